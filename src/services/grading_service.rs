use crate::models::question::{CorrectAnswer, Question, QuestionType};
use crate::models::submission::{AnswerValue, QuestionResult, SubmittedAnswer};

#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub score: i32,
    pub total_possible_points: i32,
    pub percentage: f64,
    pub is_passed: bool,
    pub per_question: Vec<QuestionResult>,
}

pub struct GradingService;

impl GradingService {
    /// Grades one submission in a single pass over the quiz's questions.
    ///
    /// Answers may arrive in any order and may cover any subset of the
    /// quiz; unanswered questions score zero and answers referencing
    /// unknown question ids are ignored. Pure and deterministic: no clock,
    /// no storage, same inputs always produce the same outcome.
    ///
    /// Every question's points count toward `total_possible_points`, so a
    /// quiz containing essay or short-answer questions (never auto-awarded)
    /// caps the achievable percentage below 100.
    pub fn grade_submission(
        questions: &[Question],
        answers: &[SubmittedAnswer],
        passing_score_percentage: Option<f64>,
    ) -> GradeOutcome {
        let mut score: i32 = 0;
        let mut total_possible_points: i32 = 0;
        let mut per_question = Vec::with_capacity(questions.len());

        for question in questions {
            total_possible_points += question.points;
            let submitted = answers.iter().find(|a| a.question_id == question.id);

            let (is_correct, auto_graded) = match question.question_type {
                QuestionType::SingleChoice | QuestionType::MultipleChoice => {
                    (choice_matches(question, submitted), true)
                }
                QuestionType::TrueFalse => (true_false_matches(question, submitted), true),
                QuestionType::ShortAnswer | QuestionType::Essay => (false, false),
            };

            let awarded_points = if is_correct { question.points } else { 0 };
            score += awarded_points;
            per_question.push(QuestionResult {
                question_id: question.id,
                awarded_points,
                max_points: question.points,
                is_correct,
                auto_graded,
            });
        }

        let percentage = if total_possible_points > 0 {
            f64::from(score) / f64::from(total_possible_points) * 100.0
        } else {
            0.0
        };
        let is_passed = match passing_score_percentage {
            Some(threshold) => percentage >= threshold,
            None => true,
        };

        GradeOutcome {
            score,
            total_possible_points,
            percentage,
            is_passed,
            per_question,
        }
    }
}

/// Exact, case-sensitive match against the first option flagged correct in
/// declared order. When several options are flagged, the first one stays
/// authoritative for single_choice and multiple_choice alike.
fn choice_matches(question: &Question, submitted: Option<&SubmittedAnswer>) -> bool {
    let Some(SubmittedAnswer {
        answer: AnswerValue::Text(text),
        ..
    }) = submitted
    else {
        return false;
    };
    question
        .options
        .iter()
        .find(|o| o.is_correct)
        .map(|o| o.text == *text)
        .unwrap_or(false)
}

/// Boolean true or the literal string "true" count as true; any other
/// submitted value coerces to false before comparison. An unanswered
/// question is incorrect, not coerced.
fn true_false_matches(question: &Question, submitted: Option<&SubmittedAnswer>) -> bool {
    let expected = match question.correct_answer.as_deref() {
        Some(CorrectAnswer::Bool(b)) => *b,
        _ => return false,
    };
    let Some(answer) = submitted else {
        return false;
    };
    let given = match &answer.answer {
        AnswerValue::Bool(b) => *b,
        AnswerValue::Text(s) => s == "true",
        _ => false,
    };
    given == expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuestionOption;
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn question(
        question_type: QuestionType,
        options: Vec<(&str, bool)>,
        correct_answer: Option<CorrectAnswer>,
        points: i32,
    ) -> Question {
        Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            text: "q".to_string(),
            question_type,
            options: Json(
                options
                    .into_iter()
                    .map(|(text, is_correct)| QuestionOption {
                        text: text.to_string(),
                        is_correct,
                    })
                    .collect(),
            ),
            correct_answer: correct_answer.map(Json),
            points,
            position: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn answer(question_id: Uuid, value: AnswerValue) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id,
            answer: value,
        }
    }

    fn text(s: &str) -> AnswerValue {
        AnswerValue::Text(s.to_string())
    }

    #[test]
    fn empty_quiz_scores_zero_and_passes_without_threshold() {
        let outcome = GradingService::grade_submission(&[], &[], None);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_possible_points, 0);
        assert_eq!(outcome.percentage, 0.0);
        assert!(outcome.is_passed);
        assert!(outcome.per_question.is_empty());
    }

    #[test]
    fn empty_quiz_with_threshold_fails() {
        let outcome = GradingService::grade_submission(&[], &[], Some(50.0));
        assert!(!outcome.is_passed);
    }

    #[test]
    fn true_false_worth_two_points_full_marks() {
        let q = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            2,
        );
        let answers = vec![answer(q.id, text("true"))];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.percentage, 100.0);
        assert!(outcome.is_passed);
    }

    #[test]
    fn true_false_accepts_boolean_value() {
        let q = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let answers = vec![answer(q.id, AnswerValue::Bool(true))];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn true_false_coerces_non_true_values_to_false() {
        let q = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(false)),
            1,
        );
        // "yes" is not the literal "true", so it coerces to false and
        // matches a false key.
        let answers = vec![answer(q.id, text("yes"))];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 1);

        // But an unanswered question is incorrect, not coerced.
        let outcome = GradingService::grade_submission(
            &[question(
                QuestionType::TrueFalse,
                vec![],
                Some(CorrectAnswer::Bool(false)),
                1,
            )],
            &[],
            None,
        );
        assert_eq!(outcome.score, 0);
    }

    #[test]
    fn single_choice_wrong_option_fails_threshold() {
        let q = question(
            QuestionType::SingleChoice,
            vec![("Paris", true), ("London", false)],
            None,
            1,
        );
        let answers = vec![answer(q.id, text("London"))];
        let outcome = GradingService::grade_submission(&[q], &answers, Some(50.0));
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.percentage, 0.0);
        assert!(!outcome.is_passed);
    }

    #[test]
    fn single_choice_match_is_case_sensitive_and_untrimmed() {
        let q = question(
            QuestionType::SingleChoice,
            vec![("Paris", true), ("London", false)],
            None,
            1,
        );
        for wrong in ["paris", " Paris", "Paris "] {
            let answers = vec![answer(q.id, text(wrong))];
            let outcome = GradingService::grade_submission(
                std::slice::from_ref(&q),
                &answers,
                None,
            );
            assert_eq!(outcome.score, 0, "{:?} should not match", wrong);
        }
        let answers = vec![answer(q.id, text("Paris"))];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 1);
    }

    #[test]
    fn first_flagged_option_is_authoritative_when_several_are_correct() {
        let q = question(
            QuestionType::MultipleChoice,
            vec![("A", false), ("B", true), ("C", true)],
            None,
            3,
        );
        let answers = vec![answer(q.id, text("C"))];
        let outcome = GradingService::grade_submission(std::slice::from_ref(&q), &answers, None);
        assert_eq!(outcome.score, 0);

        let answers = vec![answer(q.id, text("B"))];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 3);
    }

    #[test]
    fn essay_points_count_toward_denominator_but_never_score() {
        let essay = question(QuestionType::Essay, vec![], None, 3);
        let tf = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let answers = vec![
            answer(essay.id, text("a thoughtful response")),
            answer(tf.id, text("true")),
        ];
        let outcome = GradingService::grade_submission(&[essay, tf], &answers, None);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total_possible_points, 4);
        assert_eq!(outcome.percentage, 25.0);
        let essay_result = &outcome.per_question[0];
        assert!(!essay_result.auto_graded);
        assert_eq!(essay_result.awarded_points, 0);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let q = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let answers = vec![
            answer(Uuid::new_v4(), text("true")),
            answer(q.id, text("true")),
        ];
        let outcome = GradingService::grade_submission(&[q], &answers, None);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.per_question.len(), 1);
    }

    #[test]
    fn score_never_exceeds_total_and_grading_is_idempotent() {
        let questions = vec![
            question(
                QuestionType::SingleChoice,
                vec![("x", true), ("y", false)],
                None,
                2,
            ),
            question(
                QuestionType::TrueFalse,
                vec![],
                Some(CorrectAnswer::Bool(false)),
                5,
            ),
            question(QuestionType::ShortAnswer, vec![], None, 4),
        ];
        let answers = vec![
            answer(questions[0].id, text("x")),
            answer(questions[1].id, text("false")),
            answer(questions[2].id, text("whatever")),
        ];

        let first = GradingService::grade_submission(&questions, &answers, Some(60.0));
        assert!(first.score >= 0 && first.score <= first.total_possible_points);
        assert_eq!(first.total_possible_points, 11);
        assert_eq!(first.score, 7);

        let second = GradingService::grade_submission(&questions, &answers, Some(60.0));
        assert_eq!(first, second);
    }

    #[test]
    fn answer_order_does_not_affect_the_result() {
        let q1 = question(
            QuestionType::SingleChoice,
            vec![("a", true), ("b", false)],
            None,
            1,
        );
        let q2 = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let forward = vec![answer(q1.id, text("a")), answer(q2.id, text("true"))];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let questions = vec![q1, q2];
        let a = GradingService::grade_submission(&questions, &forward, Some(100.0));
        let b = GradingService::grade_submission(&questions, &reversed, Some(100.0));
        assert_eq!(a, b);
        assert!(a.is_passed);
    }

    #[test]
    fn passing_is_inclusive_of_the_threshold() {
        let q1 = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let q2 = question(
            QuestionType::TrueFalse,
            vec![],
            Some(CorrectAnswer::Bool(true)),
            1,
        );
        let answers = vec![answer(q1.id, text("true"))];
        let outcome = GradingService::grade_submission(&[q1, q2], &answers, Some(50.0));
        assert_eq!(outcome.percentage, 50.0);
        assert!(outcome.is_passed);
    }
}
