use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Full platform walk-through against a live database. Run with
/// `cargo test -- --ignored` and a DATABASE_URL pointing at a scratch
/// Postgres.
#[tokio::test]
#[ignore]
async fn platform_api_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("GEMINI_API_KEY", "test-key");
    env::set_var("FRONTEND_URL", "http://localhost:3000");
    env::set_var("SMTP_HOST", "localhost");
    env::set_var("SMTP_PORT", "587");
    env::set_var("SMTP_USER", "mailer");
    env::set_var("SMTP_PASS", "secret");
    env::set_var("MAIL_FROM", "LearnHub <no-reply@example.com>");
    env::set_var("OPEN_RPS", "100");
    env::set_var("API_RPS", "100");

    let _ = learnhub_backend::config::init_config();

    let pool = learnhub_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let app_state = learnhub_backend::AppState::new(pool.clone()).expect("state");

    let app = Router::new()
        .route("/api/auth/register", post(learnhub_backend::routes::auth::register))
        .route("/api/auth/login", post(learnhub_backend::routes::auth::login))
        .route(
            "/api/courses",
            get(learnhub_backend::routes::courses::list_courses)
                .post(learnhub_backend::routes::courses::create_course),
        )
        .route(
            "/api/courses/:id",
            get(learnhub_backend::routes::courses::get_course)
                .put(learnhub_backend::routes::courses::update_course),
        )
        .route(
            "/api/courses/:id/enroll",
            post(learnhub_backend::routes::courses::enroll),
        )
        .route(
            "/api/courses/:id/reviews",
            get(learnhub_backend::routes::courses::list_reviews)
                .post(learnhub_backend::routes::courses::create_review),
        )
        .route(
            "/api/courses/:id/modules",
            post(learnhub_backend::routes::modules::create_module),
        )
        .route(
            "/api/modules/:id/lessons",
            post(learnhub_backend::routes::modules::create_lesson),
        )
        .route(
            "/api/courses/:id/quizzes",
            post(learnhub_backend::routes::quizzes::create_quiz_for_course),
        )
        .route(
            "/api/quizzes/:id",
            get(learnhub_backend::routes::quizzes::get_quiz),
        )
        .route(
            "/api/quizzes/:id/questions",
            post(learnhub_backend::routes::quizzes::add_question),
        )
        .route(
            "/api/quizzes/:id/submit",
            post(learnhub_backend::routes::quizzes::submit_quiz),
        )
        .route(
            "/api/quizzes/:id/result/:submission_id",
            get(learnhub_backend::routes::quizzes::get_submission_result),
        )
        .with_state(app_state);

    let run = Uuid::new_v4().simple().to_string();

    // Register an account and promote it to instructor directly in the
    // database; registration itself only ever grants learner.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "first_name": "Ina",
                        "last_name": "Structor",
                        "email": format!("instructor_{run}@example.com"),
                        "password": "password1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["user"]["roles"], json!(["learner"]));
    let instructor_id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();

    sqlx::query("UPDATE users SET roles = $2 WHERE id = $1")
        .bind(instructor_id)
        .bind(vec!["instructor".to_string()])
        .execute(&pool)
        .await
        .expect("promote");

    // Log in again so the token carries the instructor role.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "email": format!("instructor_{run}@example.com"),
                        "password": "password1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let instructor_token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    // Course, published right away so a learner can enroll.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/courses")
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(
                    json!({
                        "title": "Intro to Geography",
                        "description": "Capitals of the world",
                        "category": "geography",
                        "price": 0.0,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let course_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/api/courses/{course_id}"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(json!({ "is_published": true }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Module and lesson under it.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/courses/{course_id}/modules"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(json!({ "title": "Europe" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let module_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/modules/{module_id}/lessons"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(
                    json!({ "title": "Capitals", "lesson_type": "text" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Quiz with a pass threshold and two auto-graded questions.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/courses/{course_id}/quizzes"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(
                    json!({
                        "title": "Capitals check",
                        "passing_score_percentage": 50.0,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let quiz_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/quizzes/{quiz_id}/questions"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(
                    json!({
                        "text": "Capital of France?",
                        "question_type": "single_choice",
                        "options": [
                            { "text": "Paris", "is_correct": true },
                            { "text": "London" },
                        ],
                        "points": 2,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let question_one = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/quizzes/{quiz_id}/questions"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&instructor_token))
                .body(Body::from(
                    json!({
                        "text": "The Earth is flat.",
                        "question_type": "true_false",
                        "correct_answer": false,
                        "points": 2,
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let question_two = body_json(response).await["id"].as_str().unwrap().to_string();

    // Learner signs up and enrolls.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "first_name": "Lea",
                        "last_name": "Rner",
                        "email": format!("learner_{run}@example.com"),
                        "password": "password1",
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let learner_token = body_json(response).await["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/courses/{course_id}/enroll"))
                .header("authorization", bearer(&learner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Enrolling twice is a conflict, not a second row.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/courses/{course_id}/enroll"))
                .header("authorization", bearer(&learner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The learner-facing quiz never leaks answer keys.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/quizzes/{quiz_id}"))
                .header("authorization", bearer(&learner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total_questions"], json!(2));
    let rendered = body.to_string();
    assert!(!rendered.contains("is_correct"));
    assert!(!rendered.contains("correct_answer"));

    // One right choice, one wrong true/false: 2 of 4 points, threshold 50
    // is inclusive so the attempt passes.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/quizzes/{quiz_id}/submit"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&learner_token))
                .body(Body::from(
                    json!({
                        "answers": [
                            { "question_id": question_one, "answer": "Paris" },
                            { "question_id": question_two, "answer": true },
                        ],
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["score"], json!(2));
    assert_eq!(body["total_questions"], json!(2));
    assert_eq!(body["percentage_score"], json!(50.0));
    assert_eq!(body["is_passed"], json!(true));
    let submission_id = body["submission_id"].as_str().unwrap().to_string();

    // A second attempt is rejected outright.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/quizzes/{quiz_id}/submit"))
                .header("content-type", "application/json")
                .header("authorization", bearer(&learner_token))
                .body(Body::from(json!({ "answers": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The submitter can read the stored result back.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/quizzes/{quiz_id}/result/{submission_id}"))
                .header("authorization", bearer(&learner_token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["score"], json!(2));
    assert_eq!(body["total_possible_points"], json!(4));

    // Reviews: posting twice keeps one row and refreshes the course average.
    for rating in [2, 5] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/courses/{course_id}/reviews"))
                    .header("content-type", "application/json")
                    .header("authorization", bearer(&learner_token))
                    .body(Body::from(
                        json!({ "rating": rating, "comment": "changed my mind" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/courses/{course_id}/reviews"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["rating"], json!(5));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(format!("/api/courses/{course_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["average_rating"], json!(5.0));
    assert_eq!(body["total_enrollments"], json!(1));

    // The denormalized course aggregates always agree with the rows they
    // summarize, including after the rejected duplicate enrollment.
    let course_uuid = Uuid::parse_str(&course_id).unwrap();
    let (stored_enrollments, stored_average): (i32, Option<f64>) =
        sqlx::query_as("SELECT total_enrollments, average_rating FROM courses WHERE id = $1")
            .bind(course_uuid)
            .fetch_one(&pool)
            .await
            .expect("course aggregates");
    let actual_enrollments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
            .bind(course_uuid)
            .fetch_one(&pool)
            .await
            .expect("enrollment count");
    let actual_average: Option<f64> = sqlx::query_scalar(
        "SELECT AVG(rating)::double precision FROM reviews WHERE course_id = $1",
    )
    .bind(course_uuid)
    .fetch_one(&pool)
    .await
    .expect("review average");
    assert_eq!(i64::from(stored_enrollments), actual_enrollments);
    assert_eq!(stored_average, actual_average);

    // Unknown quiz id: clean 404, no record.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/api/quizzes/{}/submit", Uuid::new_v4()))
                .header("content-type", "application/json")
                .header("authorization", bearer(&learner_token))
                .body(Body::from(json!({ "answers": [] }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
