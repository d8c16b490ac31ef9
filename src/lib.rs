pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    chat_service::ChatService, course_service::CourseService,
    enrollment_service::EnrollmentService, lesson_service::LessonService,
    mail_service::MailService, module_service::ModuleService, quiz_service::QuizService,
    review_service::ReviewService, submission_service::SubmissionService,
    user_service::UserService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub user_service: UserService,
    pub course_service: CourseService,
    pub module_service: ModuleService,
    pub lesson_service: LessonService,
    pub quiz_service: QuizService,
    pub submission_service: SubmissionService,
    pub enrollment_service: EnrollmentService,
    pub review_service: ReviewService,
    pub chat_service: ChatService,
    pub mail_service: MailService,
}

impl AppState {
    pub fn new(pool: PgPool) -> crate::error::Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(crate::error::Error::from)?;

        let user_service = UserService::new(pool.clone());
        let course_service = CourseService::new(pool.clone());
        let module_service = ModuleService::new(pool.clone());
        let lesson_service = LessonService::new(pool.clone());
        let quiz_service = QuizService::new(pool.clone());
        let submission_service = SubmissionService::new(pool.clone());
        let enrollment_service = EnrollmentService::new(pool.clone());
        let review_service = ReviewService::new(pool.clone());
        let chat_service = ChatService::new(http_client);
        let mail_service = MailService::new(config)?;

        Ok(Self {
            pool,
            user_service,
            course_service,
            module_service,
            lesson_service,
            quiz_service,
            submission_service,
            enrollment_service,
            review_service,
            chat_service,
            mail_service,
        })
    }
}
