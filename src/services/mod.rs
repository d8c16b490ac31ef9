pub mod chat_service;
pub mod course_service;
pub mod enrollment_service;
pub mod grading_service;
pub mod lesson_service;
pub mod mail_service;
pub mod module_service;
pub mod quiz_service;
pub mod review_service;
pub mod submission_service;
pub mod user_service;
