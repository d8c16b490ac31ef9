pub mod auth_dto;
pub mod chat_dto;
pub mod content_dto;
pub mod course_dto;
pub mod quiz_dto;
pub mod user_dto;
