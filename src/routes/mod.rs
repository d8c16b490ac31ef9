pub mod auth;
pub mod chat;
pub mod courses;
pub mod health;
pub mod lessons;
pub mod modules;
pub mod quizzes;
pub mod users;
