pub mod course;
pub mod course_module;
pub mod enrollment;
pub mod lesson;
pub mod question;
pub mod quiz;
pub mod review;
pub mod submission;
pub mod user;
