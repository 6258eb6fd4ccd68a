pub mod auth;
pub mod courses;
pub mod departments;
pub mod files;
pub mod levels;
pub mod stats;
pub mod users;
