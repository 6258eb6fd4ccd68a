//! One client per resource type.
//!
//! Every operation issues exactly one HTTP call with credentials, funnels
//! non-2xx responses through the central status-to-message mapping with its
//! own action label, and returns the body as a typed model. Clients are
//! stateless; clone the `Arc<Http>` freely.

pub mod courses;
pub mod departments;
pub mod files;
pub mod levels;
pub mod stats;
pub mod users;

pub use courses::CoursesClient;
pub use departments::DepartmentsClient;
pub use files::FilesClient;
pub use levels::LevelsClient;
pub use stats::StatsClient;
pub use users::UsersClient;
