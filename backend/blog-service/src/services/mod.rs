/// Business logic layer for blog-service
///
/// - User service: registration, login, profile and status
/// - Post service: post CRUD with auth, ownership and validation checks
///
/// Resolvers and HTTP handlers stay thin and delegate here.
pub mod posts;
pub mod users;

pub use posts::{PostInput, PostPage, PostService};
pub use users::{CreateUserInput, LoginResult, UserService};
