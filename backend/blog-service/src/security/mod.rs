/// Security primitives for blog-service
///
/// - **password**: Argon2id password hashing
/// - **token**: HS256 bearer credential issue/verify
pub mod password;
pub mod token;

pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};
