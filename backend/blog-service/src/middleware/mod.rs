//! Blog Service Middleware

pub mod auth_gate;
pub mod guards;

pub use auth_gate::{AuthGate, AuthState, AuthenticatedUser};
pub use guards::{auth_state, check_post_ownership, require_auth, PostAction};
