//! Authorization helpers called by each resolver
//!
//! There is no shared policy engine: every operation calls `require_auth`
//! itself and, for post mutations, `check_post_ownership`.

use async_graphql::Context;
use uuid::Uuid;

use super::AuthState;
use crate::error::{BlogError, Result};
use crate::models::Post;

static ANONYMOUS: AuthState = AuthState::Anonymous;

/// Auth state attached to the GraphQL request; anonymous if none was attached
pub fn auth_state<'a>(ctx: &'a Context<'_>) -> &'a AuthState {
    ctx.data_opt::<AuthState>().unwrap_or(&ANONYMOUS)
}

/// Verify the caller is authenticated and return their user ID
pub fn require_auth(auth: &AuthState) -> Result<Uuid> {
    auth.user_id().ok_or(BlogError::Unauthenticated)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Edit,
    Delete,
}

/// Only a post's creator may edit or delete it
pub fn check_post_ownership(user_id: Uuid, post: &Post, action: PostAction) -> Result<()> {
    if post.creator_id == user_id {
        return Ok(());
    }

    let verb = match action {
        PostAction::Edit => "edit",
        PostAction::Delete => "delete",
    };
    Err(BlogError::Forbidden(format!(
        "You are not authorized to {} this post",
        verb
    )))
}
