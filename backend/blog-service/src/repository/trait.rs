use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewPost, NewUser, Post, PostChanges, User};

/// Storage interface for users and posts.
/// PostgresBlogRepository is the production store; InMemoryBlogRepository backs
/// tests and `STORAGE_BACKEND=memory` runs. Both uphold the same invariants:
/// - email is unique (`BlogError::Conflict` otherwise)
/// - a post's creator exists
/// - deleting a post drops it from its creator's post list
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new user with the default status
    async fn create_user(&self, new_user: NewUser) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Set a user's status. Returns `None` if the user does not exist.
    async fn update_user_status(&self, user_id: Uuid, status: &str) -> Result<Option<User>>;

    /// Insert a post and append it to its creator's post list
    async fn create_post(&self, new_post: NewPost) -> Result<Post>;

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>>;

    /// One page of posts, newest first
    async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;

    async fn count_posts(&self) -> Result<i64>;

    /// Posts authored by `user_id`, newest first
    async fn find_posts_by_creator(&self, user_id: Uuid) -> Result<Vec<Post>>;

    /// Apply `changes` and bump `updated_at`. Returns `None` if the post does not exist.
    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    /// Remove a post and its reference from the creator. Returns whether a post was removed.
    async fn delete_post(&self, post_id: Uuid) -> Result<bool>;

    /// Fails if the backing store cannot serve queries
    async fn health_check(&self) -> Result<()>;
}
