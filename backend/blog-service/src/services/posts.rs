/// Post service - handles post creation, retrieval, update and deletion
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;

use crate::error::{BlogError, Result};
use crate::images::ImageStore;
use crate::middleware::{check_post_ownership, require_auth, AuthState, PostAction};
use crate::models::{NewPost, Post, PostChanges};
use crate::repository::BlogRepository;
use crate::validators::validate_post_input;

/// Sent by clients that did not pick a new image when editing
const UNCHANGED_IMAGE_MARKER: &str = "undefined";

#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_posts: i64,
}

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn BlogRepository>,
    images: ImageStore,
    posts_per_page: i64,
}

fn not_found() -> BlogError {
    BlogError::NotFound("No post found".into())
}

/// Malformed ids cannot name an existing post
fn parse_post_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found())
}

impl PostService {
    pub fn new(repo: Arc<dyn BlogRepository>, images: ImageStore, posts_per_page: i64) -> Self {
        Self {
            repo,
            images,
            posts_per_page: posts_per_page.max(1),
        }
    }

    pub async fn create_post(&self, auth: &AuthState, input: PostInput) -> Result<Post> {
        let user_id = require_auth(auth)?;
        validate_post_input(&input.title, &input.content)?;

        if self.repo.find_user_by_id(user_id).await?.is_none() {
            return Err(BlogError::InvalidCredentials("Invalid user".into()));
        }

        let post = self
            .repo
            .create_post(NewPost {
                title: input.title,
                content: input.content,
                image_url: input.image_url,
                creator_id: user_id,
            })
            .await?;

        info!(post_id = %post.id, user_id = %user_id, "Post created");
        Ok(post)
    }

    /// One page of posts, newest first. Pages start at 1.
    pub async fn list_posts(&self, auth: &AuthState, page: Option<i32>) -> Result<PostPage> {
        require_auth(auth)?;

        let page = i64::from(page.unwrap_or(1).max(1));
        let offset = (page - 1) * self.posts_per_page;

        let total_posts = self.repo.count_posts().await?;
        let posts = self.repo.list_posts(self.posts_per_page, offset).await?;

        Ok(PostPage { posts, total_posts })
    }

    pub async fn get_post(&self, auth: &AuthState, id: &str) -> Result<Post> {
        require_auth(auth)?;
        let post_id = parse_post_id(id)?;

        self.repo.find_post(post_id).await?.ok_or_else(not_found)
    }

    pub async fn update_post(&self, auth: &AuthState, id: &str, input: PostInput) -> Result<Post> {
        let user_id = require_auth(auth)?;
        let post_id = parse_post_id(id)?;

        let post = self.repo.find_post(post_id).await?.ok_or_else(not_found)?;
        check_post_ownership(user_id, &post, PostAction::Edit)?;
        validate_post_input(&input.title, &input.content)?;

        let image_url = Some(input.image_url)
            .filter(|url| !url.is_empty() && url != UNCHANGED_IMAGE_MARKER);

        let updated = self
            .repo
            .update_post(
                post_id,
                PostChanges {
                    title: input.title,
                    content: input.content,
                    image_url,
                },
            )
            .await?
            .ok_or_else(not_found)?;

        info!(post_id = %post_id, user_id = %user_id, "Post updated");
        Ok(updated)
    }

    /// Delete a post, drop it from the owner's list and clear its image
    pub async fn delete_post(&self, auth: &AuthState, id: &str) -> Result<bool> {
        let user_id = require_auth(auth)?;
        let post_id = parse_post_id(id)?;

        let post = self.repo.find_post(post_id).await?.ok_or_else(not_found)?;
        check_post_ownership(user_id, &post, PostAction::Delete)?;

        if let Err(e) = self.repo.delete_post(post_id).await {
            error!(post_id = %post_id, error = %e, "Deleting post failed");
            return Err(BlogError::Internal("Deleting post failed".into()));
        }
        self.images.clear(&post.image_url).await;

        info!(post_id = %post_id, user_id = %user_id, "Post deleted");
        Ok(true)
    }

    /// Posts authored by `user_id`, used by `User.posts`
    pub async fn posts_by_creator(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.repo.find_posts_by_creator(user_id).await
    }
}
