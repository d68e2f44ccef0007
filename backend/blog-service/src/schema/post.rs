//! Post schema and resolvers

use async_graphql::{
    ComplexObject, Context, InputObject, Object, Result as GraphQLResult, ResultExt, SimpleObject,
    ID,
};
use uuid::Uuid;

use super::iso_timestamp;
use super::user::User;
use crate::error::BlogError;
use crate::middleware::auth_state;
use crate::models;
use crate::services::{PostInput, PostService, UserService};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct Post {
    pub id: ID,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
    #[graphql(skip)]
    pub creator_id: Uuid,
}

impl From<models::Post> for Post {
    fn from(post: models::Post) -> Self {
        Post {
            id: ID(post.id.to_string()),
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            created_at: iso_timestamp(post.created_at),
            updated_at: iso_timestamp(post.updated_at),
            creator_id: post.creator_id,
        }
    }
}

#[ComplexObject]
impl Post {
    async fn creator(&self, ctx: &Context<'_>) -> GraphQLResult<User> {
        let users = ctx.data::<UserService>()?;
        let creator = users
            .find_by_id(self.creator_id)
            .await
            .and_then(|user| user.ok_or_else(|| BlogError::NotFound("No user found".into())))
            .extend()?;
        Ok(creator.into())
    }
}

#[derive(SimpleObject, Clone, Debug)]
pub struct PostData {
    pub posts: Vec<Post>,
    pub total_posts: i64,
}

#[derive(InputObject, Clone, Debug)]
pub struct PostInputData {
    pub title: String,
    pub content: String,
    /// Path returned by `PUT /post-image`. On update, `"undefined"` keeps the current image.
    pub image_url: String,
}

impl From<PostInputData> for PostInput {
    fn from(input: PostInputData) -> Self {
        PostInput {
            title: input.title,
            content: input.content,
            image_url: input.image_url,
        }
    }
}

#[derive(Default)]
pub struct PostQuery;

#[Object]
impl PostQuery {
    /// Newest posts first, paginated
    async fn get_posts(&self, ctx: &Context<'_>, page: Option<i32>) -> GraphQLResult<PostData> {
        let posts = ctx.data::<PostService>()?;
        let page = posts.list_posts(auth_state(ctx), page).await.extend()?;

        Ok(PostData {
            posts: page.posts.into_iter().map(Post::from).collect(),
            total_posts: page.total_posts,
        })
    }

    async fn get_single_post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<Post> {
        let posts = ctx.data::<PostService>()?;
        let post = posts.get_post(auth_state(ctx), &id).await.extend()?;
        Ok(post.into())
    }
}

#[derive(Default)]
pub struct PostMutation;

#[Object]
impl PostMutation {
    async fn create_post(&self, ctx: &Context<'_>, post_input: PostInputData) -> GraphQLResult<Post> {
        let posts = ctx.data::<PostService>()?;
        let post = posts
            .create_post(auth_state(ctx), post_input.into())
            .await
            .extend()?;
        Ok(post.into())
    }

    async fn update_post(
        &self,
        ctx: &Context<'_>,
        id: ID,
        post_input: PostInputData,
    ) -> GraphQLResult<Post> {
        let posts = ctx.data::<PostService>()?;
        let post = posts
            .update_post(auth_state(ctx), &id, post_input.into())
            .await
            .extend()?;
        Ok(post.into())
    }

    async fn delete_post(&self, ctx: &Context<'_>, id: ID) -> GraphQLResult<bool> {
        let posts = ctx.data::<PostService>()?;
        posts.delete_post(auth_state(ctx), &id).await.extend()
    }
}
