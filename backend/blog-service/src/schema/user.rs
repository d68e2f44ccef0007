//! User schema and resolvers

use async_graphql::{
    ComplexObject, Context, InputObject, Object, Result as GraphQLResult, ResultExt, SimpleObject,
    ID,
};
use uuid::Uuid;

use super::iso_timestamp;
use super::post::Post;
use crate::middleware::auth_state;
use crate::models;
use crate::services::{CreateUserInput, PostService, UserService};

#[derive(SimpleObject, Clone, Debug)]
#[graphql(complex)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[graphql(skip)]
    pub user_id: Uuid,
}

impl From<models::User> for User {
    fn from(user: models::User) -> Self {
        User {
            id: ID(user.id.to_string()),
            name: user.name,
            email: user.email,
            status: user.status,
            created_at: iso_timestamp(user.created_at),
            updated_at: iso_timestamp(user.updated_at),
            user_id: user.id,
        }
    }
}

#[ComplexObject]
impl User {
    /// Posts authored by this user, newest first
    async fn posts(&self, ctx: &Context<'_>) -> GraphQLResult<Vec<Post>> {
        let posts = ctx.data::<PostService>()?;
        let authored = posts.posts_by_creator(self.user_id).await.extend()?;
        Ok(authored.into_iter().map(Post::from).collect())
    }
}

#[derive(InputObject, Clone, Debug)]
pub struct UserInputData {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Default)]
pub struct UserQuery;

#[Object]
impl UserQuery {
    /// The authenticated caller's profile
    async fn user(&self, ctx: &Context<'_>) -> GraphQLResult<User> {
        let users = ctx.data::<UserService>()?;
        let user = users.profile(auth_state(ctx)).await.extend()?;
        Ok(user.into())
    }
}

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInputData) -> GraphQLResult<User> {
        let users = ctx.data::<UserService>()?;
        let user = users
            .create_user(CreateUserInput {
                email: user_input.email,
                name: user_input.name,
                password: user_input.password,
            })
            .await
            .extend()?;
        Ok(user.into())
    }

    async fn update_status(&self, ctx: &Context<'_>, status: String) -> GraphQLResult<User> {
        let users = ctx.data::<UserService>()?;
        let user = users
            .update_status(auth_state(ctx), &status)
            .await
            .extend()?;
        Ok(user.into())
    }
}
