//! Authentication schema and resolvers

use async_graphql::{Context, Object, Result as GraphQLResult, ResultExt, SimpleObject};
use serde::{Deserialize, Serialize};

use crate::services::UserService;

#[derive(SimpleObject, Clone, Debug, Serialize, Deserialize)]
pub struct AuthData {
    pub token: String,
    pub user_id: String,
    pub expires_in: i64,
}

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    async fn health(&self) -> &str {
        "ok"
    }

    /// Exchange credentials for a bearer token
    async fn login(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> GraphQLResult<AuthData> {
        let users = ctx.data::<UserService>()?;
        let result = users.login(&email, &password).await.extend()?;

        Ok(AuthData {
            token: result.token,
            user_id: result.user_id.to_string(),
            expires_in: result.expires_in,
        })
    }
}
