//! GraphQL schema for the blog API
//!
//! Resolvers stay thin: they pull the request's `AuthState` from context,
//! call into `services`, and convert `BlogError` with `ResultExt::extend`
//! so clients receive `{ message, extensions: { status, data } }`.

pub mod auth;
pub mod post;
pub mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::GraphQLConfig;
use crate::services::{PostService, UserService};

/// Root query object
#[derive(MergedObject, Default)]
pub struct QueryRoot(user::UserQuery, post::PostQuery, auth::AuthQuery);

/// Root mutation object
#[derive(MergedObject, Default)]
pub struct MutationRoot(user::UserMutation, post::PostMutation);

pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// ISO-8601 with millisecond precision, e.g. `2024-01-01T12:00:00.000Z`
pub(crate) fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the GraphQL schema with services and query limits
pub fn build_schema(users: UserService, posts: PostService, config: &GraphQLConfig) -> BlogSchema {
    let mut builder = Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(users)
        .data(posts)
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);

    if !config.introspection {
        builder = builder.disable_introspection();
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;
    use crate::images::ImageStore;
    use crate::repository::InMemoryBlogRepository;
    use crate::security::TokenService;
    use std::sync::Arc;

    fn schema() -> BlogSchema {
        let repo = Arc::new(InMemoryBlogRepository::new());
        let tokens = TokenService::new(&JwtConfig {
            secret: "a".repeat(32),
            issuer: "blog-service".to_string(),
            expiry_seconds: 3600,
        });
        build_schema(
            UserService::new(repo.clone(), tokens),
            PostService::new(repo, ImageStore::new("images"), 2),
            &GraphQLConfig::default(),
        )
    }

    #[test]
    fn test_schema_builds() {
        let sdl = schema().sdl();
        assert!(sdl.contains("type Query"));
        assert!(sdl.contains("type Mutation"));
        assert!(sdl.contains("getPosts"));
        assert!(sdl.contains("createUser"));
        assert!(!sdl.contains("passwordHash"));
    }

    #[tokio::test]
    async fn test_health_query() {
        let result = schema().execute("{ health }").await;

        assert!(result.errors.is_empty());
        assert_eq!(result.data.to_string(), r#"{health: "ok"}"#);
    }

    #[test]
    fn test_iso_timestamp() {
        let ts = DateTime::parse_from_rfc3339("2024-01-02T03:04:05.678Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(iso_timestamp(ts), "2024-01-02T03:04:05.678Z");
    }
}
