//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    dev::{Service, ServiceResponse},
    test, App, Error,
};
use serde_json::{json, Value};

use blog_service::config::{
    Config, DatabaseConfig, GraphQLConfig, JwtConfig, ServerConfig, StorageBackend, UploadConfig,
};
use blog_service::middleware::AuthGate;
use blog_service::repository::InMemoryBlogRepository;
use blog_service::AppState;

pub const JWT_SECRET: &str = "integration-test-secret-with-32-bytes!!";
pub const BOUNDARY: &str = "----blog-test-boundary";

pub fn config(images_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: 1,
        },
        database: DatabaseConfig {
            backend: StorageBackend::Memory,
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
            issuer: "blog-service".to_string(),
            expiry_seconds: 3600,
        },
        uploads: UploadConfig {
            images_dir: images_dir.to_path_buf(),
            max_upload_bytes: 1024,
        },
        graphql: GraphQLConfig::default(),
    }
}

pub fn state(images_dir: &Path) -> AppState {
    AppState::new(&config(images_dir), Arc::new(InMemoryBlogRepository::new()))
}

pub async fn init_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse, Error = Error> {
    test::init_service(
        App::new()
            .wrap(AuthGate::new(state.tokens.clone()))
            .configure(|cfg| state.configure(cfg)),
    )
    .await
}

/// POST a GraphQL document, optionally with a bearer token
pub async fn graphql<S>(app: &S, token: Option<&str>, query: &str, variables: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let mut req = test::TestRequest::post()
        .uri("/graphql")
        .set_json(json!({ "query": query, "variables": variables }));
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }
    test::call_and_read_body_json(app, req.to_request()).await
}

pub async fn signup_and_login<S>(app: &S, email: &str) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    let created = graphql(
        app,
        None,
        r#"mutation($input: UserInputData!) { createUser(userInput: $input) { id } }"#,
        json!({ "input": { "email": email, "name": "Max", "password": "secret" } }),
    )
    .await;
    let user_id = created["data"]["createUser"]["id"]
        .as_str()
        .expect("user id")
        .to_string();

    let login = graphql(
        app,
        None,
        r#"query($email: String!, $password: String!) { login(email: $email, password: $password) { token userId } }"#,
        json!({ "email": email, "password": "secret" }),
    )
    .await;
    let token = login["data"]["login"]["token"]
        .as_str()
        .expect("token")
        .to_string();

    (token, user_id)
}

pub async fn create_post<S>(app: &S, token: &str, title: &str, image_url: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = Error>,
{
    graphql(
        app,
        Some(token),
        r#"mutation($input: PostInputData!) {
            createPost(postInput: $input) { id title imageUrl creator { id name } }
        }"#,
        json!({ "input": { "title": title, "content": "Some content", "imageUrl": image_url } }),
    )
    .await
}

/// First error's message and `extensions.status`
pub fn first_error(response: &Value) -> (String, i64) {
    let err = &response["errors"][0];
    (
        err["message"].as_str().unwrap_or_default().to_string(),
        err["extensions"]["status"].as_i64().unwrap_or_default(),
    )
}

/// One multipart part: (field name, optional (filename, content type), body)
pub type Part<'a> = (&'a str, Option<(&'a str, &'a str)>, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file {
            Some((filename, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    name, filename, content_type
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
