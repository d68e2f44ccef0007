//! Shared application state and route wiring, used by `main` and tests

use std::sync::Arc;

use actix_web::web;

use crate::config::{Config, UploadConfig};
use crate::images::ImageStore;
use crate::repository::BlogRepository;
use crate::rest_api;
use crate::schema::{build_schema, BlogSchema};
use crate::security::TokenService;
use crate::services::{PostService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub schema: BlogSchema,
    pub repo: Arc<dyn BlogRepository>,
    pub images: ImageStore,
    pub uploads: UploadConfig,
    pub tokens: TokenService,
    pub playground: bool,
}

impl AppState {
    pub fn new(config: &Config, repo: Arc<dyn BlogRepository>) -> Self {
        let tokens = TokenService::new(&config.jwt);
        let images = ImageStore::new(config.uploads.images_dir.clone());

        let users = UserService::new(repo.clone(), tokens.clone());
        let posts = PostService::new(repo.clone(), images.clone(), config.graphql.posts_per_page);
        let schema = build_schema(users, posts, &config.graphql);

        Self {
            schema,
            repo,
            images,
            uploads: config.uploads.clone(),
            tokens,
            playground: config.graphql.playground,
        }
    }

    /// Register app data and routes. The caller wraps the app with `AuthGate`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.schema.clone()))
            .app_data(web::Data::from(self.repo.clone()))
            .app_data(web::Data::new(self.images.clone()))
            .app_data(web::Data::new(self.uploads.clone()));
        rest_api::configure(cfg, self.playground);
    }
}
