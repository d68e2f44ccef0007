/// HTTP routes
///
/// ```text
/// POST /graphql          GraphQL endpoint
/// GET  /graphql          GraphiQL (when enabled)
/// GET  /graphql/schema   SDL
/// PUT  /post-image       multipart image upload
/// GET  /images/{file}    stored images
/// GET  /health           liveness
/// ```
pub mod graphql;
pub mod images;
pub mod upload;

use actix_web::web;

pub use graphql::{graphql_handler, health_handler, playground_handler, schema_handler};
pub use images::serve_image;
pub use upload::upload_post_image;

/// Register every route on an app or scope
pub fn configure(cfg: &mut web::ServiceConfig, playground: bool) {
    let mut graphql = web::resource("/graphql").route(web::post().to(graphql_handler));
    if playground {
        graphql = graphql.route(web::get().to(playground_handler));
    }

    cfg.service(graphql)
        .route("/graphql/schema", web::get().to(schema_handler))
        .route("/post-image", web::put().to(upload_post_image))
        .route("/images/{file}", web::get().to(serve_image))
        .route("/health", web::get().to(health_handler));
}
