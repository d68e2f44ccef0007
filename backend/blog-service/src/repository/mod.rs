mod memory_repository;
mod postgres_repository;
mod r#trait;

pub use memory_repository::InMemoryBlogRepository;
pub use postgres_repository::PostgresBlogRepository;
pub use r#trait::BlogRepository;
