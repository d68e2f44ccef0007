use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::BlogRepository;
use crate::error::{BlogError, Result};
use crate::models::{NewPost, NewUser, Post, PostChanges, User, DEFAULT_USER_STATUS};

#[derive(Default)]
struct Store {
    users: HashMap<Uuid, User>,
    /// Authored post references per user, in creation order
    user_posts: HashMap<Uuid, Vec<Uuid>>,
    /// Posts with their insertion sequence (tie-break for equal timestamps)
    posts: HashMap<Uuid, (u64, Post)>,
    next_seq: u64,
}

impl Store {
    fn newest_first(&self, mut posts: Vec<&(u64, Post)>) -> Vec<Post> {
        posts.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        posts.into_iter().map(|(_, post)| post.clone()).collect()
    }
}

/// In-process repository for tests and local development
#[derive(Default)]
pub struct InMemoryBlogRepository {
    store: RwLock<Store>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post ids currently referenced by `user_id`, in creation order
    pub async fn post_refs(&self, user_id: Uuid) -> Vec<Uuid> {
        let store = self.store.read().await;
        store.user_posts.get(&user_id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let mut store = self.store.write().await;

        if store.users.values().any(|u| u.email == new_user.email) {
            return Err(BlogError::Conflict(
                "Email already registered, please pick another one".into(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            status: DEFAULT_USER_STATUS.to_string(),
            created_at: now,
            updated_at: now,
        };
        store.users.insert(user.id, user.clone());
        store.user_posts.insert(user.id, Vec::new());

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&user_id).cloned())
    }

    async fn update_user_status(&self, user_id: Uuid, status: &str) -> Result<Option<User>> {
        let mut store = self.store.write().await;
        Ok(store.users.get_mut(&user_id).map(|user| {
            user.status = status.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let mut store = self.store.write().await;

        if !store.users.contains_key(&new_post.creator_id) {
            return Err(BlogError::InvalidCredentials("Invalid user".into()));
        }

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: new_post.title,
            content: new_post.content,
            image_url: new_post.image_url,
            creator_id: new_post.creator_id,
            created_at: now,
            updated_at: now,
        };

        let seq = store.next_seq;
        store.next_seq += 1;
        store.posts.insert(post.id, (seq, post.clone()));
        store
            .user_posts
            .entry(post.creator_id)
            .or_default()
            .push(post.id);

        Ok(post)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let store = self.store.read().await;
        Ok(store.posts.get(&post_id).map(|(_, post)| post.clone()))
    }

    async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let store = self.store.read().await;
        let all = store.newest_first(store.posts.values().collect());

        Ok(all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_posts(&self) -> Result<i64> {
        let store = self.store.read().await;
        Ok(store.posts.len() as i64)
    }

    async fn find_posts_by_creator(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let store = self.store.read().await;
        let refs = match store.user_posts.get(&user_id) {
            Some(refs) => refs,
            None => return Ok(Vec::new()),
        };

        let authored: Vec<&(u64, Post)> =
            refs.iter().filter_map(|id| store.posts.get(id)).collect();
        Ok(store.newest_first(authored))
    }

    async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let mut store = self.store.write().await;
        Ok(store.posts.get_mut(&post_id).map(|(_, post)| {
            post.title = changes.title;
            post.content = changes.content;
            if let Some(image_url) = changes.image_url {
                post.image_url = image_url;
            }
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let mut store = self.store.write().await;

        let Some((_, post)) = store.posts.remove(&post_id) else {
            return Ok(false);
        };
        if let Some(refs) = store.user_posts.get_mut(&post.creator_id) {
            refs.retain(|id| *id != post_id);
        }

        Ok(true)
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_user(repo: &InMemoryBlogRepository, email: &str) -> User {
        repo.create_user(NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Test".to_string(),
        })
        .await
        .unwrap()
    }

    fn new_post(creator_id: Uuid, title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Some content".to_string(),
            image_url: "images/a.png".to_string(),
            creator_id,
        }
    }

    #[tokio::test]
    async fn test_new_user_has_default_status() {
        let repo = InMemoryBlogRepository::new();
        let user = seed_user(&repo, "a@example.com").await;
        assert_eq!(user.status, DEFAULT_USER_STATUS);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryBlogRepository::new();
        seed_user(&repo, "a@example.com").await;

        let err = repo
            .create_user(NewUser {
                email: "a@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "Other".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_post_requires_existing_creator() {
        let repo = InMemoryBlogRepository::new();
        let err = repo
            .create_post(new_post(Uuid::new_v4(), "Title"))
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::InvalidCredentials(_)));
        assert_eq!(repo.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_post_appends_reference() {
        let repo = InMemoryBlogRepository::new();
        let user = seed_user(&repo, "a@example.com").await;

        let p1 = repo.create_post(new_post(user.id, "First")).await.unwrap();
        let p2 = repo.create_post(new_post(user.id, "Second")).await.unwrap();

        assert_eq!(repo.post_refs(user.id).await, vec![p1.id, p2.id]);
    }

    #[tokio::test]
    async fn test_delete_post_pulls_reference() {
        let repo = InMemoryBlogRepository::new();
        let user = seed_user(&repo, "a@example.com").await;
        let p1 = repo.create_post(new_post(user.id, "First")).await.unwrap();
        let p2 = repo.create_post(new_post(user.id, "Second")).await.unwrap();

        assert!(repo.delete_post(p1.id).await.unwrap());
        assert!(!repo.delete_post(p1.id).await.unwrap());

        assert_eq!(repo.post_refs(user.id).await, vec![p2.id]);
        assert!(repo.find_post(p1.id).await.unwrap().is_none());
        let authored = repo.find_posts_by_creator(user.id).await.unwrap();
        assert_eq!(authored.len(), 1);
        assert_eq!(authored[0].id, p2.id);
    }

    #[tokio::test]
    async fn test_list_posts_newest_first_with_paging() {
        let repo = InMemoryBlogRepository::new();
        let user = seed_user(&repo, "a@example.com").await;
        let mut ids = Vec::new();
        for title in ["One", "Two", "Three"] {
            ids.push(repo.create_post(new_post(user.id, title)).await.unwrap().id);
        }

        let page1 = repo.list_posts(2, 0).await.unwrap();
        let page2 = repo.list_posts(2, 2).await.unwrap();

        assert_eq!(
            page1.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![ids[2], ids[1]]
        );
        assert_eq!(page2.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[0]]);
        assert_eq!(repo.count_posts().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_post_keeps_image_when_absent() {
        let repo = InMemoryBlogRepository::new();
        let user = seed_user(&repo, "a@example.com").await;
        let post = repo.create_post(new_post(user.id, "First")).await.unwrap();

        let updated = repo
            .update_post(
                post.id,
                PostChanges {
                    title: "Changed".to_string(),
                    content: "Changed content".to_string(),
                    image_url: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Changed");
        assert_eq!(updated.image_url, "images/a.png");
        assert_eq!(updated.created_at, post.created_at);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn test_update_status_missing_user() {
        let repo = InMemoryBlogRepository::new();
        assert!(repo
            .update_user_status(Uuid::new_v4(), "busy")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_health_check() {
        assert!(InMemoryBlogRepository::new().health_check().await.is_ok());
    }
}
