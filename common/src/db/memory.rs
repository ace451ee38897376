// In-memory stores with the same contracts as the MySQL repositories

use crate::db::repositories::{PostStore, RecordStore, UserStore};
use crate::errors::DatabaseError;
use crate::models::{NewPost, NewUser, Post, User, UserChanges};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    next_user_id: i64,
    next_post_id: i64,
    fail_writes: bool,
}

impl Tables {
    fn check_writable(&self) -> Result<(), DatabaseError> {
        if self.fail_writes {
            return Err(DatabaseError::QueryFailed("simulated write failure".to_string()));
        }
        Ok(())
    }
}

/// Shared in-memory database implementing every store trait.
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A panicking test thread must not wedge the others
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make every subsequent write fail, leaving contents untouched
    pub fn fail_writes(&self, fail: bool) {
        self.tables().fail_writes = fail;
    }

    pub fn user_count(&self) -> usize {
        self.tables().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.tables().posts.len()
    }

    /// Insert or overwrite posts directly, bypassing write failures
    pub fn seed_posts(&self, posts: impl IntoIterator<Item = Post>) {
        let mut tables = self.tables();
        for post in posts {
            tables.next_post_id = tables.next_post_id.max(post.id);
            tables.posts.insert(post.id, post);
        }
    }

    /// Insert or overwrite users directly, bypassing write failures
    pub fn seed_users(&self, users: impl IntoIterator<Item = User>) {
        let mut tables = self.tables();
        for user in users {
            tables.next_user_id = tables.next_user_id.max(user.id);
            tables.users.insert(user.id, user);
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables().users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        let id = match user.id {
            Some(id) if tables.users.contains_key(&id) => {
                return Err(DatabaseError::DuplicateKey(format!("users.id {}", id)));
            }
            Some(id) => id,
            None => tables.next_user_id + 1,
        };
        tables.next_user_id = tables.next_user_id.max(id);

        let created = User {
            id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            address: user.address.clone(),
            phone: user.phone.clone(),
            website: user.website.clone(),
            company: user.company.clone(),
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("User not found: {}", id)))?;
        user.name = changes.name.clone();
        user.username = changes.username.clone();
        user.email = changes.email.clone();
        user.phone = changes.phone.clone();
        user.website = changes.website.clone();
        if let Some(address) = &changes.address {
            user.address = Some(address.clone());
        }
        if let Some(company) = &changes.company {
            user.company = Some(company.clone());
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("User not found: {}", id)))
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Post>, DatabaseError> {
        Ok(self.tables().posts.values().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        Ok(self.tables().posts.get(&id).cloned())
    }

    async fn create(&self, post: &NewPost) -> Result<Post, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables.next_post_id += 1;
        let created = Post {
            id: tables.next_post_id,
            user_id: post.user_id,
            title: post.title.clone(),
            body: post.body.clone(),
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, title: &str, body: &str) -> Result<Post, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        let post = tables
            .posts
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Post not found: {}", id)))?;
        post.title = title.to_string();
        post.body = body.to_string();
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables
            .posts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::NotFound(format!("Post not found: {}", id)))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn replace_users(&self, users: &[User]) -> Result<u64, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables.users = users.iter().map(|u| (u.id, u.clone())).collect();
        tables.next_user_id = tables.users.keys().max().copied().unwrap_or(0);
        Ok(tables.users.len() as u64)
    }

    async fn replace_posts(&self, posts: &[Post]) -> Result<u64, DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables.posts = posts.iter().map(|p| (p.id, p.clone())).collect();
        tables.next_post_id = tables.posts.keys().max().copied().unwrap_or(0);
        Ok(tables.posts.len() as u64)
    }

    async fn clear_all(&self) -> Result<(), DatabaseError> {
        let mut tables = self.tables();
        tables.check_writable()?;

        tables.users.clear();
        tables.posts.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, title: &str) -> Post {
        Post {
            id,
            user_id: Some(1),
            title: title.to_string(),
            body: format!("{} body", title),
        }
    }

    #[tokio::test]
    async fn test_posts_listed_newest_first() {
        let store = MemoryStore::new();
        store.seed_posts(vec![post(1, "a"), post(2, "b"), post(3, "c")]);

        let ids: Vec<i64> = PostStore::find_all(&store)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_update_missing_post_is_not_found() {
        let store = MemoryStore::new();
        let err = PostStore::update(&store, 9, "t", "b").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_contents() {
        let store = MemoryStore::new();
        store.seed_posts(vec![post(1, "a")]);
        store.fail_writes(true);

        assert!(store.replace_posts(&[]).await.is_err());
        assert_eq!(store.post_count(), 1);
    }

    #[tokio::test]
    async fn test_create_post_after_replace_continues_ids() {
        let store = MemoryStore::new();
        store.replace_posts(&[post(10, "a")]).await.unwrap();
        let created = PostStore::create(
            &store,
            &NewPost {
                user_id: None,
                title: "new".to_string(),
                body: "body".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.id, 11);
    }
}
