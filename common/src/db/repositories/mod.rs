// Repository layer for database operations

pub mod post;
pub mod records;
pub mod user;

pub use post::PostRepository;
pub use records::RecordRepository;
pub use user::UserRepository;

use crate::errors::DatabaseError;
use crate::models::{NewPost, NewUser, Post, User, UserChanges};
use async_trait::async_trait;

/// Single-entity operations on the `users` table
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Used by login; returns the first match
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn create(&self, user: &NewUser) -> Result<User, DatabaseError>;

    /// `DatabaseError::NotFound` when no user has this id
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User, DatabaseError>;

    /// `DatabaseError::NotFound` when no user has this id
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Single-entity operations on the `posts` table
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Post>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError>;

    async fn create(&self, post: &NewPost) -> Result<Post, DatabaseError>;

    /// Replaces title and body; `DatabaseError::NotFound` when no post has this id
    async fn update(&self, id: i64, title: &str, body: &str) -> Result<Post, DatabaseError>;

    /// `DatabaseError::NotFound` when no post has this id
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Whole-table replace and wipe, each run inside one transaction
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Clear `users` and insert `users` in order; returns rows inserted
    async fn replace_users(&self, users: &[User]) -> Result<u64, DatabaseError>;

    /// Clear `posts` and insert `posts` in order; returns rows inserted
    async fn replace_posts(&self, posts: &[Post]) -> Result<u64, DatabaseError>;

    /// Clear both tables
    async fn clear_all(&self) -> Result<(), DatabaseError>;
}
