// Bulk import / delete orchestration
//
// Imports fetch the whole dataset first and only then replace the table,
// so an unreachable source never leaves an emptied table behind.

use crate::db::repositories::RecordStore;
use crate::errors::BulkError;
use crate::models::{ImportSummary, Table};
use crate::source::PlaceholderSource;
use crate::telemetry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Replace-all ingestion of external records into local tables
#[derive(Clone)]
pub struct BulkImportService {
    records: Arc<dyn RecordStore>,
    source: Arc<dyn PlaceholderSource>,
}

impl BulkImportService {
    pub fn new(records: Arc<dyn RecordStore>, source: Arc<dyn PlaceholderSource>) -> Self {
        Self { records, source }
    }

    /// Replace the `users` table with the source's user list
    #[instrument(skip(self))]
    pub async fn import_users(&self) -> Result<ImportSummary, BulkError> {
        let started = Instant::now();

        let users = self.source.fetch_users().await?;
        let rows = self.records.replace_users(&users).await?;

        telemetry::record_bulk_import(Table::Users, rows, started.elapsed());
        info!(rows, "Imported users from source");
        Ok(ImportSummary {
            table: Table::Users,
            rows,
        })
    }

    /// Replace the `posts` table with the source's post list
    #[instrument(skip(self))]
    pub async fn import_posts(&self) -> Result<ImportSummary, BulkError> {
        let started = Instant::now();

        let posts = self.source.fetch_posts().await?;
        let rows = self.records.replace_posts(&posts).await?;

        telemetry::record_bulk_import(Table::Posts, rows, started.elapsed());
        info!(rows, "Imported posts from source");
        Ok(ImportSummary {
            table: Table::Posts,
            rows,
        })
    }

    /// Empty both tables
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<(), BulkError> {
        let started = Instant::now();

        self.records.clear_all().await?;

        telemetry::record_bulk_delete(started.elapsed());
        info!("Deleted all users and posts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DatabaseError, SourceError};
    use crate::models::{Post, User};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Records {}

        #[async_trait]
        impl RecordStore for Records {
            async fn replace_users(&self, users: &[User]) -> Result<u64, DatabaseError>;
            async fn replace_posts(&self, posts: &[Post]) -> Result<u64, DatabaseError>;
            async fn clear_all(&self) -> Result<(), DatabaseError>;
        }
    }

    mock! {
        pub Source {}

        #[async_trait]
        impl PlaceholderSource for Source {
            async fn fetch_users(&self) -> Result<Vec<User>, SourceError>;
            async fn fetch_posts(&self) -> Result<Vec<Post>, SourceError>;
        }
    }

    fn posts(n: i64) -> Vec<Post> {
        (1..=n)
            .map(|id| Post {
                id,
                user_id: Some((id - 1) / 10 + 1),
                title: format!("title {}", id),
                body: format!("body {}", id),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_import_posts_passes_source_rows_through_in_order() {
        let mut source = MockSource::new();
        source.expect_fetch_posts().times(1).returning(|| Ok(posts(3)));

        let mut records = MockRecords::new();
        records
            .expect_replace_posts()
            .withf(|rows| rows.iter().map(|p| p.id).eq([1, 2, 3]))
            .times(1)
            .returning(|rows| Ok(rows.len() as u64));

        let service = BulkImportService::new(Arc::new(records), Arc::new(source));
        let summary = service.import_posts().await.unwrap();
        assert_eq!(summary, ImportSummary { table: Table::Posts, rows: 3 });
    }

    #[tokio::test]
    async fn test_source_failure_never_touches_table() {
        let mut source = MockSource::new();
        source.expect_fetch_users().times(1).returning(|| {
            Err(SourceError::Status {
                url: "http://source.test/users".to_string(),
                status: 500,
            })
        });

        let mut records = MockRecords::new();
        records.expect_replace_users().times(0);

        let service = BulkImportService::new(Arc::new(records), Arc::new(source));
        let err = service.import_users().await.unwrap_err();
        assert!(matches!(err, BulkError::Source(_)));
    }

    #[tokio::test]
    async fn test_database_failure_surfaces_as_bulk_error() {
        let mut source = MockSource::new();
        source.expect_fetch_posts().returning(|| Ok(posts(2)));

        let mut records = MockRecords::new();
        records
            .expect_replace_posts()
            .returning(|_| Err(DatabaseError::TransactionFailed("deadlock".to_string())));

        let service = BulkImportService::new(Arc::new(records), Arc::new(source));
        let err = service.import_posts().await.unwrap_err();
        assert!(matches!(err, BulkError::Database(DatabaseError::TransactionFailed(_))));
    }

    #[tokio::test]
    async fn test_delete_all_clears_once() {
        let source = MockSource::new();
        let mut records = MockRecords::new();
        records.expect_clear_all().times(1).returning(|| Ok(()));

        let service = BulkImportService::new(Arc::new(records), Arc::new(source));
        service.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_import_twice_matches_import_once() {
        use crate::db::memory::MemoryStore;

        let mut source = MockSource::new();
        source.expect_fetch_posts().times(2).returning(|| Ok(posts(25)));

        let store = MemoryStore::new();
        let service = BulkImportService::new(Arc::new(store.clone()), Arc::new(source));

        service.import_posts().await.unwrap();
        let once = crate::db::PostStore::find_all(&store).await.unwrap();
        service.import_posts().await.unwrap();
        let twice = crate::db::PostStore::find_all(&store).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.post_count(), 25);
    }
}
