use std::fmt::Display;
use std::sync::Arc;

use common::bulk::BulkImportService;
use common::config::Settings;
use common::db::repositories::{PostRepository, RecordRepository, UserRepository};
use common::db::{DbPool, PostStore, RecordStore, UserStore};
use common::source::PlaceholderSource;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::error::ApiError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub bulk: BulkImportService,
    pub metrics: PrometheusHandle,
    pub config: Arc<Settings>,
}

impl AppState {
    /// Create state backed by the MySQL repositories
    pub fn new(
        db_pool: DbPool,
        source: Arc<dyn PlaceholderSource>,
        metrics: PrometheusHandle,
        config: Settings,
    ) -> Self {
        Self::with_stores(
            db_pool.clone(),
            Arc::new(UserRepository::new(db_pool.clone())),
            Arc::new(PostRepository::new(db_pool.clone())),
            Arc::new(RecordRepository::new(db_pool)),
            source,
            metrics,
            config,
        )
    }

    /// Create state from explicit store implementations
    pub fn with_stores(
        db_pool: DbPool,
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        records: Arc<dyn RecordStore>,
        source: Arc<dyn PlaceholderSource>,
        metrics: PrometheusHandle,
        config: Settings,
    ) -> Self {
        Self {
            db_pool,
            users,
            posts,
            bulk: BulkImportService::new(records, source),
            metrics,
            config: Arc::new(config),
        }
    }

    /// Log the failure and build a 500 whose detail honours the environment
    pub fn internal_error(&self, message: &str, err: &dyn Display) -> ApiError {
        tracing::error!(error = %err, "{}", message);
        let detail = self
            .config
            .environment
            .exposes_error_details()
            .then(|| err.to_string());
        ApiError::Internal {
            message: message.to_string(),
            detail,
        }
    }
}
