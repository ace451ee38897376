// Shared library for the placeholder board API: configuration, storage,
// the external placeholder source and bulk import orchestration

pub mod bulk;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod source;
pub mod telemetry;
