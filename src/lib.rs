pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod source;

pub use api::{router, AppState};
pub use config::AppConfig;
pub use db::{create_pool, PgCatalog};
pub use error::{AnalysisError, SourceError};
pub use service::{classify, CatalogProvider, SalesAnalyzer, StaticCatalog};
