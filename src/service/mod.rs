pub mod analyzer;
pub mod catalog;
pub mod matcher;

pub use analyzer::SalesAnalyzer;
pub use catalog::{CatalogProvider, StaticCatalog};
pub use matcher::{classify, normalize_article};
