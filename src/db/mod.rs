pub mod catalog;
pub mod pool;
pub mod queries;

pub use catalog::PgCatalog;
pub use pool::create_pool;
