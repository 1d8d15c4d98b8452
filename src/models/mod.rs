pub mod catalog;
pub mod result;
pub mod sales;

pub use catalog::{MenuCatalogEntry, NewMenuItem, RecipeIndex};
pub use result::{
    ClassifiedLine, Classification, ClassificationSummary, MatchStatus, MatchTrace,
    SalesAnalysis, UnknownItem,
};
pub use sales::{RawSale, SalesLine};
