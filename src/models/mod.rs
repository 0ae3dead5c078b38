pub mod movie;

pub use movie::{CatalogItem, SearchPage};
