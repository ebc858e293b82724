//! Read-only data sources.

mod field;
mod jql;
mod project_category;

pub use field::FieldDataSource;
pub use jql::JqlDataSource;
pub use project_category::ProjectCategoryDataSource;
