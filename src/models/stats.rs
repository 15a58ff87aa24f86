//! Catalog summary counts

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CatalogStats {
    /// Number of distinct books in the catalog
    pub total_books: i64,
    /// Sum of copies owned
    pub total_copies: i64,
    /// Sum of copies currently on the shelf
    pub available_copies: i64,
    /// Books with no copy left on the shelf
    pub issued_books: i64,
    /// Loan records not yet returned
    pub active_loans: i64,
    /// Registered members
    pub members: i64,
}
