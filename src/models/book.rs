//! Book model, loan records and the borrow/return transitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Default language recorded for new books
pub const DEFAULT_LANGUAGE: &str = "English";

/// Book availability, derived from the number of available copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    Available,
    Issued,
}

impl BookStatus {
    /// A book is issued exactly when no copy is left on the shelf
    pub fn from_available_copies(available_copies: i32) -> Self {
        if available_copies > 0 {
            BookStatus::Available
        } else {
            BookStatus::Issued
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "Available",
            BookStatus::Issued => "Issued",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a book's lending history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoanRecord {
    pub id: i32,
    pub member_id: i32,
    pub issue_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

/// Internal row structure for `book_loans` queries
#[derive(Debug, Clone, FromRow)]
pub struct LoanRow {
    pub id: i32,
    pub book_ref: i32,
    pub member_id: i32,
    pub issue_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub is_returned: bool,
}

impl From<LoanRow> for LoanRecord {
    fn from(row: LoanRow) -> Self {
        LoanRecord {
            id: row.id,
            member_id: row.member_id,
            issue_date: row.issue_date,
            return_date: row.return_date,
            is_returned: row.is_returned,
        }
    }
}

/// Internal row structure for `books` queries
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i32,
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full book representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    /// Library-assigned identifier, unique across the catalog
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    /// Cover image URL
    pub image: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: String,
    pub total_copies: i32,
    pub available_copies: i32,
    pub status: BookStatus,
    pub rating: f64,
    /// Lending history, oldest first
    pub issued_to: Vec<LoanRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn from_row(row: BookRow, issued_to: Vec<LoanRecord>) -> Self {
        Book {
            id: row.id,
            book_id: row.book_id,
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            genre: row.genre,
            description: row.description,
            image: row.image,
            publisher: row.publisher,
            published_year: row.published_year,
            language: row.language,
            total_copies: row.total_copies,
            available_copies: row.available_copies,
            status: BookStatus::from_available_copies(row.available_copies),
            rating: row.rating,
            issued_to,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// The member's oldest loan that has not been returned yet
    pub fn open_loan_for(&self, member_id: i32) -> Option<&LoanRecord> {
        self.issued_to
            .iter()
            .find(|loan| loan.member_id == member_id && !loan.is_returned)
    }

    pub fn is_borrowed_by(&self, member_id: i32) -> bool {
        self.open_loan_for(member_id).is_some()
    }

    /// Lend one copy to `member_id`.
    ///
    /// Appends an open loan record (with id 0 until persisted) and takes one
    /// copy off the shelf. The book is left untouched on failure.
    pub fn borrow(&mut self, member_id: i32, now: DateTime<Utc>) -> AppResult<LoanRecord> {
        if self.available_copies <= 0 {
            return Err(AppError::BusinessRule("Book is not available".to_string()));
        }

        let loan = LoanRecord {
            id: 0,
            member_id,
            issue_date: now,
            return_date: None,
            is_returned: false,
        };

        self.issued_to.push(loan.clone());
        self.available_copies = (self.available_copies - 1).max(0);
        self.status = BookStatus::from_available_copies(self.available_copies);
        self.updated_at = now;

        Ok(loan)
    }

    /// Close the member's oldest open loan and put the copy back on the shelf.
    ///
    /// Available copies never exceed the total. Returns the closed loan.
    pub fn return_copy(&mut self, member_id: i32, now: DateTime<Utc>) -> AppResult<LoanRecord> {
        let loan = self
            .issued_to
            .iter_mut()
            .find(|loan| loan.member_id == member_id && !loan.is_returned)
            .ok_or_else(|| {
                AppError::BusinessRule("You have not borrowed this book".to_string())
            })?;

        loan.is_returned = true;
        loan.return_date = Some(now);
        let closed = loan.clone();

        self.available_copies = (self.available_copies + 1).min(self.total_copies);
        self.status = BookStatus::from_available_copies(self.available_copies);
        self.updated_at = now;

        Ok(closed)
    }

    /// Number of loans not yet returned
    pub fn open_loan_count(&self) -> i32 {
        self.issued_to.iter().filter(|loan| !loan.is_returned).count() as i32
    }

    /// Check the current counters against the copies out on loan
    pub fn check_inventory(&self) -> AppResult<()> {
        check_inventory(
            self.total_copies,
            self.available_copies,
            self.open_loan_count(),
        )
    }

    /// Overwrite the fields present in `update`
    pub fn apply_update(&mut self, update: UpdateBook) {
        if let Some(book_id) = update.book_id {
            self.book_id = book_id;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(author) = update.author {
            self.author = author;
        }
        if update.isbn.is_some() {
            self.isbn = update.isbn;
        }
        if update.genre.is_some() {
            self.genre = update.genre;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if update.image.is_some() {
            self.image = update.image;
        }
        if update.publisher.is_some() {
            self.publisher = update.publisher;
        }
        if update.published_year.is_some() {
            self.published_year = update.published_year;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
        if let Some(total) = update.total_copies {
            self.total_copies = total;
        }
        if let Some(available) = update.available_copies {
            self.available_copies = available;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        self.status = BookStatus::from_available_copies(self.available_copies);
    }
}

/// Reject inventories where the shelf plus the copies out on loan exceed
/// the number of copies owned
pub fn check_inventory(
    total_copies: i32,
    available_copies: i32,
    open_loans: i32,
) -> AppResult<()> {
    if available_copies > total_copies {
        return Err(AppError::Validation(format!(
            "available_copies ({}) cannot exceed total_copies ({})",
            available_copies, total_copies
        )));
    }
    if available_copies + open_loans > total_copies {
        return Err(AppError::Validation(format!(
            "total_copies ({}) cannot be less than available_copies ({}) plus copies on loan ({})",
            total_copies, available_copies, open_loans
        )));
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "book_id is required"))]
    pub book_id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: Option<String>,
    #[validate(range(min = 0, message = "total_copies cannot be negative"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0, message = "available_copies cannot be negative"))]
    pub available_copies: Option<i32>,
    pub rating: Option<f64>,
}

impl CreateBook {
    /// Total and available copies after defaults: one copy, all of them on the shelf
    pub fn inventory(&self) -> (i32, i32) {
        let total = self.total_copies.unwrap_or(1);
        let available = self.available_copies.unwrap_or(total);
        (total, available)
    }
}

/// Update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, message = "book_id cannot be empty"))]
    pub book_id: Option<String>,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub publisher: Option<String>,
    pub published_year: Option<i32>,
    pub language: Option<String>,
    #[validate(range(min = 0, message = "total_copies cannot be negative"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0, message = "available_copies cannot be negative"))]
    pub available_copies: Option<i32>,
    pub rating: Option<f64>,
}

/// Book query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of title or author
    pub search: Option<String>,
    /// Exact genre
    pub genre: Option<String>,
    /// Derived availability status
    pub status: Option<BookStatus>,
}

impl BookQuery {
    /// Search pattern for `ILIKE`, `None` when the search term is blank
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let escaped = s
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                format!("%{}%", escaped)
            })
    }

    pub fn genre_filter(&self) -> Option<&str> {
        self.genre.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
