//! Books repository for database operations

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookQuery, BookRow, BookStatus, CreateBook, LoanRecord, LoanRow, UpdateBook,
        DEFAULT_LANGUAGE,
    },
};

const BOOK_COLUMNS: &str = "id, book_id, title, author, isbn, genre, description, image, \
     publisher, published_year, language, total_copies, available_copies, rating, \
     created_at, updated_at";

const LOAN_COLUMNS: &str = "id, book_ref, member_id, issue_date, return_date, is_returned";

const DUPLICATE_BOOK_ID: &str = "A book with this book_id already exists";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books matching the query, ordered by title
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(pattern) = query.search_pattern() {
            params.push(pattern);
            conditions.push(format!(
                "(title ILIKE ${0} OR author ILIKE ${0})",
                params.len()
            ));
        }

        if let Some(genre) = query.genre_filter() {
            params.push(genre.to_string());
            conditions.push(format!("genre = ${}", params.len()));
        }

        match query.status {
            Some(BookStatus::Available) => conditions.push("available_copies > 0".to_string()),
            Some(BookStatus::Issued) => conditions.push("available_copies <= 0".to_string()),
            None => {}
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_query = format!(
            "SELECT {} FROM books {} ORDER BY title, id",
            BOOK_COLUMNS, where_clause
        );

        let mut builder = sqlx::query_as::<_, BookRow>(&select_query);
        for param in &params {
            builder = builder.bind(param);
        }
        let rows = builder.fetch_all(&self.pool).await?;

        self.attach_loans(rows).await
    }

    /// Get book by internal ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| book_not_found(id))?;

        let loans = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {} FROM book_loans WHERE book_ref = $1 ORDER BY issue_date, id",
            LOAN_COLUMNS
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Book::from_row(
            row,
            loans.into_iter().map(LoanRecord::from).collect(),
        ))
    }

    /// Create a new book
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let (total_copies, available_copies) = book.inventory();

        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            INSERT INTO books (
                book_id, title, author, isbn, genre, description, image,
                publisher, published_year, language, total_copies,
                available_copies, rating
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(&book.image)
        .bind(&book.publisher)
        .bind(book.published_year)
        .bind(book.language.as_deref().unwrap_or(DEFAULT_LANGUAGE))
        .bind(total_copies)
        .bind(available_copies)
        .bind(book.rating.unwrap_or(0.0))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_BOOK_ID))?;

        Ok(Book::from_row(row, Vec::new()))
    }

    /// Apply `update` to book `id`.
    ///
    /// The row is locked while the update is merged and written, so a
    /// concurrent borrow or return is never overwritten by a stale counter.
    pub async fn update(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let mut book = fetch_for_update(&mut tx, id).await?;
        book.apply_update(update);
        book.check_inventory()?;

        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            UPDATE books SET
                book_id = $2, title = $3, author = $4, isbn = $5, genre = $6,
                description = $7, image = $8, publisher = $9, published_year = $10,
                language = $11, total_copies = $12, available_copies = $13,
                rating = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(book.id)
        .bind(&book.book_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.genre)
        .bind(&book.description)
        .bind(&book.image)
        .bind(&book.publisher)
        .bind(book.published_year)
        .bind(&book.language)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(book.rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_BOOK_ID))?;

        tx.commit().await?;

        Ok(Book::from_row(row, book.issued_to))
    }

    /// Delete a book and its loan history
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(book_not_found(id));
        }
        Ok(())
    }

    /// Distinct non-empty genres, sorted
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        let genres = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT genre FROM books
            WHERE genre IS NOT NULL AND btrim(genre) <> ''
            ORDER BY genre
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    /// Books with at least one open loan held by `member_id`
    pub async fn borrowed_by(&self, member_id: i32) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            SELECT {} FROM books b
            WHERE EXISTS (
                SELECT 1 FROM book_loans l
                WHERE l.book_ref = b.id AND l.member_id = $1 AND NOT l.is_returned
            )
            ORDER BY b.title, b.id
            "#,
            BOOK_COLUMNS
        ))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        self.attach_loans(rows).await
    }

    /// Lend one copy of book `id` to `member_id`.
    ///
    /// The book row stays locked from the availability check to the commit,
    /// so concurrent borrows of the last copy cannot both succeed.
    pub async fn borrow(&self, id: i32, member_id: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let mut book = fetch_for_update(&mut tx, id).await?;
        let loan = book.borrow(member_id, Utc::now())?;

        let loan_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO book_loans (book_ref, member_id, issue_date, is_returned)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(loan.member_id)
        .bind(loan.issue_date)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(last) = book.issued_to.last_mut() {
            last.id = loan_id;
        }

        store_availability(&mut tx, &book).await?;
        tx.commit().await?;

        Ok(book)
    }

    /// Close `member_id`'s oldest open loan on book `id`
    pub async fn return_copy(&self, id: i32, member_id: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let mut book = fetch_for_update(&mut tx, id).await?;
        let loan = book.return_copy(member_id, Utc::now())?;

        sqlx::query(
            "UPDATE book_loans SET is_returned = TRUE, return_date = $2 WHERE id = $1",
        )
        .bind(loan.id)
        .bind(loan.return_date)
        .execute(&mut *tx)
        .await?;

        store_availability(&mut tx, &book).await?;
        tx.commit().await?;

        Ok(book)
    }

    async fn attach_loans(&self, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let loans = sqlx::query_as::<_, LoanRow>(&format!(
            "SELECT {} FROM book_loans WHERE book_ref = ANY($1) ORDER BY issue_date, id",
            LOAN_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<LoanRecord>> = HashMap::new();
        for loan in loans {
            by_book.entry(loan.book_ref).or_default().push(loan.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let loans = by_book.remove(&row.id).unwrap_or_default();
                Book::from_row(row, loans)
            })
            .collect())
    }
}

fn book_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Book with id {} not found", id))
}

/// Load a book with its loans, holding a row lock until the transaction ends
async fn fetch_for_update(tx: &mut Transaction<'_, Postgres>, id: i32) -> AppResult<Book> {
    let row = sqlx::query_as::<_, BookRow>(&format!(
        "SELECT {} FROM books WHERE id = $1 FOR UPDATE",
        BOOK_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| book_not_found(id))?;

    let loans = sqlx::query_as::<_, LoanRow>(&format!(
        "SELECT {} FROM book_loans WHERE book_ref = $1 ORDER BY issue_date, id",
        LOAN_COLUMNS
    ))
    .bind(id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(Book::from_row(
        row,
        loans.into_iter().map(LoanRecord::from).collect(),
    ))
}

async fn store_availability(tx: &mut Transaction<'_, Postgres>, book: &Book) -> AppResult<()> {
    sqlx::query("UPDATE books SET available_copies = $2, updated_at = $3 WHERE id = $1")
        .bind(book.id)
        .bind(book.available_copies)
        .bind(book.updated_at)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
