//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{check_inventory, Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List books matching the query
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.list(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Distinct genres present in the catalog
    pub async fn genres(&self) -> AppResult<Vec<String>> {
        self.repository.books.genres().await
    }

    /// Create a new book
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        let (total, available) = book.inventory();
        check_inventory(total, available, 0)?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(id = created.id, book_id = %created.book_id, "Book created");
        Ok(created)
    }

    /// Update an existing book
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        self.repository.books.update(id, update).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!(id, "Book deleted");
        Ok(())
    }
}
