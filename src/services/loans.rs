//! Borrow and return service

use crate::{error::AppResult, models::book::Book, repository::Repository};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow one copy of a book
    pub async fn borrow(&self, book_id: i32, member_id: i32) -> AppResult<Book> {
        // Verify member exists
        self.repository.users.get_by_id(member_id).await?;

        let book = self.repository.books.borrow(book_id, member_id).await?;
        tracing::info!(
            book = book_id,
            member = member_id,
            available_copies = book.available_copies,
            "Book borrowed"
        );
        Ok(book)
    }

    /// Return a borrowed copy
    pub async fn return_book(&self, book_id: i32, member_id: i32) -> AppResult<Book> {
        let book = self.repository.books.return_copy(book_id, member_id).await?;
        tracing::info!(
            book = book_id,
            member = member_id,
            available_copies = book.available_copies,
            "Book returned"
        );
        Ok(book)
    }

    /// Books the member currently holds
    pub async fn borrowed_by(&self, member_id: i32) -> AppResult<Vec<Book>> {
        self.repository.books.borrowed_by(member_id).await
    }
}
