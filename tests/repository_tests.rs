//! Repository tests against a migrated database
//!
//! Requires `DATABASE_URL`; run with `cargo test -- --ignored`.

use std::time::Duration;

use bookshelf_server::{
    models::{BookStatus, CreateBook, RegisterUser, UpdateBook},
    repository::Repository,
    AppError,
};
use sqlx::postgres::PgPoolOptions;

async fn connect() -> Repository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Repository::new(pool)
}

fn unique(prefix: &str) -> String {
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}", prefix, nanos)
}

async fn new_member(repo: &Repository) -> i32 {
    let user = RegisterUser {
        name: "Repository Member".to_string(),
        email: format!("{}@example.org", unique("repo")),
        password: "secret-pass".to_string(),
        contact: None,
        address: None,
    };
    repo.users
        .create(&user, "not-a-real-hash")
        .await
        .expect("Failed to create user")
        .id
}

async fn new_book(repo: &Repository, copies: i32) -> i32 {
    let book = CreateBook {
        book_id: unique("RB"),
        title: "A Wizard of Earthsea".to_string(),
        author: "Ursula K. Le Guin".to_string(),
        isbn: None,
        genre: Some("Fantasy".to_string()),
        description: None,
        image: None,
        publisher: None,
        published_year: Some(1968),
        language: None,
        total_copies: Some(copies),
        available_copies: None,
        rating: None,
    };
    repo.books.create(&book).await.expect("Failed to create book").id
}

fn title_only(title: &str) -> UpdateBook {
    UpdateBook {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_update_waits_for_concurrent_borrow() {
    let repo = connect().await;
    let member_id = new_member(&repo).await;
    let book_id = new_book(&repo, 1).await;

    // Take the row lock the way a borrow does and hold it while the update starts
    let mut tx = repo.pool.begin().await.expect("begin");
    sqlx::query("SELECT id FROM books WHERE id = $1 FOR UPDATE")
        .bind(book_id)
        .execute(&mut *tx)
        .await
        .expect("lock row");

    let updater = {
        let repo = repo.clone();
        tokio::spawn(async move {
            repo.books
                .update(book_id, title_only("The Tombs of Atuan"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!updater.is_finished());

    sqlx::query("UPDATE books SET available_copies = 0 WHERE id = $1")
        .bind(book_id)
        .execute(&mut *tx)
        .await
        .expect("take copy");
    sqlx::query(
        "INSERT INTO book_loans (book_ref, member_id, issue_date, is_returned) \
         VALUES ($1, $2, NOW(), FALSE)",
    )
    .bind(book_id)
    .bind(member_id)
    .execute(&mut *tx)
    .await
    .expect("open loan");
    tx.commit().await.expect("commit");

    let updated = updater
        .await
        .expect("update task panicked")
        .expect("update failed");
    assert_eq!(updated.title, "The Tombs of Atuan");
    assert_eq!(updated.available_copies, 0);
    assert_eq!(updated.status, BookStatus::Issued);
    assert_eq!(updated.open_loan_count(), 1);

    let stored = repo.books.get_by_id(book_id).await.expect("reload");
    assert_eq!(stored.available_copies, 0);
    assert_eq!(stored.status, BookStatus::Issued);
    assert!(stored.is_borrowed_by(member_id));

    let other = new_member(&repo).await;
    let second = repo.books.borrow(book_id, other).await;
    assert!(matches!(second, Err(AppError::BusinessRule(_))));
}

#[tokio::test]
#[ignore]
async fn test_title_update_after_borrow_keeps_loan() {
    let repo = connect().await;
    let member_id = new_member(&repo).await;
    let book_id = new_book(&repo, 2).await;

    repo.books.borrow(book_id, member_id).await.expect("borrow");
    let updated = repo
        .books
        .update(book_id, title_only("The Farthest Shore"))
        .await
        .expect("update");

    assert_eq!(updated.available_copies, 1);
    assert_eq!(updated.open_loan_count(), 1);
    assert!(updated.is_borrowed_by(member_id));
}

#[tokio::test]
#[ignore]
async fn test_update_rejects_total_below_open_loans() {
    let repo = connect().await;
    let member_id = new_member(&repo).await;
    let book_id = new_book(&repo, 1).await;
    repo.books.borrow(book_id, member_id).await.expect("borrow");

    let result = repo
        .books
        .update(
            book_id,
            UpdateBook {
                total_copies: Some(0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let stored = repo.books.get_by_id(book_id).await.expect("reload");
    assert_eq!(stored.total_copies, 1);
}
