//! Data models for the bookshelf server

pub mod book;
pub mod stats;
pub mod user;

pub use book::{Book, BookQuery, BookStatus, CreateBook, LoanRecord, UpdateBook};
pub use user::{RegisterUser, UpdateProfile, User, UserClaims};
