//! # Repository Module
//!
//! SQL access for the SQLite backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storage facade                                                         │
//! │       │  db.products().load_all()                                       │
//! │       │  db.purchases().list_for_date(day)                              │
//! │       ▼                                                                 │
//! │  ProductRepository / PurchaseRepository                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes that must land together (a sale's stock changes and its purchase
//! rows) take a `&mut SqliteConnection` so the caller can run them inside one
//! SQL transaction; see [`crate::Database::commit_transaction`].
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - The catalog table
//! - [`purchase::PurchaseRepository`] - One row per committed sale line
//! - [`customer::CustomerRepository`] - Registered customers

pub mod customer;
pub mod product;
pub mod purchase;
