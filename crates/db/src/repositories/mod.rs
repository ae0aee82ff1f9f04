//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod subledger;

#[cfg(test)]
mod subledger_tests;

pub use subledger::SubledgerRepository;
