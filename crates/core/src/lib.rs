//! Core business logic for the subsidiary ledger (libro de auxiliares) report.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! The record store is reached only through the [`subledger::SubledgerSource`] trait.
//!
//! # Modules
//!
//! - `subledger` - Auxiliary resolution, movement assembly, summary and detail reports

pub mod subledger;
