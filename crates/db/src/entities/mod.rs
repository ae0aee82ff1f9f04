//! `SeaORM` entities for the ledger tables the report reads.
//!
//! The schema is owned by the accounting application; these entities map
//! onto it and are never used to create or migrate tables.

pub mod auxiliaries;
pub mod chart_of_accounts;
pub mod sea_orm_active_enums;
pub mod voucher_lines;
pub mod vouchers;
