//! Subsidiary ledger (libro de auxiliares) report.
//!
//! This module reconstructs, per auxiliary and account, the movement history
//! and balances of a period:
//! - Auxiliary resolution by code, then by normalized name
//! - Movement assembly from the ledger store
//! - Summary layout (one row per auxiliary and account)
//! - Detail layout (auxiliary, account and movement tree)

pub mod assembler;
pub mod detail;
pub mod diagnostics;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod resolver;
pub mod service;
pub mod source;
pub mod summary;
pub mod types;

#[cfg(test)]
mod testing;

pub use assembler::MovementAssembler;
pub use detail::build_detail;
pub use diagnostics::{Diagnostics, EffectiveFilters, EmptyReason, FilterWarning};
pub use error::{FetchStage, SourceError, SubledgerError};
pub use filter::{AccountRange, CodeRange, SubledgerFilter, VoucherQuery};
pub use normalize::normalize;
pub use resolver::{AuxiliaryResolver, Resolution};
pub use service::SubledgerService;
pub use source::SubledgerSource;
pub use summary::build_summary;
pub use types::*;
