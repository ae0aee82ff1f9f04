//! Ledger store contract.
//!
//! The engine never talks to a database directly. Anything that can list
//! vouchers, their lines, account descriptions and the auxiliary master can
//! feed a report.

use async_trait::async_trait;
use subledger_shared::types::VoucherId;

use super::error::SourceError;
use super::filter::{AccountRange, VoucherQuery};
use super::types::{AccountInfo, Auxiliary, VoucherDetailLine, VoucherHeader};

/// Read-only access to the ledger record sets.
#[async_trait]
pub trait SubledgerSource: Send + Sync {
    /// Vouchers matching the header filters.
    async fn list_vouchers(&self, query: &VoucherQuery) -> Result<Vec<VoucherHeader>, SourceError>;

    /// Lines of the given vouchers whose account lies in `accounts`.
    ///
    /// Implementations should leave out lines without an auxiliary
    /// reference; the engine drops any that slip through.
    async fn list_detail_lines(
        &self,
        voucher_ids: &[VoucherId],
        accounts: &AccountRange,
    ) -> Result<Vec<VoucherDetailLine>, SourceError>;

    /// Chart-of-accounts entries for the given codes.
    async fn list_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, SourceError>;

    /// Every active auxiliary.
    async fn list_active_auxiliaries(&self) -> Result<Vec<Auxiliary>, SourceError>;
}
