//! Test fixtures: an in-memory ledger store and record builders.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use subledger_shared::types::VoucherId;

use super::error::{FetchStage, SourceError};
use super::filter::{AccountRange, VoucherQuery};
use super::source::SubledgerSource;
use super::types::{
    AccountInfo, Auxiliary, VoucherDetailLine, VoucherHeader, VoucherStatus,
};

/// Store double that filters like the real one, except it keeps lines
/// without an auxiliary so the engine-side exclusion is exercised.
#[derive(Debug, Default)]
pub struct InMemorySource {
    vouchers: Vec<VoucherHeader>,
    lines: Vec<VoucherDetailLine>,
    accounts: Vec<AccountInfo>,
    auxiliaries: Vec<Auxiliary>,
    failing: Option<FetchStage>,
    calls: Mutex<Vec<FetchStage>>,
}

impl InMemorySource {
    pub fn with_voucher(mut self, voucher: VoucherHeader) -> Self {
        self.vouchers.push(voucher);
        self
    }

    pub fn with_line(mut self, line: VoucherDetailLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn with_account(mut self, account: AccountInfo) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_auxiliary(mut self, auxiliary: Auxiliary) -> Self {
        self.auxiliaries.push(auxiliary);
        self
    }

    pub fn failing_at(mut self, stage: FetchStage) -> Self {
        self.failing = Some(stage);
        self
    }

    /// Stages fetched so far, in call order.
    pub fn calls(&self) -> Vec<FetchStage> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, stage: FetchStage) -> Result<(), SourceError> {
        self.calls.lock().unwrap().push(stage);
        if self.failing == Some(stage) {
            return Err(SourceError::new("store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubledgerSource for InMemorySource {
    async fn list_vouchers(&self, query: &VoucherQuery) -> Result<Vec<VoucherHeader>, SourceError> {
        self.record(FetchStage::Vouchers)?;
        Ok(self
            .vouchers
            .iter()
            .filter(|v| query.matches(v.company_id, v.branch_id, v.status, v.date))
            .cloned()
            .collect())
    }

    async fn list_detail_lines(
        &self,
        voucher_ids: &[VoucherId],
        accounts: &AccountRange,
    ) -> Result<Vec<VoucherDetailLine>, SourceError> {
        self.record(FetchStage::DetailLines)?;
        Ok(self
            .lines
            .iter()
            .filter(|l| voucher_ids.contains(&l.voucher_id) && accounts.contains(&l.account_code))
            .cloned()
            .collect())
    }

    async fn list_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, SourceError> {
        self.record(FetchStage::Accounts)?;
        Ok(self
            .accounts
            .iter()
            .filter(|a| codes.contains(&a.code))
            .cloned()
            .collect())
    }

    async fn list_active_auxiliaries(&self) -> Result<Vec<Auxiliary>, SourceError> {
        self.record(FetchStage::Auxiliaries)?;
        Ok(self.auxiliaries.iter().filter(|a| a.active).cloned().collect())
    }
}

/// Approved journal voucher.
pub fn voucher(id: i64, number: &str, (y, m, d): (i32, u32, u32)) -> VoucherHeader {
    VoucherHeader {
        id: VoucherId(id),
        number: number.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        concept: format!("Concept {number}"),
        status: VoucherStatus::Approved,
        voucher_type: "journal".to_string(),
        company_id: None,
        branch_id: None,
    }
}

/// Line whose foreign amounts are a quarter of the local ones.
pub fn line(
    voucher_id: i64,
    account_code: &str,
    auxiliary_ref: Option<&str>,
    debit: Decimal,
    credit: Decimal,
) -> VoucherDetailLine {
    let quarter = Decimal::from(4);
    VoucherDetailLine {
        voucher_id: VoucherId(voucher_id),
        account_code: account_code.to_string(),
        auxiliary_ref: auxiliary_ref.map(str::to_string),
        note: format!("Line {account_code}"),
        debit_local: debit,
        credit_local: credit,
        debit_foreign: debit / quarter,
        credit_foreign: credit / quarter,
        sequence: 1,
    }
}

pub fn account(code: &str, description: &str, class: &str) -> AccountInfo {
    AccountInfo {
        code: code.to_string(),
        description: description.to_string(),
        account_class: class.to_string(),
    }
}

/// Active auxiliary.
pub fn aux(code: &str, name: &str, auxiliary_type: &str) -> Auxiliary {
    Auxiliary {
        code: code.to_string(),
        name: name.to_string(),
        auxiliary_type: auxiliary_type.to_string(),
        active: true,
    }
}
