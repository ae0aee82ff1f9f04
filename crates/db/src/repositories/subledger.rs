//! Ledger store adapter for the subsidiary ledger report.
//!
//! Pushes every filter it can down to `SQL` and maps rows onto the engine's
//! record types. Store errors are handed back with their message verbatim.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
};
use subledger_core::subledger::{
    AccountInfo, AccountRange, Auxiliary, SourceError, SubledgerSource, VoucherDetailLine,
    VoucherHeader, VoucherQuery, VoucherStatus,
};
use subledger_shared::types::{BranchId, CompanyId, VoucherId};
use tracing::debug;

use crate::entities::{
    auxiliaries, chart_of_accounts, sea_orm_active_enums::VoucherStatus as DbVoucherStatus,
    voucher_lines, vouchers,
};

/// Subsidiary ledger repository.
#[derive(Debug, Clone)]
pub struct SubledgerRepository {
    db: DatabaseConnection,
}

impl SubledgerRepository {
    /// Creates a new subledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubledgerSource for SubledgerRepository {
    async fn list_vouchers(&self, query: &VoucherQuery) -> Result<Vec<VoucherHeader>, SourceError> {
        let mut select = vouchers::Entity::find();

        if let Some(company_id) = query.company_id {
            select = select.filter(vouchers::Column::CompanyId.eq(company_id.into_inner()));
        }
        if let Some(branch_id) = query.branch_id {
            select = select.filter(vouchers::Column::BranchId.eq(branch_id.into_inner()));
        }
        if let Some(status) = query.status {
            select = select.filter(vouchers::Column::Status.eq(DbVoucherStatus::from(status)));
        }
        if let Some(start) = query.start_date {
            select = select.filter(vouchers::Column::VoucherDate.gte(start));
        }
        if let Some(end) = query.end_date {
            select = select.filter(vouchers::Column::VoucherDate.lte(end));
        }

        let rows = select
            .order_by_asc(vouchers::Column::VoucherDate)
            .order_by_asc(vouchers::Column::Number)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        debug!(count = rows.len(), "Loaded vouchers");

        Ok(rows.into_iter().map(voucher_header).collect())
    }

    async fn list_detail_lines(
        &self,
        voucher_ids: &[VoucherId],
        accounts: &AccountRange,
    ) -> Result<Vec<VoucherDetailLine>, SourceError> {
        if voucher_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = voucher_ids.iter().map(|id| id.into_inner()).collect();
        let select = voucher_lines::Entity::find()
            .filter(voucher_lines::Column::VoucherId.is_in(ids))
            .filter(voucher_lines::Column::AuxiliaryRef.is_not_null());

        let rows = with_account_range(select, accounts)
            .order_by_asc(voucher_lines::Column::VoucherId)
            .order_by_asc(voucher_lines::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        debug!(count = rows.len(), "Loaded voucher lines");

        Ok(rows.into_iter().map(detail_line).collect())
    }

    async fn list_accounts(&self, codes: &[String]) -> Result<Vec<AccountInfo>, SourceError> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let rows = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.is_in(codes.iter().cloned()))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|a| AccountInfo {
                code: a.code,
                description: a.description,
                account_class: a.account_class.unwrap_or_default(),
            })
            .collect())
    }

    async fn list_active_auxiliaries(&self) -> Result<Vec<Auxiliary>, SourceError> {
        let rows = auxiliaries::Entity::find()
            .filter(auxiliaries::Column::IsActive.eq(true))
            .order_by_asc(auxiliaries::Column::Code)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(rows
            .into_iter()
            .map(|a| Auxiliary {
                code: a.code,
                name: a.name,
                auxiliary_type: a.auxiliary_type,
                active: a.is_active,
            })
            .collect())
    }
}

fn with_account_range(
    mut select: Select<voucher_lines::Entity>,
    accounts: &AccountRange,
) -> Select<voucher_lines::Entity> {
    if let Some(from) = &accounts.from {
        select = select.filter(voucher_lines::Column::AccountCode.gte(from.as_str()));
    }
    if let Some(to) = &accounts.to {
        select = select.filter(voucher_lines::Column::AccountCode.lte(to.as_str()));
    }
    select
}

fn store_error(err: DbErr) -> SourceError {
    SourceError::new(err)
}

fn voucher_header(v: vouchers::Model) -> VoucherHeader {
    VoucherHeader {
        id: VoucherId::new(v.id),
        number: v.number,
        date: v.voucher_date,
        concept: v.concept,
        status: v.status.into(),
        voucher_type: v.voucher_type,
        company_id: v.company_id.map(CompanyId::new),
        branch_id: v.branch_id.map(BranchId::new),
    }
}

fn detail_line(l: voucher_lines::Model) -> VoucherDetailLine {
    VoucherDetailLine {
        voucher_id: VoucherId::new(l.voucher_id),
        account_code: l.account_code,
        auxiliary_ref: l.auxiliary_ref,
        note: l.note.unwrap_or_default(),
        debit_local: l.debit_local,
        credit_local: l.credit_local,
        debit_foreign: l.debit_foreign,
        credit_foreign: l.credit_foreign,
        sequence: l.sequence,
    }
}

impl From<VoucherStatus> for DbVoucherStatus {
    fn from(status: VoucherStatus) -> Self {
        match status {
            VoucherStatus::Draft => Self::Draft,
            VoucherStatus::Approved => Self::Approved,
            VoucherStatus::Voided => Self::Voided,
        }
    }
}

impl From<DbVoucherStatus> for VoucherStatus {
    fn from(status: DbVoucherStatus) -> Self {
        match status {
            DbVoucherStatus::Draft => Self::Draft,
            DbVoucherStatus::Approved => Self::Approved,
            DbVoucherStatus::Voided => Self::Voided,
        }
    }
}
