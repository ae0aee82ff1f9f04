//! Per-request pipeline counters.
//!
//! Diagnostics travel with every report for operability. They are purely
//! additive and never drive control flow.

use chrono::NaiveDate;
use serde::Serialize;
use subledger_shared::types::{BranchId, CompanyId, CurrencySelector};

use super::types::{ReportMode, VoucherStatus};

/// A filter value that could not be applied and was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterWarning {
    /// Company identifier is not numeric.
    NonNumericCompany(String),
    /// Branch identifier is not numeric.
    NonNumericBranch(String),
    /// Status is neither "All" nor a known voucher status.
    UnknownStatus(String),
    /// Date is not a calendar date.
    InvalidDate(String),
    /// Currency selector is unknown; local amounts are used.
    UnknownCurrency(String),
    /// Report mode is unknown; the detail layout is used.
    UnknownReportMode(String),
    /// Start date is after end date.
    InvertedDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },
}

impl std::fmt::Display for FilterWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonNumericCompany(v) => write!(f, "company id '{v}' is not numeric, ignored"),
            Self::NonNumericBranch(v) => write!(f, "branch id '{v}' is not numeric, ignored"),
            Self::UnknownStatus(v) => write!(f, "status '{v}' is unknown, ignored"),
            Self::InvalidDate(v) => write!(f, "date '{v}' is not a valid date, ignored"),
            Self::UnknownCurrency(v) => write!(f, "currency '{v}' is unknown, using local"),
            Self::UnknownReportMode(v) => write!(f, "report mode '{v}' is unknown, using detail"),
            Self::InvertedDateRange { start, end } => {
                write!(f, "start date {start} is after end date {end}")
            }
        }
    }
}

/// Why a report came back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No voucher matched the header filters.
    NoVouchers,
    /// The matching vouchers have no line with an auxiliary in the account range.
    NoDetailLines,
    /// Every movement was removed by the auxiliary or classifier filters.
    NoMovements,
}

/// Filter values as they were actually applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveFilters {
    /// Company filter.
    pub company_id: Option<CompanyId>,
    /// Branch filter.
    pub branch_id: Option<BranchId>,
    /// Status filter, `None` means all statuses.
    pub status: Option<VoucherStatus>,
    /// Inclusive start date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date.
    pub end_date: Option<NaiveDate>,
    /// Lower account bound.
    pub from_account: Option<String>,
    /// Upper account bound.
    pub to_account: Option<String>,
    /// Lower auxiliary code bound.
    pub from_auxiliary: Option<String>,
    /// Upper auxiliary code bound.
    pub to_auxiliary: Option<String>,
    /// Auxiliary type filter.
    pub auxiliary_type: Option<String>,
    /// Account class filter.
    pub classifier: Option<String>,
    /// Amount columns read.
    pub currency: CurrencySelector,
    /// Report layout.
    pub report_mode: ReportMode,
}

/// Counters collected while building one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Filters actually applied.
    pub effective_filters: EffectiveFilters,
    /// Ignored filters.
    pub warnings: Vec<FilterWarning>,
    /// Vouchers returned by the store.
    pub vouchers_fetched: usize,
    /// Detail lines returned by the store.
    pub detail_lines_fetched: usize,
    /// Lines dropped for having no auxiliary reference.
    pub lines_without_auxiliary: usize,
    /// Lines the store returned outside the account range.
    pub lines_outside_account_range: usize,
    /// Lines whose voucher was not among the fetched vouchers.
    pub lines_without_voucher: usize,
    /// Chart-of-accounts entries loaded.
    pub accounts_loaded: usize,
    /// Active auxiliaries loaded.
    pub auxiliaries_loaded: usize,
    /// Movements resolved by auxiliary code.
    pub resolved_by_code: usize,
    /// Movements resolved by normalized name.
    pub resolved_by_name: usize,
    /// Movements passed through unresolved.
    pub unresolved: usize,
    /// Resolved movements removed by the auxiliary type filter.
    pub excluded_by_auxiliary_type: usize,
    /// Resolved movements removed by the auxiliary code range.
    pub excluded_by_auxiliary_range: usize,
    /// Movements removed by the classifier filter.
    pub excluded_by_classifier: usize,
    /// Movements left after every filter.
    pub movement_count: usize,
    /// Summary rows or auxiliary blocks produced.
    pub output_groups: usize,
    /// Set when the report is empty.
    pub empty_reason: Option<EmptyReason>,
}

impl Diagnostics {
    /// Records an ignored filter.
    pub fn warn(&mut self, warning: FilterWarning) {
        self.warnings.push(warning);
    }

    /// Total resolved movements, by either index.
    #[must_use]
    pub const fn resolved_total(&self) -> usize {
        self.resolved_by_code + self.resolved_by_name
    }

    /// Total movements built before the post-resolution filters.
    #[must_use]
    pub const fn movements_built(&self) -> usize {
        self.resolved_total() + self.unresolved
    }
}
