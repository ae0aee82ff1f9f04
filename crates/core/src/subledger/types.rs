//! Subsidiary ledger data types.
//!
//! Input records mirror what the ledger store hands back; output types are what
//! renderers and the HTTP layer receive verbatim.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use subledger_shared::types::{BranchId, CompanyId, VoucherId};

use super::diagnostics::Diagnostics;

// ============================================================================
// Store records
// ============================================================================

/// Voucher (comprobante) lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    /// Being edited, not yet approved.
    Draft,
    /// Approved and posted.
    Approved,
    /// Cancelled after approval.
    Voided,
}

impl VoucherStatus {
    /// Returns the status as its storage string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Voided => "voided",
        }
    }
}

impl std::fmt::Display for VoucherStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VoucherStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" | "borrador" => Ok(Self::Draft),
            "approved" | "aprobado" => Ok(Self::Approved),
            "voided" | "anulado" => Ok(Self::Voided),
            _ => Err(format!("Unknown voucher status: {s}")),
        }
    }
}

/// One accounting document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherHeader {
    /// Store key.
    pub id: VoucherId,
    /// Human-facing voucher number.
    pub number: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Voucher concept (header description).
    pub concept: String,
    /// Lifecycle status.
    pub status: VoucherStatus,
    /// Voucher type (journal, receipt, payment, ...).
    pub voucher_type: String,
    /// Owning company.
    pub company_id: Option<CompanyId>,
    /// Owning branch.
    pub branch_id: Option<BranchId>,
}

/// One debit/credit line inside a voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherDetailLine {
    /// Owning voucher.
    pub voucher_id: VoucherId,
    /// General-ledger account code.
    pub account_code: String,
    /// Auxiliary reference: a canonical code, a legacy free-text name, or nothing.
    pub auxiliary_ref: Option<String>,
    /// Line note.
    pub note: String,
    /// Debit in local currency.
    pub debit_local: Decimal,
    /// Credit in local currency.
    pub credit_local: Decimal,
    /// Debit in foreign currency.
    pub debit_foreign: Decimal,
    /// Credit in foreign currency.
    pub credit_foreign: Decimal,
    /// Position of the line inside its voucher.
    pub sequence: i32,
}

impl VoucherDetailLine {
    /// Returns the auxiliary reference when it is present and not blank.
    #[must_use]
    pub fn auxiliary_reference(&self) -> Option<&str> {
        self.auxiliary_ref
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
    }
}

/// Chart-of-accounts entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Account code.
    pub code: String,
    /// Account description.
    pub description: String,
    /// Account class (asset, liability, equity, income, expense).
    pub account_class: String,
}

/// Canonical sub-ledger entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auxiliary {
    /// Unique, stable code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Auxiliary type (customer, supplier, bank, employee, ...).
    pub auxiliary_type: String,
    /// Only active auxiliaries take part in resolution.
    pub active: bool,
}

// ============================================================================
// Engine records
// ============================================================================

/// A voucher line joined with its header, account and auxiliary.
///
/// `resolved` is true exactly when `auxiliary_code` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Canonical auxiliary code, `None` when the reference did not resolve.
    pub auxiliary_code: Option<String>,
    /// Canonical name, or the raw reference as received when unresolved.
    pub auxiliary_name: String,
    /// Whether the reference matched an active auxiliary.
    pub resolved: bool,
    /// Auxiliary type, empty when unresolved.
    pub auxiliary_type: String,
    /// Account code.
    pub account_code: String,
    /// Account description.
    pub account_description: String,
    /// Account class.
    pub account_class: String,
    /// Voucher date.
    pub date: NaiveDate,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: String,
    /// Voucher concept.
    pub voucher_concept: String,
    /// Line note.
    pub line_note: String,
    /// Debit in the selected currency.
    pub debit: Decimal,
    /// Credit in the selected currency.
    pub credit: Decimal,
    /// Line sequence inside the voucher.
    pub sequence: i32,
}

impl Movement {
    /// Key the movement is grouped under: the code when resolved, else the raw name.
    #[must_use]
    pub fn auxiliary_key(&self) -> &str {
        self.auxiliary_code
            .as_deref()
            .unwrap_or(&self.auxiliary_name)
    }

    /// Signed effect on a debit-minus-credit balance.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

// ============================================================================
// Report output
// ============================================================================

/// Report layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportMode {
    /// One row per (auxiliary, account).
    Summary,
    /// Auxiliary, account and movement tree.
    #[default]
    Detail,
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summary => write!(f, "Summary"),
            Self::Detail => write!(f, "Detail"),
        }
    }
}

impl std::str::FromStr for ReportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summary" | "resumen" => Ok(Self::Summary),
            "detail" | "detalle" => Ok(Self::Detail),
            _ => Err(format!("Unknown report mode: {s}")),
        }
    }
}

/// Summary report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Auxiliary code, `None` when unresolved.
    pub auxiliary_code: Option<String>,
    /// Auxiliary name.
    pub auxiliary_name: String,
    /// Whether the auxiliary resolved.
    pub resolved: bool,
    /// Account code.
    pub account_code: String,
    /// Account description.
    pub account_description: String,
    /// Balance before the first movement (back-derived).
    pub opening_balance: Decimal,
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Balance after the last movement.
    pub closing_balance: Decimal,
}

/// One printed line of an account block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementRow {
    /// Voucher date, or the period start on the opening line.
    /// Serialized as `""` when the opening line has no period start.
    #[serde(serialize_with = "date_or_blank")]
    pub date: Option<NaiveDate>,
    /// Voucher number.
    pub voucher_number: String,
    /// Voucher type.
    pub voucher_type: String,
    /// Line note.
    pub note: String,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Balance after this line.
    pub running_balance: Decimal,
    /// Synthetic opening-balance line.
    pub is_opening_balance: bool,
}

#[allow(clippy::ref_option)]
fn date_or_blank<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => date.serialize(serializer),
        None => serializer.serialize_str(""),
    }
}

/// Movements of one auxiliary on one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBlock {
    /// Account code.
    pub account_code: String,
    /// Account description.
    pub account_description: String,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Rows, the opening-balance line first.
    pub movement_rows: Vec<MovementRow>,
    /// Total debit (opening line excluded).
    pub total_debit: Decimal,
    /// Total credit (opening line excluded).
    pub total_credit: Decimal,
    /// Last running balance.
    pub closing_balance: Decimal,
}

/// All accounts touched by one auxiliary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxiliaryBlock {
    /// Auxiliary code, `None` when unresolved.
    pub auxiliary_code: Option<String>,
    /// Auxiliary name.
    pub auxiliary_name: String,
    /// Whether the auxiliary resolved.
    pub resolved: bool,
    /// Account blocks in first-seen order.
    pub accounts: Vec<AccountBlock>,
    /// Sum of account debits.
    pub total_debit: Decimal,
    /// Sum of account credits.
    pub total_credit: Decimal,
    /// Sum of account closing balances.
    pub total_balance: Decimal,
}

/// Report-wide totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GrandTotal {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Total balance.
    pub total_balance: Decimal,
}

/// Detail-mode result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetailReport {
    /// Auxiliary blocks in first-seen order.
    pub auxiliaries: Vec<AuxiliaryBlock>,
    /// Grand total.
    pub grand_total: GrandTotal,
}

/// Report payload, shaped by the report mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    /// Flat rows.
    Summary(Vec<SummaryRow>),
    /// Nested tree.
    Detail(DetailReport),
}

impl ReportData {
    /// Empty payload for the given mode.
    #[must_use]
    pub fn empty(mode: ReportMode) -> Self {
        match mode {
            ReportMode::Summary => Self::Summary(Vec::new()),
            ReportMode::Detail => Self::Detail(DetailReport::default()),
        }
    }

    /// Returns true if there is nothing to print.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Summary(rows) => rows.is_empty(),
            Self::Detail(detail) => detail.auxiliaries.is_empty(),
        }
    }
}

/// Complete subsidiary ledger report.
#[derive(Debug, Clone, Serialize)]
pub struct SubledgerReport {
    /// Report payload.
    pub data: ReportData,
    /// Layout the payload follows.
    pub report_mode: ReportMode,
    /// Pipeline counters and filter warnings.
    pub diagnostics: Diagnostics,
}

impl SubledgerReport {
    /// Returns true when no rows matched the filters.
    ///
    /// This is a normal outcome, not an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
