//! Report filters.
//!
//! `SubledgerFilter` is what callers send. It is split into the
//! `VoucherQuery` and `AccountRange` pushed down to the store, and the
//! predicates applied to resolved movements.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use subledger_shared::types::{BranchId, CompanyId, CurrencySelector};

use super::diagnostics::{Diagnostics, EffectiveFilters, FilterWarning};
use super::types::{Movement, ReportMode, VoucherStatus};

/// Keyword meaning "no filter" for text filters.
const ALL: &str = "all";

/// Caller-supplied report filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubledgerFilter {
    /// Company identifier; ignored with a warning when not numeric.
    pub company_id: Option<String>,
    /// Branch identifier; ignored with a warning when not numeric.
    pub branch_id: Option<String>,
    /// Account class, `"all"` disables the filter.
    pub classifier: Option<String>,
    /// Auxiliary type, `"all"` disables the filter.
    pub auxiliary_type: Option<String>,
    /// Lower auxiliary code bound (inclusive).
    pub from_auxiliary: Option<String>,
    /// Upper auxiliary code bound (inclusive).
    pub to_auxiliary: Option<String>,
    /// Lower account code bound (inclusive).
    pub from_account: Option<String>,
    /// Upper account code bound (inclusive).
    pub to_account: Option<String>,
    /// First voucher date (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Last voucher date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// `"All"` or a voucher status, case-insensitive.
    pub status: Option<String>,
    /// Amount columns to read.
    pub currency: CurrencySelector,
    /// Report layout.
    pub report_mode: ReportMode,
    /// Raw values dropped while parsing request text.
    #[serde(skip)]
    pub ignored: Vec<FilterWarning>,
}

impl SubledgerFilter {
    /// Creates an empty filter (everything, detail mode, local currency).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one company.
    #[must_use]
    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    /// Restricts to one branch.
    #[must_use]
    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Restricts voucher dates to `[start, end]`.
    #[must_use]
    pub const fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Restricts account codes to `[from, to]`.
    #[must_use]
    pub fn with_accounts(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from_account = from.map(str::to_string);
        self.to_account = to.map(str::to_string);
        self
    }

    /// Restricts resolved auxiliary codes to `[from, to]`.
    #[must_use]
    pub fn with_auxiliaries(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from_auxiliary = from.map(str::to_string);
        self.to_auxiliary = to.map(str::to_string);
        self
    }

    /// Restricts resolved auxiliaries to one type.
    #[must_use]
    pub fn with_auxiliary_type(mut self, auxiliary_type: impl Into<String>) -> Self {
        self.auxiliary_type = Some(auxiliary_type.into());
        self
    }

    /// Restricts to one account class.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Restricts to one voucher status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Selects the amount columns.
    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencySelector) -> Self {
        self.currency = currency;
        self
    }

    /// Selects the report layout.
    #[must_use]
    pub const fn with_mode(mut self, report_mode: ReportMode) -> Self {
        self.report_mode = report_mode;
        self
    }

    /// Sets the date bounds from request text.
    ///
    /// Blank values leave the bound open. Values that are not `YYYY-MM-DD`
    /// or RFC 3339 are dropped with a warning.
    #[must_use]
    pub fn with_raw_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_date = self.date_or_warn(start);
        self.end_date = self.date_or_warn(end);
        self
    }

    /// Selects the amount columns from request text, keeping the default
    /// with a warning when the value is unknown.
    #[must_use]
    pub fn with_raw_currency(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = non_blank(raw) {
            match raw.parse() {
                Ok(currency) => self.currency = currency,
                Err(_) => self.ignored.push(FilterWarning::UnknownCurrency(raw)),
            }
        }
        self
    }

    /// Selects the report layout from request text, keeping the default
    /// with a warning when the value is unknown.
    #[must_use]
    pub fn with_raw_mode(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = non_blank(raw) {
            match raw.parse() {
                Ok(mode) => self.report_mode = mode,
                Err(_) => self.ignored.push(FilterWarning::UnknownReportMode(raw)),
            }
        }
        self
    }

    fn date_or_warn(&mut self, raw: Option<&str>) -> Option<NaiveDate> {
        parse_date(raw).unwrap_or_else(|raw| {
            self.ignored.push(FilterWarning::InvalidDate(raw));
            None
        })
    }

    /// Account code range pushed down with the detail-line fetch.
    #[must_use]
    pub fn account_range(&self) -> AccountRange {
        CodeRange::new(self.from_account.as_deref(), self.to_account.as_deref())
    }

    /// Auxiliary code range applied to resolved movements.
    #[must_use]
    pub fn auxiliary_range(&self) -> CodeRange {
        CodeRange::new(self.from_auxiliary.as_deref(), self.to_auxiliary.as_deref())
    }

    /// Parses the header filters into a store query.
    ///
    /// Values that cannot be applied are recorded as warnings and dropped;
    /// this never fails. Also records the effective filters.
    pub fn voucher_query(&self, diagnostics: &mut Diagnostics) -> VoucherQuery {
        for warning in &self.ignored {
            diagnostics.warn(warning.clone());
        }

        let company_id = parse_numeric::<CompanyId>(self.company_id.as_deref())
            .unwrap_or_else(|raw| {
                diagnostics.warn(FilterWarning::NonNumericCompany(raw));
                None
            });
        let branch_id = parse_numeric::<BranchId>(self.branch_id.as_deref())
            .unwrap_or_else(|raw| {
                diagnostics.warn(FilterWarning::NonNumericBranch(raw));
                None
            });
        let status = parse_status(self.status.as_deref()).unwrap_or_else(|raw| {
            diagnostics.warn(FilterWarning::UnknownStatus(raw));
            None
        });

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                diagnostics.warn(FilterWarning::InvertedDateRange { start, end });
            }
        }

        diagnostics.effective_filters = EffectiveFilters {
            company_id,
            branch_id,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            from_account: non_blank(self.from_account.as_deref()),
            to_account: non_blank(self.to_account.as_deref()),
            from_auxiliary: non_blank(self.from_auxiliary.as_deref()),
            to_auxiliary: non_blank(self.to_auxiliary.as_deref()),
            auxiliary_type: text_filter(self.auxiliary_type.as_deref()).map(str::to_string),
            classifier: text_filter(self.classifier.as_deref()).map(str::to_string),
            currency: self.currency,
            report_mode: self.report_mode,
        };

        VoucherQuery {
            company_id,
            branch_id,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    /// Auxiliary type filter; only resolved movements can fail it.
    #[must_use]
    pub fn matches_auxiliary_type(&self, movement: &Movement) -> bool {
        if !movement.resolved {
            return true;
        }
        text_filter(self.auxiliary_type.as_deref())
            .is_none_or(|wanted| eq_ignore_case(wanted, movement.auxiliary_type.trim()))
    }

    /// Account class filter; passes when either side is empty or "all".
    #[must_use]
    pub fn matches_classifier(&self, movement: &Movement) -> bool {
        let Some(wanted) = text_filter(self.classifier.as_deref()) else {
            return true;
        };
        let class = movement.account_class.trim();
        if class.is_empty() || class.eq_ignore_ascii_case(ALL) {
            return true;
        }
        eq_ignore_case(wanted, class)
    }
}

/// Header filters the store applies to vouchers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoucherQuery {
    /// Company.
    pub company_id: Option<CompanyId>,
    /// Branch.
    pub branch_id: Option<BranchId>,
    /// Status, `None` for all.
    pub status: Option<VoucherStatus>,
    /// Inclusive start date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date.
    pub end_date: Option<NaiveDate>,
}

impl VoucherQuery {
    /// Returns true if a voucher with these attributes passes the query.
    #[must_use]
    pub fn matches(
        &self,
        company_id: Option<CompanyId>,
        branch_id: Option<BranchId>,
        status: VoucherStatus,
        date: NaiveDate,
    ) -> bool {
        self.company_id.is_none_or(|c| company_id == Some(c))
            && self.branch_id.is_none_or(|b| branch_id == Some(b))
            && self.status.is_none_or(|s| s == status)
            && self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}

/// Inclusive, lexicographic code range. Open bounds match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeRange {
    /// Lower bound.
    pub from: Option<String>,
    /// Upper bound.
    pub to: Option<String>,
}

/// Account code bounds for the detail-line fetch.
pub type AccountRange = CodeRange;

impl CodeRange {
    /// Builds a range, treating blank bounds as open.
    #[must_use]
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: non_blank(from),
            to: non_blank(to),
        }
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Returns true if `code` lies within the bounds (string comparison).
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.from.as_deref().is_none_or(|from| code >= from)
            && self.to.as_deref().is_none_or(|to| code <= to)
    }

    /// Auxiliary code check; unresolved movements always pass.
    #[must_use]
    pub fn admits(&self, movement: &Movement) -> bool {
        movement
            .auxiliary_code
            .as_deref()
            .is_none_or(|code| self.contains(code))
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// A text filter value, or `None` when it is blank or "all".
fn text_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

/// `Ok(None)` for absent/blank, `Ok(Some)` when numeric, `Err(raw)` otherwise.
fn parse_numeric<T: std::str::FromStr>(value: Option<&str>) -> Result<Option<T>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| raw.to_string()),
    }
}

/// `Ok(None)` for absent/blank, `Ok(Some)` for a calendar date, `Err(raw)` otherwise.
fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map(Some)
        .map_err(|_| raw.to_string())
}

/// `Ok(None)` for absent/blank/"All", `Ok(Some)` for a known status, `Err(raw)` otherwise.
fn parse_status(value: Option<&str>) -> Result<Option<VoucherStatus>, String> {
    match text_filter(value) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| raw.to_string()),
    }
}
