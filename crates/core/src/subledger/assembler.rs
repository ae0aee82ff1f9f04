//! Movement assembly.
//!
//! Joins voucher headers, detail lines, account descriptions and resolved
//! auxiliaries into the flat, filtered and sorted movement list both report
//! layouts are built from.

use std::collections::{BTreeSet, HashMap};

use subledger_shared::types::{CurrencySelector, VoucherId, round_money};
use tracing::{debug, warn};

use super::diagnostics::{Diagnostics, EmptyReason};
use super::error::{FetchStage, SubledgerError};
use super::filter::{AccountRange, SubledgerFilter};
use super::resolver::{AuxiliaryResolver, Resolution};
use super::source::SubledgerSource;
use super::types::{AccountInfo, Auxiliary, Movement, VoucherDetailLine, VoucherHeader};

/// Runs the fetch-and-join pipeline against a ledger store.
pub struct MovementAssembler<'s, S: ?Sized> {
    source: &'s S,
}

impl<'s, S: SubledgerSource + ?Sized> MovementAssembler<'s, S> {
    /// Creates an assembler reading from `source`.
    #[must_use]
    pub const fn new(source: &'s S) -> Self {
        Self { source }
    }

    /// Builds the movement list for `filter`.
    ///
    /// Stages:
    /// 1. Fetch vouchers (company, branch, status, date range)
    /// 2. Fetch their detail lines within the account range
    /// 3. Fetch account descriptions and the active auxiliary master, concurrently
    /// 4. Resolve auxiliaries and pick amounts in the requested currency
    /// 5. Apply the auxiliary type, auxiliary range and classifier filters
    /// 6. Sort by auxiliary, account, date and voucher number
    ///
    /// An empty stage short-circuits to an empty list.
    ///
    /// # Errors
    ///
    /// Returns `SubledgerError::DataSource` if any fetch fails.
    pub async fn assemble(
        &self,
        filter: &SubledgerFilter,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<Movement>, SubledgerError> {
        let query = filter.voucher_query(diagnostics);
        for warning in &diagnostics.warnings {
            warn!(%warning, "Ignoring report filter");
        }

        let vouchers = self
            .source
            .list_vouchers(&query)
            .await
            .map_err(|e| SubledgerError::data_source(FetchStage::Vouchers, e))?;
        diagnostics.vouchers_fetched = vouchers.len();
        debug!(count = vouchers.len(), "Fetched vouchers");

        if vouchers.is_empty() {
            diagnostics.empty_reason = Some(EmptyReason::NoVouchers);
            return Ok(Vec::new());
        }

        let voucher_ids: Vec<VoucherId> = vouchers.iter().map(|v| v.id).collect();
        let account_range = filter.account_range();
        let fetched = self
            .source
            .list_detail_lines(&voucher_ids, &account_range)
            .await
            .map_err(|e| SubledgerError::data_source(FetchStage::DetailLines, e))?;
        diagnostics.detail_lines_fetched = fetched.len();
        debug!(count = fetched.len(), "Fetched detail lines");

        let lines = retain_reportable_lines(fetched, &account_range, diagnostics);
        if lines.is_empty() {
            diagnostics.empty_reason = Some(EmptyReason::NoDetailLines);
            return Ok(Vec::new());
        }

        let codes = distinct_account_codes(&lines);
        let (accounts, auxiliaries) = tokio::try_join!(
            async {
                self.source
                    .list_accounts(&codes)
                    .await
                    .map_err(|e| SubledgerError::data_source(FetchStage::Accounts, e))
            },
            async {
                self.source
                    .list_active_auxiliaries()
                    .await
                    .map_err(|e| SubledgerError::data_source(FetchStage::Auxiliaries, e))
            },
        )?;
        diagnostics.accounts_loaded = accounts.len();
        diagnostics.auxiliaries_loaded = auxiliaries.len();
        debug!(
            accounts = accounts.len(),
            auxiliaries = auxiliaries.len(),
            "Loaded lookups"
        );

        let movements = build_movements(
            &vouchers,
            lines,
            &accounts,
            &auxiliaries,
            filter.currency,
            diagnostics,
        );
        debug!(
            resolved = diagnostics.resolved_total(),
            unresolved = diagnostics.unresolved,
            "Resolved auxiliaries"
        );

        let mut movements = apply_movement_filters(movements, filter, diagnostics);
        sort_movements(&mut movements);

        diagnostics.movement_count = movements.len();
        if movements.is_empty() {
            diagnostics.empty_reason = Some(EmptyReason::NoMovements);
        }

        Ok(movements)
    }
}

/// Joins lines with their voucher, account and auxiliary.
///
/// Every line with a non-blank auxiliary reference and a known voucher yields
/// exactly one movement; unresolved references are passed through with the
/// raw reference as the name.
pub fn build_movements(
    vouchers: &[VoucherHeader],
    lines: Vec<VoucherDetailLine>,
    accounts: &[AccountInfo],
    auxiliaries: &[Auxiliary],
    currency: CurrencySelector,
    diagnostics: &mut Diagnostics,
) -> Vec<Movement> {
    let vouchers_by_id: HashMap<VoucherId, &VoucherHeader> =
        vouchers.iter().map(|v| (v.id, v)).collect();
    let accounts_by_code: HashMap<&str, &AccountInfo> =
        accounts.iter().map(|a| (a.code.as_str(), a)).collect();
    let resolver = AuxiliaryResolver::new(auxiliaries);

    let mut movements = Vec::with_capacity(lines.len());

    for line in lines {
        let Some(raw_ref) = line.auxiliary_reference() else {
            diagnostics.lines_without_auxiliary += 1;
            continue;
        };
        let Some(voucher) = vouchers_by_id.get(&line.voucher_id) else {
            warn!(voucher_id = %line.voucher_id, "Detail line references an unknown voucher");
            diagnostics.lines_without_voucher += 1;
            continue;
        };

        let resolution = resolver.resolve(raw_ref);
        match resolution {
            Resolution::ByCode(_) => diagnostics.resolved_by_code += 1,
            Resolution::ByName(_) => diagnostics.resolved_by_name += 1,
            Resolution::Unresolved => diagnostics.unresolved += 1,
        }

        let (auxiliary_code, auxiliary_name, auxiliary_type) = match resolution.auxiliary() {
            Some(aux) => (
                Some(aux.code.clone()),
                aux.name.clone(),
                aux.auxiliary_type.clone(),
            ),
            None => (None, raw_ref.to_string(), String::new()),
        };

        let (account_description, account_class) = accounts_by_code
            .get(line.account_code.as_str())
            .map(|a| (a.description.clone(), a.account_class.clone()))
            .unwrap_or_default();

        let (debit, credit) = currency.select(
            (line.debit_local, line.credit_local),
            (line.debit_foreign, line.credit_foreign),
        );

        movements.push(Movement {
            resolved: auxiliary_code.is_some(),
            auxiliary_code,
            auxiliary_name,
            auxiliary_type,
            account_code: line.account_code,
            account_description,
            account_class,
            date: voucher.date,
            voucher_number: voucher.number.clone(),
            voucher_type: voucher.voucher_type.clone(),
            voucher_concept: voucher.concept.clone(),
            line_note: line.note,
            debit: round_money(debit),
            credit: round_money(credit),
            sequence: line.sequence,
        });
    }

    movements
}

/// Applies the filters that need a resolved auxiliary or account class.
pub fn apply_movement_filters(
    movements: Vec<Movement>,
    filter: &SubledgerFilter,
    diagnostics: &mut Diagnostics,
) -> Vec<Movement> {
    let auxiliary_range = filter.auxiliary_range();

    movements
        .into_iter()
        .filter(|m| {
            if !filter.matches_auxiliary_type(m) {
                diagnostics.excluded_by_auxiliary_type += 1;
                return false;
            }
            if !auxiliary_range.admits(m) {
                diagnostics.excluded_by_auxiliary_range += 1;
                return false;
            }
            if !filter.matches_classifier(m) {
                diagnostics.excluded_by_classifier += 1;
                return false;
            }
            true
        })
        .collect()
}

/// Sorts by auxiliary key, account code, date and voucher number.
///
/// Line sequence breaks the remaining ties so the order is deterministic.
pub fn sort_movements(movements: &mut [Movement]) {
    movements.sort_by(|a, b| {
        a.auxiliary_key()
            .cmp(b.auxiliary_key())
            .then_with(|| a.account_code.cmp(&b.account_code))
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.voucher_number.cmp(&b.voucher_number))
            .then_with(|| a.sequence.cmp(&b.sequence))
    });
}

/// Drops lines without an auxiliary reference or outside the account range.
fn retain_reportable_lines(
    lines: Vec<VoucherDetailLine>,
    account_range: &AccountRange,
    diagnostics: &mut Diagnostics,
) -> Vec<VoucherDetailLine> {
    lines
        .into_iter()
        .filter(|line| {
            if line.auxiliary_reference().is_none() {
                diagnostics.lines_without_auxiliary += 1;
                return false;
            }
            if !account_range.contains(&line.account_code) {
                diagnostics.lines_outside_account_range += 1;
                return false;
            }
            true
        })
        .collect()
}

fn distinct_account_codes(lines: &[VoucherDetailLine]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.account_code.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
