//! Detail layout: auxiliary, account and movement tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::diagnostics::Diagnostics;
use super::types::{
    AccountBlock, AuxiliaryBlock, DetailReport, GrandTotal, Movement, MovementRow,
};

const OPENING_NOTE: &str = "Saldo inicial";

/// One auxiliary with its accounts, before rollup.
struct AuxiliaryGroup<'a> {
    head: &'a Movement,
    accounts: Vec<Vec<&'a Movement>>,
    account_index: HashMap<&'a str, usize>,
}

/// Builds the detail tree from sorted movements.
///
/// Groups keep first-seen order. Every account block starts with a synthetic
/// opening row dated `period_start`; the detail opening balance is always
/// zero, so `closing_balance == total_debit - total_credit` per account.
#[must_use]
pub fn build_detail(
    movements: &[Movement],
    period_start: Option<NaiveDate>,
    diagnostics: &mut Diagnostics,
) -> DetailReport {
    let groups = group_movements(movements);

    let mut grand_total = GrandTotal::default();
    let auxiliaries: Vec<AuxiliaryBlock> = groups
        .into_iter()
        .map(|group| {
            let accounts: Vec<AccountBlock> = group
                .accounts
                .iter()
                .map(|lines| account_block(lines, period_start))
                .collect();
            let block = auxiliary_block(group.head, accounts);

            grand_total.total_debit += block.total_debit;
            grand_total.total_credit += block.total_credit;
            grand_total.total_balance += block.total_balance;
            block
        })
        .collect();

    diagnostics.output_groups = auxiliaries.len();

    DetailReport {
        auxiliaries,
        grand_total,
    }
}

fn group_movements(movements: &[Movement]) -> Vec<AuxiliaryGroup<'_>> {
    let mut groups: Vec<AuxiliaryGroup<'_>> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for movement in movements {
        let slot = *group_index
            .entry(movement.auxiliary_key())
            .or_insert_with(|| {
                groups.push(AuxiliaryGroup {
                    head: movement,
                    accounts: Vec::new(),
                    account_index: HashMap::new(),
                });
                groups.len() - 1
            });

        let group = &mut groups[slot];
        let account_slot = *group
            .account_index
            .entry(movement.account_code.as_str())
            .or_insert_with(|| {
                group.accounts.push(Vec::new());
                group.accounts.len() - 1
            });
        group.accounts[account_slot].push(movement);
    }

    groups
}

fn account_block(lines: &[&Movement], period_start: Option<NaiveDate>) -> AccountBlock {
    let opening_balance = Decimal::ZERO;
    let mut running = opening_balance;
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    let mut movement_rows = Vec::with_capacity(lines.len() + 1);
    movement_rows.push(opening_row(opening_balance, period_start));

    for movement in lines {
        running += movement.net();
        total_debit += movement.debit;
        total_credit += movement.credit;

        movement_rows.push(MovementRow {
            date: Some(movement.date),
            voucher_number: movement.voucher_number.clone(),
            voucher_type: movement.voucher_type.clone(),
            note: movement.line_note.clone(),
            debit: movement.debit,
            credit: movement.credit,
            running_balance: running,
            is_opening_balance: false,
        });
    }

    // Grouping never creates an empty account.
    let (account_code, account_description) = lines
        .first()
        .map(|m| (m.account_code.clone(), m.account_description.clone()))
        .unwrap_or_default();

    AccountBlock {
        account_code,
        account_description,
        opening_balance,
        movement_rows,
        total_debit,
        total_credit,
        closing_balance: running,
    }
}

fn opening_row(balance: Decimal, period_start: Option<NaiveDate>) -> MovementRow {
    let note = match period_start {
        Some(date) => format!("{OPENING_NOTE} al {}", date.format("%d/%m/%Y")),
        None => OPENING_NOTE.to_string(),
    };

    MovementRow {
        date: period_start,
        voucher_number: String::new(),
        voucher_type: String::new(),
        note,
        debit: Decimal::ZERO,
        credit: Decimal::ZERO,
        running_balance: balance,
        is_opening_balance: true,
    }
}

fn auxiliary_block(head: &Movement, accounts: Vec<AccountBlock>) -> AuxiliaryBlock {
    let total_debit = accounts.iter().map(|a| a.total_debit).sum();
    let total_credit = accounts.iter().map(|a| a.total_credit).sum();
    let total_balance = accounts.iter().map(|a| a.closing_balance).sum();

    AuxiliaryBlock {
        auxiliary_code: head.auxiliary_code.clone(),
        auxiliary_name: head.auxiliary_name.clone(),
        resolved: head.resolved,
        accounts,
        total_debit,
        total_credit,
        total_balance,
    }
}
