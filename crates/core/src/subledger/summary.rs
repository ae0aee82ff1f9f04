//! Summary layout: one row per (auxiliary, account).

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::diagnostics::Diagnostics;
use super::types::{Movement, SummaryRow};

/// Builds summary rows from sorted movements.
///
/// The running balance restarts at zero whenever the (auxiliary, account) key
/// changes from the previous movement, so each row's closing balance is the
/// total of its last contiguous run. The opening balance is then back-derived
/// so that `closing = opening + debit - credit` holds for every row.
///
/// Rows come out in first-seen order.
#[must_use]
pub fn build_summary(movements: &[Movement], diagnostics: &mut Diagnostics) -> Vec<SummaryRow> {
    let mut rows: Vec<SummaryRow> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    let mut previous: Option<(&str, &str)> = None;
    let mut running = Decimal::ZERO;

    for movement in movements {
        let key = (movement.auxiliary_key(), movement.account_code.as_str());
        if previous != Some(key) {
            running = Decimal::ZERO;
            previous = Some(key);
        }
        running += movement.net();

        match index.get(&key) {
            Some(&slot) => {
                let row = &mut rows[slot];
                row.total_debit += movement.debit;
                row.total_credit += movement.credit;
                row.closing_balance = running;
            }
            None => {
                index.insert(key, rows.len());
                rows.push(SummaryRow {
                    auxiliary_code: movement.auxiliary_code.clone(),
                    auxiliary_name: movement.auxiliary_name.clone(),
                    resolved: movement.resolved,
                    account_code: movement.account_code.clone(),
                    account_description: movement.account_description.clone(),
                    opening_balance: Decimal::ZERO,
                    total_debit: movement.debit,
                    total_credit: movement.credit,
                    closing_balance: running,
                });
            }
        }
    }

    for row in &mut rows {
        row.opening_balance = row.closing_balance - row.total_debit + row.total_credit;
    }

    diagnostics.output_groups = rows.len();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn movement(key: &str, account: &str, day: u32, debit: Decimal, credit: Decimal) -> Movement {
        Movement {
            auxiliary_code: Some(key.to_string()),
            auxiliary_name: format!("Name {key}"),
            resolved: true,
            auxiliary_type: "customer".to_string(),
            account_code: account.to_string(),
            account_description: format!("Account {account}"),
            account_class: "asset".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            voucher_number: format!("V-{day:03}"),
            voucher_type: "journal".to_string(),
            voucher_concept: String::new(),
            line_note: String::new(),
            debit,
            credit,
            sequence: 1,
        }
    }

    #[test]
    fn test_empty_input() {
        let mut diagnostics = Diagnostics::default();
        assert!(build_summary(&[], &mut diagnostics).is_empty());
        assert_eq!(diagnostics.output_groups, 0);
    }

    #[test]
    fn test_contiguous_group() {
        let movements = vec![
            movement("C001", "1211", 1, dec!(100), dec!(0)),
            movement("C001", "1211", 2, dec!(0), dec!(40)),
            movement("C001", "1211", 3, dec!(15.50), dec!(0)),
        ];
        let mut diagnostics = Diagnostics::default();

        let rows = build_summary(&movements, &mut diagnostics);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total_debit, dec!(115.50));
        assert_eq!(row.total_credit, dec!(40));
        assert_eq!(row.closing_balance, dec!(75.50));
        assert_eq!(row.opening_balance, dec!(0));
        assert_eq!(diagnostics.output_groups, 1);
    }

    #[test]
    fn test_rows_in_first_seen_order() {
        let movements = vec![
            movement("C002", "1211", 1, dec!(10), dec!(0)),
            movement("C001", "1211", 2, dec!(20), dec!(0)),
            movement("C001", "4212", 3, dec!(0), dec!(5)),
        ];

        let rows = build_summary(&movements, &mut Diagnostics::default());

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.auxiliary_code.as_deref().unwrap(), r.account_code.as_str()))
            .collect();
        assert_eq!(keys, vec![("C002", "1211"), ("C001", "1211"), ("C001", "4212")]);
    }

    #[test]
    fn test_interleaved_key_restarts_running_balance() {
        // Unsorted input revisits a key; the closing balance covers only the last run.
        let movements = vec![
            movement("C001", "1211", 1, dec!(100), dec!(0)),
            movement("C002", "1211", 2, dec!(50), dec!(0)),
            movement("C001", "1211", 3, dec!(30), dec!(0)),
        ];

        let rows = build_summary(&movements, &mut Diagnostics::default());

        let row = &rows[0];
        assert_eq!(row.total_debit, dec!(130));
        assert_eq!(row.closing_balance, dec!(30));
        assert_eq!(row.opening_balance, dec!(-100));
        assert_eq!(
            row.closing_balance,
            row.opening_balance + row.total_debit - row.total_credit
        );
    }

    #[test]
    fn test_unresolved_row_keeps_raw_name() {
        let mut legacy = movement("x", "1041", 1, dec!(75.56), dec!(0));
        legacy.auxiliary_code = None;
        legacy.auxiliary_name = "Bcp".to_string();
        legacy.resolved = false;

        let rows = build_summary(&[legacy], &mut Diagnostics::default());

        assert_eq!(rows[0].auxiliary_code, None);
        assert_eq!(rows[0].auxiliary_name, "Bcp");
        assert!(!rows[0].resolved);
        assert_eq!(rows[0].closing_balance, dec!(75.56));
    }
}
