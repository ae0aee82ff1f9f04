//! Tests for the subledger repository against a mock connection.

use chrono::{DateTime, NaiveDate};
use rust_decimal_macros::dec;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
use subledger_core::subledger::{
    AccountRange, SubledgerSource, VoucherQuery, VoucherStatus,
};
use subledger_shared::types::{CompanyId, VoucherId};

use super::subledger::SubledgerRepository;
use crate::entities::{
    auxiliaries, chart_of_accounts, sea_orm_active_enums::VoucherStatus as DbVoucherStatus,
    voucher_lines, vouchers,
};

fn voucher_row(id: i64, number: &str) -> vouchers::Model {
    vouchers::Model {
        id,
        company_id: Some(1),
        branch_id: None,
        number: number.to_string(),
        voucher_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        concept: "Cobranza".to_string(),
        status: DbVoucherStatus::Approved,
        voucher_type: "receipt".to_string(),
        created_at: DateTime::parse_from_rfc3339("2024-01-10T09:00:00+00:00").unwrap(),
    }
}

fn line_row(id: i64, auxiliary_ref: Option<&str>) -> voucher_lines::Model {
    voucher_lines::Model {
        id,
        voucher_id: 1,
        sequence: i32::try_from(id).unwrap(),
        account_code: "1211".to_string(),
        auxiliary_ref: auxiliary_ref.map(str::to_string),
        note: None,
        debit_local: dec!(118.00),
        credit_local: dec!(0),
        debit_foreign: dec!(31.55),
        credit_foreign: dec!(0),
    }
}

fn statements(db: DatabaseConnection) -> String {
    format!("{:?}", db.into_transaction_log())
}

#[tokio::test]
async fn test_list_vouchers_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![voucher_row(1, "R-0001"), voucher_row(2, "R-0002")]])
        .into_connection();
    let repo = SubledgerRepository::new(db);

    let query = VoucherQuery {
        company_id: Some(CompanyId::new(1)),
        status: Some(VoucherStatus::Approved),
        ..Default::default()
    };
    let vouchers = repo.list_vouchers(&query).await.unwrap();

    assert_eq!(vouchers.len(), 2);
    assert_eq!(vouchers[0].id, VoucherId::new(1));
    assert_eq!(vouchers[0].number, "R-0001");
    assert_eq!(vouchers[0].status, VoucherStatus::Approved);
    assert_eq!(vouchers[0].company_id, Some(CompanyId::new(1)));
    assert_eq!(vouchers[0].branch_id, None);
}

#[tokio::test]
async fn test_list_vouchers_pushes_filters_down() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<vouchers::Model>::new()])
        .into_connection();
    let repo = SubledgerRepository::new(db.clone());

    let query = VoucherQuery {
        company_id: Some(CompanyId::new(7)),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
        ..Default::default()
    };
    repo.list_vouchers(&query).await.unwrap();
    drop(repo);

    let log = statements(db);
    assert!(log.contains("company_id"));
    assert!(log.contains("voucher_date"));
}

#[tokio::test]
async fn test_list_detail_lines_maps_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![line_row(1, Some("C001")), line_row(2, Some("Bcp"))]])
        .into_connection();
    let repo = SubledgerRepository::new(db);

    let lines = repo
        .list_detail_lines(&[VoucherId::new(1)], &AccountRange::new(Some("12"), Some("13")))
        .await
        .unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].auxiliary_ref.as_deref(), Some("C001"));
    assert_eq!(lines[0].note, "");
    assert_eq!(lines[0].debit_local, dec!(118.00));
    assert_eq!(lines[1].sequence, 2);
}

#[tokio::test]
async fn test_list_detail_lines_without_vouchers_skips_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = SubledgerRepository::new(db);

    let lines = repo
        .list_detail_lines(&[], &AccountRange::default())
        .await
        .unwrap();

    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_list_accounts_defaults_missing_class() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![chart_of_accounts::Model {
            id: 1,
            code: "1211".to_string(),
            description: "Facturas por cobrar".to_string(),
            account_class: None,
            is_active: true,
        }]])
        .into_connection();
    let repo = SubledgerRepository::new(db);

    let accounts = repo.list_accounts(&["1211".to_string()]).await.unwrap();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].description, "Facturas por cobrar");
    assert_eq!(accounts[0].account_class, "");
}

#[tokio::test]
async fn test_list_active_auxiliaries() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![auxiliaries::Model {
            id: 3,
            code: "C001".to_string(),
            name: "Comercial Andina".to_string(),
            auxiliary_type: "customer".to_string(),
            is_active: true,
        }]])
        .into_connection();
    let repo = SubledgerRepository::new(db.clone());

    let auxiliaries = repo.list_active_auxiliaries().await.unwrap();
    drop(repo);

    assert_eq!(auxiliaries.len(), 1);
    assert_eq!(auxiliaries[0].code, "C001");
    assert!(auxiliaries[0].active);
    assert!(statements(db).contains("is_active"));
}

#[tokio::test]
async fn test_store_error_message_is_kept() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let repo = SubledgerRepository::new(db);

    let err = repo.list_active_auxiliaries().await.unwrap_err();

    assert!(err.message.contains("connection reset"));
}
