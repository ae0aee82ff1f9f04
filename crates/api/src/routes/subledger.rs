//! Subsidiary ledger report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::AppState;
use subledger_core::subledger::{
    SubledgerError, SubledgerFilter, SubledgerReport, SubledgerService,
};
use subledger_shared::AppError;

/// Creates the subledger report routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/subledger", get(get_subledger_report))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the subledger report.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubledgerQuery {
    /// Company id, ignored with a warning when not numeric.
    pub company_id: Option<String>,
    /// Branch id, ignored with a warning when not numeric.
    pub branch_id: Option<String>,
    /// Account class filter.
    pub classifier: Option<String>,
    /// Auxiliary type filter.
    pub auxiliary_type: Option<String>,
    /// Lower auxiliary code bound.
    pub from_auxiliary: Option<String>,
    /// Upper auxiliary code bound.
    pub to_auxiliary: Option<String>,
    /// Lower account code bound.
    pub from_account: Option<String>,
    /// Upper account code bound.
    pub to_account: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// Voucher status or "All".
    pub status: Option<String>,
    /// `local` (default) or `foreign`.
    pub currency: Option<String>,
    /// `Summary` or `Detail` (default).
    pub report_mode: Option<String>,
}

impl SubledgerQuery {
    /// Converts the query string into an engine filter.
    ///
    /// Never rejects: values the engine cannot apply are dropped and
    /// reported as warnings in the report diagnostics.
    #[must_use]
    pub fn into_filter(self) -> SubledgerFilter {
        SubledgerFilter {
            company_id: self.company_id,
            branch_id: self.branch_id,
            classifier: self.classifier,
            auxiliary_type: self.auxiliary_type,
            from_auxiliary: self.from_auxiliary,
            to_auxiliary: self.to_auxiliary,
            from_account: self.from_account,
            to_account: self.to_account,
            status: self.status,
            ..SubledgerFilter::default()
        }
        .with_raw_dates(self.start_date.as_deref(), self.end_date.as_deref())
        .with_raw_currency(self.currency.as_deref())
        .with_raw_mode(self.report_mode.as_deref())
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Report response: the engine output plus an explicit empty flag.
#[derive(Debug, Serialize)]
pub struct SubledgerResponse {
    /// Report payload, layout and diagnostics.
    #[serde(flatten)]
    pub report: SubledgerReport,
    /// True when no movement matched the filters.
    pub empty: bool,
}

impl From<SubledgerReport> for SubledgerResponse {
    fn from(report: SubledgerReport) -> Self {
        Self {
            empty: report.is_empty(),
            report,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/reports/subledger`
async fn get_subledger_report(
    State(state): State<AppState>,
    Query(query): Query<SubledgerQuery>,
) -> Response {
    let filter = query.into_filter();

    match SubledgerService::generate_with_deadline(
        state.source.as_ref(),
        &filter,
        state.report_timeout,
    )
    .await
    {
        Ok(report) => (StatusCode::OK, Json(SubledgerResponse::from(report))).into_response(),
        Err(e) => {
            error!(error = %e, code = e.error_code(), "Failed to generate subledger report");
            error_response(&app_error(e))
        }
    }
}

/// Maps an engine failure onto the application error taxonomy.
fn app_error(err: SubledgerError) -> AppError {
    match err {
        SubledgerError::DataSource { .. } => AppError::Database(err.to_string()),
        SubledgerError::DeadlineExceeded(_) => AppError::Timeout(err.to_string()),
    }
}

fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use chrono::NaiveDate;
    use subledger_core::subledger::{
        AccountInfo, AccountRange, Auxiliary, ReportMode, SourceError, SubledgerSource,
        VoucherDetailLine, VoucherHeader, VoucherQuery, VoucherStatus,
    };
    use subledger_shared::types::{CurrencySelector, VoucherId};
    use tower::ServiceExt;

    /// One approved voucher with a resolved and an unresolved line.
    struct FixtureSource {
        fail: bool,
    }

    fn detail_line(auxiliary_ref: &str, debit: Decimal, credit: Decimal) -> VoucherDetailLine {
        VoucherDetailLine {
            voucher_id: VoucherId::new(1),
            account_code: "1211".to_string(),
            auxiliary_ref: Some(auxiliary_ref.to_string()),
            note: "Venta".to_string(),
            debit_local: debit,
            credit_local: credit,
            debit_foreign: Decimal::ZERO,
            credit_foreign: Decimal::ZERO,
            sequence: 1,
        }
    }

    #[async_trait]
    impl SubledgerSource for FixtureSource {
        async fn list_vouchers(
            &self,
            query: &VoucherQuery,
        ) -> Result<Vec<VoucherHeader>, SourceError> {
            if self.fail {
                return Err(SourceError::new("connection refused"));
            }
            let voucher = VoucherHeader {
                id: VoucherId::new(1),
                number: "F-0001".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                concept: "Venta".to_string(),
                status: VoucherStatus::Approved,
                voucher_type: "sale".to_string(),
                company_id: None,
                branch_id: None,
            };
            Ok(
                if query.matches(voucher.company_id, voucher.branch_id, voucher.status, voucher.date) {
                    vec![voucher]
                } else {
                    Vec::new()
                },
            )
        }

        async fn list_detail_lines(
            &self,
            _: &[VoucherId],
            _: &AccountRange,
        ) -> Result<Vec<VoucherDetailLine>, SourceError> {
            Ok(vec![
                detail_line("C001", dec!(300), dec!(0)),
                detail_line("Bcp", dec!(0), dec!(45)),
            ])
        }

        async fn list_accounts(&self, _: &[String]) -> Result<Vec<AccountInfo>, SourceError> {
            Ok(vec![AccountInfo {
                code: "1211".to_string(),
                description: "Facturas por cobrar".to_string(),
                account_class: "asset".to_string(),
            }])
        }

        async fn list_active_auxiliaries(&self) -> Result<Vec<Auxiliary>, SourceError> {
            Ok(vec![Auxiliary {
                code: "C001".to_string(),
                name: "Comercial Andina".to_string(),
                auxiliary_type: "customer".to_string(),
                active: true,
            }])
        }
    }

    fn app(fail: bool) -> Router {
        let state = AppState::new(Arc::new(FixtureSource { fail }), Duration::from_secs(5));
        Router::new().merge(routes()).with_state(state)
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_summary_report() {
        let (status, body) = fetch(app(false), "/reports/subledger?reportMode=summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report_mode"], "Summary");
        assert_eq!(body["empty"], false);
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        // "Bcp" sorts before "C001".
        assert_eq!(rows[0]["auxiliary_code"], Value::Null);
        assert_eq!(rows[0]["auxiliary_name"], "Bcp");
        assert_eq!(rows[0]["closing_balance"], "-45");
        assert_eq!(rows[1]["auxiliary_code"], "C001");
        assert_eq!(rows[1]["closing_balance"], "300");
        assert_eq!(body["diagnostics"]["unresolved"], 1);
    }

    #[tokio::test]
    async fn test_detail_report_is_default() {
        let (status, body) = fetch(app(false), "/reports/subledger?startDate=2024-06-01").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report_mode"], "Detail");
        let auxiliaries = body["data"]["auxiliaries"].as_array().unwrap();
        assert_eq!(auxiliaries.len(), 2);
        let opening = &auxiliaries[0]["accounts"][0]["movement_rows"][0];
        assert_eq!(opening["is_opening_balance"], true);
        assert_eq!(opening["note"], "Saldo inicial al 01/06/2024");
        assert_eq!(body["data"]["grand_total"]["total_balance"], "255");
    }

    #[tokio::test]
    async fn test_empty_report_is_ok() {
        let (status, body) = fetch(app(false), "/reports/subledger?status=Anulado").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["empty"], true);
        assert_eq!(body["diagnostics"]["empty_reason"], "no_vouchers");
    }

    #[tokio::test]
    async fn test_non_numeric_company_is_a_warning() {
        let (status, body) = fetch(app(false), "/reports/subledger?companyId=ACME").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["diagnostics"]["warnings"][0]["kind"], "non_numeric_company");
    }

    #[tokio::test]
    async fn test_store_failure_is_database_error() {
        let (status, body) = fetch(app(true), "/reports/subledger").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(
            body["message"],
            "Database error: Data source error while fetching vouchers: connection refused"
        );
    }

    #[tokio::test]
    async fn test_blank_dates_are_open_bounds() {
        let (status, body) = fetch(
            app(false),
            "/reports/subledger?startDate=&endDate=&reportMode=Summary",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report_mode"], "Summary");
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert!(body["diagnostics"]["warnings"].as_array().unwrap().is_empty());
    }

    #[rstest]
    #[case("/reports/subledger?reportMode=tree", "unknown_report_mode", "tree")]
    #[case("/reports/subledger?currency=eur", "unknown_currency", "eur")]
    #[case("/reports/subledger?startDate=junio", "invalid_date", "junio")]
    #[tokio::test]
    async fn test_unusable_value_is_a_warning(
        #[case] uri: &str,
        #[case] kind: &str,
        #[case] value: &str,
    ) {
        let (status, body) = fetch(app(false), uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report_mode"], "Detail");
        assert_eq!(body["diagnostics"]["warnings"][0]["kind"], kind);
        assert_eq!(body["diagnostics"]["warnings"][0]["value"], value);
        assert_eq!(body["data"]["grand_total"]["total_balance"], "255");
    }

    #[test]
    fn test_deadline_maps_to_timeout() {
        let err = app_error(SubledgerError::DeadlineExceeded(Duration::from_secs(30)));

        assert_eq!(err.status_code(), 504);
        assert_eq!(err.error_code(), "TIMEOUT");
    }

    #[test]
    fn test_query_defaults() {
        let filter = SubledgerQuery::default().into_filter();

        assert_eq!(filter.report_mode, ReportMode::Detail);
        assert_eq!(filter.currency, CurrencySelector::Local);
        assert!(filter.ignored.is_empty());
    }
}
