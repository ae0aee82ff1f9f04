//! Report generation service.

use std::time::Duration;

use tracing::info;

use super::assembler::MovementAssembler;
use super::detail::build_detail;
use super::diagnostics::Diagnostics;
use super::error::SubledgerError;
use super::filter::SubledgerFilter;
use super::source::SubledgerSource;
use super::summary::build_summary;
use super::types::{ReportData, ReportMode, SubledgerReport};

/// Service for generating subsidiary ledger reports.
pub struct SubledgerService;

impl SubledgerService {
    /// Generates the report for `filter` in its requested layout.
    ///
    /// # Errors
    ///
    /// Returns `SubledgerError::DataSource` if any store fetch fails.
    pub async fn generate<S>(
        source: &S,
        filter: &SubledgerFilter,
    ) -> Result<SubledgerReport, SubledgerError>
    where
        S: SubledgerSource + ?Sized,
    {
        let mut diagnostics = Diagnostics::default();
        let movements = MovementAssembler::new(source)
            .assemble(filter, &mut diagnostics)
            .await?;

        let data = if movements.is_empty() {
            ReportData::empty(filter.report_mode)
        } else {
            match filter.report_mode {
                ReportMode::Summary => {
                    ReportData::Summary(build_summary(&movements, &mut diagnostics))
                }
                ReportMode::Detail => ReportData::Detail(build_detail(
                    &movements,
                    filter.start_date,
                    &mut diagnostics,
                )),
            }
        };

        info!(
            report_mode = %filter.report_mode,
            vouchers = diagnostics.vouchers_fetched,
            lines = diagnostics.detail_lines_fetched,
            resolved = diagnostics.resolved_total(),
            unresolved = diagnostics.unresolved,
            movements = diagnostics.movement_count,
            groups = diagnostics.output_groups,
            warnings = diagnostics.warnings.len(),
            empty_reason = ?diagnostics.empty_reason,
            "Generated subledger report"
        );

        Ok(SubledgerReport {
            data,
            report_mode: filter.report_mode,
            diagnostics,
        })
    }

    /// Same as [`Self::generate`], abandoned once `deadline` elapses.
    ///
    /// Dropping the pipeline future cancels any in-flight store fetch.
    ///
    /// # Errors
    ///
    /// Returns `SubledgerError::DeadlineExceeded` when the deadline elapses,
    /// or `SubledgerError::DataSource` if any store fetch fails first.
    pub async fn generate_with_deadline<S>(
        source: &S,
        filter: &SubledgerFilter,
        deadline: Duration,
    ) -> Result<SubledgerReport, SubledgerError>
    where
        S: SubledgerSource + ?Sized,
    {
        tokio::time::timeout(deadline, Self::generate(source, filter))
            .await
            .map_err(|_| SubledgerError::DeadlineExceeded(deadline))?
    }
}
