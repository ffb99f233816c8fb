//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ImportErrorType, ImportStats};
use crate::RunReport;

/// Logs the failure counts of a run, one line per non-zero category.
pub fn print_error_statistics(stats: &ImportStats) {
    let total_errors = stats.total_errors();
    if total_errors == 0 {
        return;
    }

    info!("Error Counts ({} total):", total_errors);
    for error_type in ImportErrorType::iter() {
        let count = stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}

/// Logs a one-line summary of a run, with the import rate.
pub fn print_run_summary(report: &RunReport) {
    let rate = if report.elapsed_seconds > 0.0 {
        report.records as f64 / report.elapsed_seconds
    } else {
        0.0
    };
    info!(
        "Imported {} record{} from {} file{} in {:.1}s ({:.0} records/s, {} failed file{})",
        report.records,
        if report.records == 1 { "" } else { "s" },
        report.files,
        if report.files == 1 { "" } else { "s" },
        report.elapsed_seconds,
        rate,
        report.failed_files.len(),
        if report.failed_files.len() == 1 { "" } else { "s" },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_error_statistics_empty() {
        print_error_statistics(&ImportStats::new());
    }

    #[test]
    fn test_print_error_statistics_with_errors() {
        let stats = ImportStats::new();
        stats.increment_error(ImportErrorType::DecodeError);
        stats.increment_error(ImportErrorType::FileOpenError);
        print_error_statistics(&stats);
        assert_eq!(stats.total_errors(), 2);
    }

    #[test]
    fn test_print_run_summary_zero_elapsed() {
        print_run_summary(&RunReport {
            files: 0,
            failed_files: vec![std::path::PathBuf::from("a.log")],
            records: 0,
            elapsed_seconds: 0.0,
        });
    }
}
