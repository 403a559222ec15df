//! Status - ステータス行の文言
//!
//! 文言は表示上の都合なので core の契約ではないが、対話シェルの出力と
//! 揃えるためにここへ集約する。

use crate::domain::TaskKind;
use crate::error::MemfsError;

use super::report::BatchReport;

/// Line for a single inline operation that succeeded.
pub fn single_success(kind: TaskKind, name: &str) -> String {
    match kind {
        TaskKind::Create => "file created successfully".to_string(),
        TaskKind::Write => format!("successfully written to {name}"),
        TaskKind::Delete => "file deleted successfully".to_string(),
    }
}

pub fn failure(err: &MemfsError) -> String {
    format!("error: {err}")
}

pub fn duplicate_in_batch(name: &str) -> String {
    format!("error: {name} appears more than once in this batch; skipped")
}

/// Summary line once a dispatched batch has been fully drained.
pub fn batch_summary(report: &BatchReport) -> String {
    if report.is_success() {
        return match report.kind {
            TaskKind::Create => "files created successfully".to_string(),
            TaskKind::Write => "successfully written to the given files".to_string(),
            TaskKind::Delete => "files deleted successfully".to_string(),
        };
    }
    let verb = match report.kind {
        TaskKind::Create => "files created",
        TaskKind::Write => "files written",
        TaskKind::Delete => "files deleted",
    };
    format!(
        "{verb}: {} succeeded, {} failed, {} rejected",
        report.succeeded.len(),
        report.failed.len(),
        report.rejected.len()
    )
}
