//! StatusSink port - 人間向けステータス行の出力先
//!
//! Store / Dispatcher / Batch API の結果は 1 行のステータスとしてここに流す。
//! 文言はプレゼンテーションの問題なので、core の契約には含めない。
//!
//! # 実装
//! - **StdoutSink**: 対話シェル用
//! - **MemorySink**: テスト用（行を溜める）
//! - **NoopSink**: ベンチマーク用（捨てる）

use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Receives human-readable status lines.
///
/// Called concurrently from worker threads, hence `Send + Sync`.
pub trait StatusSink: Send + Sync {
    fn emit(&self, line: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StatusSink for StdoutSink {
    fn emit(&self, line: &str) {
        let mut out = std::io::stdout().lock();
        // stdout closed: nothing left to report to
        let _ = writeln!(out, "{line}");
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl StatusSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl StatusSink for NoopSink {
    fn emit(&self, _line: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_lines_in_order() {
        let sink = MemorySink::new();
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.lines(), vec!["first".to_string(), "second".to_string()]);
        assert!(sink.contains("sec"));
        assert!(!sink.contains("third"));
    }
}
