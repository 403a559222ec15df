//! App - アプリケーション層
//!
//! Store と Dispatcher を組み合わせて Batch API を提供する。
//!
//! # 主要コンポーネント
//! - **MemFsBuilder**: セッションの構築とワイヤリング
//! - **MemFs**: Batch API（1 件は inline、2 件以上は Dispatcher 経由）
//! - **BatchReport / Response**: 呼び出し側に返す集計結果
//! - **status**: ステータス行の文言

pub mod builder;
pub mod memfs;
pub mod report;
pub mod status;

pub use self::builder::{BuildError, MemFsBuilder};
pub use self::memfs::MemFs;
pub use self::report::{BatchReport, Response};
