//! memfs-core
//!
//! In-memory named-blob store with a bounded worker pool for batch
//! create/write/delete.
//!
//! # モジュール構成
//! - **domain**: Entry, Task, ids, Request
//! - **store**: name -> Entry マップ（単一の排他ロック）
//! - **dispatch**: ワーカープール + バッチ完了バリア（CountDownLatch）
//! - **app**: Batch API（MemFs）と builder
//! - **ports**: Clock / IdGenerator / StatusSink
//! - **config**, **error**, **observability**

pub mod app;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod observability;
pub mod ports;
pub mod store;

pub use app::{BatchReport, BuildError, MemFs, MemFsBuilder, Response};
pub use config::{ConfigError, MemfsConfig};
pub use domain::{Operation, Request};
pub use error::MemfsError;
