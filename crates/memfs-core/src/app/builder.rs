//! MemFsBuilder - セッションの構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() で設定を検証してからワーカーを起動する
//! - 不正な設定なら BuildError を返し、スレッドは一本も立たない

use std::sync::Arc;

use crate::config::{ConfigError, MemfsConfig};
use crate::dispatch::Dispatcher;
use crate::error::MemfsError;
use crate::ports::{Clock, IdGenerator, StatusSink, StdoutSink, SystemClock, UlidGenerator};
use crate::store::Store;

use super::MemFs;

/// Builds a [`MemFs`] session.
///
/// # 使用例
/// ```ignore
/// let fs = MemFsBuilder::new()
///     .config(MemfsConfig::default().with_workers(8))
///     .sink(Arc::new(MemorySink::new()))
///     .build()?;
/// ```
pub struct MemFsBuilder {
    config: MemfsConfig,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn StatusSink>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start dispatcher: {0}")]
    Dispatcher(#[source] MemfsError),
}

impl MemFsBuilder {
    pub fn new() -> Self {
        Self {
            config: MemfsConfig::default(),
            clock: None,
            sink: None,
            ids: None,
        }
    }

    pub fn config(mut self, config: MemfsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Defaults to [`StdoutSink`].
    pub fn sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Defaults to a [`UlidGenerator`] on the session clock.
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<MemFs, BuildError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let sink = self.sink.unwrap_or_else(|| Arc::new(StdoutSink));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));

        let store = Arc::new(Store::new(&self.config, clock));
        let dispatcher = Dispatcher::start(self.config.workers, Arc::clone(&store), Arc::clone(&sink))
            .map_err(BuildError::Dispatcher)?;

        Ok(MemFs {
            store,
            dispatcher,
            sink,
            ids,
        })
    }
}

impl Default for MemFsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
