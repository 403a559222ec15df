//! Ports - 抽象化レイヤー
//!
//! 時刻・ID 生成・ステータス出力を trait にして、
//! 本番実装とテスト実装を差し替えられるようにする。

pub mod clock;
pub mod id_generator;
pub mod status_sink;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::status_sink::{MemorySink, NoopSink, StatusSink, StdoutSink};
