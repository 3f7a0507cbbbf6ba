//! # Frameflow Order
//!
//! 電商訂單行處理：為每條訂製尺寸的行建立專屬產品變體與 BOM，
//! 並行處理、單行錯誤隔離、日誌按行順序沖出。

pub mod log;
pub mod processor;
pub mod report;

// Re-export 主要類型
pub use log::{LogBuffer, LogEntry, LogLevel};
pub use processor::OrderProcessor;
pub use report::{LineOutcome, LineResult, OrderLine, OrderReport, SkipReason};
