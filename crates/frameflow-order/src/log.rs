//! 行內日誌緩衝
//!
//! 並行處理時各訂單行把日誌先寫進自己的緩衝，協調器收齊後按原始
//! 行順序統一沖出，避免多工作者交錯導致日誌無法對讀。

/// 日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// 單筆緩衝日誌
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

/// 行內日誌緩衝
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    entries: Vec<LogEntry>,
}

impl LogBuffer {
    /// 創建空緩衝
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: LogLevel::Info,
            message: message.into(),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: LogLevel::Warn,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            level: LogLevel::Error,
            message: message.into(),
        });
    }

    /// 緩衝內容
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按緩衝順序沖到全域日誌
    pub fn flush(&self, line_id: i64) {
        for entry in &self.entries {
            match entry.level {
                LogLevel::Info => tracing::info!(line_id, "{}", entry.message),
                LogLevel::Warn => tracing::warn!(line_id, "{}", entry.message),
                LogLevel::Error => tracing::error!(line_id, "{}", entry.message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_preserves_order() {
        let mut logs = LogBuffer::new();
        logs.info("開始");
        logs.warn("元件缺失");
        logs.error("建立失敗");

        let entries = logs.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[1].level, LogLevel::Warn);
        assert_eq!(entries[2].message, "建立失敗");
    }
}
