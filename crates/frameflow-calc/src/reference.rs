//! 產品編號產生器
//!
//! 為訂製品變體產生全域唯一的內部編號。時間戳（微秒）乘上序號空間再加
//! 行程內遞增序號，base36 編碼後冠上固定前綴；同一微秒內的併發呼叫由
//! 序號區分。

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 編號前綴
const REFERENCE_PREFIX: &str = "FRM";

/// 單一微秒內可容納的序號空間
const SEQUENCE_SPACE: u128 = 1_000_000;

/// 唯一編號產生器
///
/// 可在執行緒間共享；`generate` 不需要外部鎖。
#[derive(Debug, Default)]
pub struct ReferenceGenerator {
    counter: AtomicU64,
}

impl ReferenceGenerator {
    /// 創建新的產生器
    pub fn new() -> Self {
        Self::default()
    }

    /// 產生一個唯一編號，如 `FRM9XK2A4BQZ0`
    pub fn generate(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros();
        let value = micros * SEQUENCE_SPACE + (sequence as u128 % SEQUENCE_SPACE);
        format!("{}{}", REFERENCE_PREFIX, to_base36(value))
    }
}

/// 判斷名稱是否為本產生器的產物
///
/// 訂製品以編號為名建立，後續處理需要把這類名稱還原為原始產品名；
/// 判定條件是固定前綴加至少 6 個大寫英數字元。
pub fn is_generated_name(name: &str) -> bool {
    match name.strip_prefix(REFERENCE_PREFIX) {
        Some(rest) => {
            rest.len() >= 6
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        }
        None => false,
    }
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    // DIGITS 內容皆為 ASCII
    String::from_utf8(buf).unwrap_or_default()
}
