//! 服務時長規則模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 服務時長規則
///
/// 對固定的 `service_id`，規則構成一組數量門檻；查詢值 `q` 適用的規則是
/// `threshold_quantity >= q` 中門檻最小者，全部不符時退回門檻最大的規則
/// （飽和查詢，不視為錯誤）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRule {
    /// 關聯服務 ID
    pub service_id: i64,

    /// 數量門檻
    pub threshold_quantity: Decimal,

    /// 時長（秒）
    pub duration_seconds: Decimal,
}

impl DurationRule {
    /// 創建新的時長規則
    pub fn new(service_id: i64, threshold_quantity: Decimal, duration_seconds: Decimal) -> Self {
        Self {
            service_id,
            threshold_quantity,
            duration_seconds,
        }
    }
}
