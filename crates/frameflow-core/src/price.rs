//! 售價模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// 加成率
///
/// 由儲存的折扣值推導：`margin = (discount * -1) / 100`。
/// 例如折扣 -50 對應 50% 加成。此符號約定為既有業務契約，必須原樣保留。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    /// 加成率（0.5 表示 50%）
    pub rate: Decimal,
}

impl Margin {
    /// 從儲存的折扣值推導加成率
    pub fn from_discount(discount: Decimal) -> Self {
        Self {
            rate: (discount * Decimal::NEGATIVE_ONE) / Decimal::from(100),
        }
    }

    /// 直接以加成率建立
    pub fn from_rate(rate: Decimal) -> Self {
        Self { rate }
    }

    /// 售價乘數（1 + 加成率）
    pub fn factor(&self) -> Decimal {
        Decimal::ONE + self.rate
    }
}

/// 單一尺寸的報價
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// 尺寸
    pub dimension: Dimension,

    /// 材料成本
    pub base_cost: Decimal,

    /// 人工成本
    pub labor_cost: Decimal,

    /// 加成率
    pub margin: Decimal,

    /// 總售價：round((base + labor) * (1 + margin), 2)
    pub total_price: Decimal,
}

/// 四捨五入到 2 位小數（銀行家捨入，與來源系統一致）
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp(2)
}
