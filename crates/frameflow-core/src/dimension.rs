//! 尺寸模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品尺寸（毫米）
///
/// 寬高一經建立即不可變；表面積、周長等欄位皆為兩個基礎欄位的純函數。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// 寬度（mm）
    pub width_mm: Decimal,

    /// 高度（mm）
    pub height_mm: Decimal,
}

impl Dimension {
    /// 創建新的尺寸（毫米）
    pub fn new(width_mm: Decimal, height_mm: Decimal) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    /// 以公分創建尺寸
    pub fn from_cm(width_cm: Decimal, height_cm: Decimal) -> Self {
        Self {
            width_mm: width_cm * Decimal::from(10),
            height_mm: height_cm * Decimal::from(10),
        }
    }

    /// 寬度（cm）
    pub fn width_cm(&self) -> Decimal {
        self.width_mm / Decimal::from(10)
    }

    /// 高度（cm）
    pub fn height_cm(&self) -> Decimal {
        self.height_mm / Decimal::from(10)
    }

    /// 表面積（m²）：mm² 換算為 m²
    pub fn surface_m2(&self) -> Decimal {
        (self.width_mm * self.height_mm) / Decimal::from(1_000_000)
    }

    /// 周長（m）：mm 換算為 m
    pub fn circumference_m(&self) -> Decimal {
        Decimal::from(2) * (self.width_mm + self.height_mm) / Decimal::from(1000)
    }

    /// 價格表欄位標籤，例如 "40.0 x 53.0"
    pub fn label(&self) -> String {
        format!("{:.1} x {:.1}", self.width_cm(), self.height_cm())
    }
}
