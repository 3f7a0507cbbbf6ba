//! 元件模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 計價方式
///
/// 決定元件用量如何隨產品尺寸縮放。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMethod {
    /// 依表面積（目錄標籤 "Surface"）
    Area,
    /// 依周長（目錄標籤 "Circumference"）
    Perimeter,
    /// 固定用量
    Fixed,
}

impl PricingMethod {
    /// 從目錄欄位標籤解碼
    pub fn from_label(label: &str) -> Self {
        match label {
            "Surface" => Self::Area,
            "Circumference" => Self::Perimeter,
            _ => Self::Fixed,
        }
    }

    /// 目錄欄位標籤
    pub fn label(&self) -> &'static str {
        match self {
            Self::Area => "Surface",
            Self::Perimeter => "Circumference",
            Self::Fixed => "Fixed",
        }
    }
}

/// 元件請求（以參考號指定，尚未解析）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRequest {
    /// 元件名稱
    pub name: String,

    /// 目錄參考號（目錄內唯一）
    pub reference: String,

    /// 既有 BOM 回放的用量覆寫；存在且 ≠ 1 時直接採用
    pub quantity_override: Option<Decimal>,
}

impl ComponentRequest {
    /// 創建新的元件請求
    pub fn new(name: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            quantity_override: None,
        }
    }

    /// 建構器模式：設置用量覆寫
    pub fn with_quantity_override(mut self, quantity: Decimal) -> Self {
        self.quantity_override = Some(quantity);
        self
    }

    /// 覆寫是否生效（存在且 ≠ 1）
    pub fn effective_override(&self) -> Option<Decimal> {
        self.quantity_override.filter(|q| *q != Decimal::ONE)
    }
}

/// 已解析元件
///
/// 由元件解析器按批次建立，不做持久化，每次計算重建。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedComponent {
    /// 元件名稱
    pub name: String,

    /// 目錄參考號
    pub reference: String,

    /// 目錄記錄 ID
    pub catalog_id: i64,

    /// 計價方式
    pub pricing_method: PricingMethod,

    /// 用量覆寫（來自原請求）
    pub quantity_override: Option<Decimal>,

    /// 成本單價
    pub standard_price: Decimal,

    /// 關聯服務 ID
    pub associated_service_id: Option<i64>,

    /// 關聯的時長規則 ID
    pub duration_rule_ids: Vec<i64>,
}

impl ResolvedComponent {
    /// 覆寫是否生效（存在且 ≠ 1）
    pub fn effective_override(&self) -> Option<Decimal> {
        self.quantity_override.filter(|q| *q != Decimal::ONE)
    }
}

/// 被跳過的條目
///
/// 累積回報、絕不中斷整個批次；最終結果與人可讀日誌都會呈現。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// 元件/條目名稱
    pub name: String,

    /// 目錄參考號
    pub reference: String,

    /// 跳過原因
    pub reason: String,
}

impl SkippedEntry {
    /// 創建新的跳過條目
    pub fn new(
        name: impl Into<String>,
        reference: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}
