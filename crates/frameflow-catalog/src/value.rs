//! 目錄欄位值

use rust_decimal::Decimal;

/// 目錄欄位值的帶標籤聯合
///
/// 遠端記錄的欄位時而是單一 ID、時而是 `(id, 標籤)` 對、時而是 ID 列表。
/// 在目錄客戶端邊界解碼一次，下游一律透過存取器取值，不再各自判斷形狀。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// 空值（遠端以 false 表示未設置）
    Empty,
    /// 布林
    Bool(bool),
    /// 整數（通常是記錄 ID）
    Int(i64),
    /// 數值
    Number(Decimal),
    /// 文字
    Text(String),
    /// 關聯記錄：(id, 顯示標籤)
    Reference { id: i64, label: String },
    /// ID 列表（一對多關聯）
    Ids(Vec<i64>),
}

impl FieldValue {
    /// 關聯記錄值
    pub fn reference(id: i64, label: impl Into<String>) -> Self {
        Self::Reference {
            id,
            label: label.into(),
        }
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty | Self::Bool(false))
    }

    /// 取記錄 ID（整數或關聯值）
    pub fn as_id(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Reference { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// 取顯示標籤（文字或關聯值的標籤）
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Reference { label, .. } => Some(label),
            _ => None,
        }
    }

    /// 取數值（數值或整數）
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Int(value) => Some(Decimal::from(*value)),
            _ => None,
        }
    }

    /// 取文字
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 取 ID 列表（單一 ID 視為單元素列表）
    pub fn as_ids(&self) -> Vec<i64> {
        match self {
            Self::Ids(ids) => ids.clone(),
            Self::Int(id) => vec![*id],
            Self::Reference { id, .. } => vec![*id],
            _ => Vec::new(),
        }
    }

    /// 是否為真
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Empty => false,
            _ => true,
        }
    }
}
