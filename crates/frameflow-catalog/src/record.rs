//! 目錄記錄

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::value::FieldValue;

/// 欄位名 → 值 映射（創建/寫入時的載荷）
pub type FieldMap = HashMap<String, FieldValue>;

/// 一筆目錄記錄
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    /// 記錄 ID
    pub id: i64,

    /// 欄位值
    fields: FieldMap,
}

impl CatalogRecord {
    /// 創建新的記錄
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: FieldMap::new(),
        }
    }

    /// 從欄位映射創建
    pub fn from_fields(id: i64, fields: FieldMap) -> Self {
        Self { id, fields }
    }

    /// 建構器模式：設置欄位
    pub fn with_field(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    /// 取欄位值；未設置視為空值
    pub fn get(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&FieldValue::Empty)
    }

    /// 設置欄位值
    pub fn set(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// 欄位映射
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// 取數值，空值回 0（遠端以 false 表示未設置的數值欄位）
    pub fn number_or_zero(&self, field: &str) -> Decimal {
        self.get(field).as_number().unwrap_or(Decimal::ZERO)
    }

    /// 取文字標籤，空值回空字串
    pub fn label_or_empty(&self, field: &str) -> String {
        self.get(field).as_label().unwrap_or("").to_string()
    }

    /// 取關聯 ID
    pub fn reference_id(&self, field: &str) -> Option<i64> {
        self.get(field).as_id()
    }
}
