//! # Frameflow Catalog
//!
//! 遠端目錄服務（記錄系統）的存取介面。
//!
//! 核心只依賴這裡定義的批次讀寫契約，對傳輸方式不做任何假設；
//! 線上實作以 RPC 連到實際目錄，測試用 [`MemoryCatalog`] 替身。

pub mod memory;
pub mod record;
pub mod schema;
pub mod value;

pub use memory::{CallCounts, MemoryCatalog};
pub use record::{CatalogRecord, FieldMap};
pub use value::FieldValue;

use std::collections::HashMap;

use frameflow_core::Result;

/// 查詢條件（AND 串接）
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// 欄位等於值
    Eq(String, FieldValue),
    /// 欄位在值集合內
    In(String, Vec<FieldValue>),
    /// 欄位為空
    IsEmpty(String),
}

/// 查詢過濾器
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(pub Vec<Condition>);

impl Filter {
    /// 無條件過濾器（匹配全部記錄）
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// 建構器模式：添加等於條件
    pub fn eq(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.0.push(Condition::Eq(field.into(), value));
        self
    }

    /// 建構器模式：添加集合條件
    pub fn is_in(mut self, field: impl Into<String>, values: Vec<FieldValue>) -> Self {
        self.0.push(Condition::In(field.into(), values));
        self
    }

    /// 建構器模式：添加為空條件
    pub fn is_empty(mut self, field: impl Into<String>) -> Self {
        self.0.push(Condition::IsEmpty(field.into()));
        self
    }
}

/// 目錄服務契約
///
/// 全部操作都是批次的：任意大小的邏輯操作只允許 O(1) 次遠端往返，
/// 這是對遠端系統的關鍵性能約定。
pub trait Catalog {
    /// 批次以參考號查找記錄，回傳 參考號 → 記錄 映射；
    /// 缺席的參考號直接不在映射中，不視為錯誤
    fn batch_find_by_reference(
        &self,
        model: &str,
        references: &[String],
    ) -> Result<HashMap<String, CatalogRecord>>;

    /// 批次讀取指定欄位
    fn batch_read(&self, model: &str, ids: &[i64], fields: &[&str]) -> Result<Vec<CatalogRecord>>;

    /// 創建記錄，回傳新 ID
    fn create(&self, model: &str, values: FieldMap) -> Result<i64>;

    /// 寫入既有記錄
    fn write(&self, model: &str, id: i64, values: FieldMap) -> Result<()>;

    /// 按過濾器搜尋，回傳 ID 列表
    fn search(&self, model: &str, filter: &Filter) -> Result<Vec<i64>>;
}

/// 目錄連線工廠
///
/// 線上客戶端不可跨執行緒共用，每個工作者須持有獨立連線。
pub trait SessionFactory: Send + Sync {
    /// 單一工作者持有的連線型別
    type Session: Catalog;

    /// 開啟新連線
    fn open_session(&self) -> Result<Self::Session>;
}
