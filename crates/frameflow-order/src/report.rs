//! 訂單行處理結果模型
//!
//! 每條行以明確的結局分類收斂（完成、跳過、出錯），單行失敗不影響
//! 其他行；整批報告附帶執行 ID 供追蹤。

use frameflow_core::SkippedEntry;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::log::LogBuffer;

/// 待處理的訂單行
#[derive(Debug, Clone)]
pub struct OrderLine {
    /// 訂單行記錄 ID
    pub id: i64,

    /// 下單的產品變體
    pub product_id: i64,

    /// 訂購數量
    pub quantity: Decimal,

    /// 訂製寬度（mm）
    pub width_mm: Decimal,

    /// 訂製高度（mm）
    pub height_mm: Decimal,
}

/// 跳過原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 數量不是 1，屬預置成品而非訂製品
    PresetQuantity,
    /// 產品標記為不可更新
    Unupdatable,
    /// 找不到可回放的來源 BOM
    NoBom,
}

impl SkipReason {
    /// 人可讀描述
    pub fn describe(&self) -> &'static str {
        match self {
            Self::PresetQuantity => "數量非 1，視為預置成品",
            Self::Unupdatable => "產品標記為不可更新",
            Self::NoBom => "找不到來源 BOM",
        }
    }
}

/// 單行處理結局
#[derive(Debug, Clone)]
pub enum LineOutcome {
    /// 訂製品已建立並回寫訂單行
    Processed {
        /// 新建變體 ID
        new_product_id: i64,
        /// 新建 BOM ID
        bom_id: i64,
        /// 回寫到訂單行的描述
        description: String,
        /// 元件用量摘要（只進日誌，不寫回描述）
        component_summary: String,
        /// 被跳過的元件
        skipped_components: Vec<SkippedEntry>,
    },
    /// 整行按規則跳過
    Skipped(SkipReason),
    /// 整行出錯（錯誤已被隔離）
    Errored(String),
}

/// 單行處理結果
#[derive(Debug, Clone)]
pub struct LineResult {
    /// 訂單行記錄 ID
    pub line_id: i64,

    /// 結局
    pub outcome: LineOutcome,

    /// 行內日誌緩衝
    pub logs: LogBuffer,
}

/// 整批訂單處理報告
#[derive(Debug, Clone)]
pub struct OrderReport {
    /// 本次執行 ID
    pub run_id: Uuid,

    /// 各行結果，與輸入同序
    pub results: Vec<LineResult>,
}

impl OrderReport {
    /// 完成行數
    pub fn processed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, LineOutcome::Processed { .. }))
            .count()
    }

    /// 跳過行數
    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, LineOutcome::Skipped(_)))
            .count()
    }

    /// 出錯行數
    pub fn errored(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, LineOutcome::Errored(_)))
            .count()
    }

    /// 整批是否算成功：至少一行不是出錯即視為成功
    pub fn overall_success(&self) -> bool {
        self.results.is_empty() || self.errored() < self.results.len()
    }
}
