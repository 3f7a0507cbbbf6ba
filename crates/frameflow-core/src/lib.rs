//! # Frameflow Core
//!
//! 核心資料模型與類型定義

pub mod bom;
pub mod component;
pub mod dimension;
pub mod duration;
pub mod price;

// Re-export 主要類型
pub use bom::{BomAssembly, BomLine, Operation, RouteSelection};
pub use component::{ComponentRequest, PricingMethod, ResolvedComponent, SkippedEntry};
pub use dimension::Dimension;
pub use duration::DurationRule;
pub use price::{Margin, PriceQuote};

/// Frameflow 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum FrameflowError {
    #[error("目錄服務呼叫失敗: {0}")]
    Catalog(String),

    #[error("找不到記錄: {model} id {id}")]
    RecordNotFound { model: String, id: i64 },

    #[error("尺寸配置解析失敗: {0}")]
    DimensionConfig(String),

    #[error("找不到價格表: {0}")]
    PricelistNotFound(String),

    #[error("價格計算錯誤: {0}")]
    Calculation(String),

    #[error("CSV 輸出錯誤: {0}")]
    CsvOutput(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FrameflowError>;
