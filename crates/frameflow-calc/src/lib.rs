//! # Frameflow Calculation Engine
//!
//! 定價與 BOM 計算核心：尺寸目錄、時長規則索引、元件批次解析、
//! BOM 組裝、售價計算與參考號產生器。

pub mod assembler;
pub mod dimensions;
pub mod duration_index;
pub mod pricing;
pub mod reference;
pub mod resolver;

// Re-export 主要類型
pub use assembler::BomAssembler;
pub use dimensions::DimensionCatalog;
pub use duration_index::DurationIndex;
pub use pricing::{compute_price, compute_prices, PricedProduct};
pub use reference::{is_generated_name, ReferenceGenerator};
pub use resolver::{ComponentResolver, Resolution, ServiceInfo};
