//! # Frameflow
//!
//! 電商到 ERP 中介的定價與 BOM 計算引擎。
//!
//! - [`frameflow_core`]：資料模型（尺寸、元件、BOM、售價）
//! - [`frameflow_catalog`]：遠端目錄服務的批次存取契約與記憶體替身
//! - [`frameflow_calc`]：尺寸目錄、時長索引、元件解析、BOM 組裝與售價計算
//! - [`frameflow_export`]：價格表 CSV 輸出
//! - [`frameflow_order`]：訂單行並行處理

pub use frameflow_calc as calc;
pub use frameflow_catalog as catalog;
pub use frameflow_core as core;
pub use frameflow_export as export;
pub use frameflow_order as order;
