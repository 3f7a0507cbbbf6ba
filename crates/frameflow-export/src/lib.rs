//! # Frameflow Export
//!
//! 價格表輸出：掃描參與計價的產品、套用各價格表的加成率，
//! 對尺寸目錄逐格計算售價並序列化為 CSV。

pub mod generator;
pub mod table;

// Re-export 主要類型
pub use generator::PriceListGenerator;
pub use table::{export_filename, PriceListTable};
