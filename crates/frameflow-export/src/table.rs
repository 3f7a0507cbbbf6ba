//! 價格表輸出模型
//!
//! 每份價格表對應一個二維字串表：首欄是產品模板 ID，其餘欄位依尺寸
//! 目錄的順序排列；序列化為 CSV 位元組串由呼叫端落地。

use chrono::NaiveDateTime;
use frameflow_core::{FrameflowError, Margin, Result};

/// 檔名前綴
const FILENAME_PREFIX: &str = "frameflow_price_export";

/// 單一價格表的完整輸出
#[derive(Debug, Clone)]
pub struct PriceListTable {
    /// 價格表名稱
    pub pricelist: String,

    /// 套用的加成率
    pub margin: Margin,

    /// 表頭：`product_tmpl_id` 加各尺寸標籤
    pub header: Vec<String>,

    /// 資料列，與表頭同寬
    pub rows: Vec<Vec<String>>,

    /// 建議輸出檔名
    pub filename: String,
}

impl PriceListTable {
    /// 序列化為 CSV 位元組串
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.header)
            .map_err(|e| FrameflowError::CsvOutput(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| FrameflowError::CsvOutput(e.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|e| FrameflowError::CsvOutput(e.to_string()))
    }
}

/// 價格表輸出檔名
///
/// 名稱轉小寫、空白換底線，再接批次時間戳；同一次輸出的所有檔案
/// 共用同一個時間戳。
pub fn export_filename(pricelist: &str, timestamp: NaiveDateTime) -> String {
    let safe_name = pricelist
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!(
        "{}_{}_{}.csv",
        FILENAME_PREFIX,
        safe_name,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}
