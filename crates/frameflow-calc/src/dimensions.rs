//! 尺寸目錄
//!
//! 價格表固定按一份有序的 (寬, 高) 清單計算；順序決定輸出欄位順序，
//! 必須穩定可重現。優先讀外部 JSON 配置，缺失或解析失敗時退回內建表。

use frameflow_catalog::{schema, Catalog, Filter};
use frameflow_core::{Dimension, FrameflowError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 外部配置中的單筆尺寸
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionSpec {
    pub width_mm: f64,
    pub height_mm: f64,
}

/// 內建尺寸表（mm），與既有價格表模板逐項同序
///
/// 依序為：正方形 18 筆、直式 2:3 共 16 筆、直式 ~3:4 共 22 筆、
/// 橫式 3:2 共 20 筆、橫式 ~4:3 共 23 筆、標準相片 12 筆、混合 34 筆。
/// 表中存在重複條目，保留原樣（欄位順序是契約的一部分）。
const DEFAULT_DIMENSIONS_MM: &[(u32, u32)] = &[
    // 正方形 (1:1)
    (50, 50), (700, 700), (750, 750), (800, 800), (850, 850),
    (900, 900), (950, 950), (1000, 1000), (1050, 1050), (1100, 1100),
    (1150, 1150), (1200, 1200), (1250, 1250), (1300, 1300), (1350, 1350),
    (1400, 1400), (1450, 1450), (1500, 1500),
    // 直式 2:3
    (50, 75), (150, 225), (250, 375), (300, 450), (350, 525),
    (450, 675), (500, 750), (550, 825), (650, 975), (700, 1050),
    (760, 1125), (750, 1125), (850, 1275), (900, 1350), (950, 1425),
    (1000, 1500),
    // 直式 ~3:4
    (50, 70), (100, 130), (200, 270), (250, 330), (350, 470),
    (400, 530), (400, 600), (400, 530), (450, 600), (500, 670),
    (550, 730), (650, 870), (700, 930), (750, 1000), (800, 1070),
    (850, 1130), (900, 1200), (950, 1270), (1000, 1330), (1050, 1400),
    (1100, 1470), (1150, 1530),
    // 橫式 3:2
    (75, 50), (150, 100), (225, 150), (300, 200), (375, 250),
    (450, 300), (525, 350), (600, 400), (675, 450), (750, 500),
    (825, 550), (900, 600), (975, 650), (1050, 700), (1125, 750),
    (1200, 800), (1275, 850), (1350, 900), (1425, 950), (1500, 1000),
    // 橫式 ~4:3
    (67, 50), (133, 100), (200, 150), (267, 200), (333, 250),
    (400, 300), (467, 350), (533, 400), (600, 450), (660, 500),
    (730, 550), (800, 600), (860, 650), (930, 700), (1000, 750),
    (1060, 800), (1130, 850), (1200, 900), (1260, 950), (1330, 1000),
    (1400, 1050), (1460, 1100), (1530, 1150),
    // 標準相片
    (90, 130), (200, 280), (180, 130), (240, 180), (250, 200),
    (280, 200), (297, 210), (300, 240), (500, 400), (600, 500),
    (700, 500), (1000, 700),
    // 混合
    (130, 90), (100, 100), (105, 105), (100, 150), (130, 130),
    (250, 250), (130, 180), (150, 200), (150, 150), (350, 350),
    (180, 240), (200, 200), (450, 450), (200, 250), (550, 550),
    (200, 300), (210, 297), (600, 600), (650, 650), (700, 700),
    (240, 300), (300, 300), (300, 400), (300, 450), (400, 400),
    (400, 500), (400, 600), (500, 500), (500, 600), (500, 700),
    (600, 800), (600, 900), (700, 1000), (800, 1200),
];

/// 尺寸目錄：有序、有限、可重複迭代
#[derive(Debug, Clone)]
pub struct DimensionCatalog {
    dimensions: Vec<Dimension>,
}

impl DimensionCatalog {
    /// 內建尺寸表
    pub fn defaults() -> Self {
        let dimensions = DEFAULT_DIMENSIONS_MM
            .iter()
            .map(|&(w, h)| Dimension::new(Decimal::from(w), Decimal::from(h)))
            .collect();
        Self { dimensions }
    }

    /// 從外部 JSON 配置解析（條目形如 `{"width_mm": 400, "height_mm": 400}`）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let specs: Vec<DimensionSpec> = serde_json::from_str(json)
            .map_err(|e| FrameflowError::DimensionConfig(e.to_string()))?;

        let mut dimensions = Vec::with_capacity(specs.len());
        for spec in specs {
            let width = Decimal::try_from(spec.width_mm)
                .map_err(|e| FrameflowError::DimensionConfig(e.to_string()))?;
            let height = Decimal::try_from(spec.height_mm)
                .map_err(|e| FrameflowError::DimensionConfig(e.to_string()))?;
            dimensions.push(Dimension::new(width, height));
        }
        Ok(Self { dimensions })
    }

    /// 從目錄配置載入；缺失或解析失敗時記警告並退回內建表（此階段不失敗）
    pub fn from_catalog<C: Catalog>(catalog: &C) -> Self {
        match Self::try_from_catalog(catalog) {
            Ok(Some(loaded)) => {
                tracing::info!("從目錄配置載入 {} 筆尺寸", loaded.len());
                loaded
            }
            Ok(None) => {
                tracing::info!("目錄未設置尺寸配置，使用內建尺寸表");
                Self::defaults()
            }
            Err(e) => {
                tracing::warn!("尺寸配置載入失敗，退回內建尺寸表: {}", e);
                Self::defaults()
            }
        }
    }

    fn try_from_catalog<C: Catalog>(catalog: &C) -> Result<Option<Self>> {
        let config_ids = catalog.search(schema::CONFIGURATION, &Filter::all())?;
        let Some(&config_id) = config_ids.first() else {
            return Ok(None);
        };

        let records = catalog.batch_read(
            schema::CONFIGURATION,
            &[config_id],
            &[schema::F_EXPORT_DIMENSIONS],
        )?;
        let Some(json) = records
            .first()
            .and_then(|r| r.get(schema::F_EXPORT_DIMENSIONS).as_text().map(String::from))
        else {
            return Ok(None);
        };

        Self::from_json_str(&json).map(Some)
    }

    /// 尺寸數量
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// 是否為空
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// 依序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }

    /// 尺寸切片
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// 輸出欄位標籤（與尺寸同序）
    pub fn labels(&self) -> Vec<String> {
        self.dimensions.iter().map(|d| d.label()).collect()
    }
}
