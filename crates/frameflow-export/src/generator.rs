//! 價格表產生器
//!
//! 讀取階段循序進行且每個模型固定一次搜尋加一次批次讀取；計算階段
//! 按價格表用 rayon 並行，各表之間互不共享可變狀態。

use chrono::Local;
use frameflow_calc::{compute_prices, DimensionCatalog, DurationIndex, PricedProduct};
use frameflow_catalog::{schema, Catalog, FieldValue, Filter};
use frameflow_core::{DurationRule, FrameflowError, Margin, Result};
use rayon::prelude::*;

use crate::table::{export_filename, PriceListTable};

/// 待計算的價格表
#[derive(Debug, Clone)]
struct Pricelist {
    name: String,
    margin: Margin,
}

/// 價格表產生器
pub struct PriceListGenerator<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> PriceListGenerator<'a, C> {
    /// 創建新的產生器
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// 產生價格表
    ///
    /// `requested` 為 `None` 時涵蓋全部價格表（"Default" 除外）；
    /// 指定名稱但目錄中不存在時回傳 [`FrameflowError::PricelistNotFound`]。
    pub fn generate(&self, requested: Option<&[String]>) -> Result<Vec<PriceListTable>> {
        let dimensions = DimensionCatalog::from_catalog(self.catalog);
        let products = self.fetch_products()?;
        let duration_index = self.fetch_duration_index()?;
        let pricelists = self.fetch_pricelists(requested)?;

        tracing::info!(
            "價格表計算開始：{} 份價格表 × {} 個產品 × {} 筆尺寸",
            pricelists.len(),
            products.len(),
            dimensions.len()
        );

        // 同一批次的所有輸出檔共用一個時間戳
        let timestamp = Local::now().naive_local();
        let header: Vec<String> = std::iter::once(schema::F_TEMPLATE_ID.to_string())
            .chain(dimensions.labels())
            .collect();

        let tables: Result<Vec<PriceListTable>> = pricelists
            .par_iter()
            .map(|pricelist| {
                let mut rows = Vec::with_capacity(products.len());
                for product in &products {
                    let prices = compute_prices(
                        product,
                        dimensions.dimensions(),
                        &duration_index,
                        &pricelist.margin,
                    )?;
                    let mut row = Vec::with_capacity(header.len());
                    row.push(product.template_id.to_string());
                    row.extend(prices.iter().map(|p| format!("{:.2}", p)));
                    rows.push(row);
                }

                tracing::debug!(
                    "價格表 {} 計算完成（{} 列）",
                    pricelist.name,
                    rows.len()
                );

                Ok(PriceListTable {
                    pricelist: pricelist.name.clone(),
                    margin: pricelist.margin,
                    header: header.clone(),
                    rows,
                    filename: export_filename(&pricelist.name, timestamp),
                })
            })
            .collect();
        tables
    }

    /// 參與計價的產品：只取計價方式為面積或周長者
    fn fetch_products(&self) -> Result<Vec<PricedProduct>> {
        let filter = Filter::all().is_in(
            schema::F_PRICE_COMPUTATION,
            vec![
                FieldValue::Text("Surface".to_string()),
                FieldValue::Text("Circumference".to_string()),
            ],
        );
        let ids = self.catalog.search(schema::PRODUCT, &filter)?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.catalog.batch_read(
            schema::PRODUCT,
            &ids,
            &[
                schema::F_NAME,
                schema::F_TEMPLATE_ID,
                schema::F_PRICE_COMPUTATION,
                schema::F_STANDARD_PRICE,
                schema::F_ASSOCIATED_SERVICE,
                schema::F_COST_PER_HOUR,
            ],
        )?;
        Ok(records.iter().map(PricedProduct::from_record).collect())
    }

    /// 全量時長規則索引
    fn fetch_duration_index(&self) -> Result<DurationIndex> {
        let ids = self.catalog.search(schema::DURATION_RULE, &Filter::all())?;
        if ids.is_empty() {
            return Ok(DurationIndex::empty());
        }

        let records = self.catalog.batch_read(
            schema::DURATION_RULE,
            &ids,
            &[
                schema::F_RULE_SERVICE,
                schema::F_RULE_QUANTITY,
                schema::F_RULE_DURATION,
            ],
        )?;
        let rules: Vec<DurationRule> = records
            .iter()
            .filter_map(|record| {
                let service_id = record.reference_id(schema::F_RULE_SERVICE)?;
                Some(DurationRule::new(
                    service_id,
                    record.number_or_zero(schema::F_RULE_QUANTITY),
                    record.number_or_zero(schema::F_RULE_DURATION),
                ))
            })
            .collect();
        Ok(DurationIndex::build(&rules))
    }

    fn fetch_pricelists(&self, requested: Option<&[String]>) -> Result<Vec<Pricelist>> {
        let ids = self.catalog.search(schema::PRICELIST, &Filter::all())?;
        let records = self.catalog.batch_read(
            schema::PRICELIST,
            &ids,
            &[schema::F_NAME, schema::F_PRICE_DISCOUNT],
        )?;

        // "Default" 是內部佔位表，永遠不輸出
        let available: Vec<Pricelist> = records
            .iter()
            .map(|record| Pricelist {
                name: record.label_or_empty(schema::F_NAME),
                margin: Margin::from_discount(
                    record.number_or_zero(schema::F_PRICE_DISCOUNT),
                ),
            })
            .filter(|p| !p.name.eq_ignore_ascii_case("default"))
            .collect();

        let Some(names) = requested else {
            return Ok(available);
        };

        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            let found = available
                .iter()
                .find(|p| &p.name == name)
                .cloned()
                .ok_or_else(|| FrameflowError::PricelistNotFound(name.clone()))?;
            selected.push(found);
        }
        Ok(selected)
    }
}
