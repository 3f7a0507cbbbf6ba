//! 售價計算引擎
//!
//! 單尺寸（純量）與整批尺寸（向量化）兩條路徑；向量化路徑只把產品層
//! 常數提出迴圈，逐尺寸結果必須與純量路徑完全一致。

use frameflow_catalog::{schema, CatalogRecord};
use frameflow_core::price::round_price;
use frameflow_core::{
    Dimension, FrameflowError, Margin, PriceQuote, PricingMethod, Result,
};
use rust_decimal::Decimal;

use crate::duration_index::DurationIndex;

/// 參與價格表計算的產品
#[derive(Debug, Clone)]
pub struct PricedProduct {
    /// 變體 ID
    pub product_id: i64,

    /// 模板 ID（輸出表的行識別）
    pub template_id: i64,

    /// 產品名稱
    pub name: String,

    /// 計價方式
    pub pricing_method: PricingMethod,

    /// 成本單價
    pub standard_price: Decimal,

    /// 關聯服務 ID
    pub service_id: Option<i64>,

    /// 每人每小時成本
    pub cost_per_hour: Decimal,
}

impl PricedProduct {
    /// 從目錄記錄解碼
    pub fn from_record(record: &CatalogRecord) -> Self {
        Self {
            product_id: record.id,
            template_id: record
                .reference_id(schema::F_TEMPLATE_ID)
                .unwrap_or(record.id),
            name: record.label_or_empty(schema::F_NAME),
            pricing_method: PricingMethod::from_label(
                &record.label_or_empty(schema::F_PRICE_COMPUTATION),
            ),
            standard_price: record.number_or_zero(schema::F_STANDARD_PRICE),
            service_id: record.reference_id(schema::F_ASSOCIATED_SERVICE),
            cost_per_hour: record.number_or_zero(schema::F_COST_PER_HOUR),
        }
    }
}

/// 計價方式對應的尺寸值（同時作為材料乘數與時長查詢值）
fn dimension_value(method: PricingMethod, dimension: &Dimension) -> Decimal {
    match method {
        PricingMethod::Perimeter => dimension.circumference_m(),
        PricingMethod::Area => dimension.surface_m2(),
        PricingMethod::Fixed => Decimal::ONE,
    }
}

fn check_preconditions(base_cost: Decimal, margin: &Margin) -> Result<()> {
    if base_cost < Decimal::ZERO {
        return Err(FrameflowError::Calculation(format!(
            "材料成本為負: {}",
            base_cost
        )));
    }
    if margin.rate <= Decimal::NEGATIVE_ONE {
        return Err(FrameflowError::Calculation(format!(
            "加成率超出下界: {}",
            margin.rate
        )));
    }
    Ok(())
}

/// 單尺寸售價
///
/// `base = 單價 × 尺寸值`，`labor = 時長秒 × 時薪 / 3600`，
/// `total = round((base + labor) × (1 + margin), 2)`。
pub fn compute_price(
    product: &PricedProduct,
    dimension: &Dimension,
    index: &DurationIndex,
    margin: &Margin,
) -> Result<PriceQuote> {
    let value = dimension_value(product.pricing_method, dimension);
    let base_cost = product.standard_price * value;
    check_preconditions(base_cost, margin)?;

    let duration_seconds = product
        .service_id
        .map(|service_id| index.lookup(service_id, value))
        .unwrap_or(Decimal::ZERO);
    let labor_cost = duration_seconds * product.cost_per_hour / Decimal::from(3600);

    Ok(PriceQuote {
        dimension: *dimension,
        base_cost,
        labor_cost,
        margin: margin.rate,
        total_price: round_price((base_cost + labor_cost) * margin.factor()),
    })
}

/// 整批尺寸售價（向量化路徑）
///
/// 產品層欄位只取一次，逐尺寸套同一公式；任一索引上的結果都必須與
/// 純量路徑完全相同。
pub fn compute_prices(
    product: &PricedProduct,
    dimensions: &[Dimension],
    index: &DurationIndex,
    margin: &Margin,
) -> Result<Vec<Decimal>> {
    // 常數提出迴圈
    let method = product.pricing_method;
    let standard_price = product.standard_price;
    let cost_per_hour = product.cost_per_hour;
    let service_id = product.service_id;
    let factor = margin.factor();

    let mut prices = Vec::with_capacity(dimensions.len());
    for dimension in dimensions {
        let value = dimension_value(method, dimension);
        let base_cost = standard_price * value;
        check_preconditions(base_cost, margin)?;

        let duration_seconds = service_id
            .map(|id| index.lookup(id, value))
            .unwrap_or(Decimal::ZERO);
        let labor_cost = duration_seconds * cost_per_hour / Decimal::from(3600);

        prices.push(round_price((base_cost + labor_cost) * factor));
    }
    Ok(prices)
}
