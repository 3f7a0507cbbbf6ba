//! 元件批次解析器
//!
//! 把「以參考號指定的元件清單」解析成帶計價方式、服務與時長規則的
//! 已解析元件。關鍵性能約定：無論元件多少，只對遠端目錄發出三次批次
//! 呼叫（元件 1 次、服務 1 次、時長規則 1 次），絕不逐件查詢。

use std::collections::{HashMap, HashSet};

use frameflow_catalog::{schema, Catalog};
use frameflow_core::{
    ComponentRequest, DurationRule, PricingMethod, ResolvedComponent, Result, SkippedEntry,
};
use rust_decimal::Decimal;

use crate::duration_index::DurationIndex;

/// 已解析服務
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    /// 服務 ID
    pub id: i64,

    /// 服務名稱
    pub name: String,

    /// 每人每小時成本
    pub cost_per_hour: Decimal,

    /// 關聯工作中心
    pub workcenter_id: Option<i64>,
}

/// 批次解析結果
///
/// 每次請求重建的唯讀快照，不跨請求快取。
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// 已解析元件（與請求同序）
    pub resolved: Vec<ResolvedComponent>,

    /// 被跳過的條目（參考號未命中等），不中斷批次
    pub skipped: Vec<SkippedEntry>,

    /// 服務 ID → 服務資訊
    pub services: HashMap<i64, ServiceInfo>,

    /// 時長規則索引
    pub duration_index: DurationIndex,
}

/// 元件解析器
pub struct ComponentResolver<'a, C: Catalog> {
    catalog: &'a C,
}

impl<'a, C: Catalog> ComponentResolver<'a, C> {
    /// 創建新的解析器
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// 批次解析元件清單
    pub fn resolve(&self, requested: &[ComponentRequest]) -> Result<Resolution> {
        if requested.is_empty() {
            return Ok(Resolution::default());
        }

        // 第 1 次批次呼叫：去重後的參考號一次查齊
        let mut seen = HashSet::new();
        let references: Vec<String> = requested
            .iter()
            .filter(|r| seen.insert(r.reference.clone()))
            .map(|r| r.reference.clone())
            .collect();

        tracing::debug!(
            "解析 {} 個元件請求（{} 個去重參考號）",
            requested.len(),
            references.len()
        );

        let records = self.catalog.batch_find_by_reference(
            schema::PRODUCT,
            &references,
        )?;

        let mut resolved = Vec::with_capacity(requested.len());
        let mut skipped = Vec::new();

        for request in requested {
            let Some(record) = records.get(&request.reference) else {
                tracing::warn!(
                    "元件參考號未命中目錄，跳過: {} ({})",
                    request.name,
                    request.reference
                );
                skipped.push(SkippedEntry::new(
                    request.name.clone(),
                    request.reference.clone(),
                    "not found",
                ));
                continue;
            };

            let pricing_method = PricingMethod::from_label(
                &record.label_or_empty(schema::F_PRICE_COMPUTATION),
            );

            resolved.push(ResolvedComponent {
                name: request.name.clone(),
                reference: request.reference.clone(),
                catalog_id: record.id,
                pricing_method,
                quantity_override: request.quantity_override,
                standard_price: record.number_or_zero(schema::F_STANDARD_PRICE),
                associated_service_id: record.reference_id(schema::F_ASSOCIATED_SERVICE),
                duration_rule_ids: record.get(schema::F_DURATION_RULE_IDS).as_ids(),
            });
        }

        // 第 2、3 次批次呼叫：服務與時長規則各取一次聯集
        let service_ids: Vec<i64> = {
            let mut ids: Vec<i64> = resolved
                .iter()
                .filter_map(|c| c.associated_service_id)
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };
        let rule_ids: Vec<i64> = {
            let mut ids: Vec<i64> = resolved
                .iter()
                .flat_map(|c| c.duration_rule_ids.iter().copied())
                .collect();
            ids.sort_unstable();
            ids.dedup();
            ids
        };

        let services = self.read_services(&service_ids)?;
        let duration_index = self.read_duration_rules(&rule_ids)?;

        tracing::debug!(
            "解析完成：{} 筆元件、{} 筆跳過、{} 個服務",
            resolved.len(),
            skipped.len(),
            services.len()
        );

        Ok(Resolution {
            resolved,
            skipped,
            services,
            duration_index,
        })
    }

    fn read_services(&self, service_ids: &[i64]) -> Result<HashMap<i64, ServiceInfo>> {
        if service_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let records = self.catalog.batch_read(
            schema::PRODUCT,
            service_ids,
            &[
                schema::F_NAME,
                schema::F_COST_PER_HOUR,
                schema::F_ASSOCIATED_WORKCENTER,
            ],
        )?;

        Ok(records
            .into_iter()
            .map(|record| {
                (
                    record.id,
                    ServiceInfo {
                        id: record.id,
                        name: record.label_or_empty(schema::F_NAME),
                        cost_per_hour: record.number_or_zero(schema::F_COST_PER_HOUR),
                        workcenter_id: record.reference_id(schema::F_ASSOCIATED_WORKCENTER),
                    },
                )
            })
            .collect())
    }

    fn read_duration_rules(&self, rule_ids: &[i64]) -> Result<DurationIndex> {
        if rule_ids.is_empty() {
            return Ok(DurationIndex::empty());
        }

        let records = self.catalog.batch_read(
            schema::DURATION_RULE,
            rule_ids,
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
}
