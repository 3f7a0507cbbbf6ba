//! 服務時長規則索引
//!
//! 按服務分組、門檻升冪排序的查詢結構，支援「最小符合門檻」二分查詢。

use std::collections::HashMap;

use frameflow_core::DurationRule;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Default)]
struct ServiceRules {
    /// 升冪排序的門檻
    thresholds: Vec<Decimal>,
    /// 與門檻同序的時長（秒）
    durations: Vec<Decimal>,
    /// 門檻最大規則的時長，作為飽和退路
    fallback: Decimal,
}

/// 時長規則索引
#[derive(Debug, Clone, Default)]
pub struct DurationIndex {
    services: HashMap<i64, ServiceRules>,
}

impl DurationIndex {
    /// 空索引（查任何服務都回 0）
    pub fn empty() -> Self {
        Self::default()
    }

    /// 從規則清單建立索引
    pub fn build(rules: &[DurationRule]) -> Self {
        let mut grouped: HashMap<i64, Vec<(Decimal, Decimal)>> = HashMap::new();
        for rule in rules {
            grouped
                .entry(rule.service_id)
                .or_default()
                .push((rule.threshold_quantity, rule.duration_seconds));
        }

        let mut services = HashMap::with_capacity(grouped.len());
        for (service_id, mut pairs) in grouped {
            // 穩定排序：同門檻規則保持輸入順序，取排後靠後者
            pairs.sort_by_key(|&(threshold, _)| threshold);
            let fallback = pairs.last().map(|&(_, d)| d).unwrap_or(Decimal::ZERO);
            services.insert(
                service_id,
                ServiceRules {
                    thresholds: pairs.iter().map(|&(t, _)| t).collect(),
                    durations: pairs.iter().map(|&(_, d)| d).collect(),
                    fallback,
                },
            );
        }

        tracing::debug!("時長規則索引建立完成：{} 個服務", services.len());
        Self { services }
    }

    /// 查詢時長（秒）
    ///
    /// 二分搜尋最左側 `threshold >= quantity` 的規則；全部不符時退回
    /// 門檻最大規則的時長；服務不存在回 0（視為無關聯人工，不是錯誤）。
    pub fn lookup(&self, service_id: i64, quantity: Decimal) -> Decimal {
        let Some(rules) = self.services.get(&service_id) else {
            return Decimal::ZERO;
        };
        if rules.thresholds.is_empty() {
            return Decimal::ZERO;
        }

        let idx = rules.thresholds.partition_point(|&t| t < quantity);
        if idx < rules.thresholds.len() {
            rules.durations[idx]
        } else {
            rules.fallback
        }
    }

    /// 服務是否有任何規則
    pub fn has_service(&self, service_id: i64) -> bool {
        self.services.contains_key(&service_id)
    }

    /// 收錄的服務數量
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}
