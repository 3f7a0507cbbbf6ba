//! BOM 組裝器
//!
//! 由已解析元件與尺寸推導每行用量、每個關聯服務的作業時長，
//! 組裝物料清單結構並標記固定的製造路線。

use frameflow_core::{
    BomAssembly, BomLine, Dimension, Operation, ResolvedComponent, RouteSelection,
};
use rust_decimal::Decimal;

use crate::resolver::Resolution;

/// BOM 組裝器
pub struct BomAssembler<'a> {
    resolution: &'a Resolution,
}

impl<'a> BomAssembler<'a> {
    /// 基於一次解析結果創建組裝器
    pub fn new(resolution: &'a Resolution) -> Self {
        Self { resolution }
    }

    /// 組裝 BOM 明細與製造作業
    pub fn assemble(&self, dimension: Dimension) -> BomAssembly {
        let mut lines = Vec::with_capacity(self.resolution.resolved.len());
        let mut operations = Vec::new();

        for component in &self.resolution.resolved {
            let quantity = Self::line_quantity(component, dimension);

            if let Some(operation) = self.operation_for(component, quantity) {
                tracing::debug!(
                    "作業 {}: 週期 {}",
                    operation.name,
                    operation.cycle_time_display()
                );
                operations.push(operation);
            }

            lines.push(BomLine {
                component: component.clone(),
                quantity,
            });
        }

        BomAssembly {
            lines,
            operations,
            // 固定業務規則：接單生產 + 自行製造，排除採購
            route: RouteSelection::make_to_order(),
        }
    }

    /// 用量優先序：覆寫（≠1）→ 表面積 → 周長 → 1
    fn line_quantity(component: &ResolvedComponent, dimension: Dimension) -> Decimal {
        if let Some(override_qty) = component.effective_override() {
            return override_qty;
        }
        match component.pricing_method {
            frameflow_core::PricingMethod::Area => dimension.surface_m2(),
            frameflow_core::PricingMethod::Perimeter => dimension.circumference_m(),
            frameflow_core::PricingMethod::Fixed => Decimal::ONE,
        }
    }

    /// 服務與規則都解析成功才產生作業；查詢值用該元件計得的用量本身
    fn operation_for(&self, component: &ResolvedComponent, quantity: Decimal) -> Option<Operation> {
        let service_id = component.associated_service_id?;

        let Some(service) = self.resolution.services.get(&service_id) else {
            tracing::warn!(
                "元件 {} 的關聯服務 {} 無法解析，省略作業",
                component.name,
                service_id
            );
            return None;
        };
        if !self.resolution.duration_index.has_service(service_id) {
            tracing::warn!(
                "服務 {} 沒有可用的時長規則，省略作業",
                service.name
            );
            return None;
        }

        let duration_seconds = self.resolution.duration_index.lookup(service_id, quantity);
        let duration_minutes = duration_seconds / Decimal::from(60);

        let mut operation = Operation::new(service.name.clone(), duration_minutes);
        if let Some(workcenter_id) = service.workcenter_id {
            operation = operation.with_workcenter(workcenter_id);
        }
        Some(operation)
    }
}
