//! 物料清單（BOM）模型

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::component::ResolvedComponent;

/// BOM 明細行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    /// 已解析元件
    pub component: ResolvedComponent,

    /// 用量：覆寫值或依計價方式推導（表面積、周長或 1）
    pub quantity: Decimal,
}

/// 製造作業
///
/// 由帶有關聯服務的已解析元件 1:1 推導；服務或其時長規則無法解析時
/// 整個作業省略（記警告，不視為失敗）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// 作業名稱（取自服務）
    pub name: String,

    /// 週期時間（分鐘），儲存用數值
    pub duration_minutes: Decimal,

    /// 工作中心 ID
    pub workcenter_id: Option<i64>,
}

impl Operation {
    /// 創建新的作業
    pub fn new(name: impl Into<String>, duration_minutes: Decimal) -> Self {
        Self {
            name: name.into(),
            duration_minutes,
            workcenter_id: None,
        }
    }

    /// 建構器模式：設置工作中心
    pub fn with_workcenter(mut self, workcenter_id: i64) -> Self {
        self.workcenter_id = Some(workcenter_id);
        self
    }

    /// 分:秒 顯示字串，只用於人可讀日誌，不回寫數值欄位
    pub fn cycle_time_display(&self) -> String {
        let minutes = self.duration_minutes.floor();
        let seconds = ((self.duration_minutes - minutes) * Decimal::from(60))
            .round()
            .to_u32()
            .unwrap_or(0);
        format!("{}:{:02}", minutes, seconds)
    }
}

/// 製造路線選擇
///
/// 組裝後產品固定標記為「接單生產 + 自行製造」並排除「採購」，
/// 屬不可按呼叫調整的業務規則。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    /// 接單生產（MTO）
    pub make_to_order: bool,

    /// 自行製造
    pub manufacture: bool,

    /// 採購
    pub buy: bool,
}

impl RouteSelection {
    /// 接單生產路線：MTO + 製造，排除採購
    pub fn make_to_order() -> Self {
        Self {
            make_to_order: true,
            manufacture: true,
            buy: false,
        }
    }

    /// 選中的路線名稱（對應目錄中的路線記錄）
    pub fn route_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.make_to_order {
            names.push("Replenish on Order (MTO)");
        }
        if self.manufacture {
            names.push("Manufacture");
        }
        if self.buy {
            names.push("Buy");
        }
        names
    }
}

/// BOM 組裝結果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomAssembly {
    /// 明細行
    pub lines: Vec<BomLine>,

    /// 製造作業
    pub operations: Vec<Operation>,

    /// 製造路線
    pub route: RouteSelection,
}
