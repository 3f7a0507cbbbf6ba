//! 目錄結構定義
//!
//! 核心消費的模型與欄位名是對遠端系統的固定結構契約，集中在此、不得散落。

/// 產品（變體層）
pub const PRODUCT: &str = "product.product";
/// 價格表
pub const PRICELIST: &str = "product.pricelist";
/// 服務時長規則
pub const DURATION_RULE: &str = "x_services_duration_rules";
/// 物料清單
pub const BOM: &str = "mrp.bom";
/// 物料清單明細行
pub const BOM_LINE: &str = "mrp.bom.line";
/// 製造作業
pub const BOM_OPERATION: &str = "mrp.routing.workcenter";
/// 補貨路線
pub const ROUTE: &str = "stock.route";
/// 銷售訂單行
pub const SALE_ORDER_LINE: &str = "sale.order.line";
/// 全域配置單例
pub const CONFIGURATION: &str = "x_configuration";

/// 名稱
pub const F_NAME: &str = "name";
/// 目錄參考號
pub const F_REFERENCE: &str = "default_code";
/// 計價方式（"Surface" | "Circumference"）
pub const F_PRICE_COMPUTATION: &str = "x_studio_price_computation";
/// 成本單價
pub const F_STANDARD_PRICE: &str = "standard_price";
/// 關聯服務
pub const F_ASSOCIATED_SERVICE: &str = "x_studio_associated_service";
/// 關聯工作中心
pub const F_ASSOCIATED_WORKCENTER: &str = "x_studio_associated_work_center";
/// 每人每小時成本
pub const F_COST_PER_HOUR: &str = "x_studio_associated_cost_per_employee_per_hour";
/// 產品關聯的時長規則
pub const F_DURATION_RULE_IDS: &str = "x_studio_duration_rule_ids";
/// 產品模板
pub const F_TEMPLATE_ID: &str = "product_tmpl_id";
/// 電商描述
pub const F_DESCRIPTION: &str = "description_ecommerce";
/// 變體不可更新旗標
pub const F_NOT_UPDATABLE: &str = "x_studio_not_updatable";
/// 補貨路線列表
pub const F_ROUTE_IDS: &str = "route_ids";

/// 時長規則：關聯服務
pub const F_RULE_SERVICE: &str = "x_associated_service";
/// 時長規則：數量門檻
pub const F_RULE_QUANTITY: &str = "x_studio_quantity";
/// 時長規則：總時長（秒）
pub const F_RULE_DURATION: &str = "x_duurtijd_totaal";

/// 價格表：折扣值（加成率由此推導）
pub const F_PRICE_DISCOUNT: &str = "x_studio_price_discount";

/// BOM：變體
pub const F_BOM_PRODUCT: &str = "product_id";
/// BOM 行：所屬 BOM
pub const F_BOM_ID: &str = "bom_id";
/// BOM 行：用量
pub const F_PRODUCT_QTY: &str = "product_qty";
/// 作業：週期時間（分鐘）
pub const F_TIME_CYCLE: &str = "time_cycle_manual";
/// 作業：工作中心
pub const F_WORKCENTER: &str = "workcenter_id";

/// 訂單行：產品
pub const F_LINE_PRODUCT: &str = "product_id";

/// 配置：價格表輸出尺寸（JSON 字串）
pub const F_EXPORT_DIMENSIONS: &str = "x_studio_price_export_dimensions";
