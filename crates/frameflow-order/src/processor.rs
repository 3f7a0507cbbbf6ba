//! 訂單行處理器
//!
//! 把含訂製尺寸的訂單行轉成專屬產品變體：回放來源 BOM、按尺寸重算
//! 用量與作業時長、建立新變體並回寫訂單行。行與行並行處理、錯誤互相
//! 隔離，單行失敗不中斷整批。

use frameflow_calc::{is_generated_name, BomAssembler, ComponentResolver, ReferenceGenerator};
use frameflow_catalog::{schema, Catalog, CatalogRecord, FieldMap, FieldValue, Filter, SessionFactory};
use frameflow_core::{BomAssembly, ComponentRequest, Dimension, FrameflowError, Result};
use rayon::prelude::*;
use uuid::Uuid;

use crate::log::LogBuffer;
use crate::report::{LineOutcome, LineResult, OrderLine, OrderReport, SkipReason};

/// 工作者上限：遠端目錄的併發連線配額
const MAX_WORKERS: usize = 5;

/// 新變體描述欄位中標記原始產品名的前綴
const ORIGINAL_PREFIX: &str = "Original: ";

/// 訂單行處理器
pub struct OrderProcessor<'a, F: SessionFactory> {
    sessions: &'a F,
    references: ReferenceGenerator,
}

impl<'a, F: SessionFactory> OrderProcessor<'a, F> {
    /// 創建新的處理器
    pub fn new(sessions: &'a F) -> Self {
        Self {
            sessions,
            references: ReferenceGenerator::new(),
        }
    }

    /// 處理一批訂單行
    ///
    /// 回傳的結果與輸入同序；所有行內日誌在收齊後按原始順序統一沖出。
    pub fn process(&self, lines: &[OrderLine]) -> OrderReport {
        let run_id = Uuid::new_v4();
        tracing::info!(%run_id, "訂單處理開始：{} 條行", lines.len());

        if lines.is_empty() {
            return OrderReport {
                run_id,
                results: Vec::new(),
            };
        }

        let workers = lines.len().min(MAX_WORKERS);
        let results: Vec<LineResult> = match rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
        {
            Ok(pool) => pool.install(|| {
                lines
                    .par_iter()
                    .map(|line| self.process_line(line))
                    .collect()
            }),
            Err(e) => {
                tracing::warn!("執行緒池建立失敗，改為循序處理: {}", e);
                lines.iter().map(|line| self.process_line(line)).collect()
            }
        };

        // 收齊後按原始行順序沖出，避免工作者交錯
        for result in &results {
            result.logs.flush(result.line_id);
        }

        let report = OrderReport { run_id, results };
        tracing::info!(
            %run_id,
            "訂單處理結束：{} 完成 / {} 跳過 / {} 出錯",
            report.processed(),
            report.skipped(),
            report.errored()
        );
        report
    }

    fn process_line(&self, line: &OrderLine) -> LineResult {
        let mut logs = LogBuffer::new();
        let outcome = match self.try_line(line, &mut logs) {
            Ok(outcome) => outcome,
            Err(e) => {
                // 單行錯誤就地收斂，整批繼續
                logs.error(format!("訂單行處理失敗: {}", e));
                LineOutcome::Errored(e.to_string())
            }
        };
        LineResult {
            line_id: line.id,
            outcome,
            logs,
        }
    }

    fn try_line(&self, line: &OrderLine, logs: &mut LogBuffer) -> Result<LineOutcome> {
        let session = self.sessions.open_session()?;

        if line.quantity != rust_decimal::Decimal::ONE {
            logs.info(format!(
                "數量 {} 非 1，{}",
                line.quantity,
                SkipReason::PresetQuantity.describe()
            ));
            return Ok(LineOutcome::Skipped(SkipReason::PresetQuantity));
        }

        let product = read_product(&session, line.product_id)?;

        if product.get(schema::F_NOT_UPDATABLE).as_bool() {
            logs.info(SkipReason::Unupdatable.describe());
            return Ok(LineOutcome::Skipped(SkipReason::Unupdatable));
        }

        let Some(bom_id) = find_source_bom(&session, &product)? else {
            logs.warn(format!(
                "產品 {} 沒有來源 BOM，{}",
                line.product_id,
                SkipReason::NoBom.describe()
            ));
            return Ok(LineOutcome::Skipped(SkipReason::NoBom));
        };

        let requests = load_component_requests(&session, bom_id)?;
        let original_name = recover_original_name(&session, line.id, &product, logs)?;
        let dimension = Dimension::new(line.width_mm, line.height_mm);

        let resolution = ComponentResolver::new(&session).resolve(&requests)?;
        for skipped in &resolution.skipped {
            logs.warn(format!(
                "元件 {} ({}) 被跳過: {}",
                skipped.name, skipped.reference, skipped.reason
            ));
        }

        let assembly = BomAssembler::new(&resolution).assemble(dimension);
        let reference = self.references.generate();
        logs.info(format!(
            "建立訂製變體 {}（{} 行元件、{} 個作業）",
            reference,
            assembly.lines.len(),
            assembly.operations.len()
        ));

        let new_product_id =
            create_custom_product(&session, &reference, &original_name, &assembly, logs)?;
        let new_bom_id = create_bom(&session, new_product_id, &reference, &assembly)?;

        // 顯示描述用公分
        let description = format!(
            "{} ({}x{})",
            original_name,
            dimension.width_cm(),
            dimension.height_cm()
        );
        let component_summary = summarize_components(&assembly);
        logs.info(format!("元件用量: {}", component_summary));

        let mut values = FieldMap::new();
        values.insert(
            schema::F_LINE_PRODUCT.to_string(),
            FieldValue::reference(new_product_id, &reference),
        );
        values.insert(
            schema::F_NAME.to_string(),
            FieldValue::Text(description.clone()),
        );
        session.write(schema::SALE_ORDER_LINE, line.id, values)?;

        Ok(LineOutcome::Processed {
            new_product_id,
            bom_id: new_bom_id,
            description,
            component_summary,
            skipped_components: resolution.skipped,
        })
    }
}

fn read_product<C: Catalog>(session: &C, product_id: i64) -> Result<CatalogRecord> {
    let records = session.batch_read(
        schema::PRODUCT,
        &[product_id],
        &[
            schema::F_NAME,
            schema::F_DESCRIPTION,
            schema::F_NOT_UPDATABLE,
            schema::F_TEMPLATE_ID,
        ],
    )?;
    records
        .into_iter()
        .next()
        .ok_or_else(|| FrameflowError::RecordNotFound {
            model: schema::PRODUCT.to_string(),
            id: product_id,
        })
}

/// 先找變體層 BOM，沒有再退到模板層（未綁定特定變體者）
fn find_source_bom<C: Catalog>(session: &C, product: &CatalogRecord) -> Result<Option<i64>> {
    let variant_filter = Filter::all().eq(schema::F_BOM_PRODUCT, FieldValue::Int(product.id));
    let ids = session.search(schema::BOM, &variant_filter)?;
    if let Some(&id) = ids.first() {
        return Ok(Some(id));
    }

    let template_id = product
        .reference_id(schema::F_TEMPLATE_ID)
        .unwrap_or(product.id);
    let template_filter = Filter::all()
        .eq(schema::F_TEMPLATE_ID, FieldValue::Int(template_id))
        .is_empty(schema::F_BOM_PRODUCT);
    let ids = session.search(schema::BOM, &template_filter)?;
    Ok(ids.first().copied())
}

/// 回放來源 BOM 的明細行為元件請求（帶原始用量作為覆寫）
fn load_component_requests<C: Catalog>(session: &C, bom_id: i64) -> Result<Vec<ComponentRequest>> {
    let line_filter = Filter::all().eq(schema::F_BOM_ID, FieldValue::Int(bom_id));
    let line_ids = session.search(schema::BOM_LINE, &line_filter)?;
    if line_ids.is_empty() {
        return Ok(Vec::new());
    }

    let bom_lines = session.batch_read(
        schema::BOM_LINE,
        &line_ids,
        &[schema::F_LINE_PRODUCT, schema::F_PRODUCT_QTY],
    )?;

    let component_ids: Vec<i64> = bom_lines
        .iter()
        .filter_map(|l| l.reference_id(schema::F_LINE_PRODUCT))
        .collect();
    let components = session.batch_read(
        schema::PRODUCT,
        &component_ids,
        &[schema::F_NAME, schema::F_REFERENCE],
    )?;

    let by_id: std::collections::HashMap<i64, &CatalogRecord> =
        components.iter().map(|r| (r.id, r)).collect();

    let mut requests = Vec::with_capacity(bom_lines.len());
    for bom_line in &bom_lines {
        let Some(component) = bom_line
            .reference_id(schema::F_LINE_PRODUCT)
            .and_then(|id| by_id.get(&id))
        else {
            continue;
        };
        let name = component.label_or_empty(schema::F_NAME);
        let reference = component
            .get(schema::F_REFERENCE)
            .as_text()
            .unwrap_or_default()
            .to_string();
        requests.push(
            ComponentRequest::new(name, reference)
                .with_quantity_override(bom_line.number_or_zero(schema::F_PRODUCT_QTY)),
        );
    }
    Ok(requests)
}

/// 還原原始產品名
///
/// 重複處理過的變體名稱是產生的編號，依序嘗試：描述的 `Original: ` 行、
/// 訂單行現有名稱剝掉尺寸尾綴；都失敗才保留編號並記警告。
/// 一般名稱只剝掉既有的尺寸尾綴。
fn recover_original_name<C: Catalog>(
    session: &C,
    line_id: i64,
    product: &CatalogRecord,
    logs: &mut LogBuffer,
) -> Result<String> {
    let name = product.label_or_empty(schema::F_NAME);
    if !is_generated_name(&name) {
        return Ok(strip_dimension_suffix(&name).to_string());
    }

    if let Some(original) = product
        .get(schema::F_DESCRIPTION)
        .as_text()
        .and_then(extract_original)
    {
        return Ok(original);
    }

    // 描述缺失時退到訂單行現有名稱，尾綴剝得掉才採信
    let records = session.batch_read(schema::SALE_ORDER_LINE, &[line_id], &[schema::F_NAME])?;
    if let Some(line_name) = records.first().and_then(|r| r.get(schema::F_NAME).as_text()) {
        let stripped = strip_dimension_suffix(line_name);
        if stripped != line_name {
            return Ok(stripped.to_string());
        }
    }

    logs.warn(format!("無法還原 {} 的原始產品名", name));
    Ok(name)
}

fn extract_original(description: &str) -> Option<String> {
    description
        .lines()
        .find_map(|l| l.trim().strip_prefix(ORIGINAL_PREFIX))
        .map(|rest| rest.trim().to_string())
        .filter(|rest| !rest.is_empty())
}

/// 剝掉 `名稱 (寬x高)` 形式的尾綴，不符合形式的名稱原樣保留
fn strip_dimension_suffix(name: &str) -> &str {
    let trimmed = name.trim_end();
    let Some(rest) = trimmed.strip_suffix(')') else {
        return name;
    };
    let Some(open) = rest.rfind('(') else {
        return name;
    };
    let inner = &rest[open + 1..];
    let mut parts = inner.splitn(2, 'x');
    let (Some(w), Some(h)) = (parts.next(), parts.next()) else {
        return name;
    };
    let numeric =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric(w) && numeric(h) {
        rest[..open].trim_end()
    } else {
        name
    }
}

fn create_custom_product<C: Catalog>(
    session: &C,
    reference: &str,
    original_name: &str,
    assembly: &BomAssembly,
    logs: &mut LogBuffer,
) -> Result<i64> {
    let mut fields = FieldMap::new();
    fields.insert(
        schema::F_NAME.to_string(),
        FieldValue::Text(reference.to_string()),
    );
    fields.insert(
        schema::F_REFERENCE.to_string(),
        FieldValue::Text(reference.to_string()),
    );
    fields.insert(
        schema::F_DESCRIPTION.to_string(),
        FieldValue::Text(format!("{}{}", ORIGINAL_PREFIX, original_name)),
    );
    let new_product_id = session.create(schema::PRODUCT, fields)?;

    // 依名稱查路線記錄，缺席時記警告但不失敗
    let route_names: Vec<FieldValue> = assembly
        .route
        .route_names()
        .into_iter()
        .map(|n| FieldValue::Text(n.to_string()))
        .collect();
    let route_filter = Filter::all().is_in(schema::F_NAME, route_names);
    let route_ids = session.search(schema::ROUTE, &route_filter)?;
    if route_ids.is_empty() {
        logs.warn("目錄中找不到製造路線記錄，略過路線指派");
    } else {
        let mut values = FieldMap::new();
        values.insert(schema::F_ROUTE_IDS.to_string(), FieldValue::Ids(route_ids));
        session.write(schema::PRODUCT, new_product_id, values)?;
    }

    Ok(new_product_id)
}

fn create_bom<C: Catalog>(
    session: &C,
    product_id: i64,
    reference: &str,
    assembly: &BomAssembly,
) -> Result<i64> {
    let mut fields = FieldMap::new();
    fields.insert(
        schema::F_BOM_PRODUCT.to_string(),
        FieldValue::reference(product_id, reference),
    );
    let bom_id = session.create(schema::BOM, fields)?;

    for line in &assembly.lines {
        let mut values = FieldMap::new();
        values.insert(schema::F_BOM_ID.to_string(), FieldValue::Int(bom_id));
        values.insert(
            schema::F_LINE_PRODUCT.to_string(),
            FieldValue::reference(line.component.catalog_id, &line.component.name),
        );
        values.insert(
            schema::F_PRODUCT_QTY.to_string(),
            FieldValue::Number(line.quantity),
        );
        session.create(schema::BOM_LINE, values)?;
    }

    for operation in &assembly.operations {
        let mut values = FieldMap::new();
        values.insert(schema::F_BOM_ID.to_string(), FieldValue::Int(bom_id));
        values.insert(
            schema::F_NAME.to_string(),
            FieldValue::Text(operation.name.clone()),
        );
        values.insert(
            schema::F_TIME_CYCLE.to_string(),
            FieldValue::Number(operation.duration_minutes),
        );
        if let Some(workcenter_id) = operation.workcenter_id {
            values.insert(
                schema::F_WORKCENTER.to_string(),
                FieldValue::reference(workcenter_id, &operation.name),
            );
        }
        session.create(schema::BOM_OPERATION, values)?;
    }

    Ok(bom_id)
}

fn summarize_components(assembly: &BomAssembly) -> String {
    assembly
        .lines
        .iter()
        .map(|line| format!("{} × {}", line.component.name, line.quantity))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameflow_catalog::MemoryCatalog;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn seed_routes(catalog: &MemoryCatalog) {
        for name in ["Replenish on Order (MTO)", "Manufacture", "Buy"] {
            let mut fields = FieldMap::new();
            fields.insert(schema::F_NAME.into(), FieldValue::Text(name.into()));
            catalog.seed(schema::ROUTE, fields);
        }
    }

    fn seed_service_with_rules(catalog: &MemoryCatalog) -> (i64, Vec<i64>) {
        let mut service = FieldMap::new();
        service.insert(schema::F_NAME.into(), FieldValue::Text("Framing".into()));
        service.insert(
            schema::F_COST_PER_HOUR.into(),
            FieldValue::Number(Decimal::from(36)),
        );
        service.insert(
            schema::F_ASSOCIATED_WORKCENTER.into(),
            FieldValue::reference(77, "Atelier"),
        );
        let service_id = catalog.seed(schema::PRODUCT, service);

        let mut rule_ids = Vec::new();
        for (qty, secs) in [(Decimal::new(1, 1), 60), (Decimal::new(2, 1), 120)] {
            let mut rule = FieldMap::new();
            rule.insert(
                schema::F_RULE_SERVICE.into(),
                FieldValue::reference(service_id, "Framing"),
            );
            rule.insert(schema::F_RULE_QUANTITY.into(), FieldValue::Number(qty));
            rule.insert(
                schema::F_RULE_DURATION.into(),
                FieldValue::Number(Decimal::from(secs)),
            );
            rule_ids.push(catalog.seed(schema::DURATION_RULE, rule));
        }
        (service_id, rule_ids)
    }

    fn seed_component(
        catalog: &MemoryCatalog,
        name: &str,
        reference: &str,
        method: &str,
        service: Option<(i64, &[i64])>,
    ) -> i64 {
        let mut fields = FieldMap::new();
        fields.insert(schema::F_NAME.into(), FieldValue::Text(name.into()));
        fields.insert(schema::F_REFERENCE.into(), FieldValue::Text(reference.into()));
        fields.insert(
            schema::F_PRICE_COMPUTATION.into(),
            FieldValue::Text(method.into()),
        );
        fields.insert(
            schema::F_STANDARD_PRICE.into(),
            FieldValue::Number(Decimal::TEN),
        );
        if let Some((service_id, rule_ids)) = service {
            fields.insert(
                schema::F_ASSOCIATED_SERVICE.into(),
                FieldValue::reference(service_id, "Framing"),
            );
            fields.insert(
                schema::F_DURATION_RULE_IDS.into(),
                FieldValue::Ids(rule_ids.to_vec()),
            );
        }
        catalog.seed(schema::PRODUCT, fields)
    }

    /// 產品 + 變體層 BOM（玻璃依面積、掛鉤固定 3 個）
    fn seed_ordered_product(catalog: &MemoryCatalog, name: &str) -> i64 {
        let (service_id, rule_ids) = seed_service_with_rules(catalog);
        let glass = seed_component(
            catalog,
            "Glass clear",
            "GLASS-01",
            "Surface",
            Some((service_id, &rule_ids)),
        );
        let hanger = seed_component(catalog, "Hanger", "HANGER-01", "", None);

        let mut product = FieldMap::new();
        product.insert(schema::F_NAME.into(), FieldValue::Text(name.into()));
        let product_id = catalog.seed(schema::PRODUCT, product);

        let mut bom = FieldMap::new();
        bom.insert(
            schema::F_BOM_PRODUCT.into(),
            FieldValue::reference(product_id, name),
        );
        let bom_id = catalog.seed(schema::BOM, bom);

        for (component, qty) in [(glass, Decimal::ONE), (hanger, Decimal::from(3))] {
            let mut line = FieldMap::new();
            line.insert(schema::F_BOM_ID.into(), FieldValue::Int(bom_id));
            line.insert(
                schema::F_LINE_PRODUCT.into(),
                FieldValue::reference(component, "component"),
            );
            line.insert(schema::F_PRODUCT_QTY.into(), FieldValue::Number(qty));
            catalog.seed(schema::BOM_LINE, line);
        }

        product_id
    }

    fn seed_order_line(catalog: &MemoryCatalog, product_id: i64) -> i64 {
        let mut fields = FieldMap::new();
        fields.insert(
            schema::F_LINE_PRODUCT.into(),
            FieldValue::reference(product_id, "ordered"),
        );
        catalog.seed(schema::SALE_ORDER_LINE, fields)
    }

    fn order_line(id: i64, product_id: i64, quantity: Decimal) -> OrderLine {
        OrderLine {
            id,
            product_id,
            quantity,
            width_mm: Decimal::from(400),
            height_mm: Decimal::from(400),
        }
    }

    #[test]
    fn test_preset_quantity_skips_line() {
        let catalog = MemoryCatalog::new();
        let product_id = seed_ordered_product(&catalog, "Classic Frame");
        let line_id = seed_order_line(&catalog, product_id);

        catalog.reset_call_counts();
        let report = OrderProcessor::new(&catalog)
            .process(&[order_line(line_id, product_id, Decimal::from(2))]);

        assert!(matches!(
            report.results[0].outcome,
            LineOutcome::Skipped(SkipReason::PresetQuantity)
        ));
        assert_eq!(catalog.call_counts().create, 0);
        assert_eq!(catalog.call_counts().write, 0);
    }

    #[test]
    fn test_unupdatable_product_skips_line() {
        let catalog = MemoryCatalog::new();
        let product_id = seed_ordered_product(&catalog, "Classic Frame");
        catalog
            .write(schema::PRODUCT, product_id, {
                let mut fields = FieldMap::new();
                fields.insert(schema::F_NOT_UPDATABLE.into(), FieldValue::Bool(true));
                fields
            })
            .unwrap();
        let line_id = seed_order_line(&catalog, product_id);

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        assert!(matches!(
            report.results[0].outcome,
            LineOutcome::Skipped(SkipReason::Unupdatable)
        ));
    }

    #[test]
    fn test_missing_bom_skips_line() {
        let catalog = MemoryCatalog::new();
        let mut product = FieldMap::new();
        product.insert(schema::F_NAME.into(), FieldValue::Text("Loose print".into()));
        let product_id = catalog.seed(schema::PRODUCT, product);
        let line_id = seed_order_line(&catalog, product_id);

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        assert!(matches!(
            report.results[0].outcome,
            LineOutcome::Skipped(SkipReason::NoBom)
        ));
    }

    #[test]
    fn test_processed_line_creates_variant_and_rewrites_line() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "Classic Frame");
        let line_id = seed_order_line(&catalog, product_id);

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        let LineOutcome::Processed {
            new_product_id,
            bom_id,
            ref description,
            ref component_summary,
            ref skipped_components,
        } = report.results[0].outcome
        else {
            panic!("應為 Processed，實得 {:?}", report.results[0].outcome);
        };

        assert_eq!(description, "Classic Frame (40x40)");
        assert!(skipped_components.is_empty());
        // 玻璃依面積 0.16、掛鉤固定 3
        assert!(component_summary.contains("Glass clear × 0.16"));
        assert!(component_summary.contains("Hanger × 3"));

        // 新變體：名稱為產生的編號、描述藏原始名、路線已指派
        let variant = catalog.record(schema::PRODUCT, new_product_id).unwrap();
        let variant_name = variant.label_or_empty(schema::F_NAME);
        assert!(is_generated_name(&variant_name));
        assert_eq!(
            variant.get(schema::F_DESCRIPTION).as_text(),
            Some("Original: Classic Frame")
        );
        let route_ids = variant.get(schema::F_ROUTE_IDS).as_ids();
        assert_eq!(route_ids.len(), 2); // MTO + 製造，排除採購

        // 新 BOM：2 行元件 + 1 個作業（0.16 落在第二級 → 120 秒 = 2 分鐘）
        let bom_lines = catalog
            .search(
                schema::BOM_LINE,
                &Filter::all().eq(schema::F_BOM_ID, FieldValue::Int(bom_id)),
            )
            .unwrap();
        assert_eq!(bom_lines.len(), 2);

        let operations = catalog
            .search(
                schema::BOM_OPERATION,
                &Filter::all().eq(schema::F_BOM_ID, FieldValue::Int(bom_id)),
            )
            .unwrap();
        assert_eq!(operations.len(), 1);
        let operation = catalog.record(schema::BOM_OPERATION, operations[0]).unwrap();
        assert_eq!(
            operation.get(schema::F_TIME_CYCLE).as_number(),
            Some(Decimal::from(2))
        );

        // 訂單行已回寫到新變體
        let line = catalog.record(schema::SALE_ORDER_LINE, line_id).unwrap();
        assert_eq!(
            line.get(schema::F_LINE_PRODUCT).as_id(),
            Some(new_product_id)
        );
        assert_eq!(
            line.get(schema::F_NAME).as_text(),
            Some("Classic Frame (40x40)")
        );
    }

    #[test]
    fn test_reprocessed_variant_recovers_original_name() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "FRMABC123XYZ");
        catalog
            .write(schema::PRODUCT, product_id, {
                let mut fields = FieldMap::new();
                fields.insert(
                    schema::F_DESCRIPTION.into(),
                    FieldValue::Text("Original: Classic Frame".into()),
                );
                fields
            })
            .unwrap();
        let line_id = seed_order_line(&catalog, product_id);

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        let LineOutcome::Processed { ref description, .. } = report.results[0].outcome else {
            panic!("應為 Processed");
        };
        assert_eq!(description, "Classic Frame (40x40)");
    }

    #[test]
    fn test_variant_without_description_recovers_name_from_line() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "FRMABC123XYZ");
        let line_id = seed_order_line(&catalog, product_id);
        // 描述遺失，但訂單行仍保有上一輪寫入的顯示名稱
        catalog
            .write(schema::SALE_ORDER_LINE, line_id, {
                let mut fields = FieldMap::new();
                fields.insert(
                    schema::F_NAME.into(),
                    FieldValue::Text("Classic Frame (40x40)".into()),
                );
                fields
            })
            .unwrap();

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        let LineOutcome::Processed { ref description, .. } = report.results[0].outcome else {
            panic!("應為 Processed");
        };
        assert_eq!(description, "Classic Frame (40x40)");
    }

    #[test]
    fn test_unrecoverable_variant_keeps_generated_name() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "FRMABC123XYZ");
        let line_id = seed_order_line(&catalog, product_id);
        // 訂單行名稱沒有尺寸尾綴，無從還原
        catalog
            .write(schema::SALE_ORDER_LINE, line_id, {
                let mut fields = FieldMap::new();
                fields.insert(
                    schema::F_NAME.into(),
                    FieldValue::Text("Custom order".into()),
                );
                fields
            })
            .unwrap();

        let report =
            OrderProcessor::new(&catalog).process(&[order_line(line_id, product_id, Decimal::ONE)]);

        let LineOutcome::Processed { ref description, .. } = report.results[0].outcome else {
            panic!("應為 Processed");
        };
        assert_eq!(description, "FRMABC123XYZ (40x40)");
        assert!(report.results[0]
            .logs
            .entries()
            .iter()
            .any(|entry| entry.message.contains("原始產品名")));
    }

    #[test]
    fn test_variant_bom_preferred_over_template_bom() {
        let catalog = MemoryCatalog::new();
        let mut product = FieldMap::new();
        product.insert(schema::F_NAME.into(), FieldValue::Text("Classic Frame".into()));
        product.insert(
            schema::F_TEMPLATE_ID.into(),
            FieldValue::reference(42, "Classic Frame"),
        );
        let product_id = catalog.seed(schema::PRODUCT, product);

        // 模板層 BOM（未綁變體）先種，變體層 BOM 後種，仍應選變體層
        let mut template_bom = FieldMap::new();
        template_bom.insert(schema::F_TEMPLATE_ID.into(), FieldValue::Int(42));
        catalog.seed(schema::BOM, template_bom);

        let mut variant_bom = FieldMap::new();
        variant_bom.insert(
            schema::F_BOM_PRODUCT.into(),
            FieldValue::reference(product_id, "Classic Frame"),
        );
        let variant_bom_id = catalog.seed(schema::BOM, variant_bom);

        let product = catalog.record(schema::PRODUCT, product_id).unwrap();
        let found = find_source_bom(&catalog, &product).unwrap();
        assert_eq!(found, Some(variant_bom_id));
    }

    #[test]
    fn test_template_bom_used_when_no_variant_bom() {
        let catalog = MemoryCatalog::new();
        let mut product = FieldMap::new();
        product.insert(schema::F_NAME.into(), FieldValue::Text("Classic Frame".into()));
        product.insert(
            schema::F_TEMPLATE_ID.into(),
            FieldValue::reference(42, "Classic Frame"),
        );
        let product_id = catalog.seed(schema::PRODUCT, product);

        let mut template_bom = FieldMap::new();
        template_bom.insert(schema::F_TEMPLATE_ID.into(), FieldValue::Int(42));
        let template_bom_id = catalog.seed(schema::BOM, template_bom);

        // 綁在其他變體上的 BOM 不能當模板層 BOM 撿走
        let mut other_bom = FieldMap::new();
        other_bom.insert(schema::F_TEMPLATE_ID.into(), FieldValue::Int(42));
        other_bom.insert(
            schema::F_BOM_PRODUCT.into(),
            FieldValue::reference(product_id + 100, "sibling"),
        );
        catalog.seed(schema::BOM, other_bom);

        let product = catalog.record(schema::PRODUCT, product_id).unwrap();
        let found = find_source_bom(&catalog, &product).unwrap();
        assert_eq!(found, Some(template_bom_id));
    }

    #[test]
    fn test_line_errors_are_isolated() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "Classic Frame");
        let good_line = seed_order_line(&catalog, product_id);
        let bad_line = seed_order_line(&catalog, product_id);

        let report = OrderProcessor::new(&catalog).process(&[
            order_line(bad_line, 9999, Decimal::ONE), // 不存在的產品
            order_line(good_line, product_id, Decimal::ONE),
        ]);

        assert_eq!(report.results.len(), 2);
        assert!(matches!(report.results[0].outcome, LineOutcome::Errored(_)));
        assert!(matches!(
            report.results[1].outcome,
            LineOutcome::Processed { .. }
        ));
        assert_eq!(report.processed(), 1);
        assert_eq!(report.errored(), 1);
        assert!(report.overall_success());
    }

    #[test]
    fn test_results_follow_input_order() {
        let catalog = MemoryCatalog::new();
        seed_routes(&catalog);
        let product_id = seed_ordered_product(&catalog, "Classic Frame");

        let mut lines = Vec::new();
        for _ in 0..8 {
            let line_id = seed_order_line(&catalog, product_id);
            lines.push(order_line(line_id, product_id, Decimal::ONE));
        }

        let report = OrderProcessor::new(&catalog).process(&lines);
        let result_ids: Vec<i64> = report.results.iter().map(|r| r.line_id).collect();
        let input_ids: Vec<i64> = lines.iter().map(|l| l.id).collect();
        assert_eq!(result_ids, input_ids);
    }

    #[rstest]
    #[case("Frame (400x500)", "Frame")]
    #[case("Frame (40.5x50)", "Frame")]
    #[case("Frame (large)", "Frame (large)")]
    #[case("Frame", "Frame")]
    #[case("Frame (x)", "Frame (x)")]
    fn test_strip_dimension_suffix(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(strip_dimension_suffix(name), expected);
    }
}
