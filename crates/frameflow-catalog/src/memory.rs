//! 記憶體目錄
//!
//! 測試與離線開發用的目錄服務實作；另外統計每種遠端操作的呼叫次數，
//! 供「任意輸入只允許 O(1) 次批次呼叫」的一致性測試斷言。

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use frameflow_core::{FrameflowError, Result};

use crate::record::{CatalogRecord, FieldMap};
use crate::schema;
use crate::value::FieldValue;
use crate::{Catalog, Condition, Filter, SessionFactory};

/// 每種操作的累計呼叫次數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallCounts {
    pub find_by_reference: usize,
    pub read: usize,
    pub create: usize,
    pub write: usize,
    pub search: usize,
}

#[derive(Default)]
struct Counters {
    find_by_reference: AtomicUsize,
    read: AtomicUsize,
    create: AtomicUsize,
    write: AtomicUsize,
    search: AtomicUsize,
}

type Store = HashMap<String, BTreeMap<i64, CatalogRecord>>;

/// 記憶體目錄
///
/// 複製實例共享同一份資料，對應「多條連線指向同一個遠端系統」。
#[derive(Clone, Default)]
pub struct MemoryCatalog {
    store: Arc<RwLock<Store>>,
    counters: Arc<Counters>,
    next_id: Arc<AtomicI64>,
}

impl MemoryCatalog {
    /// 創建空目錄
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new())),
            counters: Arc::new(Counters::default()),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// 直接插入一筆記錄（測試資料播種，不計入呼叫統計）
    pub fn seed(&self, model: &str, fields: FieldMap) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = CatalogRecord::from_fields(id, fields);
        self.store
            .write()
            .expect("store poisoned")
            .entry(model.to_string())
            .or_default()
            .insert(id, record);
        id
    }

    /// 讀取一筆完整記錄（測試斷言用）
    pub fn record(&self, model: &str, id: i64) -> Option<CatalogRecord> {
        self.store
            .read()
            .expect("store poisoned")
            .get(model)
            .and_then(|records| records.get(&id))
            .cloned()
    }

    /// 呼叫次數快照
    pub fn call_counts(&self) -> CallCounts {
        CallCounts {
            find_by_reference: self.counters.find_by_reference.load(Ordering::SeqCst),
            read: self.counters.read.load(Ordering::SeqCst),
            create: self.counters.create.load(Ordering::SeqCst),
            write: self.counters.write.load(Ordering::SeqCst),
            search: self.counters.search.load(Ordering::SeqCst),
        }
    }

    /// 重置呼叫統計
    pub fn reset_call_counts(&self) {
        self.counters.find_by_reference.store(0, Ordering::SeqCst);
        self.counters.read.store(0, Ordering::SeqCst);
        self.counters.create.store(0, Ordering::SeqCst);
        self.counters.write.store(0, Ordering::SeqCst);
        self.counters.search.store(0, Ordering::SeqCst);
    }

    fn matches(record: &CatalogRecord, filter: &Filter) -> bool {
        filter.0.iter().all(|condition| match condition {
            Condition::Eq(field, value) => Self::value_matches(record.get(field), value),
            Condition::In(field, values) => values
                .iter()
                .any(|value| Self::value_matches(record.get(field), value)),
            Condition::IsEmpty(field) => record.get(field).is_empty(),
        })
    }

    // 比較時關聯值以 ID 或標籤皆可命中，與遠端域過濾行為一致
    fn value_matches(actual: &FieldValue, expected: &FieldValue) -> bool {
        if actual == expected {
            return true;
        }
        match (actual.as_id(), expected.as_id()) {
            (Some(a), Some(b)) if a == b => return true,
            _ => {}
        }
        matches!(
            (actual.as_label(), expected.as_label()),
            (Some(a), Some(b)) if a == b
        )
    }
}

impl Catalog for MemoryCatalog {
    fn batch_find_by_reference(
        &self,
        model: &str,
        references: &[String],
    ) -> Result<HashMap<String, CatalogRecord>> {
        self.counters
            .find_by_reference
            .fetch_add(1, Ordering::SeqCst);

        let store = self.store.read().expect("store poisoned");
        let records = store.get(model);
        let mut found = HashMap::new();
        if let Some(records) = records {
            for record in records.values() {
                if let Some(reference) = record.get(schema::F_REFERENCE).as_text() {
                    if references.iter().any(|r| r == reference) {
                        found.insert(reference.to_string(), record.clone());
                    }
                }
            }
        }
        tracing::debug!(
            "記憶體目錄 find_by_reference: {} 個參考號命中 {} 筆",
            references.len(),
            found.len()
        );
        Ok(found)
    }

    fn batch_read(&self, model: &str, ids: &[i64], _fields: &[&str]) -> Result<Vec<CatalogRecord>> {
        self.counters.read.fetch_add(1, Ordering::SeqCst);

        let store = self.store.read().expect("store poisoned");
        let records = store.get(model);
        // 缺席的 ID 不回傳也不報錯，呼叫端自行比對
        Ok(ids
            .iter()
            .filter_map(|id| records.and_then(|r| r.get(id)).cloned())
            .collect())
    }

    fn create(&self, model: &str, values: FieldMap) -> Result<i64> {
        self.counters.create.fetch_add(1, Ordering::SeqCst);

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = CatalogRecord::from_fields(id, values);
        self.store
            .write()
            .expect("store poisoned")
            .entry(model.to_string())
            .or_default()
            .insert(id, record);
        Ok(id)
    }

    fn write(&self, model: &str, id: i64, values: FieldMap) -> Result<()> {
        self.counters.write.fetch_add(1, Ordering::SeqCst);

        let mut store = self.store.write().expect("store poisoned");
        let record = store
            .get_mut(model)
            .and_then(|records| records.get_mut(&id))
            .ok_or_else(|| FrameflowError::RecordNotFound {
                model: model.to_string(),
                id,
            })?;
        for (field, value) in values {
            record.set(field, value);
        }
        Ok(())
    }

    fn search(&self, model: &str, filter: &Filter) -> Result<Vec<i64>> {
        self.counters.search.fetch_add(1, Ordering::SeqCst);

        let store = self.store.read().expect("store poisoned");
        Ok(store
            .get(model)
            .map(|records| {
                records
                    .values()
                    .filter(|record| Self::matches(record, filter))
                    .map(|record| record.id)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl SessionFactory for MemoryCatalog {
    type Session = MemoryCatalog;

    fn open_session(&self) -> Result<Self::Session> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product_fields(name: &str, reference: &str, price: i64) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(schema::F_NAME.into(), FieldValue::Text(name.into()));
        fields.insert(schema::F_REFERENCE.into(), FieldValue::Text(reference.into()));
        fields.insert(
            schema::F_STANDARD_PRICE.into(),
            FieldValue::Number(Decimal::from(price)),
        );
        fields
    }

    #[test]
    fn test_find_by_reference_skips_unknown() {
        let catalog = MemoryCatalog::new();
        catalog.seed(schema::PRODUCT, product_fields("Glass", "GLASS-01", 10));

        let found = catalog
            .batch_find_by_reference(
                schema::PRODUCT,
                &["GLASS-01".to_string(), "MISSING".to_string()],
            )
            .unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.contains_key("GLASS-01"));
    }

    #[test]
    fn test_search_with_conditions() {
        let catalog = MemoryCatalog::new();
        let mut fields = product_fields("Frame", "FRAME-01", 5);
        fields.insert(
            schema::F_PRICE_COMPUTATION.into(),
            FieldValue::Text("Circumference".into()),
        );
        let frame_id = catalog.seed(schema::PRODUCT, fields);
        catalog.seed(schema::PRODUCT, product_fields("Misc", "MISC-01", 1));

        let filter = Filter::all().is_in(
            schema::F_PRICE_COMPUTATION,
            vec![
                FieldValue::Text("Surface".into()),
                FieldValue::Text("Circumference".into()),
            ],
        );
        let ids = catalog.search(schema::PRODUCT, &filter).unwrap();
        assert_eq!(ids, vec![frame_id]);
    }

    #[test]
    fn test_reference_value_matches_by_id() {
        // 關聯欄位以純 ID 過濾也要命中 (id, 標籤) 對
        let catalog = MemoryCatalog::new();
        let mut fields = FieldMap::new();
        fields.insert(
            schema::F_RULE_SERVICE.into(),
            FieldValue::reference(42, "Framing"),
        );
        let rule_id = catalog.seed(schema::DURATION_RULE, fields);

        let filter = Filter::all().eq(schema::F_RULE_SERVICE, FieldValue::Int(42));
        let ids = catalog.search(schema::DURATION_RULE, &filter).unwrap();
        assert_eq!(ids, vec![rule_id]);
    }

    #[test]
    fn test_call_counts_accumulate() {
        let catalog = MemoryCatalog::new();
        catalog.seed(schema::PRODUCT, product_fields("Glass", "GLASS-01", 10));

        catalog
            .batch_find_by_reference(schema::PRODUCT, &["GLASS-01".to_string()])
            .unwrap();
        catalog.batch_read(schema::PRODUCT, &[1], &[]).unwrap();
        catalog.search(schema::PRODUCT, &Filter::all()).unwrap();

        let counts = catalog.call_counts();
        assert_eq!(counts.find_by_reference, 1);
        assert_eq!(counts.read, 1);
        assert_eq!(counts.search, 1);

        // 複製的連線共享同一份統計
        let session = catalog.open_session().unwrap();
        session.batch_read(schema::PRODUCT, &[1], &[]).unwrap();
        assert_eq!(catalog.call_counts().read, 2);
    }

    #[test]
    fn test_write_missing_record_fails() {
        let catalog = MemoryCatalog::new();
        let err = catalog
            .write(schema::PRODUCT, 99, FieldMap::new())
            .unwrap_err();
        assert!(matches!(err, FrameflowError::RecordNotFound { .. }));
    }
}
