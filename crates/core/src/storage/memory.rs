use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StoreConfig;
use crate::errors::CoreError;
use crate::models::item::{str_attr, Item};

use super::keys;
use super::traits::{RecordStore, ScanOrder};

type Table = BTreeMap<(String, String), Item>;

/// Reference [`RecordStore`] held entirely in memory.
///
/// Items are ordered by `(PK, SK)` like a sorted-key table. The whole table
/// can be snapshotted to JSON bytes or a file and loaded back.
pub struct InMemoryStore {
    config: StoreConfig,
    table: RwLock<Table>,
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("table_name", &self.config.table_name)
            .field("items", &self.len())
            .finish()
    }
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        if config.is_local() {
            tracing::info!(
                table = %config.table_name,
                endpoint = config.endpoint.as_deref().unwrap_or(""),
                "store configured for local endpoint"
            );
        }
        Self {
            config,
            table: RwLock::new(Table::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of items currently stored (all users).
    pub fn len(&self) -> usize {
        self.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Serialize every item, in key order, as a JSON array.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let table = self.read()?;
        let items: Vec<&Item> = table.values().collect();
        serde_json::to_vec_pretty(&items)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize table: {e}")))
    }

    /// Rebuild a store from bytes produced by [`InMemoryStore::to_bytes`].
    pub fn from_bytes(config: StoreConfig, data: &[u8]) -> Result<Self, CoreError> {
        let items: Vec<Item> = serde_json::from_slice(data)?;
        let mut table = Table::new();
        for item in items {
            let key = item_key(&item)?;
            table.insert(key, item);
        }
        Ok(Self {
            config,
            table: RwLock::new(table),
        })
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), CoreError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load_from_file(config: StoreConfig, path: &str) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(config, &bytes)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn read(&self) -> Result<RwLockReadGuard<'_, Table>, CoreError> {
        self.table
            .read()
            .map_err(|_| CoreError::Storage(format!("{}: table lock poisoned", self.config.table_name)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Table>, CoreError> {
        self.table
            .write()
            .map_err(|_| CoreError::Storage(format!("{}: table lock poisoned", self.config.table_name)))
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn name(&self) -> &str {
        &self.config.table_name
    }

    async fn put(&self, item: Item) -> Result<(), CoreError> {
        let key = item_key(&item)?;
        self.write()?.insert(key, item);
        Ok(())
    }

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, CoreError> {
        let table = self.read()?;
        Ok(table.get(&(pk.to_string(), sk.to_string())).cloned())
    }

    async fn delete(&self, pk: &str, sk: &str) -> Result<bool, CoreError> {
        let mut table = self.write()?;
        Ok(table.remove(&(pk.to_string(), sk.to_string())).is_some())
    }

    async fn query_prefix(
        &self,
        pk: &str,
        sk_prefix: &str,
        order: ScanOrder,
    ) -> Result<Vec<Item>, CoreError> {
        let table = self.read()?;
        let start = (pk.to_string(), sk_prefix.to_string());
        let mut items: Vec<Item> = table
            .range(start..)
            .take_while(|((p, s), _)| p == pk && s.starts_with(sk_prefix))
            .map(|(_, item)| item.clone())
            .collect();

        if order == ScanOrder::Descending {
            items.reverse();
        }
        Ok(items)
    }

    async fn query_index_range(
        &self,
        pk: &str,
        from: &str,
        to: &str,
        order: ScanOrder,
    ) -> Result<Vec<Item>, CoreError> {
        let table = self.read()?;
        let mut hits: Vec<(String, Item)> = table
            .values()
            .filter(|item| str_attr(item, keys::INDEX_PK).as_deref() == Some(pk))
            .filter_map(|item| {
                let index_sk = str_attr(item, keys::INDEX_SK)?;
                (index_sk.as_str() >= from && index_sk.as_str() <= to)
                    .then(|| (index_sk, item.clone()))
            })
            .collect();

        // Stable sort keeps primary-key order among equal index keys.
        hits.sort_by(|a, b| a.0.cmp(&b.0));
        if order == ScanOrder::Descending {
            hits.reverse();
        }
        Ok(hits.into_iter().map(|(_, item)| item).collect())
    }
}

fn item_key(item: &Item) -> Result<(String, String), CoreError> {
    match (item.get(keys::PK), item.get(keys::SK)) {
        (Some(Value::String(pk)), Some(Value::String(sk))) => Ok((pk.clone(), sk.clone())),
        _ => Err(CoreError::Storage(
            "Item must carry string PK and SK attributes".into(),
        )),
    }
}
