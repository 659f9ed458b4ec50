use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::item::Item;

/// Order in which query results come back, by sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    Ascending,
    Descending,
}

/// Key-value store collaborator, queried by owner and sort key.
///
/// Items carry their own key attributes (`PK`, `SK`, and optionally the
/// secondary index pair `GSI1PK`/`GSI1SK`). Implementations only move
/// items around; they never interpret budget or expense semantics.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable name of this store (for logs/errors).
    fn name(&self) -> &str;

    /// Insert or fully replace the item at its `(PK, SK)`.
    async fn put(&self, item: Item) -> Result<(), CoreError>;

    async fn get(&self, pk: &str, sk: &str) -> Result<Option<Item>, CoreError>;

    /// Delete the item at `(pk, sk)`. Returns whether something was removed.
    async fn delete(&self, pk: &str, sk: &str) -> Result<bool, CoreError>;

    /// All items under `pk` whose sort key starts with `sk_prefix`.
    async fn query_prefix(
        &self,
        pk: &str,
        sk_prefix: &str,
        order: ScanOrder,
    ) -> Result<Vec<Item>, CoreError>;

    /// Secondary index query: items with `GSI1PK == pk` and
    /// `from <= GSI1SK <= to`.
    async fn query_index_range(
        &self,
        pk: &str,
        from: &str,
        to: &str,
        order: ScanOrder,
    ) -> Result<Vec<Item>, CoreError>;
}
