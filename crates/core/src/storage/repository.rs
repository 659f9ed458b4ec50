use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetRecord};
use crate::models::expense::{Expense, ExpenseRecord};
use crate::models::item::{str_attr, Item};
use crate::models::receipt::ReceiptExpense;
use crate::models::settings::Settings;
use crate::services::window_service::format_date;

use super::keys;
use super::traits::{RecordStore, ScanOrder};

/// Maps user-scoped budget/expense/settings operations onto the key schema.
///
/// Every call is scoped to one owner; there is no cross-user query.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("store", &self.store.name())
            .finish()
    }
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    // ── Budgets ─────────────────────────────────────────────────────

    pub async fn list_budgets(&self, user_id: &str) -> Result<Vec<BudgetRecord>, CoreError> {
        let items = self
            .store
            .query_prefix(&keys::user_pk(user_id), keys::BUDGET_PREFIX, ScanOrder::Ascending)
            .await?;
        Ok(items.iter().map(BudgetRecord::from_item).collect())
    }

    pub async fn put_budget(&self, user_id: &str, budget: &Budget) -> Result<(), CoreError> {
        let mut item = budget.to_item();
        stamp_owner(&mut item, user_id);
        item.insert(keys::SK.into(), Value::String(keys::budget_sk(&budget.budget_id)));
        self.store.put(item).await
    }

    pub async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<(), CoreError> {
        let removed = self
            .store
            .delete(&keys::user_pk(user_id), &keys::budget_sk(budget_id))
            .await?;
        if !removed {
            return Err(CoreError::not_found("Budget", budget_id));
        }
        Ok(())
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Newest first. The secondary index is used only when a range is given.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ExpenseRecord>, CoreError> {
        let pk = keys::user_pk(user_id);
        let items = match range {
            Some((from, to)) => {
                self.store
                    .query_index_range(
                        &pk,
                        &keys::expense_index_sk(&format_date(from)),
                        &keys::expense_index_upper(&format_date(to)),
                        ScanOrder::Descending,
                    )
                    .await?
            }
            None => {
                self.store
                    .query_prefix(&pk, keys::EXPENSE_PREFIX, ScanOrder::Descending)
                    .await?
            }
        };
        Ok(items.iter().map(ExpenseRecord::from_item).collect())
    }

    pub async fn put_expense(&self, user_id: &str, expense: &Expense) -> Result<(), CoreError> {
        let pk = keys::user_pk(user_id);
        let mut item = expense.to_item();
        stamp_owner(&mut item, user_id);
        item.insert(
            keys::SK.into(),
            Value::String(keys::expense_sk(&expense.date, &expense.expense_id)),
        );
        item.insert(keys::INDEX_PK.into(), Value::String(pk));
        item.insert(
            keys::INDEX_SK.into(),
            Value::String(keys::expense_index_sk(&expense.date)),
        );
        self.store.put(item).await
    }

    /// Receipt records keep their creation timestamp in both sort keys.
    pub async fn put_receipt_expense(&self, receipt: &ReceiptExpense) -> Result<(), CoreError> {
        let pk = keys::user_pk(&receipt.user_id);
        let sk = keys::receipt_expense_sk(&receipt.created_at);
        let mut item = receipt.to_item();
        stamp_owner(&mut item, &receipt.user_id);
        item.insert(keys::SK.into(), Value::String(sk.clone()));
        item.insert(keys::INDEX_PK.into(), Value::String(pk));
        item.insert(keys::INDEX_SK.into(), Value::String(sk));
        self.store.put(item).await
    }

    /// Expenses are keyed by date, so the id is looked up first.
    pub async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<(), CoreError> {
        let pk = keys::user_pk(user_id);
        let items = self
            .store
            .query_prefix(&pk, keys::EXPENSE_PREFIX, ScanOrder::Ascending)
            .await?;

        let sk = items
            .iter()
            .find(|item| str_attr(item, "expenseId").as_deref() == Some(expense_id))
            .and_then(|item| str_attr(item, keys::SK))
            .ok_or_else(|| CoreError::not_found("Expense", expense_id))?;

        self.store.delete(&pk, &sk).await?;
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    pub async fn get_settings(&self, user_id: &str) -> Result<Option<Settings>, CoreError> {
        let item = self
            .store
            .get(&keys::user_pk(user_id), keys::SETTINGS_SK)
            .await?;
        Ok(item.as_ref().map(Settings::from_item))
    }

    /// Full replacement of the user's settings.
    pub async fn put_settings(&self, user_id: &str, settings: &Settings) -> Result<(), CoreError> {
        let mut item = settings.to_item();
        stamp_owner(&mut item, user_id);
        item.insert(keys::SK.into(), Value::String(keys::SETTINGS_SK.into()));
        self.store.put(item).await
    }
}

fn stamp_owner(item: &mut Item, user_id: &str) {
    item.insert(keys::PK.into(), Value::String(keys::user_pk(user_id)));
    item.insert("userId".into(), Value::String(user_id.to_string()));
}
