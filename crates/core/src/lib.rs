pub mod config;
pub mod errors;
pub mod models;
pub mod notifications;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use config::EmailConfig;
use errors::CoreError;
use models::{
    alert::{AlertDecision, AlertRequest},
    budget::{Budget, BudgetInput, BudgetRecord},
    digest::WeeklyDigest,
    expense::{Expense, ExpenseInput, ExpenseRecord},
    overview::DashboardOverview,
    receipt::ReceiptExpense,
    settings::{Settings, DEFAULT_CURRENCY},
    summary::BudgetSummary,
};
use notifications::mailer::{Mailer, OutboundEmail};
use notifications::templates;
use services::{
    alert_service::{resolve_recipient, AlertService},
    budget_service::BudgetService,
    digest_service::DigestService,
    expense_service::ExpenseService,
    overview_service::OverviewService,
    receipt_service::ReceiptService,
    summary_service::SummaryService,
};
use storage::repository::Repository;
use storage::traits::RecordStore;

// ── Stateless engine entry points ───────────────────────────────────

/// Join budgets with their current-window spend and classify each one.
pub fn summarize_budgets(
    budgets: &[BudgetRecord],
    expenses: &[ExpenseRecord],
    now: DateTime<Utc>,
) -> Vec<BudgetSummary> {
    SummaryService::new().summarize(budgets, expenses, now)
}

/// Decide whether an overspending notification should go out.
pub fn evaluate_overspend_alert(
    category: &str,
    spent: Decimal,
    limit: Decimal,
    settings: Option<&Settings>,
    identity_email: Option<&str>,
) -> Result<AlertDecision, CoreError> {
    AlertService::new().evaluate(
        &AlertRequest::new(category, spent, limit),
        settings,
        identity_email,
    )
}

/// Build the 7-day trailing digest.
pub fn build_weekly_digest(
    budgets: &[BudgetRecord],
    expenses: &[ExpenseRecord],
    now: DateTime<Utc>,
) -> WeeklyDigest {
    DigestService::new().build(budgets, expenses, now)
}

/// Month-level dashboard figures.
pub fn build_overview(
    budgets: &[BudgetRecord],
    expenses: &[ExpenseRecord],
    now: DateTime<Utc>,
) -> DashboardOverview {
    OverviewService::new().build(budgets, expenses, now)
}

/// How a weekly summary send was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestTrigger {
    /// Explicit user request; sent regardless of the `weeklySummary` flag.
    Manual,
    /// Scheduled run; skipped unless `weeklySummary` is on.
    Scheduled,
}

/// Result of a weekly summary send.
#[derive(Debug, Clone, PartialEq)]
pub enum DigestOutcome {
    Sent {
        digest: WeeklyDigest,
        message_id: String,
    },
    /// Scheduled run for a user who turned weekly summaries off.
    Disabled,
}

/// Result of an overspend check that may have sent an email.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertOutcome {
    pub decision: AlertDecision,
    pub message_id: Option<String>,
}

/// Main entry point for SpendGuard.
///
/// Fetches a user's records once from the store, hands snapshots to the
/// stateless engine, and delivers notifications. Holds no per-user state,
/// so one instance serves every user.
#[must_use]
pub struct SpendGuard {
    repository: Repository,
    mailer: Arc<dyn Mailer>,
    email_config: EmailConfig,
    expense_service: ExpenseService,
    budget_service: BudgetService,
    summary_service: SummaryService,
    alert_service: AlertService,
    digest_service: DigestService,
    overview_service: OverviewService,
    receipt_service: ReceiptService,
}

impl std::fmt::Debug for SpendGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpendGuard")
            .field("store", &self.repository.store().name())
            .field("mailer", &self.mailer.name())
            .field("from", &self.email_config.from_address)
            .finish()
    }
}

impl SpendGuard {
    pub fn new(store: Arc<dyn RecordStore>, mailer: Arc<dyn Mailer>, email_config: EmailConfig) -> Self {
        Self {
            repository: Repository::new(store),
            mailer,
            email_config,
            expense_service: ExpenseService::new(),
            budget_service: BudgetService::new(),
            summary_service: SummaryService::new(),
            alert_service: AlertService::new(),
            digest_service: DigestService::new(),
            overview_service: OverviewService::new(),
            receipt_service: ReceiptService::new(),
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Validate and store a new expense.
    pub async fn create_expense(
        &self,
        user_id: &str,
        input: ExpenseInput,
        now: DateTime<Utc>,
    ) -> Result<Expense, CoreError> {
        let expense = self.expense_service.create(input, now)?;
        self.repository.put_expense(user_id, &expense).await?;
        tracing::debug!(user = user_id, expense_id = %expense.expense_id, date = %expense.date, "expense created");
        Ok(expense)
    }

    /// Newest first; restricted to `[from, to]` when a range is given.
    pub async fn list_expenses(
        &self,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<ExpenseRecord>, CoreError> {
        if let Some((from, to)) = range {
            if from > to {
                return Err(CoreError::ValidationError(format!(
                    "'from' date ({from}) must not be after 'to' date ({to})"
                )));
            }
        }
        self.repository.list_expenses(user_id, range).await
    }

    /// Record an expense for an uploaded receipt. The owner comes from
    /// the object key (`receipts/<user>/<file>`).
    pub async fn ingest_receipt(
        &self,
        object_key: &str,
        now: DateTime<Utc>,
    ) -> Result<ReceiptExpense, CoreError> {
        let receipt = self.receipt_service.ingest(object_key, now);
        self.repository.put_receipt_expense(&receipt).await?;
        tracing::info!(
            user = %receipt.user_id,
            expense_id = %receipt.expense_id,
            receipt_key = object_key,
            "receipt ingested"
        );
        Ok(receipt)
    }

    pub async fn delete_expense(&self, user_id: &str, expense_id: &str) -> Result<(), CoreError> {
        self.repository.delete_expense(user_id, expense_id).await
    }

    // ── Budgets ─────────────────────────────────────────────────────

    pub async fn create_budget(
        &self,
        user_id: &str,
        input: BudgetInput,
        now: DateTime<Utc>,
    ) -> Result<Budget, CoreError> {
        let budget = self.budget_service.create(input, now)?;
        self.repository.put_budget(user_id, &budget).await?;
        tracing::debug!(user = user_id, budget_id = %budget.budget_id, category = %budget.category, "budget created");
        Ok(budget)
    }

    pub async fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<(), CoreError> {
        self.repository.delete_budget(user_id, budget_id).await
    }

    // ── Settings ────────────────────────────────────────────────────

    pub async fn get_settings(&self, user_id: &str) -> Result<Option<Settings>, CoreError> {
        self.repository.get_settings(user_id).await
    }

    /// Replace the user's settings. Returns the stored copy.
    pub async fn update_settings(
        &self,
        user_id: &str,
        mut settings: Settings,
        now: DateTime<Utc>,
    ) -> Result<Settings, CoreError> {
        if settings.currency.trim().is_empty() {
            settings.currency = DEFAULT_CURRENCY.to_string();
        }
        settings.updated_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        self.repository.put_settings(user_id, &settings).await?;
        Ok(settings)
    }

    // ── Aggregation ─────────────────────────────────────────────────

    pub async fn budget_summary(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<BudgetSummary>, CoreError> {
        let budgets = self.repository.list_budgets(user_id).await?;
        let expenses = self.repository.list_expenses(user_id, None).await?;
        Ok(self.summary_service.summarize(&budgets, &expenses, now))
    }

    pub async fn dashboard_overview(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<DashboardOverview, CoreError> {
        let budgets = self.repository.list_budgets(user_id).await?;
        let expenses = self.repository.list_expenses(user_id, None).await?;
        Ok(self.overview_service.build(&budgets, &expenses, now))
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Evaluate an overspend check and email the user when warranted.
    ///
    /// `identity_email` is the address carried by the caller's identity,
    /// if any; it takes precedence over the one in settings.
    pub async fn send_overspending_alert(
        &self,
        user_id: &str,
        identity_email: Option<&str>,
        request: AlertRequest,
    ) -> Result<AlertOutcome, CoreError> {
        let settings = self.repository.get_settings(user_id).await?;
        let decision = self
            .alert_service
            .evaluate(&request, settings.as_ref(), identity_email)?;

        let alert = match decision {
            AlertDecision::Send(alert) => alert,
            suppressed => {
                tracing::debug!(user = user_id, category = %request.category, decision = %suppressed, "no alert sent");
                return Ok(AlertOutcome {
                    decision: suppressed,
                    message_id: None,
                });
            }
        };

        let currency = currency_of(settings.as_ref());
        let template = templates::overspending_alert(&alert, currency);
        let email = OutboundEmail::new(&self.email_config.from_address, &alert.recipient, template);
        let message_id = self.mailer.send(&email).await?;

        tracing::info!(
            user = user_id,
            category = %alert.category,
            percentage = alert.percentage,
            %message_id,
            "overspending alert sent"
        );
        Ok(AlertOutcome {
            decision: AlertDecision::Send(alert),
            message_id: Some(message_id),
        })
    }

    /// Build the weekly digest for `now` and email it.
    pub async fn send_weekly_summary(
        &self,
        user_id: &str,
        identity_email: Option<&str>,
        trigger: DigestTrigger,
        now: DateTime<Utc>,
    ) -> Result<DigestOutcome, CoreError> {
        let settings = self.repository.get_settings(user_id).await?;
        let recipient = resolve_recipient(identity_email, settings.as_ref())
            .ok_or_else(|| CoreError::Configuration("User email not configured".into()))?;

        if trigger == DigestTrigger::Scheduled && !settings.as_ref().is_some_and(|s| s.weekly_summary) {
            tracing::debug!(user = user_id, "weekly summary disabled, skipping");
            return Ok(DigestOutcome::Disabled);
        }

        let budgets = self.repository.list_budgets(user_id).await?;
        let expenses = self.repository.list_expenses(user_id, None).await?;
        let digest = self.digest_service.build(&budgets, &expenses, now);

        let template = templates::weekly_summary(&digest, currency_of(settings.as_ref()));
        let email = OutboundEmail::new(&self.email_config.from_address, recipient, template);
        let message_id = self.mailer.send(&email).await?;

        tracing::info!(
            user = user_id,
            total_spent = %digest.total_spent,
            rows = digest.rows.len(),
            %message_id,
            "weekly summary sent"
        );
        Ok(DigestOutcome::Sent { digest, message_id })
    }
}

fn currency_of(settings: Option<&Settings>) -> &str {
    settings.map_or(DEFAULT_CURRENCY, |s| s.currency.as_str())
}
