use rust_decimal::Decimal;

use crate::errors::CoreError;
use crate::models::alert::{AlertDecision, AlertRequest, OverspendAlert, SuppressReason};
use crate::models::settings::Settings;
use crate::services::summary_service::usage_percentage;

/// Pick the recipient of a notification.
///
/// The email carried by the caller's identity wins; otherwise the address
/// stored in settings. Blank values do not count.
pub fn resolve_recipient(identity_email: Option<&str>, settings: Option<&Settings>) -> Option<String> {
    identity_email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .or_else(|| settings.and_then(Settings::usable_email))
        .map(str::to_string)
}

/// `spent / limit * 100 > 100`, evaluated exactly. A non-positive limit
/// is never overspent.
pub fn is_overspent(spent: Decimal, limit: Decimal) -> bool {
    limit > Decimal::ZERO && spent > limit
}

/// Decides whether an overspending notification is warranted.
///
/// Stateless: every call is evaluated on its own, nothing records that an
/// alert was already sent.
pub struct AlertService;

impl AlertService {
    pub fn new() -> Self {
        Self
    }

    /// Checks run in this order: request validity, alerts enabled,
    /// recipient resolvable, overspent.
    pub fn evaluate(
        &self,
        request: &AlertRequest,
        settings: Option<&Settings>,
        identity_email: Option<&str>,
    ) -> Result<AlertDecision, CoreError> {
        if request.category.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Missing required fields: category, spent, limit".into(),
            ));
        }

        if !settings.is_some_and(|s| s.alerts_enabled) {
            return Ok(AlertDecision::Suppressed(SuppressReason::AlertsDisabled));
        }

        let recipient = resolve_recipient(identity_email, settings)
            .ok_or_else(|| CoreError::Configuration("User email not configured".into()))?;

        if !is_overspent(request.spent, request.limit) {
            return Ok(AlertDecision::Suppressed(SuppressReason::NotOverspent));
        }

        Ok(AlertDecision::Send(OverspendAlert {
            recipient,
            category: request.category.clone(),
            spent: request.spent,
            limit: request.limit,
            overage: request.spent - request.limit,
            percentage: usage_percentage(request.spent, Some(request.limit)),
        }))
    }
}

impl Default for AlertService {
    fn default() -> Self {
        Self::new()
    }
}
