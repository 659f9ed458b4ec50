use rust_decimal::Decimal;

use crate::models::alert::OverspendAlert;
use crate::models::digest::{DigestRow, WeeklyDigest};
use crate::models::summary::BudgetStatus;

const DASHBOARD_URL: &str = "https://spendguard.app/app";

/// Subject and bodies of one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// `R12.50` for ZAR, `USD 12.50` for anything else.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    let value = amount.round_dp(2);
    match currency.trim().to_uppercase().as_str() {
        "ZAR" | "" => format!("R{value:.2}"),
        code => format!("{code} {value:.2}"),
    }
}

/// Minimal escaping for text interpolated into HTML.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn status_color(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Overspent => "#d63333",
        BudgetStatus::Alert => "#f06565",
        BudgetStatus::Warn | BudgetStatus::Safe => "#f4d06f",
    }
}

fn utilization_color(pct: i64) -> &'static str {
    if pct > 100 {
        "#d63333"
    } else if pct > 80 {
        "#f06565"
    } else {
        "#5dd39e"
    }
}

pub fn overspending_alert(alert: &OverspendAlert, currency: &str) -> EmailTemplate {
    let category = escape_html(&alert.category);
    let spent = format_amount(alert.spent, currency);
    let limit = format_amount(alert.limit, currency);
    let overage = format_amount(alert.overage, currency);
    let pct = alert.percentage;

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="font-size: 24px;">Budget Alert</h1>
    <p>Your <strong>{category}</strong> budget has been exceeded.</p>
    <table style="width: 100%; border-collapse: collapse;">
      <tr><td>Category</td><td style="text-align: right;">{category}</td></tr>
      <tr><td>Spent</td><td style="text-align: right; color: #f06565;">{spent}</td></tr>
      <tr><td>Budget Limit</td><td style="text-align: right;">{limit}</td></tr>
      <tr><td>Over Budget By</td><td style="text-align: right; color: #f06565; font-weight: 700;">{overage} ({pct}%)</td></tr>
    </table>
    <p>We recommend reviewing your {category} expenses to bring spending back within your budget limit.</p>
    <p><a href="{DASHBOARD_URL}">View Your Budgets</a></p>
    <p style="color: #999; font-size: 12px;">This is an automated alert from SpendGuard. You received this because overspending alerts are enabled in your settings.</p>
  </div>
</body>
</html>
"#
    );

    let text = format!(
        "BUDGET ALERT\n\n\
         You've exceeded your budget for {cat}.\n\n\
         Category: {cat}\n\
         Spent: {spent}\n\
         Budget Limit: {limit}\n\
         Over Budget By: {overage} ({pct}%)\n\n\
         We recommend reviewing your {cat} expenses to bring spending back within your budget limit.\n\n\
         View your budgets: {DASHBOARD_URL}\n\n\
         This is an automated alert from SpendGuard.\n",
        cat = alert.category,
    );

    EmailTemplate {
        subject: format!("Budget Alert: {} Budget Exceeded", alert.category),
        html,
        text,
    }
}

pub fn weekly_summary(digest: &WeeklyDigest, currency: &str) -> EmailTemplate {
    let total_spent = format_amount(digest.total_spent, currency);
    let total_budget = format_amount(digest.total_budget, currency);
    let budgeted = format_amount(digest.budgeted_spent, currency);
    let unbudgeted = format_amount(digest.unbudgeted_spent, currency);
    let pct = digest.utilization_pct;
    let pct_color = utilization_color(pct);
    let week_of = &digest.window_end;

    let rows_html: String = digest.rows.iter().map(|r| row_html(r, currency)).collect();
    let table_html = if digest.rows.is_empty() {
        String::new()
    } else {
        format!(
            r#"<h3>Budget Status</h3>
    <table style="width: 100%; border-collapse: collapse;">
      <tr><th style="text-align: left;">Category</th><th style="text-align: right;">Spent</th><th style="text-align: right;">Limit</th><th style="text-align: right;">Usage</th></tr>
{rows_html}    </table>
"#
        )
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="font-size: 24px;">Weekly Spending Summary</h1>
    <p>Week of {week_of}</p>
    <table style="width: 100%; border-collapse: collapse;">
      <tr><td>Total Spent</td><td style="text-align: right;">{total_spent}</td></tr>
      <tr><td>Budgeted Spending</td><td style="text-align: right; color: {pct_color};">{budgeted} / {total_budget}</td></tr>
      <tr><td>Budget Utilization</td><td style="text-align: right; color: {pct_color};">{pct}%</td></tr>
      <tr><td>Unbudgeted Spending</td><td style="text-align: right;">{unbudgeted}</td></tr>
    </table>
    {table_html}
    <p><a href="{DASHBOARD_URL}">View Full Dashboard</a></p>
    <p style="color: #999; font-size: 12px;">This is your weekly spending summary from SpendGuard. You can disable these emails in your account settings.</p>
  </div>
</body>
</html>
"#
    );

    let mut text = format!(
        "WEEKLY SPENDING SUMMARY\n\
         Week of {week_of}\n\n\
         OVERVIEW\n\
         Total Spent: {total_spent}\n\
         Budgeted Spending: {budgeted} / {total_budget}\n\
         Budget Utilization: {pct}%\n\
         Unbudgeted Spending: {unbudgeted}\n\n"
    );
    if !digest.rows.is_empty() {
        text.push_str("BUDGET STATUS\n");
        for row in &digest.rows {
            text.push_str(&format!(
                "{}: {} / {} ({}%)\n",
                row.category,
                format_amount(row.spent, currency),
                format_amount(row.limit, currency),
                row.percentage
            ));
        }
        text.push('\n');
    }
    text.push_str(&format!(
        "View your full dashboard: {DASHBOARD_URL}\n\n\
         You can disable these emails in your account settings.\n"
    ));

    EmailTemplate {
        subject: format!("Your Weekly Spending Summary - {total_spent} spent"),
        html,
        text,
    }
}

fn row_html(row: &DigestRow, currency: &str) -> String {
    let color = status_color(row.status);
    format!(
        "      <tr><td style=\"color: {color};\">{}</td><td style=\"text-align: right;\">{}</td><td style=\"text-align: right;\">{}</td><td style=\"text-align: right; font-weight: 600; color: {color};\">{}%</td></tr>\n",
        escape_html(&row.category),
        format_amount(row.spent, currency),
        format_amount(row.limit, currency),
        row.percentage
    )
}
