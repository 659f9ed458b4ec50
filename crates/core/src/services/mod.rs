pub mod aggregation_service;
pub mod alert_service;
pub mod budget_service;
pub mod digest_service;
pub mod expense_service;
pub mod normalization_service;
pub mod overview_service;
pub mod receipt_service;
pub mod summary_service;
pub mod window_service;
