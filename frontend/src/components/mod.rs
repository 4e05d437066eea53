pub mod charts;
pub mod financial_calendar;
pub mod merchant_category_manager;
pub mod merchant_counts;
pub mod monthly_spending;
pub mod raw_transactions;
pub mod recent_transaction;
pub mod recurring_transactions;
pub mod spending_timeline;
pub mod subscription_tracker;
pub mod tab_bar;
