pub mod use_financial_calendar;
pub mod use_merchant_categories;
pub mod use_raw_transactions;
pub mod use_resource;
