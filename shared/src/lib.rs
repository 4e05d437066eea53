//! Types and presentation logic shared by the finance dashboard.
//!
//! Everything here is plain Rust with no browser dependencies so that the
//! aggregation, filtering and formatting rules can be unit tested natively.

pub mod cache;
pub mod config;
pub mod dates;
pub mod endpoints;
pub mod formatters;
pub mod merchants;
pub mod models;
pub mod raw_table;
pub mod spending;
pub mod subscriptions;
pub mod timeline;

pub use cache::{CacheStore, MemoryStore, MerchantCategoryCache};
pub use config::DashboardConfig;
pub use dates::{CalendarCell, CalendarDayType};
pub use endpoints::Endpoints;
pub use models::*;
pub use timeline::{CalendarNavigator, PeriodBucket, ViewMode};
