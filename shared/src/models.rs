use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Amounts arrive either as JSON numbers or as strings such as `"-12.50"` or `"+$1,200.00"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Parse a loosely formatted amount string (`"+$1,200.00"`, `"-5"`, `" 3.5 "`).
pub fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && *c != '+')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => parse_amount(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {}", text))),
    }
}

fn de_opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(value)) => Some(value),
        Some(NumberOrString::Text(text)) => parse_amount(&text),
    })
}

/// A transaction row as stored by the backend (`/transactions/raw`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: i64,
    /// ISO date, optionally with a time component
    pub date: String,
    /// Signed amount, negative for spending
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub balance: Option<f64>,
    #[serde(default)]
    pub original_description: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub last_4_card_number: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl RawTransaction {
    pub fn is_spending(&self) -> bool {
        self.amount < 0.0
    }
}

/// Offset pagination reported alongside raw transaction pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionPage {
    pub transactions: Vec<RawTransaction>,
    pub pagination: Pagination,
}

/// Merchant/amount pair seen more than once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub merchant_name: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    pub occurrence_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantCount {
    pub merchant_name: String,
    pub transaction_count: u32,
}

/// Row of `/merchants/all`, used by the category manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantSummary {
    pub merchant_name: String,
    pub transaction_count: u32,
    #[serde(deserialize_with = "de_amount")]
    pub total_spent: f64,
    #[serde(default)]
    pub last_transaction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub merchant_count: Option<u32>,
}

impl Category {
    /// Icon and name, as shown in dropdowns and tags
    pub fn display_name(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#7D6B91";
pub const DEFAULT_CATEGORY_ICON: &str = "📊";

/// Body for `POST /categories`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Default for NewCategory {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: DEFAULT_CATEGORY_COLOR.to_string(),
            icon: DEFAULT_CATEGORY_ICON.to_string(),
        }
    }
}

impl NewCategory {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Spending per transaction type for one `YYYY-MM` month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: String,
    #[serde(rename = "Merchant", default, deserialize_with = "de_amount_or_zero")]
    pub merchant: f64,
    #[serde(rename = "Transfer", default, deserialize_with = "de_amount_or_zero")]
    pub transfer: f64,
    #[serde(rename = "Fee", default, deserialize_with = "de_amount_or_zero")]
    pub fee: f64,
}

fn de_amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    de_opt_amount(deserializer).map(|v| v.unwrap_or(0.0))
}

impl MonthlySpending {
    pub fn total(&self) -> f64 {
        self.merchant + self.transfer + self.fee
    }
}

/// Most recent transaction; the backend answers `{}` when there is none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl RecentTransaction {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.amount.is_none()
    }
}

/// Detected billing frequency of a subscription pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    Irregular,
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "yearly" | "annual" | "annually" => Frequency::Yearly,
            _ => Frequency::Irregular,
        }
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::Irregular => "irregular",
        }
    }

    /// Charges per year, `None` when the cadence is unknown
    pub fn charges_per_year(&self) -> Option<f64> {
        match self {
            Frequency::Weekly => Some(52.0),
            Frequency::Monthly => Some(12.0),
            Frequency::Quarterly => Some(4.0),
            Frequency::Yearly => Some(1.0),
            Frequency::Irregular => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single charge belonging to a subscription pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCharge {
    pub date: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub desc: Option<String>,
}

/// Row of `/transactions/subscriptions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPattern {
    pub merchant: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub months: u32,
    #[serde(rename = "avgAmount", deserialize_with = "de_amount")]
    pub avg_amount: f64,
    #[serde(default)]
    pub transactions: Vec<SubscriptionCharge>,
}

/// Row returned by the timeline endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineTransaction {
    pub date: String,
    #[serde(deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
}

impl TimelineTransaction {
    /// Absolute amount for spending rows, zero for income
    pub fn spend(&self) -> f64 {
        if self.amount < 0.0 {
            self.amount.abs()
        } else {
            0.0
        }
    }

    pub fn merchant_or_unknown(&self) -> &str {
        self.merchant_name
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or("Unknown")
    }
}

/// Body for the API-key based bank import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiImportRequest {
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
}

/// Result of either bank import path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    #[serde(default)]
    pub imported: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub message: Option<String>,
}

impl ImportSummary {
    pub fn describe(&self) -> String {
        match &self.message {
            Some(message) if !message.is_empty() => message.clone(),
            _ => format!(
                "Imported {} transaction{} ({} skipped)",
                self.imported,
                if self.imported == 1 { "" } else { "s" },
                self.skipped
            ),
        }
    }
}

/// Only `.csv` statements are accepted by the upload endpoint
pub fn is_csv_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}
