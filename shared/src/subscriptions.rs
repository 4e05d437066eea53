//! Subscription detection for the tracker view.
//!
//! Backend subscription patterns and recurring-transaction rows are merged by
//! merchant into [`SubscriptionRecord`]s, annotated with an estimated yearly cost.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::dates::parse_flexible_datetime;
use crate::models::{Frequency, RecurringTransaction, SubscriptionCharge, SubscriptionPattern};

/// Charges listed under each subscription card
pub const RECENT_CHARGES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionOrigin {
    Pattern,
    Recurring,
    Both,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub merchant: String,
    pub frequency: Frequency,
    pub count: u32,
    pub months: u32,
    pub avg_amount: f64,
    pub transactions: Vec<SubscriptionCharge>,
    pub origin: SubscriptionOrigin,
}

impl SubscriptionRecord {
    fn from_pattern(pattern: &SubscriptionPattern) -> Self {
        Self {
            merchant: pattern.merchant.clone(),
            frequency: pattern.frequency,
            count: pattern.count,
            months: pattern.months,
            avg_amount: pattern.avg_amount.abs(),
            transactions: pattern.transactions.clone(),
            origin: SubscriptionOrigin::Pattern,
        }
    }

    fn from_recurring(row: &RecurringTransaction) -> Self {
        Self {
            merchant: row.merchant_name.clone(),
            frequency: Frequency::Irregular,
            count: row.occurrence_count,
            months: 0,
            avg_amount: row.amount.abs(),
            transactions: Vec::new(),
            origin: SubscriptionOrigin::Recurring,
        }
    }

    pub fn is_likely_subscription(&self) -> bool {
        matches!(self.frequency, Frequency::Monthly | Frequency::Quarterly)
            || self.months >= 3
            || (self.count >= 3 && self.frequency != Frequency::Irregular)
    }

    /// `avg_amount` times charges per year, `None` for irregular cadences
    pub fn yearly_cost(&self) -> Option<f64> {
        self.frequency.charges_per_year().map(|n| self.avg_amount * n)
    }

    pub fn frequency_label(&self) -> String {
        match self.frequency {
            Frequency::Weekly => "Weekly subscription".to_string(),
            Frequency::Monthly => "Monthly subscription".to_string(),
            Frequency::Quarterly => "Quarterly subscription".to_string(),
            Frequency::Yearly => "Yearly subscription".to_string(),
            Frequency::Irregular => format!("Recurring payment ({} occurrences)", self.count),
        }
    }

    pub fn recent_charges(&self) -> &[SubscriptionCharge] {
        &self.transactions[..self.transactions.len().min(RECENT_CHARGES)]
    }
}

fn merchant_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Merge patterns with recurring rows.
///
/// Patterns keep their order; recurring merchants without a pattern follow in the
/// order first seen. Several recurring rows for one merchant collapse into a
/// single record keeping the first amount and the highest occurrence count.
pub fn merge_subscriptions(
    patterns: &[SubscriptionPattern],
    recurring: &[RecurringTransaction],
) -> Vec<SubscriptionRecord> {
    let mut records: Vec<SubscriptionRecord> = Vec::with_capacity(patterns.len() + recurring.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for pattern in patterns {
        let key = merchant_key(&pattern.merchant);
        if let Some(&i) = index.get(&key) {
            log::debug!("duplicate subscription pattern for {}", pattern.merchant);
            records[i].count = records[i].count.max(pattern.count);
            continue;
        }
        index.insert(key, records.len());
        records.push(SubscriptionRecord::from_pattern(pattern));
    }

    for row in recurring {
        let key = merchant_key(&row.merchant_name);
        match index.get(&key) {
            Some(&i) => {
                let record = &mut records[i];
                if record.origin == SubscriptionOrigin::Pattern {
                    record.origin = SubscriptionOrigin::Both;
                }
                record.count = record.count.max(row.occurrence_count);
            }
            None => {
                index.insert(key, records.len());
                records.push(SubscriptionRecord::from_recurring(row));
            }
        }
    }

    records
}

/// Likely subscriptions only, unless every recurring record is requested
pub fn visible(records: &[SubscriptionRecord], show_all: bool) -> Vec<&SubscriptionRecord> {
    records.iter().filter(|r| show_all || r.is_likely_subscription()).collect()
}

/// Estimated yearly spend over records with a known cadence
pub fn total_yearly_cost<'a>(records: impl IntoIterator<Item = &'a SubscriptionRecord>) -> f64 {
    records.into_iter().filter_map(SubscriptionRecord::yearly_cost).sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCharge {
    pub merchant: String,
    pub amount: f64,
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayCharges {
    pub total: f64,
    pub charges: Vec<DayCharge>,
}

/// Charges falling in `year`/`month`, keyed by day of month, amounts made positive
pub fn charges_by_day<'a>(
    records: impl IntoIterator<Item = &'a SubscriptionRecord>,
    year: i32,
    month: u32,
) -> BTreeMap<u32, DayCharges> {
    let mut days: BTreeMap<u32, DayCharges> = BTreeMap::new();
    for record in records {
        for charge in &record.transactions {
            let Some(dt) = parse_flexible_datetime(&charge.date) else { continue };
            if dt.year() != year || dt.month() != month {
                continue;
            }
            let entry = days.entry(dt.day()).or_default();
            entry.total += charge.amount.abs();
            entry.charges.push(DayCharge {
                merchant: record.merchant.clone(),
                amount: charge.amount.abs(),
                desc: charge.desc.clone(),
            });
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::shift_month;

    fn pattern(merchant: &str, frequency: Frequency, count: u32, months: u32, avg: f64) -> SubscriptionPattern {
        SubscriptionPattern {
            merchant: merchant.to_string(),
            frequency,
            count,
            months,
            avg_amount: avg,
            transactions: vec![
                SubscriptionCharge { date: "2024-03-05".to_string(), amount: -avg, desc: Some(format!("{} charge", merchant)) },
                SubscriptionCharge { date: "2024-02-05".to_string(), amount: -avg, desc: None },
            ],
        }
    }

    fn recurring(merchant: &str, amount: f64, count: u32) -> RecurringTransaction {
        RecurringTransaction { merchant_name: merchant.to_string(), amount, occurrence_count: count }
    }

    #[test]
    fn test_likely_subscription_rules() {
        let records = merge_subscriptions(
            &[
                pattern("Netflix", Frequency::Monthly, 2, 2, 15.99),
                pattern("Insurer", Frequency::Quarterly, 1, 1, 300.0),
                pattern("Gym", Frequency::Irregular, 5, 3, 20.0),
                pattern("Paper", Frequency::Weekly, 3, 1, 4.0),
                pattern("Market", Frequency::Irregular, 8, 2, 30.0),
                pattern("Domain", Frequency::Yearly, 1, 1, 12.0),
            ],
            &[],
        );
        let likely: Vec<&str> = visible(&records, false).iter().map(|r| r.merchant.as_str()).collect();
        assert_eq!(likely, vec!["Netflix", "Insurer", "Gym", "Paper"]);
        assert_eq!(visible(&records, true).len(), 6);
    }

    #[test]
    fn test_merge_with_recurring_rows() {
        let records = merge_subscriptions(
            &[pattern("Netflix", Frequency::Monthly, 4, 4, 15.99)],
            &[
                recurring(" netflix ", -15.99, 9),
                recurring("Corner Cafe", -4.5, 6),
                recurring("corner cafe", -5.0, 2),
            ],
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].origin, SubscriptionOrigin::Both);
        assert_eq!(records[0].count, 9);
        assert_eq!(records[1].origin, SubscriptionOrigin::Recurring);
        assert_eq!(records[1].frequency, Frequency::Irregular);
        assert_eq!(records[1].avg_amount, 4.5);
        assert_eq!(records[1].count, 6);
        assert_eq!(records[1].frequency_label(), "Recurring payment (6 occurrences)");
    }

    #[test]
    fn test_yearly_cost() {
        let records = merge_subscriptions(
            &[
                pattern("Netflix", Frequency::Monthly, 4, 4, 10.0),
                pattern("Insurer", Frequency::Quarterly, 1, 1, 100.0),
                pattern("Paper", Frequency::Weekly, 3, 1, 2.0),
            ],
            &[recurring("Cafe", -3.0, 4)],
        );
        assert_eq!(records[0].yearly_cost(), Some(120.0));
        assert_eq!(records[1].yearly_cost(), Some(400.0));
        assert_eq!(records[2].yearly_cost(), Some(104.0));
        assert_eq!(records[3].yearly_cost(), None);
        assert_eq!(total_yearly_cost(&records), 624.0);
    }

    #[test]
    fn test_charges_by_day() {
        let records = merge_subscriptions(
            &[pattern("Netflix", Frequency::Monthly, 4, 4, 10.0), pattern("Music", Frequency::Monthly, 4, 4, 5.0)],
            &[],
        );
        let days = charges_by_day(&records, 2024, 3);
        assert_eq!(days.len(), 1);
        let fifth = &days[&5];
        assert_eq!(fifth.total, 15.0);
        assert_eq!(fifth.charges.len(), 2);
        assert_eq!(fifth.charges[0].desc.as_deref(), Some("Netflix charge"));
        assert!(charges_by_day(&records, 2024, 4).is_empty());
        assert_eq!(records[0].recent_charges().len(), 2);
    }

    #[test]
    fn test_month_navigation_wraps() {
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
    }
}
