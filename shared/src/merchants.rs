//! Merchant → category bookkeeping for the category manager and the raw table.

use std::collections::HashMap;

use crate::models::{Category, MerchantSummary};

/// Category dropdown selection in the merchant list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Uncategorized,
    Category(i64),
}

impl CategoryFilter {
    /// Parse a `<select>` value: `all`, `uncategorized` or a category id
    pub fn from_value(value: &str) -> Self {
        match value {
            "uncategorized" => CategoryFilter::Uncategorized,
            other => other.parse().map(CategoryFilter::Category).unwrap_or(CategoryFilter::All),
        }
    }

    pub fn value(&self) -> String {
        match self {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Uncategorized => "uncategorized".to_string(),
            CategoryFilter::Category(id) => id.to_string(),
        }
    }

    pub fn accepts(&self, primary: Option<i64>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Uncategorized => primary.is_none(),
            CategoryFilter::Category(id) => primary == Some(*id),
        }
    }
}

/// The first category returned for a merchant is its primary category
pub fn primary_category(categories: &[Category]) -> Option<i64> {
    categories.first().map(|c| c.id)
}

pub fn find_category(categories: &[Category], id: i64) -> Option<&Category> {
    categories.iter().find(|c| c.id == id)
}

/// One backend call needed to move a merchant between categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStep {
    Remove(i64),
    Add(i64),
}

/// Primary category per merchant name, patched locally after each backend call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchantAssignments {
    primary: HashMap<String, i64>,
}

impl MerchantAssignments {
    pub fn get(&self, merchant: &str) -> Option<i64> {
        self.primary.get(merchant).copied()
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Calls needed to move `merchant` to `target` (`None` clears it)
    pub fn plan(&self, merchant: &str, target: Option<i64>) -> Vec<AssignmentStep> {
        let current = self.get(merchant);
        match (current, target) {
            (Some(from), Some(to)) if from == to => Vec::new(),
            (Some(from), Some(to)) => vec![AssignmentStep::Remove(from), AssignmentStep::Add(to)],
            (None, Some(to)) => vec![AssignmentStep::Add(to)],
            (Some(from), None) => vec![AssignmentStep::Remove(from)],
            (None, None) => Vec::new(),
        }
    }

    pub fn assign(&mut self, merchant: &str, category_id: i64) {
        self.primary.insert(merchant.to_string(), category_id);
    }

    pub fn unassign(&mut self, merchant: &str) {
        self.primary.remove(merchant);
    }

    /// Drop a deleted category from every merchant
    pub fn remove_category(&mut self, category_id: i64) {
        self.primary.retain(|_, id| *id != category_id);
    }

    pub fn count_for(&self, category_id: i64) -> usize {
        self.primary.values().filter(|id| **id == category_id).count()
    }
}

/// Largest spenders first
pub fn sort_by_total_spent(merchants: &mut [MerchantSummary]) {
    merchants.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
}

pub fn filter_merchants<'a>(
    merchants: &'a [MerchantSummary],
    search: &str,
    filter: CategoryFilter,
    assignments: &MerchantAssignments,
) -> Vec<&'a MerchantSummary> {
    let needle = search.trim().to_lowercase();
    merchants
        .iter()
        .filter(|m| needle.is_empty() || m.merchant_name.to_lowercase().contains(&needle))
        .filter(|m| filter.accepts(assignments.get(&m.merchant_name)))
        .collect()
}

/// 1-based page position over a filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current: usize,
    pub per_page: usize,
    pub item_count: usize,
}

impl PageState {
    pub fn new(current: usize, per_page: usize, item_count: usize) -> Self {
        let mut state = Self { current, per_page: per_page.max(1), item_count };
        state.current = current.clamp(1, state.total_pages().max(1));
        state
    }

    pub fn total_pages(&self) -> usize {
        self.item_count.div_ceil(self.per_page)
    }

    pub fn is_first(&self) -> bool {
        self.current <= 1
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.total_pages()
    }

    /// Controls are only shown when there is more than one page
    pub fn needs_controls(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn go_to(&self, page: usize) -> Self {
        Self::new(page, self.per_page, self.item_count)
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.current - 1) * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant(name: &str, total: f64) -> MerchantSummary {
        MerchantSummary {
            merchant_name: name.to_string(),
            transaction_count: 1,
            total_spent: total,
            last_transaction: Some("2024-03-05".to_string()),
        }
    }

    fn category(id: i64) -> Category {
        Category {
            id,
            name: format!("Category {}", id),
            color: "#000000".to_string(),
            icon: "🏷".to_string(),
            merchant_count: Some(0),
        }
    }

    #[test]
    fn test_category_filter_values() {
        assert_eq!(CategoryFilter::from_value("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_value("uncategorized"), CategoryFilter::Uncategorized);
        assert_eq!(CategoryFilter::from_value("12"), CategoryFilter::Category(12));
        assert_eq!(CategoryFilter::from_value("junk"), CategoryFilter::All);
        assert_eq!(CategoryFilter::Category(4).value(), "4");
    }

    #[test]
    fn test_assignment_plans() {
        let mut assignments = MerchantAssignments::default();
        assert_eq!(assignments.plan("Cafe", Some(2)), vec![AssignmentStep::Add(2)]);
        assignments.assign("Cafe", 2);
        assert!(assignments.plan("Cafe", Some(2)).is_empty());
        assert_eq!(
            assignments.plan("Cafe", Some(3)),
            vec![AssignmentStep::Remove(2), AssignmentStep::Add(3)]
        );
        assert_eq!(assignments.plan("Cafe", None), vec![AssignmentStep::Remove(2)]);
        assert!(assignments.plan("Other", None).is_empty());
        assignments.unassign("Cafe");
        assert!(assignments.is_empty());
    }

    #[test]
    fn test_remove_category_clears_merchants() {
        let mut assignments = MerchantAssignments::default();
        assignments.assign("Cafe", 1);
        assignments.assign("Bakery", 1);
        assignments.assign("Garage", 3);
        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments.count_for(1), 2);
        assignments.remove_category(1);
        assert_eq!(assignments.get("Cafe"), None);
        assert_eq!(assignments.get("Garage"), Some(3));
    }

    #[test]
    fn test_filter_and_sort_merchants() {
        let mut merchants = vec![merchant("Cafe", 20.0), merchant("Garage", 500.0), merchant("Bakery", 75.0)];
        sort_by_total_spent(&mut merchants);
        assert_eq!(merchants[0].merchant_name, "Garage");

        let mut assignments = MerchantAssignments::default();
        assignments.assign("Garage", 3);

        let uncategorized = filter_merchants(&merchants, "", CategoryFilter::Uncategorized, &assignments);
        let names: Vec<&str> = uncategorized.iter().map(|m| m.merchant_name.as_str()).collect();
        assert_eq!(names, vec!["Bakery", "Cafe"]);

        let searched = filter_merchants(&merchants, "GAR", CategoryFilter::Category(3), &assignments);
        assert_eq!(searched.len(), 1);
        assert!(filter_merchants(&merchants, "gar", CategoryFilter::Category(4), &assignments).is_empty());
    }

    #[test]
    fn test_page_state() {
        let items: Vec<u32> = (0..120).collect();
        let page = PageState::new(1, 50, items.len());
        assert_eq!(page.total_pages(), 3);
        assert!(page.is_first());
        assert!(page.needs_controls());
        assert_eq!(page.slice(&items).len(), 50);

        let last = page.go_to(99);
        assert_eq!(last.current, 3);
        assert!(last.is_last());
        assert_eq!(last.slice(&items), &items[100..]);

        let empty = PageState::new(1, 50, 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.needs_controls());
        assert!(empty.slice::<u32>(&[]).is_empty());
    }

    #[test]
    fn test_primary_category() {
        assert_eq!(primary_category(&[category(5), category(6)]), Some(5));
        assert_eq!(primary_category(&[]), None);
        assert_eq!(find_category(&[category(5)], 5).map(|c| c.id), Some(5));
    }
}
