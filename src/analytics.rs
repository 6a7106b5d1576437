// 📊 Analytics - Derived metrics for summary cards and charts
//
// Single-pass aggregations over the in-memory list. Nothing is cached; the UI
// recomputes on every render.

use crate::entities::{Category, Expense};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Sum of all amounts
pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Per-category totals, keyed in category order
pub fn expenses_by_category(expenses: &[Expense]) -> BTreeMap<Category, f64> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

/// Category with the largest total. Ties go to the category listed first.
pub fn highest_category(expenses: &[Expense]) -> Option<(Category, f64)> {
    let mut best: Option<(Category, f64)> = None;
    for (category, amount) in expenses_by_category(expenses) {
        match &best {
            Some((_, top)) if amount <= *top => {}
            _ => best = Some((category, amount)),
        }
    }
    best
}

// ============================================================================
// MONTHLY TOTALS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthlyTotal {
    /// Short label, e.g. "Jan 2025"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{:02}/{}", self.month, self.year))
    }
}

/// Per-month totals in chronological order
pub fn expenses_by_month(expenses: &[Expense]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for expense in expenses {
        *totals
            .entry((expense.date.year(), expense.date.month()))
            .or_insert(0.0) += expense.amount;
    }

    totals
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect()
}

// ============================================================================
// CHART SERIES
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub category: Category,
    pub value: f64,
    /// Share of the grand total, 0-100
    pub percentage: f64,
}

/// Pie series: one slice per category that has spending
pub fn chart_data(expenses: &[Expense]) -> Vec<ChartSlice> {
    let total = total_expenses(expenses);
    expenses_by_category(expenses)
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .map(|(category, value)| ChartSlice {
            category,
            value,
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
        })
        .collect()
}

/// Bar series: (label, total) per month
pub fn monthly_chart_data(expenses: &[Expense]) -> Vec<(String, f64)> {
    expenses_by_month(expenses)
        .into_iter()
        .map(|m| (m.label(), m.total))
        .collect()
}

// ============================================================================
// SUMMARY CARDS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: f64,
    pub highest: Option<(Category, f64)>,
    pub count: usize,
}

impl Summary {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Summary {
            total: total_expenses(expenses),
            highest: highest_category(expenses),
            count: expenses.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: f64, category: Category, date: &str) -> Expense {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: "test".to_string(),
            amount,
            category,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn sample() -> Vec<Expense> {
        vec![
            expense(12.5, Category::Food, "2025-01-03"),
            expense(40.0, Category::Transport, "2025-01-20"),
            expense(7.25, Category::Food, "2025-02-01"),
            expense(99.99, Category::Shopping, "2024-12-24"),
            expense(15.0, Category::Unrecognized("gifts".to_string()), "2025-02-14"),
        ]
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(total_expenses(&[]), 0.0);
        assert!(highest_category(&[]).is_none());
        assert!(chart_data(&[]).is_empty());
        assert!(monthly_chart_data(&[]).is_empty());

        let summary = Summary::from_expenses(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.highest.is_none());
    }

    #[test]
    fn test_category_totals_sum_to_grand_total() {
        let data = sample();
        let by_category: f64 = expenses_by_category(&data).values().sum();
        assert!((by_category - total_expenses(&data)).abs() < 1e-9);

        let food = expenses_by_category(&data)[&Category::Food];
        assert!((food - 19.75).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_totals_are_chronological() {
        let months = expenses_by_month(&sample());
        let labels: Vec<String> = months.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
        assert!((months[1].total - 52.5).abs() < 1e-9);

        let monthly_sum: f64 = months.iter().map(|m| m.total).sum();
        assert!((monthly_sum - total_expenses(&sample())).abs() < 1e-9);
    }

    #[test]
    fn test_highest_category() {
        assert_eq!(
            highest_category(&sample()),
            Some((Category::Shopping, 99.99))
        );
    }

    #[test]
    fn test_highest_category_tie_goes_to_first_listed() {
        let data = vec![
            expense(10.0, Category::Health, "2025-01-01"),
            expense(10.0, Category::Transport, "2025-01-02"),
        ];
        assert_eq!(highest_category(&data), Some((Category::Transport, 10.0)));
    }

    #[test]
    fn test_chart_percentages() {
        let data = vec![
            expense(30.0, Category::Food, "2025-01-01"),
            expense(10.0, Category::Other, "2025-01-02"),
        ];
        let slices = chart_data(&data);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, Category::Food);
        assert!((slices[0].percentage - 75.0).abs() < 1e-9);
        assert!((slices.iter().map(|s| s.percentage).sum::<f64>() - 100.0).abs() < 1e-9);
    }
}
