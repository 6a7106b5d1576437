// 📜 History View - Filtering, ordering and pagination of the expense list

use crate::entities::{Category, Expense, ExpenseDraft};

pub const ITEMS_PER_PAGE: usize = 5;

// ============================================================================
// FILTER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => &expense.category == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(category) => category.label(),
        }
    }

    /// All → Food → … → Other → All
    pub fn cycle_next(&self) -> CategoryFilter {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::ALL[0].clone()),
            CategoryFilter::Only(c) if *c == Category::Other || !c.is_recognized() => CategoryFilter::All,
            CategoryFilter::Only(c) => CategoryFilter::Only(c.next()),
        }
    }

    pub fn cycle_previous(&self) -> CategoryFilter {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::Other),
            CategoryFilter::Only(c) if *c == Category::ALL[0] || !c.is_recognized() => CategoryFilter::All,
            CategoryFilter::Only(c) => CategoryFilter::Only(c.previous()),
        }
    }

    /// Parse CLI input: "all" or a category value
    pub fn parse(input: &str) -> Option<CategoryFilter> {
        if input.trim().eq_ignore_ascii_case("all") {
            return Some(CategoryFilter::All);
        }
        Category::parse(input).map(CategoryFilter::Only)
    }
}

/// Matching expenses, newest first. Equal dates keep insertion order.
pub fn filter_and_sort(expenses: &[Expense], filter: &CategoryFilter) -> Vec<Expense> {
    let mut matching: Vec<Expense> = expenses.iter().filter(|e| filter.matches(e)).cloned().collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

// ============================================================================
// PAGINATION
// ============================================================================

pub fn total_pages(item_count: usize) -> usize {
    item_count.div_ceil(ITEMS_PER_PAGE)
}

/// Items on 1-based `page`; out-of-range pages are empty
pub fn page_items<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1) * ITEMS_PER_PAGE;
    if start >= items.len() {
        return &[];
    }
    let end = (start + ITEMS_PER_PAGE).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub filter: CategoryFilter,
    /// 1-based
    pub current_page: usize,
}

impl Default for HistoryView {
    fn default() -> Self {
        HistoryView {
            filter: CategoryFilter::All,
            current_page: 1,
        }
    }
}

impl HistoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Changing the filter always goes back to the first page
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.current_page = 1;
    }

    pub fn rows(&self, expenses: &[Expense]) -> Vec<Expense> {
        filter_and_sort(expenses, &self.filter)
    }

    pub fn next_page(&mut self, item_count: usize) {
        self.current_page = (self.current_page + 1).min(total_pages(item_count).max(1));
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    /// Step back a page when the deleted row was the only one on it
    pub fn after_delete(&mut self, rows_on_page_before: usize) {
        if rows_on_page_before == 1 && self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    /// Keep `current_page` within `[1, total_pages]`
    pub fn clamp(&mut self, item_count: usize) {
        self.current_page = self.current_page.clamp(1, total_pages(item_count).max(1));
    }
}

// ============================================================================
// EDIT FORM
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl EditForm {
    pub fn from_expense(expense: &Expense) -> Self {
        let draft = expense.to_draft();
        EditForm {
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            date: draft.date,
        }
    }

    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount.clone(),
            category: self.category.clone(),
            date: self.date.clone(),
        }
    }
}
