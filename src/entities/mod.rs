// Entity Models
//
// Expense is the only stored entity; Category is a closed tag set with
// display metadata (label, colour) attached.

pub mod category;
pub mod expense;

pub use category::{Category, DEFAULT_COLOR};
pub use expense::{Expense, ExpenseDraft, ValidExpense, ValidationError, DATE_FORMAT, MAX_AMOUNT};
