// 💸 Expense Entity - A single recorded spending entry
//
// Identity is the UUID assigned at creation. Editing replaces every other
// field but never the id.

use super::category::Category;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used by forms, storage and the CLI
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted amount; keeps every stored value exact to the cent
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

// ============================================================================
// EXPENSE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable identity (UUID v4)
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

impl Expense {
    /// Create a new expense with a fresh identifier
    pub fn new(values: ValidExpense) -> Self {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: values.description,
            amount: values.amount,
            category: values.category,
            date: values.date,
        }
    }

    /// Copy of this expense with every field except `id` replaced
    pub fn with_values(&self, values: ValidExpense) -> Self {
        Expense {
            id: self.id.clone(),
            description: values.description,
            amount: values.amount,
            category: values.category,
            date: values.date,
        }
    }

    /// Draft pre-filled with this expense (used by the edit form)
    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount.to_string(),
            category: self.category.as_str().to_string(),
            date: self.date.format(DATE_FORMAT).to_string(),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a description")]
    EmptyDescription,

    #[error("Please enter a valid amount")]
    InvalidAmount(String),

    #[error("Amount cannot exceed 1,000,000,000,000.00")]
    AmountTooLarge(String),

    #[error("Please select a category")]
    MissingCategory,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Please select a date")]
    MissingDate,

    #[error("Invalid date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),
}

/// Field values that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

/// Raw form input, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl ExpenseDraft {
    /// Blank form: food category, today's date
    pub fn new(today: NaiveDate) -> Self {
        ExpenseDraft {
            description: String::new(),
            amount: String::new(),
            category: Category::default().as_str().to_string(),
            date: today.format(DATE_FORMAT).to_string(),
        }
    }

    /// Check fields in form order; the first failure wins
    pub fn validate(&self) -> Result<ValidExpense, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        let amount = parse_amount(&self.amount)?;

        let category_raw = self.category.trim();
        if category_raw.is_empty() {
            return Err(ValidationError::MissingCategory);
        }
        let category = Category::parse(category_raw)
            .ok_or_else(|| ValidationError::UnknownCategory(category_raw.to_string()))?;

        let date_raw = self.date.trim();
        if date_raw.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidDate(date_raw.to_string()))?;

        Ok(ValidExpense {
            description: description.to_string(),
            amount,
            category,
            date,
        })
    }
}

fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let invalid = || ValidationError::InvalidAmount(trimmed.to_string());

    let amount: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(invalid());
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(trimmed.to_string()));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(description: &str, amount: &str, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_valid_draft() {
        let valid = draft("  Lunch  ", "12.50", "food", "2025-01-05").validate().unwrap();

        assert_eq!(valid.description, "Lunch");
        assert_eq!(valid.amount, 12.5);
        assert_eq!(valid.category, Category::Food);
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn test_rejects_bad_fields() {
        assert_eq!(
            draft("   ", "10", "food", "2025-01-05").validate(),
            Err(ValidationError::EmptyDescription)
        );
        for amount in ["", "abc", "0", "-3", "NaN", "inf"] {
            assert!(
                matches!(
                    draft("Taxi", amount, "transport", "2025-01-05").validate(),
                    Err(ValidationError::InvalidAmount(_))
                ),
                "amount {:?} should be rejected",
                amount
            );
        }
        assert_eq!(
            draft("Taxi", "10", "", "2025-01-05").validate(),
            Err(ValidationError::MissingCategory)
        );
        assert_eq!(
            draft("Taxi", "10", "cars", "2025-01-05").validate(),
            Err(ValidationError::UnknownCategory("cars".to_string()))
        );
        assert_eq!(draft("Taxi", "10", "transport", "").validate(), Err(ValidationError::MissingDate));
        assert!(matches!(
            draft("Taxi", "10", "transport", "05/01/2025").validate(),
            Err(ValidationError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_amount_limit() {
        assert_eq!(
            draft("Yacht", "1e25", "other", "2025-01-05").validate(),
            Err(ValidationError::AmountTooLarge("1e25".to_string()))
        );
        assert!(draft("Yacht", "1000000000000.01", "other", "2025-01-05").validate().is_err());
        let max = draft("Yacht", "1000000000000", "other", "2025-01-05").validate().unwrap();
        assert_eq!(max.amount, MAX_AMOUNT);
    }

    #[test]
    fn test_with_values_preserves_id() {
        let original = Expense::new(draft("Lunch", "12", "food", "2025-01-05").validate().unwrap());
        let edited = original.with_values(draft("Cinema", "30", "entertainment", "2025-02-01").validate().unwrap());

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.description, "Cinema");
        assert_eq!(edited.amount, 30.0);
        assert_eq!(edited.category, Category::Entertainment);
        assert_eq!(edited.date, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
    }

    #[test]
    fn test_serialized_shape() {
        let expense = Expense {
            id: "abc".to_string(),
            description: "Bus".to_string(),
            amount: 2.5,
            category: Category::Transport,
            date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        };

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "abc",
                "description": "Bus",
                "amount": 2.5,
                "category": "transport",
                "date": "2025-03-09"
            })
        );
    }

    #[test]
    fn test_to_draft_round_trip() {
        let original = Expense::new(draft("Pharmacy", "7.25", "health", "2025-04-10").validate().unwrap());
        assert_eq!(original.to_draft().validate().unwrap().amount, 7.25);
    }
}
