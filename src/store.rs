// 🧠 Expense Store - Reducer-backed state container
//
// Every state change goes through `reduce`. The store rewrites the full
// expense list after every list action; a failed write is recorded in
// `error` and the in-memory change is kept.

use crate::db::{backup_raw_expenses, load_expenses, save_expenses, Storage};
use crate::entities::{Expense, ExpenseDraft, ValidationError};
use thiserror::Error;

// ============================================================================
// STATE & ACTIONS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseState {
    pub expenses: Vec<Expense>,
    pub loading: bool,
    pub error: Option<String>,
    /// Expense currently open in the edit form
    pub editing: Option<Expense>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddExpense(Expense),
    DeleteExpense { id: String },
    UpdateExpense(Expense),
    SetEditingExpense(Expense),
    CancelEdit,
    SetExpenses(Vec<Expense>),
    SetLoading(bool),
    SetError(Option<String>),
}

/// Pure transition function
pub fn reduce(mut state: ExpenseState, action: Action) -> ExpenseState {
    match action {
        Action::AddExpense(expense) => {
            state.expenses.push(expense);
        }
        Action::DeleteExpense { id } => {
            state.expenses.retain(|e| e.id != id);
            if state.editing.as_ref().is_some_and(|e| e.id == id) {
                state.editing = None;
            }
        }
        Action::UpdateExpense(updated) => {
            for expense in state.expenses.iter_mut() {
                if expense.id == updated.id {
                    *expense = updated.clone();
                }
            }
            state.editing = None;
        }
        Action::SetEditingExpense(expense) => state.editing = Some(expense),
        Action::CancelEdit => state.editing = None,
        Action::SetExpenses(expenses) => state.expenses = expenses,
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetError(error) => state.error = error,
    }
    state
}

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No expense is being edited")]
    NotEditing,

    #[error("Expense not found: {0}")]
    NotFound(String),
}

pub struct ExpenseStore {
    storage: Box<dyn Storage>,
    state: ExpenseState,
    /// Set when an unreadable blob could not be backed up
    write_blocked: Option<String>,
}

impl ExpenseStore {
    /// Load the persisted list. A corrupt blob is not fatal: the store starts
    /// empty with the failure recorded in `error`, and the raw blob is copied
    /// to a backup key first. If that copy cannot be made, saving stays off
    /// for the session so the blob is never overwritten.
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let mut state = ExpenseState {
            loading: true,
            ..ExpenseState::default()
        };
        let mut write_blocked = None;

        match load_expenses(storage.as_ref()) {
            Ok(expenses) => {
                tracing::info!(count = expenses.len(), "expenses loaded");
                state = reduce(state, Action::SetExpenses(expenses));
            }
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "could not load stored expenses");
                let message = match backup_raw_expenses(storage.as_ref()) {
                    Ok(Some(key)) => format!("{:#} (previous data kept under '{}')", err, key),
                    Ok(None) => format!("{:#}", err),
                    Err(backup_err) => {
                        let reason = format!("{:#}", backup_err);
                        tracing::error!(error = %reason, "backup failed, saving disabled");
                        write_blocked = Some(reason.clone());
                        format!("{:#}; saving disabled: {}", err, reason)
                    }
                };
                state = reduce(state, Action::SetError(Some(message)));
            }
        }
        state = reduce(state, Action::SetLoading(false));

        ExpenseStore { storage, state, write_blocked }
    }

    pub fn dispatch(&mut self, action: Action) {
        let touches_list = action_touches_list(&action);
        self.state = reduce(std::mem::take(&mut self.state), action);

        if touches_list {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let result = match &self.write_blocked {
            Some(reason) => Err(anyhow::anyhow!("Saving disabled: {}", reason)),
            None => save_expenses(self.storage.as_ref(), &self.state.expenses),
        };

        if let Err(err) = result {
            let message = format!("{:#}", err);
            tracing::error!(error = %message, "failed to persist expenses");
            self.state = reduce(std::mem::take(&mut self.state), Action::SetError(Some(message)));
        } else {
            tracing::debug!(count = self.state.expenses.len(), "expenses persisted");
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Validate the draft and append it with a fresh id
    pub fn add_expense(&mut self, draft: &ExpenseDraft) -> Result<Expense, ValidationError> {
        let expense = Expense::new(draft.validate()?);
        tracing::info!(id = %expense.id, amount = expense.amount, "expense added");
        self.dispatch(Action::AddExpense(expense.clone()));
        Ok(expense)
    }

    /// Returns false when no expense has this id
    pub fn delete_expense(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        tracing::info!(id, "expense deleted");
        self.dispatch(Action::DeleteExpense { id: id.to_string() });
        true
    }

    /// Open the edit form for `id`
    pub fn set_editing_expense(&mut self, id: &str) -> bool {
        match self.get(id).cloned() {
            Some(expense) => {
                self.dispatch(Action::SetEditingExpense(expense));
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.dispatch(Action::CancelEdit);
    }

    /// Save the edit form over the expense being edited
    pub fn update_expense(&mut self, draft: &ExpenseDraft) -> Result<Expense, StoreError> {
        let editing = self.state.editing.clone().ok_or(StoreError::NotEditing)?;
        let values = draft.validate()?;
        if self.get(&editing.id).is_none() {
            self.cancel_edit();
            return Err(StoreError::NotFound(editing.id));
        }

        let updated = editing.with_values(values);
        tracing::info!(id = %updated.id, "expense updated");
        self.dispatch(Action::UpdateExpense(updated.clone()));
        Ok(updated)
    }

    /// Edit a record directly by id (CLI path, no form lifecycle)
    pub fn replace_expense(&mut self, id: &str, draft: &ExpenseDraft) -> Result<Expense, StoreError> {
        if !self.set_editing_expense(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let result = self.update_expense(draft);
        if result.is_err() {
            self.cancel_edit();
        }
        result
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &ExpenseState {
        &self.state
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.state.expenses
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.state.expenses.iter().find(|e| e.id == id)
    }

    pub fn editing(&self) -> Option<&Expense> {
        self.state.editing.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.dispatch(Action::SetError(None));
    }
}

fn action_touches_list(action: &Action) -> bool {
    matches!(
        action,
        Action::AddExpense(_)
            | Action::DeleteExpense { .. }
            | Action::UpdateExpense(_)
            | Action::SetExpenses(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStorage, SqliteStorage, CORRUPT_BACKUP_KEY, STORAGE_KEY};
    use crate::entities::Category;
    use anyhow::anyhow;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn draft(description: &str, amount: &str, category: &str, date: &str) -> ExpenseDraft {
        ExpenseDraft {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    /// Storage shared with the test so it can inspect what was written
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<MemoryStorage>);

    impl Storage for SharedStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.0.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.0.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            self.0.remove_item(key)
        }
    }

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get_item(&self, _key: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
        fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("quota exceeded"))
        }
        fn remove_item(&self, _key: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_add_grows_collection_with_unique_ids() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let mut ids = HashSet::new();

        for i in 0..10 {
            let before = store.expenses().len();
            let expense = store
                .add_expense(&draft(&format!("Item {}", i), "5", "other", "2025-01-01"))
                .unwrap();
            assert_eq!(store.expenses().len(), before + 1);
            assert!(ids.insert(expense.id), "ids must be unique");
        }
    }

    #[test]
    fn test_invalid_draft_leaves_store_untouched() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let err = store.add_expense(&draft("", "5", "food", "2025-01-01")).unwrap_err();

        assert_eq!(err, ValidationError::EmptyDescription);
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let a = store.add_expense(&draft("A", "1", "food", "2025-01-01")).unwrap();
        let b = store.add_expense(&draft("B", "2", "food", "2025-01-02")).unwrap();
        let c = store.add_expense(&draft("C", "3", "food", "2025-01-03")).unwrap();

        assert!(store.delete_expense(&b.id));
        let remaining: Vec<_> = store.expenses().iter().map(|e| e.id.clone()).collect();
        assert_eq!(remaining, vec![a.id, c.id]);

        assert!(!store.delete_expense("missing"));
        assert_eq!(store.expenses().len(), 2);
    }

    #[test]
    fn test_edit_lifecycle_preserves_id() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let original = store.add_expense(&draft("Lunch", "12", "food", "2025-01-05")).unwrap();

        assert!(store.set_editing_expense(&original.id));
        assert_eq!(store.editing().map(|e| e.id.as_str()), Some(original.id.as_str()));

        let updated = store
            .update_expense(&draft("Concert", "55.5", "entertainment", "2025-02-14"))
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert!(store.editing().is_none());
        let stored = store.get(&original.id).unwrap();
        assert_eq!(stored.description, "Concert");
        assert_eq!(stored.amount, 55.5);
        assert_eq!(stored.category, Category::Entertainment);
        assert_eq!(stored.date.to_string(), "2025-02-14");
    }

    #[test]
    fn test_update_requires_editing_and_validates() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let original = store.add_expense(&draft("Lunch", "12", "food", "2025-01-05")).unwrap();

        assert_eq!(
            store.update_expense(&draft("X", "1", "food", "2025-01-05")),
            Err(StoreError::NotEditing)
        );

        store.set_editing_expense(&original.id);
        assert_eq!(
            store.update_expense(&draft("X", "0", "food", "2025-01-05")),
            Err(StoreError::Validation(ValidationError::InvalidAmount("0".to_string())))
        );
        // Failed save keeps the form open
        assert!(store.editing().is_some());

        store.cancel_edit();
        assert!(store.editing().is_none());
        assert_eq!(store.get(&original.id).unwrap().description, "Lunch");
    }

    #[test]
    fn test_deleting_edited_record_closes_form() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let e = store.add_expense(&draft("Lunch", "12", "food", "2025-01-05")).unwrap();
        store.set_editing_expense(&e.id);
        store.delete_expense(&e.id);
        assert!(store.editing().is_none());
    }

    #[test]
    fn test_replace_expense_by_id() {
        let mut store = ExpenseStore::open(Box::new(MemoryStorage::new()));
        let e = store.add_expense(&draft("Lunch", "12", "food", "2025-01-05")).unwrap();

        let updated = store.replace_expense(&e.id, &draft("Dinner", "20", "food", "2025-01-05")).unwrap();
        assert_eq!(updated.id, e.id);
        assert_eq!(
            store.replace_expense("nope", &draft("Dinner", "20", "food", "2025-01-05")),
            Err(StoreError::NotFound("nope".to_string()))
        );
        assert!(store
            .replace_expense(&e.id, &draft("", "20", "food", "2025-01-05"))
            .is_err());
        assert!(store.editing().is_none());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let shared = SharedStorage::default();
        let mut store = ExpenseStore::open(Box::new(shared.clone()));

        let e = store.add_expense(&draft("Bus", "2", "transport", "2025-01-01")).unwrap();
        assert_eq!(load_expenses(&shared).unwrap().len(), 1);

        store.set_editing_expense(&e.id);
        store.update_expense(&draft("Train", "9", "transport", "2025-01-01")).unwrap();
        assert_eq!(load_expenses(&shared).unwrap()[0].description, "Train");

        store.delete_expense(&e.id);
        assert!(load_expenses(&shared).unwrap().is_empty());
    }

    #[test]
    fn test_reopen_yields_same_collection() {
        let storage = Rc::new(MemoryStorage::new());
        let shared = SharedStorage(storage.clone());
        let expected = {
            let mut store = ExpenseStore::open(Box::new(shared.clone()));
            store.add_expense(&draft("A", "1", "food", "2025-01-01")).unwrap();
            store.add_expense(&draft("B", "2", "utilities", "2025-02-01")).unwrap();
            store.expenses().to_vec()
        };

        let reopened = ExpenseStore::open(Box::new(SharedStorage(storage)));
        assert_eq!(reopened.expenses(), expected.as_slice());
    }

    #[test]
    fn test_write_failure_is_recorded_not_fatal() {
        let mut store = ExpenseStore::open(Box::new(FailingStorage));
        let e = store.add_expense(&draft("Bus", "2", "transport", "2025-01-01")).unwrap();

        assert_eq!(store.expenses().len(), 1);
        assert_eq!(store.expenses()[0].id, e.id);
        assert!(store.error().unwrap().contains("quota exceeded"));

        store.clear_error();
        assert!(store.error().is_none());
    }

    const PARTLY_CORRUPT: &str = r#"[{"id":"r1","description":"Rent","amount":900,"category":"utilities","date":"2025-01-01"},{"id":"r2","descr"#;

    #[test]
    fn test_corrupt_blob_starts_empty_with_error() {
        let shared = SharedStorage::default();
        shared.set_item(STORAGE_KEY, "definitely not json").unwrap();

        let store = ExpenseStore::open(Box::new(shared.clone()));
        assert!(store.expenses().is_empty());
        assert!(store.error().unwrap().contains(CORRUPT_BACKUP_KEY));
        assert!(!store.state().loading);
        // Blob stays untouched until something is changed
        assert_eq!(shared.get_item(STORAGE_KEY).unwrap().as_deref(), Some("definitely not json"));
    }

    #[test]
    fn test_corrupt_blob_survives_next_save() {
        let shared = SharedStorage::default();
        shared.set_item(STORAGE_KEY, PARTLY_CORRUPT).unwrap();

        let mut store = ExpenseStore::open(Box::new(shared.clone()));
        store.clear_error();
        store.add_expense(&draft("Bus", "2", "transport", "2025-01-02")).unwrap();

        let saved = load_expenses(&shared).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].description, "Bus");
        assert_eq!(shared.get_item(CORRUPT_BACKUP_KEY).unwrap().as_deref(), Some(PARTLY_CORRUPT));
    }

    /// Accepts writes to the main key only
    #[derive(Clone, Default)]
    struct NoBackupStorage(Rc<MemoryStorage>);

    impl Storage for NoBackupStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.0.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if key != STORAGE_KEY {
                return Err(anyhow!("disk full"));
            }
            self.0.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            self.0.remove_item(key)
        }
    }

    #[test]
    fn test_failed_backup_disables_saving() {
        let storage = NoBackupStorage::default();
        storage.set_item(STORAGE_KEY, PARTLY_CORRUPT).unwrap();

        let mut store = ExpenseStore::open(Box::new(storage.clone()));
        assert!(store.error().unwrap().contains("saving disabled"));

        store.clear_error();
        store.add_expense(&draft("Bus", "2", "transport", "2025-01-02")).unwrap();
        assert_eq!(store.expenses().len(), 1);
        assert!(store.error().unwrap().contains("Saving disabled"));
        assert_eq!(storage.get_item(STORAGE_KEY).unwrap().as_deref(), Some(PARTLY_CORRUPT));
    }

    /// Counts writes of the expense list
    #[derive(Clone, Default)]
    struct CountingStorage {
        inner: Rc<MemoryStorage>,
        writes: Rc<Cell<usize>>,
    }

    impl Storage for CountingStorage {
        fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.get_item(key)
        }
        fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set_item(key, value)
        }
        fn remove_item(&self, key: &str) -> anyhow::Result<()> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn test_unchanged_edit_still_rewrites_storage() {
        let storage = CountingStorage::default();
        let mut store = ExpenseStore::open(Box::new(storage.clone()));
        let e = store.add_expense(&draft("Lunch", "12", "food", "2025-01-05")).unwrap();
        assert_eq!(storage.writes.get(), 1);

        store.set_editing_expense(&e.id);
        store.cancel_edit();
        assert_eq!(storage.writes.get(), 1);

        store.set_editing_expense(&e.id);
        store.update_expense(&e.to_draft()).unwrap();
        assert_eq!(storage.writes.get(), 2);
        assert_eq!(store.get(&e.id), Some(&e));
    }

    #[test]
    fn test_store_on_sqlite() {
        let mut store = ExpenseStore::open(Box::new(SqliteStorage::open_in_memory().unwrap()));
        store.add_expense(&draft("Power bill", "60", "utilities", "2025-03-01")).unwrap();
        assert_eq!(store.expenses().len(), 1);
        assert!(store.error().is_none());
    }

    #[test]
    fn test_reduce_is_pure() {
        let state = ExpenseState::default();
        let next = reduce(state.clone(), Action::SetLoading(true));
        assert!(next.loading);
        assert!(!state.loading);

        let next = reduce(next, Action::SetError(Some("boom".to_string())));
        assert_eq!(next.error.as_deref(), Some("boom"));
    }
}
