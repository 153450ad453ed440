//! Expense Store
//!
//! Budget state driven by a pure reducer. Every transition returns a new
//! state; nothing here touches the loader, it only supplies rows to it.

use crate::loader::Row;
use serde::{Deserialize, Serialize};

/// A single expense entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: u64,
    pub name: String,
    pub cost: u64,
}

impl Expense {
    pub fn new(id: u64, name: impl Into<String>, cost: u64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
        }
    }
}

impl Row for Expense {
    fn key(&self) -> String {
        self.id.to_string()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("cost", self.cost.to_string()),
        ]
    }
}

/// Budget and the expenses counted against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetState {
    pub budget: u64,
    pub expenses: Vec<Expense>,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            budget: 1000,
            expenses: vec![
                Expense::new(12, "shopping", 40),
                Expense::new(13, "holiday", 400),
                Expense::new(14, "car service", 50),
            ],
        }
    }
}

/// State transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    AddExpense(Expense),
    DeleteExpense(u64),
    SetBudget(u64),
}

/// Apply one action, returning the next state
pub fn reduce(mut state: BudgetState, action: Action) -> BudgetState {
    match action {
        Action::AddExpense(expense) => state.expenses.push(expense),
        Action::DeleteExpense(id) => state.expenses.retain(|e| e.id != id),
        Action::SetBudget(budget) => state.budget = budget,
    }
    state
}

impl BudgetState {
    pub fn with_budget(budget: u64) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Sum of all expense costs, widened so large costs cannot overflow
    pub fn spent(&self) -> u128 {
        self.expenses.iter().map(|e| u128::from(e.cost)).sum()
    }

    /// Budget left; negative when overspent
    pub fn remaining(&self) -> i128 {
        let spent = i128::try_from(self.spent()).unwrap_or(i128::MAX);
        i128::from(self.budget).saturating_sub(spent)
    }

    /// Amount spent beyond the budget, zero when within it
    pub fn overspend(&self) -> u128 {
        self.spent().saturating_sub(u128::from(self.budget))
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent() > u128::from(self.budget)
    }

    /// Next unused expense id
    pub fn next_id(&self) -> u64 {
        self.expenses.iter().map(|e| e.id).max().map_or(1, |id| id + 1)
    }
}

/// Owns a budget state and applies actions to it in order
#[derive(Debug, Clone, Default)]
pub struct BudgetStore {
    state: BudgetState,
}

impl BudgetStore {
    pub fn new(state: BudgetState) -> Self {
        Self { state }
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "Dispatching budget action");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn into_state(self) -> BudgetState {
        self.state
    }
}
