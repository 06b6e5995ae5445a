pub mod bad_habit;
pub mod budget_category;
pub mod financial_summary;
pub mod investment;
pub mod savings_goal;
pub mod transaction;
pub mod user;

pub use bad_habit::{BadHabit, BadHabitPatch, HabitStatistic, HabitTracking, NewBadHabit};
pub use budget_category::{BudgetCategory, BudgetCategoryPatch, NewBudgetCategory};
pub use financial_summary::{FinancialSummary, SummaryPatch};
pub use investment::{Investment, InvestmentPatch, InvestmentType, NewInvestment};
pub use savings_goal::{NewSavingsGoal, SavingsGoal, SavingsGoalPatch};
pub use transaction::{NewTransaction, Transaction, TransactionPatch, TransactionType};
pub use user::{ProfilePatch, User};
