//! Raw SQL, one submodule per table. Every function that touches user data
//! takes the owner id and filters on it.

pub mod budget_categories;
pub mod habits;
pub mod investments;
pub mod savings_goals;
pub mod sessions;
pub mod summaries;
pub mod transactions;
pub mod users;
