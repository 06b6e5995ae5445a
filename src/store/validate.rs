//! Row checks applied before anything reaches SQL. Updates are checked on the
//! merged row, so a patch cannot sneak past a rule the insert enforces.

use rust_decimal::Decimal;

use crate::database::models::{BadHabit, BudgetCategory, FinancialSummary, Investment, SavingsGoal, Transaction};
use crate::error::{AppError, AppResult};

/// Largest magnitude accepted for any stored amount. Sums over a user's rows
/// stay far below `Decimal::MAX`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0); // 1e15

fn within_bounds(field: &str, value: Decimal) -> AppResult<()> {
    if value.abs() > MAX_AMOUNT {
        return Err(AppError::validation(format!("{field} must not exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> AppResult<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    within_bounds(field, value)
}

fn not_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

pub fn transaction(t: &Transaction) -> AppResult<()> {
    non_negative("amount", t.amount)?;
    not_blank("category", &t.category)
}

pub fn investment(i: &Investment) -> AppResult<()> {
    not_blank("name", &i.name)?;
    non_negative("amount", i.amount)
}

pub fn savings_goal(g: &SavingsGoal) -> AppResult<()> {
    not_blank("name", &g.name)?;
    if g.target_amount <= Decimal::ZERO {
        return Err(AppError::validation("target_amount must be greater than zero"));
    }
    within_bounds("target_amount", g.target_amount)?;
    non_negative("current_amount", g.current_amount)?;
    if g.current_amount > g.target_amount {
        return Err(AppError::validation("current_amount cannot exceed target_amount"));
    }
    Ok(())
}

pub fn budget_category(c: &BudgetCategory) -> AppResult<()> {
    not_blank("name", &c.name)?;
    non_negative("monthly_limit", c.monthly_limit)
}

pub fn summary(s: &FinancialSummary) -> AppResult<()> {
    within_bounds("current_balance", s.current_balance)?;
    non_negative("monthly_income", s.monthly_income)
}

pub fn bad_habit(h: &BadHabit) -> AppResult<()> {
    not_blank("title", &h.title)?;
    non_negative("cost_per_occurrence", h.cost_per_occurrence)
}

/// ISO 4217 style: three ASCII letters.
pub fn currency(code: &str) -> AppResult<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(AppError::validation(format!("currency {code:?} must be a three-letter code")))
    }
}
