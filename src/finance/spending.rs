use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{category_key, percentage, total, Month};
use crate::database::models::{Transaction, TransactionType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub month: Month,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Share of expense spending per category, largest first. Categories are
/// grouped case-insensitively and keep the spelling seen first.
pub fn breakdown(transactions: &[Transaction], month: Option<Month>) -> Vec<CategoryShare> {
    let mut groups: HashMap<String, (String, Decimal)> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.is_expense() && month.map_or(true, |m| m.contains(t.date)))
    {
        let entry = groups
            .entry(category_key(&t.category))
            .or_insert_with(|| (t.category.trim().to_string(), Decimal::ZERO));
        entry.1 = entry.1.saturating_add(t.amount);
    }

    let grand_total = total(groups.values().map(|(_, sum)| *sum));
    let mut shares: Vec<CategoryShare> = groups
        .into_values()
        .map(|(category, total)| CategoryShare {
            category,
            total,
            percentage: percentage(total, grand_total),
        })
        .collect();
    shares.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    shares
}

/// Income, expenses and net per calendar month, oldest first.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<Month, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let (income, expenses) = months.entry(Month::of(t.date)).or_default();
        match t.kind {
            TransactionType::Income => *income = income.saturating_add(t.amount),
            TransactionType::Expense => *expenses = expenses.saturating_add(t.amount),
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlyTotals {
            month,
            income,
            expenses,
            net: income.saturating_sub(expenses),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::fixtures::{d, date, expense, income};

    #[test]
    fn breakdown_groups_and_sorts() {
        let transactions = vec![
            expense("350", "Housing", date(2024, 1, 1)),
            expense("100", "food", date(2024, 1, 2)),
            expense("100", "Food", date(2024, 1, 5)),
            expense("50", "transport", date(2024, 1, 6)),
            income("3000", "salary", date(2024, 1, 1)),
        ];

        let shares = breakdown(&transactions, None);
        let names: Vec<&str> = shares.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["Housing", "food", "transport"]);
        assert_eq!(shares[0].percentage, 58);
        assert_eq!(shares[1].total, d("200"));
        assert_eq!(shares[1].percentage, 33);
        assert_eq!(shares[2].percentage, 8);
    }

    #[test]
    fn breakdown_respects_month_and_handles_empty() {
        let transactions = vec![
            expense("10", "food", date(2024, 1, 31)),
            expense("30", "food", date(2024, 2, 1)),
        ];
        let feb = breakdown(&transactions, Some(Month::new(2024, 2).unwrap()));
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].total, d("30"));
        assert_eq!(feb[0].percentage, 100);

        assert!(breakdown(&[], None).is_empty());
        assert!(breakdown(&transactions, Some(Month::new(2023, 2).unwrap())).is_empty());
    }

    #[test]
    fn ties_sort_by_name() {
        let transactions = vec![
            expense("5", "b", date(2024, 1, 1)),
            expense("5", "a", date(2024, 1, 1)),
        ];
        let names: Vec<String> = breakdown(&transactions, None).into_iter().map(|s| s.category).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn monthly_totals_are_chronological() {
        let transactions = vec![
            expense("40", "food", date(2024, 3, 2)),
            income("1000", "salary", date(2024, 2, 28)),
            expense("250.5", "rent", date(2024, 2, 1)),
            income("20", "refund", date(2024, 3, 9)),
        ];

        let totals = monthly_totals(&transactions);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].month.to_string(), "2024-02");
        assert_eq!(totals[0].net, d("749.5"));
        assert_eq!(totals[1].income, d("20"));
        assert_eq!(totals[1].expenses, d("40"));
        assert_eq!(totals[1].net, d("-20"));
    }
}
