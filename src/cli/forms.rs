//! Modal input forms. Each form is a list of labelled line editors; turning
//! the text into a request happens in [`Form::parse`] so the rules can be
//! tested without a terminal.

use crossterm::event::{KeyCode, KeyEvent};
use rust_decimal::Decimal;

use crate::cli::input::LineEdit;
use crate::cli::util::{blank_to_none, parse_date, parse_money};
use crate::database::models::{
    NewBadHabit, NewBudgetCategory, NewInvestment, NewSavingsGoal, NewTransaction, SummaryPatch, TransactionType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    SignIn,
    SignUp,
    Transaction,
    Investment,
    Goal,
    Contribution,
    BudgetCategory,
    Habit,
    Balance,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::SignIn => "Sign in",
            Self::SignUp => "Create account",
            Self::Transaction => "New transaction",
            Self::Investment => "New investment",
            Self::Goal => "New savings goal",
            Self::Contribution => "Add to goal",
            Self::BudgetCategory => "New budget category",
            Self::Habit => "New bad habit",
            Self::Balance => "Update balance",
        }
    }

    fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::SignIn => &["Email", "Password"],
            Self::SignUp => &["Email", "Password", "Full name"],
            Self::Transaction => &["Type (income/expense)", "Amount", "Category", "Date", "Description"],
            Self::Investment => &["Name", "Amount", "Type (stocks/crypto/realestate/bonds/other)", "Description"],
            Self::Goal => &["Name", "Target amount", "Saved so far", "Deadline", "Description"],
            Self::Contribution => &["Amount"],
            Self::BudgetCategory => &["Name", "Monthly limit"],
            Self::Habit => &["Title", "Cost per occurrence", "Description"],
            Self::Balance => &["Current balance", "Monthly income"],
        }
    }
}

/// What a submitted form asks for.
#[derive(Debug, Clone)]
pub enum Submission {
    SignIn { email: String, password: String },
    SignUp { email: String, password: String, full_name: Option<String> },
    Transaction(NewTransaction),
    Investment(NewInvestment),
    Goal(NewSavingsGoal),
    Contribution(Decimal),
    BudgetCategory(NewBudgetCategory),
    Habit(NewBadHabit),
    Balance(SummaryPatch),
}

pub enum FormAction {
    None,
    Cancel,
    Submit,
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub inputs: Vec<LineEdit>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        let inputs = kind
            .fields()
            .iter()
            .map(|label| {
                if *label == "Password" {
                    LineEdit::masked()
                } else {
                    LineEdit::default()
                }
            })
            .collect();
        let mut form = Self {
            kind,
            inputs,
            focus: 0,
            error: None,
        };
        if kind == FormKind::Transaction {
            form.inputs[0].set("expense");
        }
        form
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.kind.fields()
    }

    pub fn with_values(mut self, values: &[&str]) -> Self {
        for (input, value) in self.inputs.iter_mut().zip(values) {
            input.set(*value);
        }
        self
    }

    fn value(&self, i: usize) -> &str {
        self.inputs.get(i).map_or("", |e| e.value.as_str())
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        let n = self.inputs.len();
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % n,
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + n - 1) % n,
            KeyCode::Left => self.inputs[self.focus].left(),
            KeyCode::Right => self.inputs[self.focus].right(),
            KeyCode::Backspace => self.inputs[self.focus].backspace(),
            KeyCode::Delete => self.inputs[self.focus].delete(),
            KeyCode::Char(c) => self.inputs[self.focus].push(c),
            _ => {}
        }
        FormAction::None
    }

    fn money(&self, i: usize) -> Result<Decimal, String> {
        parse_money(self.value(i)).ok_or_else(|| format!("{} must be a number", self.labels()[i]))
    }

    fn optional_money(&self, i: usize) -> Result<Option<Decimal>, String> {
        if self.value(i).trim().is_empty() {
            Ok(None)
        } else {
            self.money(i).map(Some)
        }
    }

    fn required(&self, i: usize) -> Result<String, String> {
        blank_to_none(self.value(i)).ok_or_else(|| format!("{} is required", self.labels()[i]))
    }

    /// Turns the text fields into a request. Rules the store enforces anyway
    /// (negative amounts, goal bounds) are left to the store.
    pub fn parse(&self) -> Result<Submission, String> {
        let submission = match self.kind {
            FormKind::SignIn => Submission::SignIn {
                email: self.required(0)?,
                password: self.value(1).to_string(),
            },
            FormKind::SignUp => Submission::SignUp {
                email: self.required(0)?,
                password: self.value(1).to_string(),
                full_name: blank_to_none(self.value(2)),
            },
            FormKind::Transaction => Submission::Transaction(NewTransaction {
                kind: self.value(0).trim().to_ascii_lowercase().parse::<TransactionType>()?,
                amount: self.money(1)?,
                category: self.required(2)?,
                date: parse_date(self.value(3)).ok_or("Date must be YYYY-MM-DD")?,
                description: blank_to_none(self.value(4)),
            }),
            FormKind::Investment => Submission::Investment(NewInvestment {
                name: self.required(0)?,
                amount: self.money(1)?,
                kind: self.value(2).parse()?,
                description: blank_to_none(self.value(3)),
            }),
            FormKind::Goal => Submission::Goal(NewSavingsGoal {
                name: self.required(0)?,
                target_amount: self.money(1)?,
                current_amount: self.optional_money(2)?,
                deadline: match blank_to_none(self.value(3)) {
                    Some(d) => Some(parse_date(&d).ok_or("Deadline must be YYYY-MM-DD")?),
                    None => None,
                },
                description: blank_to_none(self.value(4)),
            }),
            FormKind::Contribution => Submission::Contribution(self.money(0)?),
            FormKind::BudgetCategory => Submission::BudgetCategory(NewBudgetCategory {
                name: self.required(0)?,
                monthly_limit: self.money(1)?,
            }),
            FormKind::Habit => Submission::Habit(NewBadHabit {
                title: self.required(0)?,
                cost_per_occurrence: self.money(1)?,
                description: blank_to_none(self.value(2)),
            }),
            FormKind::Balance => Submission::Balance(SummaryPatch {
                current_balance: self.optional_money(0)?,
                monthly_income: self.optional_money(1)?,
            }),
        };
        Ok(submission)
    }
}
