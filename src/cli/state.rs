use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::TableState;

use crate::cli::api::{Client, Snapshot};
use crate::cli::forms::{Form, FormAction, FormKind, Submission};
use crate::cli::util::today;
use crate::error::AppResult;
use crate::finance::Month;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Transactions,
    Budget,
    Goals,
    Investments,
    Habits,
    Help,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Dashboard,
        Tab::Transactions,
        Tab::Budget,
        Tab::Goals,
        Tab::Investments,
        Tab::Habits,
        Tab::Help,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Transactions => "Transactions",
            Tab::Budget => "Budget",
            Tab::Goals => "Goals",
            Tab::Investments => "Investments",
            Tab::Habits => "Habits",
            Tab::Help => "Help",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn step(&self, delta: isize) -> Tab {
        let n = Tab::ALL.len() as isize;
        Tab::ALL[(self.index() as isize + delta).rem_euclid(n) as usize]
    }

    fn add_form(&self) -> Option<FormKind> {
        match self {
            Tab::Transactions => Some(FormKind::Transaction),
            Tab::Budget => Some(FormKind::BudgetCategory),
            Tab::Goals => Some(FormKind::Goal),
            Tab::Investments => Some(FormKind::Investment),
            Tab::Habits => Some(FormKind::Habit),
            Tab::Dashboard | Tab::Help => None,
        }
    }
}

pub struct App {
    pub api: Client,
    pub tab: Tab,
    pub month: Month,
    pub status: String,
    pub quit: bool,
    pub data: Option<Snapshot>,
    /// Row selection for the current tab; reset when the tab changes.
    pub selection: TableState,
    pub form: Option<Form>,
}

impl App {
    pub fn new(api: Client) -> Self {
        Self {
            api,
            tab: Tab::Dashboard,
            month: Month::current(),
            status: "Sign in to continue | Esc quits | F2 switches to sign-up".into(),
            quit: false,
            data: None,
            selection: TableState::default(),
            form: Some(Form::new(FormKind::SignIn)),
        }
    }

    pub fn signed_in(&self) -> bool {
        self.api.user().is_some()
    }

    pub async fn refresh(&mut self) -> AppResult<()> {
        if !self.signed_in() {
            return Ok(());
        }
        let snapshot = self.api.snapshot(self.month, today()).await?;
        self.data = Some(snapshot);
        self.clamp_selection();
        Ok(())
    }

    /// Called once per tick: refetches when the change feed reports writes.
    pub async fn tick(&mut self) {
        if self.api.poll_changes() {
            if let Err(e) = self.refresh().await {
                self.status = format!("Refresh failed: {e}");
            }
        }
    }

    pub fn rows_in_tab(&self) -> usize {
        let Some(data) = &self.data else { return 0 };
        match self.tab {
            Tab::Transactions => data.transactions.len(),
            Tab::Budget => data.categories.len(),
            Tab::Goals => data.goals.len(),
            Tab::Investments => data.investments.len(),
            Tab::Habits => data.habits.len(),
            Tab::Dashboard | Tab::Help => 0,
        }
    }

    fn clamp_selection(&mut self) {
        let n = self.rows_in_tab();
        match (n, self.selection.selected()) {
            (0, _) => self.selection.select(None),
            (n, Some(i)) if i >= n => self.selection.select(Some(n - 1)),
            (_, None) => self.selection.select(Some(0)),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let n = self.rows_in_tab();
        if n == 0 {
            self.selection.select(None);
            return;
        }
        let cur = self.selection.selected().unwrap_or(0) as isize;
        self.selection.select(Some((cur + delta).rem_euclid(n as isize) as usize));
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.selection = TableState::default();
        self.clamp_selection();
    }

    async fn set_month(&mut self, month: Month) {
        self.month = month;
        if let Err(e) = self.refresh().await {
            self.status = format!("Refresh failed: {e}");
        }
    }

    pub async fn handle_key(&mut self, k: KeyEvent) -> anyhow::Result<()> {
        if k.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.form.is_some() {
            self.handle_form_key(k).await;
            return Ok(());
        }

        match k.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('?') => self.switch_tab(Tab::Help),
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.step(1)),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.step(-1)),
            KeyCode::Char(c @ '1'..='7') => {
                let i = c as usize - '1' as usize;
                self.switch_tab(Tab::ALL[i]);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('[') => self.set_month(self.month.previous()).await,
            KeyCode::Char(']') => self.set_month(self.month.next()).await,
            KeyCode::Char('r') => match self.refresh().await {
                Ok(()) => self.status = "Refreshed.".into(),
                Err(e) => self.status = format!("Refresh failed: {e}"),
            },
            KeyCode::Char('a') => {
                if let Some(kind) = self.tab.add_form() {
                    self.form = Some(Form::new(kind));
                }
            }
            KeyCode::Char('b') if self.tab == Tab::Dashboard => self.open_balance_form(),
            KeyCode::Char('c') if self.tab == Tab::Goals && self.selection.selected().is_some() => {
                self.form = Some(Form::new(FormKind::Contribution));
            }
            KeyCode::Char('y') if self.tab == Tab::Habits => self.track_selected(true).await,
            KeyCode::Char('n') if self.tab == Tab::Habits => self.track_selected(false).await,
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected().await,
            KeyCode::Char('o') => {
                if let Err(e) = self.api.sign_out().await {
                    tracing::warn!(error = %e, "sign-out failed");
                }
                self.data = None;
                self.form = Some(Form::new(FormKind::SignIn));
                self.status = "Signed out.".into();
            }
            _ => {}
        }
        Ok(())
    }

    fn open_balance_form(&mut self) {
        let form = match &self.data {
            Some(data) => {
                let s = &data.dashboard.summary;
                Form::new(FormKind::Balance)
                    .with_values(&[s.current_balance.to_string().as_str(), s.monthly_income.to_string().as_str()])
            }
            None => Form::new(FormKind::Balance),
        };
        self.form = Some(form);
    }

    async fn handle_form_key(&mut self, k: KeyEvent) {
        let Some(form) = self.form.as_mut() else { return };

        if k.code == KeyCode::F(2) && matches!(form.kind, FormKind::SignIn | FormKind::SignUp) {
            let next = if form.kind == FormKind::SignIn {
                FormKind::SignUp
            } else {
                FormKind::SignIn
            };
            self.form = Some(Form::new(next));
            return;
        }

        match form.handle_key(k) {
            FormAction::None => {}
            FormAction::Cancel => {
                if matches!(form.kind, FormKind::SignIn | FormKind::SignUp) {
                    self.quit = true;
                } else {
                    self.form = None;
                }
            }
            FormAction::Submit => match form.parse() {
                Ok(submission) => self.submit(submission).await,
                Err(msg) => form.error = Some(msg),
            },
        }
    }

    async fn submit(&mut self, submission: Submission) {
        let result = match submission {
            Submission::SignIn { email, password } => self.api.sign_in(&email, &password).await,
            Submission::SignUp {
                email,
                password,
                full_name,
            } => self.api.sign_up(&email, &password, full_name.as_deref()).await,
            Submission::Transaction(new) => self.api.add_transaction(new).await,
            Submission::Investment(new) => self.api.add_investment(new).await,
            Submission::Goal(new) => self.api.add_goal(new).await,
            Submission::Contribution(amount) => match self.selected_goal() {
                Some(goal) => self.api.contribute_to_goal(&goal, amount).await,
                None => Ok(()),
            },
            Submission::BudgetCategory(new) => self.api.add_budget_category(new).await,
            Submission::Habit(new) => self.api.add_habit(new).await,
            Submission::Balance(patch) => self.api.update_summary(patch).await,
        };

        match result {
            Ok(()) => {
                self.form = None;
                self.status = "Saved.".into();
                if let Err(e) = self.refresh().await {
                    self.status = format!("Refresh failed: {e}");
                }
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
        }
    }

    fn selected_goal(&self) -> Option<crate::database::models::SavingsGoal> {
        let i = self.selection.selected()?;
        self.data.as_ref()?.goals.get(i).cloned()
    }

    async fn track_selected(&mut self, avoided: bool) {
        let Some(id) = self
            .selection
            .selected()
            .and_then(|i| self.data.as_ref()?.habits.get(i))
            .map(|row| row.habit.id)
        else {
            return;
        };
        self.status = match self.api.track_habit(id, today(), avoided).await {
            Ok(()) if avoided => "Nice, tracked as avoided today.".into(),
            Ok(()) => "Tracked as slipped today.".into(),
            Err(e) => format!("Tracking failed: {e}"),
        };
    }

    async fn delete_selected(&mut self) {
        let (Some(i), Some(data)) = (self.selection.selected(), self.data.as_ref()) else {
            return;
        };
        let result = match self.tab {
            Tab::Transactions => match data.transactions.get(i) {
                Some(t) => self.api.delete_transaction(t.id).await,
                None => return,
            },
            Tab::Budget => match data.categories.get(i) {
                Some(c) => self.api.delete_budget_category(c.id).await,
                None => return,
            },
            Tab::Goals => match data.goals.get(i) {
                Some(g) => self.api.delete_goal(g.id).await,
                None => return,
            },
            Tab::Investments => match data.investments.get(i) {
                Some(inv) => self.api.delete_investment(inv.id).await,
                None => return,
            },
            Tab::Habits => match data.habits.get(i) {
                Some(h) => self.api.delete_habit(h.habit.id).await,
                None => return,
            },
            Tab::Dashboard | Tab::Help => return,
        };
        self.status = match result {
            Ok(()) => "Deleted.".into(),
            Err(e) => format!("Delete failed: {e}"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_wrap_around() {
        assert_eq!(Tab::Dashboard.step(-1), Tab::Help);
        assert_eq!(Tab::Help.step(1), Tab::Dashboard);
        assert_eq!(Tab::Budget.index(), 2);
    }

    #[test]
    fn only_data_tabs_have_add_forms() {
        assert_eq!(Tab::Goals.add_form(), Some(FormKind::Goal));
        assert_eq!(Tab::Dashboard.add_form(), None);
        assert_eq!(Tab::Help.add_form(), None);
    }
}
