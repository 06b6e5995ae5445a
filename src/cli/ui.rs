use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::cli::api::Snapshot;
use crate::cli::forms::Form;
use crate::cli::state::{App, Tab};
use crate::cli::util::{fmt_amount, fmt_money};
use crate::finance::budget::{BudgetLevel, BudgetProgress};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();

    if !app.signed_in() {
        draw_welcome(f, size, &app.status);
        if let Some(form) = &app.form {
            let area = center_rect(size, 60, 10);
            f.render_widget(Clear, area);
            draw_form(f, area, form);
        }
        return;
    }

    // tabs | content | status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(1)])
        .split(size);

    let titles = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(Span::raw(format!("{} {}", i + 1, t.title()))))
        .collect::<Vec<_>>();
    let user = app.api.user().map(|u| u.email.clone()).unwrap_or_default();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Finance Dashboard | {user} | {}", app.month)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));
    f.render_widget(tabs, root[0]);

    let currency = app.api.currency();
    match (&app.data, app.tab) {
        (_, Tab::Help) => draw_help(f, root[1]),
        (None, _) => f.render_widget(
            Paragraph::new("Loading… (press r to refresh)").block(Block::default().borders(Borders::ALL)),
            root[1],
        ),
        (Some(data), Tab::Dashboard) => draw_dashboard(f, root[1], data, &currency),
        (Some(data), tab) => {
            let table = data_table(tab, data, &currency);
            f.render_stateful_widget(table, root[1], &mut app.selection);
        }
    }

    f.render_widget(Paragraph::new(app.status.as_str()), root[2]);

    if let Some(form) = &app.form {
        let area = center_rect(root[1], 64, form.inputs.len() as u16 + 6);
        f.render_widget(Clear, area);
        draw_form(f, area, form);
    }
}

fn draw_welcome(f: &mut Frame, area: Rect, status: &str) {
    let p = Paragraph::new(format!("Personal Finance Dashboard\n\n{status}"))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_form(f: &mut Frame, area: Rect, form: &Form) {
    let mut lines: Vec<Line> = form
        .labels()
        .iter()
        .zip(&form.inputs)
        .enumerate()
        .map(|(i, (label, input))| {
            let style = if i == form.focus {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{label:<24}: ")),
                Span::styled(input.rendered(), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from("Tab: next field | Enter: save | Esc: cancel"));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(form.kind.title()));
    f.render_widget(p, area);
}

fn level_color(level: BudgetLevel) -> Color {
    match level {
        BudgetLevel::Healthy => Color::Green,
        BudgetLevel::Warning => Color::Yellow,
        BudgetLevel::Critical => Color::Red,
    }
}

fn budget_gauge<'a>(title: String, p: &BudgetProgress) -> Gauge<'a> {
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(level_color(p.level)))
        .percent(u16::from(p.percentage))
        .label(format!("{}% | spent {} of {}", p.percentage, fmt_money(&p.spent), fmt_money(&p.limit)))
}

// Dashboard page

fn draw_dashboard(f: &mut Frame, area: Rect, data: &Snapshot, currency: &str) {
    let d = &data.dashboard;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let balance = Paragraph::new(vec![
        Line::from(format!("Current balance   : {}", fmt_amount(&d.summary.current_balance, currency))),
        Line::from(format!("Monthly income    : {}", fmt_amount(&d.summary.monthly_income, currency))),
        Line::from(format!("Expenses (month)  : {}", fmt_amount(&d.summary.total_expenses, currency))),
        Line::from(format!("Habit savings     : {}", fmt_amount(&data.habit_savings, currency))),
        Line::from("b: update balance"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Balance"));
    f.render_widget(balance, top[0]);

    let mut portfolio = vec![Line::from(format!("Total: {}", fmt_amount(&d.investments.total, currency)))];
    portfolio.extend(d.investments.by_type.iter().map(|s| {
        Line::from(format!("{:<16} {:>12}  {:>3}%", s.kind.label(), fmt_money(&s.total), s.percentage))
    }));
    f.render_widget(
        Paragraph::new(portfolio).block(Block::default().borders(Borders::ALL).title("Investments")),
        top[1],
    );

    f.render_widget(budget_gauge(format!("Monthly budget {}", d.month), &d.budget), rows[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(33), Constraint::Percentage(33)])
        .split(rows[2]);

    let spending: Vec<Line> = if d.spending.is_empty() {
        vec![Line::from("No expenses this month")]
    } else {
        d.spending
            .iter()
            .map(|s| Line::from(format!("{:<14} {:>10} {:>3}%", s.category, fmt_money(&s.total), s.percentage)))
            .collect()
    };
    f.render_widget(
        Paragraph::new(spending).block(Block::default().borders(Borders::ALL).title("Spending by category")),
        bottom[0],
    );

    let goals: Vec<Line> = d
        .goals
        .iter()
        .map(|g| {
            let filled = usize::from(g.percentage) / 10;
            Line::from(format!(
                "{:<12} [{}{}] {:>3}%{}",
                g.name,
                "#".repeat(filled),
                ".".repeat(10 - filled),
                g.percentage,
                if g.achieved { " done" } else { "" }
            ))
        })
        .collect();
    f.render_widget(
        Paragraph::new(goals).block(Block::default().borders(Borders::ALL).title("Savings goals")),
        bottom[1],
    );

    let recent: Vec<Line> = d
        .recent_transactions
        .iter()
        .map(|t| Line::from(format!("{} {:<12} {:>10}", t.date, t.category, fmt_money(&t.signed_amount()))))
        .collect();
    f.render_widget(
        Paragraph::new(recent).block(Block::default().borders(Borders::ALL).title("Recent transactions")),
        bottom[2],
    );
}

// List pages

fn data_table<'a>(tab: Tab, data: &'a Snapshot, currency: &str) -> Table<'a> {
    let (title, header, widths, rows): (String, Vec<&str>, Vec<Constraint>, Vec<Row>) = match tab {
        Tab::Transactions => (
            "Transactions  (a: add, x: delete)".into(),
            vec!["Date", "Type", "Category", "Amount", "Description"],
            vec![
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(16),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
            data.transactions
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.date.to_string()),
                        Cell::from(t.kind.as_str()),
                        Cell::from(t.category.clone()),
                        Cell::from(fmt_money(&t.signed_amount())),
                        Cell::from(t.description.clone().unwrap_or_default()),
                    ])
                })
                .collect(),
        ),
        Tab::Budget => (
            format!("Budget {}  ([ ]: month, a: add, x: delete)", data.dashboard.month),
            vec!["Category", "Limit", "Spent", "Remaining", "Used"],
            vec![
                Constraint::Length(18),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Min(6),
            ],
            data.dashboard
                .categories
                .iter()
                .map(|c| {
                    let p = &c.progress;
                    Row::new(vec![
                        Cell::from(c.name.clone()),
                        Cell::from(fmt_money(&p.limit)),
                        Cell::from(fmt_money(&p.spent)),
                        Cell::from(fmt_money(&p.remaining)),
                        Cell::from(format!("{}%", p.percentage)),
                    ])
                    .style(Style::default().fg(level_color(p.level)))
                })
                .collect(),
        ),
        Tab::Goals => (
            "Savings goals  (a: add, c: contribute, x: delete)".into(),
            vec!["Goal", "Saved", "Target", "Progress", "Deadline"],
            vec![
                Constraint::Length(18),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(10),
                Constraint::Min(12),
            ],
            data.dashboard
                .goals
                .iter()
                .map(|g| {
                    let deadline = match g.days_left {
                        Some(days) if days < 0 => format!("{} days overdue", -days),
                        Some(days) => format!("{days} days left"),
                        None => "-".into(),
                    };
                    Row::new(vec![
                        Cell::from(g.name.clone()),
                        Cell::from(fmt_money(&g.current)),
                        Cell::from(fmt_money(&g.target)),
                        Cell::from(format!("{}%", g.percentage)),
                        Cell::from(deadline),
                    ])
                })
                .collect(),
        ),
        Tab::Investments => (
            format!("Investments ({currency})  (a: add, x: delete)"),
            vec!["Name", "Type", "Amount", "Description"],
            vec![
                Constraint::Length(20),
                Constraint::Length(16),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
            data.investments
                .iter()
                .map(|i| {
                    Row::new(vec![
                        Cell::from(i.name.clone()),
                        Cell::from(i.kind.label()),
                        Cell::from(fmt_money(&i.amount)),
                        Cell::from(i.description.clone().unwrap_or_default()),
                    ])
                })
                .collect(),
        ),
        Tab::Habits => (
            format!(
                "Bad habits, saved {} this month  (y: avoided today, n: slipped, a: add, x: delete)",
                fmt_amount(&data.habit_savings, currency)
            ),
            vec!["Habit", "Cost", "Streak", "Saved (month)", "Today"],
            vec![
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(14),
                Constraint::Min(8),
            ],
            data.habits
                .iter()
                .map(|h| {
                    let today = match h.today {
                        Some(true) => "avoided",
                        Some(false) => "slipped",
                        None => "-",
                    };
                    Row::new(vec![
                        Cell::from(h.habit.title.clone()),
                        Cell::from(fmt_money(&h.habit.cost_per_occurrence)),
                        Cell::from(format!("{}d", h.streak)),
                        Cell::from(fmt_money(&h.month_savings)),
                        Cell::from(today),
                    ])
                })
                .collect(),
        ),
        Tab::Dashboard | Tab::Help => (String::new(), Vec::new(), Vec::new(), Vec::new()),
    };

    Table::new(rows, widths)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = [
        "Global keys:",
        "  q          : Quit",
        "  1-7 / Tab  : Switch tab",
        "  [ / ]      : Previous / next month",
        "  r          : Refresh",
        "  o          : Sign out",
        "",
        "Lists:",
        "  Up/Down    : Select row",
        "  a          : Add",
        "  x / Del    : Delete selected row",
        "",
        "Dashboard:   b  update balance and monthly income",
        "Goals:       c  add money to the selected goal",
        "Habits:      y  avoided today | n  slipped today",
        "",
        "Forms:       Tab/Shift+Tab move between fields, Enter saves, Esc cancels",
        "Sign-in:     F2 switches between sign-in and sign-up",
        "",
        "Every tab refetches after a change is published for your account.",
    ]
    .join("\n");

    let p = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title("Help & keybindings"));
    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(rect.width),
        height: h.min(rect.height),
    }
}
