use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
};

use crate::models::{Client, Expense, Income, IncomeLink};
use crate::report::{Dashboard, Period};
use crate::tax::TaxRate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Income,
    Expenses,
    Clients,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Income, Tab::Expenses, Tab::Clients];

    fn title(&self) -> &'static str {
        match self {
            Tab::Income => "Income",
            Tab::Expenses => "Expenses",
            Tab::Clients => "Clients",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

// Represents the state of the dashboard screen
pub struct DashboardState {
    period: Period,
    rate: TaxRate,
    summary: Dashboard,
    incomes: Vec<Income>,
    expenses: Vec<Expense>,
    clients: Vec<Client>,
    tab: Tab,
    table_state: TableState,
}

impl DashboardState {
    pub fn new(
        period: Period,
        rate: TaxRate,
        incomes: Vec<Income>,
        expenses: Vec<Expense>,
        clients: Vec<Client>,
    ) -> Result<Self> {
        let summary = Dashboard::build(&incomes, &expenses, rate)?;
        let mut state = Self {
            period,
            rate,
            summary,
            incomes,
            expenses,
            clients,
            tab: Tab::Income,
            table_state: TableState::default(),
        };
        state.reset_selection();

        Ok(state)
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn summary(&self) -> &Dashboard {
        &self.summary
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    fn row_count(&self) -> usize {
        match self.tab {
            Tab::Income => self.incomes.len(),
            Tab::Expenses => self.expenses.len(),
            Tab::Clients => self.clients.len(),
        }
    }

    fn reset_selection(&mut self) {
        let selected = if self.row_count() == 0 { None } else { Some(0) };
        self.table_state.select(selected);
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }
}

pub enum DashboardAction {
    Exit,
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    let size = frame.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let titles = Tab::ALL
        .iter()
        .map(|t| Spans::from(Span::raw(t.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("Akowe").borders(Borders::ALL))
        .select(state.tab.index())
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, chunks[0]);

    let summary = &state.summary;
    let totals = Paragraph::new(vec![
        Spans::from(format!(
            "Income ${:.2}   Expenses ${:.2}   Net ${:.2}",
            summary.income_total, summary.expense_total, summary.net
        )),
        Spans::from(format!(
            "Tax collected at {}: ${:.2}",
            state.rate, summary.tax_collected
        )),
    ])
    .block(
        Block::default()
            .title(format!("{} to {}", state.period.start, state.period.end))
            .borders(Borders::ALL),
    );
    frame.render_widget(totals, chunks[1]);

    let (header, rows, widths) = table_contents(state);
    let table = Table::new(rows)
        .header(
            Row::new(header)
                .style(Style::default().fg(Color::Yellow))
                .bottom_margin(1),
        )
        .block(Block::default().title(state.tab.title()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .widths(&widths);
    frame.render_stateful_widget(table, chunks[2], &mut state.table_state);

    let buttons = Paragraph::new("<Tab>/<←→> Switch | <↑↓> Move | <Esc> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));
    frame.render_widget(buttons, chunks[3]);
}

fn table_contents(state: &DashboardState) -> (Vec<&'static str>, Vec<Row<'static>>, Vec<Constraint>) {
    match state.tab {
        Tab::Income => (
            vec!["Date", "Amount", "Invoice", "Details"],
            state
                .incomes
                .iter()
                .map(|income| {
                    let invoice = match (income.link(), &income.invoice) {
                        (IncomeLink::Linked { invoice_id: Some(id), .. }, _) => format!("#{}", id),
                        (_, Some(text)) => text.clone(),
                        _ => String::new(),
                    };
                    Row::new(vec![
                        Cell::from(income.date.to_string()),
                        Cell::from(format!("${:.2}", income.amount)),
                        Cell::from(invoice),
                        Cell::from(income.details.clone().unwrap_or_default()),
                    ])
                })
                .collect(),
            vec![
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        ),
        Tab::Expenses => (
            vec!["Date", "Amount", "Category", "Title", "Receipt"],
            state
                .expenses
                .iter()
                .map(|expense| {
                    Row::new(vec![
                        Cell::from(expense.date.to_string()),
                        Cell::from(format!("${:.2}", expense.amount)),
                        Cell::from(expense.category.clone()),
                        Cell::from(expense.title.clone()),
                        Cell::from(if expense.receipt().is_some() { "yes" } else { "" }),
                    ])
                })
                .collect(),
            vec![
                Constraint::Length(12),
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Min(10),
                Constraint::Length(8),
            ],
        ),
        Tab::Clients => (
            vec!["Name", "Contact", "Email"],
            state
                .clients
                .iter()
                .map(|client| {
                    Row::new(vec![
                        Cell::from(client.name.clone()),
                        Cell::from(client.contact_person.clone().unwrap_or_default()),
                        Cell::from(client.email.clone().unwrap_or_default()),
                    ])
                })
                .collect(),
            vec![
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ],
        ),
    }
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(DashboardAction::Exit)),
            KeyCode::Tab | KeyCode::Right => state.switch_tab(state.tab.next()),
            KeyCode::BackTab | KeyCode::Left => state.switch_tab(state.tab.previous()),
            KeyCode::Down => state.next(),
            KeyCode::Up => state.previous(),
            _ => {}
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn income(id: i32) -> Income {
        Income {
            id,
            date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            amount: Decimal::new(11300, 2),
            details: None,
            invoice: None,
            client_id: None,
            project_id: None,
            invoice_id: None,
        }
    }

    fn state(incomes: Vec<Income>) -> DashboardState {
        DashboardState::new(
            Period::year(2024).unwrap(),
            TaxRate::HST_ONTARIO,
            incomes,
            vec![],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn selection_wraps() {
        let mut state = state(vec![income(1), income(2)]);
        assert_eq!(state.selected(), Some(0));
        state.next();
        assert_eq!(state.selected(), Some(1));
        state.next();
        assert_eq!(state.selected(), Some(0));
        state.previous();
        assert_eq!(state.selected(), Some(1));
    }

    #[test]
    fn empty_tab_has_no_selection() {
        let mut state = state(vec![income(1)]);
        state.switch_tab(Tab::Expenses);
        assert_eq!(state.selected(), None);
        state.next();
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(Tab::Income.next(), Tab::Expenses);
        assert_eq!(Tab::Clients.next(), Tab::Income);
        assert_eq!(Tab::Income.previous(), Tab::Clients);
    }

    #[test]
    fn summary_uses_rate() {
        let state = state(vec![income(1)]);
        assert_eq!(state.summary().tax_collected, Decimal::new(1300, 2));
    }
}
