use crate::analytics::{chart_data, monthly_chart_data, Summary};
use crate::config::Config;
use crate::entities::{Category, ExpenseDraft, DATE_FORMAT};
use crate::format::{format_currency, format_date, truncate};
use crate::history::{page_items, total_pages, CategoryFilter, EditForm, HistoryView};
use crate::report::{write_csv_file, write_pdf, ExpenseReport};
use crate::store::ExpenseStore;
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Analytics,
    History,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Analytics => Page::History,
            Page::History => Page::Analytics,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Analytics => "Analytics",
            Page::History => "History",
        }
    }
}

// ============================================================================
// FORM STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Description,
    Amount,
    Category,
    Date,
}

impl FormField {
    fn next(&self) -> Self {
        match self {
            FormField::Description => FormField::Amount,
            FormField::Amount => FormField::Category,
            FormField::Category => FormField::Date,
            FormField::Date => FormField::Description,
        }
    }

    fn previous(&self) -> Self {
        match self {
            FormField::Description => FormField::Date,
            FormField::Amount => FormField::Description,
            FormField::Category => FormField::Amount,
            FormField::Date => FormField::Category,
        }
    }

    fn label(&self) -> &str {
        match self {
            FormField::Description => "Description",
            FormField::Amount => "Amount",
            FormField::Category => "Category",
            FormField::Date => "Date",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub description: String,
    pub amount: String,
    pub category: Category,
    pub date: String,
    pub focus: FormField,
}

impl FormState {
    pub fn blank(today: NaiveDate) -> Self {
        let draft = ExpenseDraft::new(today);
        FormState {
            description: draft.description,
            amount: draft.amount,
            category: Category::from(draft.category),
            date: draft.date,
            focus: FormField::Description,
        }
    }

    pub fn from_edit_form(form: EditForm) -> Self {
        FormState {
            description: form.description,
            amount: form.amount,
            category: Category::from(form.category),
            date: form.date,
            focus: FormField::Description,
        }
    }

    pub fn to_draft(&self) -> ExpenseDraft {
        ExpenseDraft {
            description: self.description.clone(),
            amount: self.amount.clone(),
            category: self.category.as_str().to_string(),
            date: self.date.clone(),
        }
    }

    fn value(&self, field: FormField) -> String {
        match field {
            FormField::Description => self.description.clone(),
            FormField::Amount => self.amount.clone(),
            FormField::Category => format!("< {} >", self.category.label()),
            FormField::Date => self.date.clone(),
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Description => Some(&mut self.description),
            FormField::Amount => Some(&mut self.amount),
            FormField::Date => Some(&mut self.date),
            FormField::Category => None,
        }
    }

    fn push(&mut self, c: char) {
        match self.focus {
            FormField::Amount if !(c.is_ascii_digit() || c == '.') => {}
            FormField::Date if !(c.is_ascii_digit() || c == '-') => {}
            FormField::Category if c == ' ' => self.category = self.category.next(),
            _ => {
                if let Some(text) = self.text_mut() {
                    text.push(c);
                }
            }
        }
    }

    fn pop(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Returns true when handled as a form-editing key (not submit/cancel)
    fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Right if self.focus == FormField::Category => {
                self.category = self.category.next()
            }
            KeyCode::Left if self.focus == FormField::Category => {
                self.category = self.category.previous()
            }
            KeyCode::Backspace => self.pop(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.push(c),
            _ => return false,
        }
        true
    }
}

// ============================================================================
// APP
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    AddForm(FormState),
    Editing(FormState),
    ConfirmDelete { id: String, description: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

pub struct App {
    pub store: ExpenseStore,
    pub history: HistoryView,
    pub current_page: Page,
    pub mode: Mode,
    pub toast: Option<Toast>,
    /// Row index within the visible history page
    pub selected: usize,
    pub table_state: TableState,
    pub today: NaiveDate,
    currency_symbol: String,
    currency_code: String,
    export_dir: PathBuf,
}

impl App {
    pub fn new(store: ExpenseStore, config: &Config) -> Self {
        App {
            store,
            history: HistoryView::new(),
            current_page: Page::Analytics,
            mode: Mode::Normal,
            toast: None,
            selected: 0,
            table_state: TableState::default(),
            today: chrono::Local::now().date_naive(),
            currency_symbol: config.currency_symbol.clone(),
            currency_code: config.currency_code.clone(),
            export_dir: config.export_dir.clone(),
        }
    }

    fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            created: Instant::now(),
        });
    }

    /// Drop expired notifications
    pub fn tick(&mut self) {
        if self.toast.as_ref().is_some_and(|t| t.created.elapsed() > TOAST_TTL) {
            self.toast = None;
        }
    }

    fn money(&self, amount: f64) -> String {
        format_currency(amount, &self.currency_symbol)
    }

    // ------------------------------------------------------------------------
    // History helpers
    // ------------------------------------------------------------------------

    fn history_rows(&self) -> Vec<crate::entities::Expense> {
        self.history.rows(self.store.expenses())
    }

    fn page_rows(&self) -> Vec<crate::entities::Expense> {
        let rows = self.history_rows();
        page_items(&rows, self.history.current_page).to_vec()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.page_rows().get(self.selected).map(|e| e.id.clone())
    }

    fn clamp_selection(&mut self) {
        let count = self.history_rows().len();
        self.history.clamp(count);
        let on_page = self.page_rows().len();
        if on_page == 0 {
            self.selected = 0;
        } else if self.selected >= on_page {
            self.selected = on_page - 1;
        }
    }

    fn select_next(&mut self) {
        let len = self.page_rows().len();
        if len > 0 {
            self.selected = if self.selected + 1 >= len { 0 } else { self.selected + 1 };
        }
    }

    fn select_previous(&mut self) {
        let len = self.page_rows().len();
        if len > 0 {
            self.selected = if self.selected == 0 { len - 1 } else { self.selected - 1 };
        }
    }

    fn set_filter(&mut self, filter: CategoryFilter) {
        self.history.set_filter(filter);
        self.selected = 0;
    }

    // ------------------------------------------------------------------------
    // Key handling
    // ------------------------------------------------------------------------

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode.clone() {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::AddForm(form) => self.handle_add_form_key(form, key),
            Mode::Editing(form) => self.handle_edit_form_key(form, key),
            Mode::ConfirmDelete { id, .. } => self.handle_confirm_key(&id, key),
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab | KeyCode::BackTab => {
                self.current_page = self.current_page.next();
            }
            KeyCode::Char('a') => {
                self.mode = Mode::AddForm(FormState::blank(self.today));
            }
            KeyCode::Char('c') => self.store.clear_error(),
            _ if self.current_page == Page::History => self.handle_history_key(key),
            _ => {}
        }
        false
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Right | KeyCode::Char('l') => {
                let count = self.history_rows().len();
                self.history.next_page(count);
                self.selected = 0;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.history.previous_page();
                self.selected = 0;
            }
            KeyCode::Char('f') => self.set_filter(self.history.filter.cycle_next()),
            KeyCode::Char('F') => self.set_filter(self.history.filter.cycle_previous()),
            KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('d') => {
                if let Some(expense) = self.page_rows().get(self.selected) {
                    self.mode = Mode::ConfirmDelete {
                        id: expense.id.clone(),
                        description: expense.description.clone(),
                    };
                }
            }
            KeyCode::Char('p') => self.export_pdf(),
            KeyCode::Char('x') => self.export_csv(),
            _ => {}
        }
    }

    fn begin_edit(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.store.set_editing_expense(&id) {
            if let Some(expense) = self.store.editing() {
                let form = FormState::from_edit_form(EditForm::from_expense(expense));
                self.mode = Mode::Editing(form);
            }
        }
    }

    fn handle_add_form_key(&mut self, mut form: FormState, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => match self.store.add_expense(&form.to_draft()) {
                Ok(_) => {
                    self.mode = Mode::Normal;
                    self.clamp_selection();
                    self.notify(ToastKind::Success, "Expense added successfully");
                }
                Err(err) => self.notify(ToastKind::Error, err.to_string()),
            },
            _ => {
                if form.handle_edit_key(key) {
                    self.mode = Mode::AddForm(form);
                }
            }
        }
    }

    fn handle_edit_form_key(&mut self, mut form: FormState, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.store.cancel_edit();
                self.mode = Mode::Normal;
                self.notify(ToastKind::Info, "Edit cancelled");
            }
            KeyCode::Enter => match self.store.update_expense(&form.to_draft()) {
                Ok(_) => {
                    self.mode = Mode::Normal;
                    self.clamp_selection();
                    self.notify(ToastKind::Success, "Expense updated successfully");
                }
                Err(err) => self.notify(ToastKind::Error, err.to_string()),
            },
            _ => {
                if form.handle_edit_key(key) {
                    self.mode = Mode::Editing(form);
                }
            }
        }
    }

    fn handle_confirm_key(&mut self, id: &str, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let rows_on_page = self.page_rows().len();
                if self.store.delete_expense(id) {
                    self.history.after_delete(rows_on_page);
                    self.notify(ToastKind::Success, "Expense deleted successfully");
                }
                self.mode = Mode::Normal;
                self.clamp_selection();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.mode = Mode::Normal,
            _ => {}
        }
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    fn current_report(&self) -> ExpenseReport {
        ExpenseReport::new(self.history_rows(), &self.history.filter, self.today)
    }

    fn export_pdf(&mut self) {
        let report = self.current_report();
        if report.rows.is_empty() {
            self.notify(ToastKind::Error, "No data available for PDF");
            return;
        }
        match write_pdf(&report, &self.export_dir, &self.currency_code) {
            Ok(path) => self.notify(
                ToastKind::Success,
                format!("PDF downloaded successfully! ({})", path.display()),
            ),
            Err(err) => {
                tracing::error!(error = %format!("{:#}", err), "PDF generation error");
                self.notify(ToastKind::Error, "Failed to generate PDF");
            }
        }
    }

    fn export_csv(&mut self) {
        let report = self.current_report();
        if report.rows.is_empty() {
            self.notify(ToastKind::Error, "No data available for CSV");
            return;
        }
        match write_csv_file(&report, &self.export_dir) {
            Ok(path) => self.notify(ToastKind::Success, format!("CSV saved to {}", path.display())),
            Err(err) => {
                tracing::error!(error = %format!("{:#}", err), "CSV export error");
                self.notify(ToastKind::Error, "Failed to export CSV");
            }
        }
    }
}

// ============================================================================
// TERMINAL LOOP
// ============================================================================

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "UI loop failed");
        return Err(err.into());
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        }
        app.tick();
    }
}

// ============================================================================
// RENDERING
// ============================================================================

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Analytics => render_analytics(f, chunks[1], app),
        Page::History => render_history(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::AddForm(form) => render_form_modal(f, form, " Add New Expense "),
        Mode::ConfirmDelete { description, .. } => render_confirm(f, description),
        _ => {}
    }
}

fn category_color(category: &Category) -> Color {
    let (r, g, b) = category.rgb();
    Color::Rgb(r, g, b)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Expense Tracker ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(" │ "));

    for (i, page) in [Page::Analytics, Page::History].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title(), style));
    }

    let summary = Summary::from_expenses(app.store.expenses());
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Total: {}", app.money(summary.total)),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("{} entries", summary.count),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(header, area);
}

fn card(title: &str, value: Line<'static>, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![Line::from(""), value])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title)),
        )
}

fn render_analytics(f: &mut Frame, area: Rect, app: &App) {
    let expenses = app.store.expenses();

    if expenses.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses yet",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Add expenses to see your analytics visualization.",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("a", Style::default().fg(Color::Yellow)),
                Span::raw(" to add one"),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Analytics "));
        f.render_widget(empty, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    // Summary cards
    let summary = Summary::from_expenses(expenses);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    let total = Line::from(Span::styled(
        app.money(summary.total),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    let highest = match &summary.highest {
        Some((category, amount)) => Line::from(vec![
            Span::styled(
                app.money(*amount),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(format!("({})", category.label()), Style::default().fg(category_color(category))),
        ]),
        None => Line::from("None"),
    };
    let count = Line::from(Span::styled(
        summary.count.to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));

    f.render_widget(card("Total Expenses", total, Color::Cyan), cards[0]);
    f.render_widget(card("Highest Category", highest, Color::Magenta), cards[1]);
    f.render_widget(card("Total Entries", count, Color::Green), cards[2]);

    // Charts
    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_category_chart(f, charts[0], app);
    render_monthly_chart(f, charts[1], app);
}

fn to_cents(amount: f64) -> u64 {
    (amount.max(0.0) * 100.0).round() as u64
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let slices = chart_data(app.store.expenses());
    let bars: Vec<Bar> = slices
        .iter()
        .map(|slice| {
            let color = category_color(&slice.category);
            Bar::default()
                .value(to_cents(slice.value))
                .label(Line::from(slice.category.label().to_string()))
                .text_value(format!("{} ({:.1}%)", app.money(slice.value), slice.percentage))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Expenses by Category "))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_monthly_chart(f: &mut Frame, area: Rect, app: &App) {
    let months = monthly_chart_data(app.store.expenses());
    let bars: Vec<Bar> = months
        .iter()
        .map(|(label, total)| {
            Bar::default()
                .value(to_cents(*total))
                .label(Line::from(label.clone()))
                .text_value(format!("{:.0}", total))
                .style(Style::default().fg(Color::Indexed(99)))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Monthly Expenses "))
        .bar_width(8)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, area);
}

fn render_history(f: &mut Frame, area: Rect, app: &mut App) {
    let all_rows = app.history_rows();
    let pages = total_pages(all_rows.len());
    let page_rows = page_items(&all_rows, app.history.current_page).to_vec();

    let title = format!(
        " Expense History - {} - Page {} of {} ",
        app.history.filter.label(),
        if pages == 0 { 0 } else { app.history.current_page },
        pages
    );

    if all_rows.is_empty() {
        let hint = if app.history.filter == CategoryFilter::All {
            "Start by adding your first expense (press a)."
        } else {
            "No expenses in this category. Press f to change the filter."
        };
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses found",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Date", "Description", "Category", "Amount"].iter().map(|h| {
        Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let editing_id = app.store.editing().map(|e| e.id.clone());
    let editing_form = match &app.mode {
        Mode::Editing(form) => Some(form.clone()),
        _ => None,
    };

    let rows: Vec<Row> = page_rows
        .iter()
        .map(|expense| {
            if let (Some(id), Some(form)) = (&editing_id, &editing_form) {
                if *id == expense.id {
                    return editing_row(form);
                }
            }

            let color = category_color(&expense.category);
            Row::new(vec![
                Cell::from(format_date(expense.date)),
                Cell::from(truncate(&expense.description, 40)),
                Cell::from(expense.category.label().to_string()).style(Style::default().fg(color)),
                Cell::from(app.money(expense.amount))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    app.table_state.select(if page_rows.is_empty() { None } else { Some(app.selected) });
    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn editing_row(form: &FormState) -> Row<'static> {
    let cell = |field: FormField| {
        let style = if form.focus == field {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Cell::from(form.value(field)).style(style)
    };
    Row::new(vec![
        cell(FormField::Date),
        cell(FormField::Description),
        cell(FormField::Category),
        cell(FormField::Amount),
    ])
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some(toast) = &app.toast {
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Error => Color::Red,
            ToastKind::Info => Color::Cyan,
        };
        spans.push(Span::styled(
            format!(" {} ", toast.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" | "));
    } else if let Some(error) = app.store.error() {
        spans.push(Span::styled(
            format!(" Storage error: {} ", error),
            Style::default().fg(Color::Red),
        ));
        spans.push(Span::raw(" ("));
        spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" dismiss) | "));
    }

    let hints: &[(&str, &str)] = match (&app.mode, app.current_page) {
        (Mode::AddForm(_), _) | (Mode::Editing(_), _) => &[
            ("Tab/↑↓", " Field | "),
            ("←/→", " Category | "),
            ("Enter", " Save | "),
            ("Esc", " Cancel"),
        ],
        (Mode::ConfirmDelete { .. }, _) => &[("y", " Delete | "), ("n", " Keep")],
        (Mode::Normal, Page::History) => &[
            ("a", " Add | "),
            ("e", " Edit | "),
            ("d", " Delete | "),
            ("f", " Filter | "),
            ("←/→", " Page | "),
            ("p", " PDF | "),
            ("x", " CSV | "),
            ("Tab", " Page | "),
            ("q", " Quit"),
        ],
        (Mode::Normal, Page::Analytics) => &[("a", " Add | "), ("Tab", " History | "), ("q", " Quit")],
    };
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form_modal(f: &mut Frame, form: &FormState, title: &str) {
    let area = centered_rect(60, 12, f.size());

    let mut lines = vec![Line::from("")];
    for field in [FormField::Description, FormField::Amount, FormField::Category, FormField::Date] {
        let focused = form.focus == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let value_style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused && field != FormField::Category { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", field.label()), label_style),
            Span::styled(format!("{}{}", form.value(field), cursor), value_style),
        ]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        format!("  Date format: {}   Enter to save, Esc to cancel", DATE_FORMAT.replace('%', "")),
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title.to_string()),
    );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn render_confirm(f: &mut Frame, description: &str) {
    let area = centered_rect(56, 7, f.size());
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from("Are you sure you want to delete this expense?"),
        Line::from(Span::styled(
            truncate(description, 48),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" keep"),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Delete Expense "),
    );
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}
