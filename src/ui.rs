use crate::aggregator::{
    compute_kpis, compute_report, filter_finances, filter_rabbits, low_stock_items, Kpis, Period,
    Report,
};
use crate::db::Snapshot;
use crate::entities::{FinanceKind, FinanceTransaction, Rabbit, RabbitStatus, StockItem};
use crate::i18n::{translate, Locale, MessageKey};
use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Rabbits,
    Stocks,
    Finances,
    Reports,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Dashboard, Page::Rabbits, Page::Stocks, Page::Finances, Page::Reports];

    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::Rabbits,
            Page::Rabbits => Page::Stocks,
            Page::Stocks => Page::Finances,
            Page::Finances => Page::Reports,
            Page::Reports => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Reports,
            Page::Rabbits => Page::Dashboard,
            Page::Stocks => Page::Rabbits,
            Page::Finances => Page::Stocks,
            Page::Reports => Page::Finances,
        }
    }

    pub fn title(&self, locale: Locale) -> &'static str {
        let key = match self {
            Page::Dashboard => MessageKey::NavDashboard,
            Page::Rabbits => MessageKey::NavRabbits,
            Page::Stocks => MessageKey::NavStocks,
            Page::Finances => MessageKey::NavFinances,
            Page::Reports => MessageKey::NavReports,
        };
        translate(locale, key)
    }

    /// Pages that show a selectable table
    fn has_rows(&self) -> bool {
        matches!(self, Page::Rabbits | Page::Stocks | Page::Finances)
    }
}

pub struct App {
    pub rabbits: Vec<Rabbit>,
    pub stocks: Vec<StockItem>,
    pub finances: Vec<FinanceTransaction>,
    pub locale: Locale,
    pub currency: String,
    /// Fixed for the whole session so every page agrees on "this month"
    pub now: DateTime<Utc>,
    pub period: Period,
    pub current_page: Page,
    pub state: TableState,
    pub status_filter: Option<RabbitStatus>,
    pub finance_filter: Option<FinanceKind>,
    pub show_detail: bool,
}

impl App {
    pub fn new(snapshot: Snapshot, locale: Locale, currency: String, now: DateTime<Utc>) -> Self {
        Self {
            rabbits: snapshot.rabbits,
            stocks: snapshot.stocks,
            finances: snapshot.finances,
            locale,
            currency,
            now,
            period: Period::default(),
            current_page: Page::Dashboard,
            state: TableState::default(),
            status_filter: None,
            finance_filter: None,
            show_detail: false,
        }
    }

    fn t(&self, key: MessageKey) -> &'static str {
        translate(self.locale, key)
    }

    fn money(&self, amount: f64) -> String {
        format!("{:.2} {}", amount, self.currency)
    }

    pub fn kpis(&self) -> Kpis {
        compute_kpis(&self.rabbits, &self.finances, &self.stocks, self.now.date_naive())
    }

    pub fn report(&self) -> Report {
        compute_report(&self.rabbits, &self.finances, &self.stocks, self.period, self.now)
    }

    pub fn visible_rabbits(&self) -> Vec<&Rabbit> {
        filter_rabbits(&self.rabbits, "", self.status_filter)
    }

    pub fn visible_finances(&self) -> Vec<&FinanceTransaction> {
        filter_finances(&self.finances, self.finance_filter)
    }

    /// Row count of the table on the current page
    pub fn row_count(&self) -> usize {
        match self.current_page {
            Page::Rabbits => self.visible_rabbits().len(),
            Page::Stocks => self.stocks.len(),
            Page::Finances => self.visible_finances().len(),
            Page::Dashboard | Page::Reports => 0,
        }
    }

    pub fn selected_rabbit(&self) -> Option<&Rabbit> {
        if self.current_page != Page::Rabbits {
            return None;
        }
        self.state.selected().and_then(|i| self.visible_rabbits().get(i).copied())
    }

    fn reset_selection(&mut self) {
        let select = if self.current_page.has_rows() && self.row_count() > 0 {
            Some(0)
        } else {
            None
        };
        self.state.select(select);
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn toggle_locale(&mut self) {
        self.locale = match self.locale {
            Locale::Fr => Locale::En,
            Locale::En => Locale::Fr,
        };
    }

    pub fn cycle_period(&mut self) {
        self.period = self.period.next();
    }

    /// All → young → weaned → ... → sold → all
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(RabbitStatus::ALL[0]),
            Some(current) => RabbitStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| RabbitStatus::ALL.get(i + 1).copied()),
        };
        self.reset_selection();
    }

    pub fn cycle_finance_filter(&mut self) {
        self.finance_filter = match self.finance_filter {
            None => Some(FinanceKind::Sale),
            Some(FinanceKind::Sale) => Some(FinanceKind::Purchase),
            Some(FinanceKind::Purchase) => None,
        };
        self.reset_selection();
    }

    pub fn clear_filter(&mut self) {
        self.status_filter = None;
        self.finance_filter = None;
        self.reset_selection();
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.show_detail = false;
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.show_detail = false;
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => (i + PAGE_JUMP).min(len - 1),
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let i = self.state.selected().map_or(0, |i| i.saturating_sub(PAGE_JUMP));
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if self.row_count() > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.row_count();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter if app.current_page == Page::Rabbits => app.toggle_detail(),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('p') => app.cycle_period(),
                KeyCode::Char('l') => app.toggle_locale(),
                KeyCode::Char('f') if app.current_page == Page::Rabbits => app.cycle_status_filter(),
                KeyCode::Char('f') if app.current_page == Page::Finances => app.cycle_finance_filter(),
                KeyCode::Char('c') => app.clear_filter(),
                KeyCode::Char(n @ '1'..='5') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let index = n as usize - '1' as usize;
                    app.current_page = Page::ALL[index];
                    app.show_detail = false;
                    app.reset_selection();
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail && app.current_page == Page::Rabbits {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_rabbits(f, content_chunks[0], app);
        render_rabbit_detail(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Dashboard => render_dashboard(f, chunks[1], app),
            Page::Rabbits => render_rabbits(f, chunks[1], app),
            Page::Stocks => render_stocks(f, chunks[1], app),
            Page::Finances => render_finances(f, chunks[1], app),
            Page::Reports => render_report(f, chunks[1], app),
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn header_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn status_color(status: RabbitStatus) -> Color {
    match status {
        RabbitStatus::Young => Color::White,
        RabbitStatus::Weaned => Color::Cyan,
        RabbitStatus::ReadyForSale => Color::Green,
        RabbitStatus::Breeder => Color::Magenta,
        RabbitStatus::Sick => Color::Red,
        RabbitStatus::Sold => Color::DarkGray,
    }
}

fn kind_color(kind: FinanceKind) -> Color {
    match kind {
        FinanceKind::Sale => Color::Green,
        FinanceKind::Purchase => Color::Red,
    }
}

fn table_header(titles: &[&str]) -> Row<'static> {
    let cells: Vec<Cell> = titles.iter().map(|h| Cell::from(h.to_string()).style(header_style())).collect();
    Row::new(cells).style(Style::default().bg(Color::DarkGray)).height(1)
}

fn content_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        format!("🐇 {}  ", app.t(MessageKey::AppTitle)),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(format!("{} {}", i + 1, page.title(app.locale)), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.t(app.period.message_key()),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(app.locale.code().to_uppercase(), Style::default().fg(Color::White)));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn kpi_line<'a>(label: &'a str, value: String, color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<22}", label), label_style()),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let kpis = app.kpis();
    let low = low_stock_items(&app.stocks);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let profit_color = if kpis.monthly_profit >= 0.0 { Color::Green } else { Color::Red };
    let content = vec![
        Line::from(""),
        kpi_line(app.t(MessageKey::DashboardTotalRabbits), kpis.total_rabbits.to_string(), Color::White),
        kpi_line(app.t(MessageKey::DashboardReadyForSale), kpis.ready_for_sale_count.to_string(), Color::Green),
        kpi_line(app.t(MessageKey::DashboardBreeders), kpis.breeder_count.to_string(), Color::Magenta),
        Line::from(""),
        kpi_line(app.t(MessageKey::DashboardMonthlyRevenue), app.money(kpis.monthly_revenue), Color::Green),
        kpi_line(app.t(MessageKey::DashboardMonthlyExpenses), app.money(kpis.monthly_expenses), Color::Red),
        kpi_line(app.t(MessageKey::DashboardMonthlyProfit), app.money(kpis.monthly_profit), profit_color),
        Line::from(""),
        kpi_line(
            app.t(MessageKey::DashboardLowStock),
            kpis.low_stock_count.to_string(),
            if kpis.low_stock_count > 0 { Color::Yellow } else { Color::White },
        ),
    ];

    let title = format!(" {} ", app.t(MessageKey::NavDashboard));
    f.render_widget(Paragraph::new(content).block(content_block(title)), columns[0]);

    let alerts: Vec<Line> = if low.is_empty() {
        vec![Line::from(Span::styled("  ✓", Style::default().fg(Color::Green)))]
    } else {
        low.iter()
            .map(|item| {
                Line::from(vec![
                    Span::styled("  ⚠ ", Style::default().fg(Color::Yellow)),
                    Span::raw(item.name.clone()),
                    Span::styled(
                        format!("  {} {} (≤ {})", item.quantity, item.unit, item.alert_threshold),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            })
            .collect()
    };

    let title = format!(" {} ", app.t(MessageKey::DashboardAlerts));
    let panel = Paragraph::new(alerts).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );
    f.render_widget(panel, columns[1]);
}

fn render_rabbits(f: &mut Frame, area: Rect, app: &mut App) {
    let days = app.t(MessageKey::RabbitsDays);

    let rows: Vec<Row> = app
        .visible_rabbits()
        .into_iter()
        .map(|r| {
            let age = r
                .age_in_days(app.now)
                .map(|d| format!("{} {}", d, days))
                .unwrap_or_else(|| "-".to_string());
            let color = status_color(r.status);

            Row::new(vec![
                Cell::from(r.id.to_string()),
                Cell::from(truncate(&r.name, 18)),
                Cell::from(app.t(r.sex.message_key())),
                Cell::from(truncate(&r.breed, 16)),
                Cell::from(age),
                Cell::from(format!("{:.2} kg", r.current_weight)),
                Cell::from(app.t(r.status.message_key())).style(Style::default().fg(color)),
            ])
            .height(1)
        })
        .collect();

    let filter = app
        .status_filter
        .map(|s| format!(" - {}", app.t(s.message_key())))
        .unwrap_or_default();
    let title = format!(" {}{} ", app.t(MessageKey::NavRabbits), filter);

    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(20),
            Constraint::Length(9),
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(16),
        ],
    )
    .header(table_header(&["#", "Name", "Sex", "Breed", "Age", "Weight", "Status"]))
    .block(content_block(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_rabbit_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", app.t(MessageKey::NavRabbits)));

    let Some(rabbit) = app.selected_rabbit() else {
        f.render_widget(Paragraph::new("  -").block(block), area);
        return;
    };

    let parent = |id: Option<i64>| {
        id.map(|id| match app.rabbits.iter().find(|r| r.id == id) {
            Some(p) => format!("#{} {}", p.id, p.name),
            None => format!("#{} ?", id),
        })
        .unwrap_or_else(|| "-".to_string())
    };
    let offspring: Vec<String> = app
        .rabbits
        .iter()
        .filter(|r| r.is_child_of(rabbit.id))
        .map(|r| format!("#{} {}", r.id, r.name))
        .collect();

    let field = |label: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {:<10}", label), label_style()), Span::raw(value)])
    };

    let age = rabbit
        .age_in_days(app.now)
        .map(|d| format!("{} {}", d, app.t(MessageKey::RabbitsDays)))
        .unwrap_or_else(|| "-".to_string());

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  #{} {}", rabbit.id, rabbit.name), header_style())),
        Line::from(""),
        field("Sex", app.t(rabbit.sex.message_key()).to_string()),
        field("Breed", rabbit.breed.clone()),
        field("Born", rabbit.birth_date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())),
        field("Age", age),
        field("Weight", format!("{:.2} kg", rabbit.current_weight)),
        Line::from(vec![
            Span::styled(format!("  {:<10}", "Status"), label_style()),
            Span::styled(
                app.t(rabbit.status.message_key()),
                Style::default().fg(status_color(rabbit.status)),
            ),
        ]),
        Line::from(""),
        field("Mother", parent(rabbit.mother_id)),
        field("Father", parent(rabbit.father_id)),
        field("Offspring", if offspring.is_empty() { "-".to_string() } else { offspring.join(", ") }),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter: close",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_stocks(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .stocks
        .iter()
        .map(|s| {
            let quantity_style = if s.is_low_stock() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if s.is_low_stock() { "⚠" } else { "" };

            Row::new(vec![
                Cell::from(s.id.to_string()),
                Cell::from(truncate(&s.name, 22)),
                Cell::from(app.t(s.kind.message_key())),
                Cell::from(format!("{} {}", s.quantity, s.unit)).style(quantity_style),
                Cell::from(s.alert_threshold.to_string()),
                Cell::from(app.money(s.value())),
                Cell::from(marker),
            ])
            .height(1)
        })
        .collect();

    let title = format!(" {} ", app.t(MessageKey::NavStocks));
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Length(24),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Length(2),
        ],
    )
    .header(table_header(&["#", "Name", "Type", "Quantity", "Alert", "Value", ""]))
    .block(content_block(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_finances(f: &mut Frame, area: Rect, app: &mut App) {
    let rows: Vec<Row> = app
        .visible_finances()
        .into_iter()
        .map(|tx| {
            let color = kind_color(tx.kind);
            Row::new(vec![
                Cell::from(tx.date.to_string()),
                Cell::from(app.t(tx.kind.message_key())).style(Style::default().fg(color)),
                Cell::from(app.money(tx.amount)).style(Style::default().fg(color)),
                Cell::from(truncate(&tx.description, 30)),
                Cell::from(truncate(&tx.category, 18)),
            ])
            .height(1)
        })
        .collect();

    let filter = app
        .finance_filter
        .map(|k| format!(" - {}", app.t(k.message_key())))
        .unwrap_or_default();
    let title = format!(" {}{} ", app.t(MessageKey::NavFinances), filter);

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(32),
            Constraint::Length(20),
        ],
    )
    .header(table_header(&["Date", "Type", "Amount", "Description", "Category"]))
    .block(content_block(title))
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_report(f: &mut Frame, area: Rect, app: &App) {
    let report = app.report();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  {}  ({} → {})",
                app.t(report.period.message_key()),
                report.start.format("%Y-%m-%d"),
                report.end.format("%Y-%m-%d")
            ),
            header_style(),
        )),
        Line::from(""),
        kpi_line(app.t(MessageKey::FinanceSale), app.money(report.revenue), Color::Green),
        kpi_line(app.t(MessageKey::FinancePurchase), app.money(report.expenses), Color::Red),
        kpi_line(
            "=",
            app.money(report.profit),
            if report.profit >= 0.0 { Color::Green } else { Color::Red },
        ),
        Line::from(""),
        kpi_line(app.t(MessageKey::DashboardTotalRabbits), report.total_rabbits.to_string(), Color::White),
    ];

    for status in RabbitStatus::ALL {
        content.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("{:<20}", app.t(status.message_key())),
                Style::default().fg(status_color(status)),
            ),
            Span::raw(report.status_counts.get(status).to_string()),
        ]));
    }

    content.push(Line::from(""));
    content.push(kpi_line(
        app.t(MessageKey::ReportsStockValue),
        format!("{}  ({} / {} ⚠)", app.money(report.stock_value), report.stock_count, report.low_stock_count),
        Color::White,
    ));

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("  {}", app.t(MessageKey::ReportsTopExpenses)),
        label_style(),
    )));
    if report.top_expense_categories.is_empty() {
        content.push(Line::from("    -"));
    }
    for (rank, entry) in report.top_expense_categories.iter().enumerate() {
        content.push(Line::from(vec![
            Span::raw(format!("    {}. {:<20}", rank + 1, entry.category)),
            Span::styled(app.money(entry.amount), Style::default().fg(Color::Red)),
        ]));
    }

    let title = format!(" {} ", app.t(MessageKey::ReportsTitle));
    f.render_widget(Paragraph::new(content).block(content_block(title)), area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if app.current_page.has_rows() {
        let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
        status_spans.push(Span::styled(
            format!(" Row: {}/{} ", selected, app.row_count()),
            Style::default().fg(Color::Cyan),
        ));
        status_spans.push(Span::raw(" | "));
    }

    let keys: &[(&str, &str)] = match app.current_page {
        Page::Rabbits => &[("Enter", " Details | "), ("f", " Status | "), ("c", " Clear | ")],
        Page::Finances => &[("f", " Type | "), ("c", " Clear | ")],
        Page::Reports => &[("p", " Period | ")],
        Page::Dashboard | Page::Stocks => &[],
    };
    for (key, label) in keys
        .iter()
        .chain([("Tab", " Page | "), ("↑/↓", " Nav | "), ("l", " FR/EN | ")].iter())
    {
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(*label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        FinanceDraft, Rabbit, RabbitDraft, Record, Sex, StockDraft, StockType,
    };
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 18, 10, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rabbit(id: i64, name: &str, born: NaiveDate, weight: f64) -> Rabbit {
        let mut r = Rabbit::from_draft(id, now(), RabbitDraft::new(name, Sex::Female, "Rex", born, weight));
        r.refresh(now());
        r
    }

    fn app() -> App {
        let snapshot = Snapshot {
            rabbits: vec![
                rabbit(1, "Doe", date(2024, 1, 1), 4.0),
                rabbit(2, "Kit", date(2025, 6, 1), 0.4),
                rabbit(3, "Fryer", date(2025, 4, 1), 2.7),
            ],
            finances: vec![
                FinanceTransaction::from_draft(1, now(), FinanceDraft::new(FinanceKind::Sale, 60.0, "Fryer", date(2025, 6, 2), "Sales")),
                FinanceTransaction::from_draft(2, now(), FinanceDraft::new(FinanceKind::Purchase, 25.0, "Pellets", date(2025, 6, 12), "Feed")),
            ],
            stocks: vec![StockItem::from_draft(
                1,
                now(),
                StockDraft {
                    name: "Pellets".to_string(),
                    kind: StockType::Feed,
                    quantity: 1.0,
                    unit: "bag".to_string(),
                    alert_threshold: 2.0,
                    unit_price: 20.0,
                    supplier: String::new(),
                },
            )],
        };
        App::new(snapshot, Locale::En, "XOF".to_string(), now())
    }

    #[test]
    fn test_page_cycle() {
        let mut app = app();
        assert_eq!(app.current_page, Page::Dashboard);
        assert_eq!(app.state.selected(), None);

        app.next_page();
        assert_eq!(app.current_page, Page::Rabbits);
        assert_eq!(app.state.selected(), Some(0));

        app.previous_page();
        app.previous_page();
        assert_eq!(app.current_page, Page::Reports);
        assert_eq!(app.state.selected(), None);
        assert_eq!(app.current_page.title(Locale::Fr), "Rapports");
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = app();
        app.next_page();
        assert_eq!(app.row_count(), 3);

        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));

        app.page_down();
        assert_eq!(app.state.selected(), Some(2));
        app.page_up();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_on_empty_page_is_noop() {
        let mut app = app();
        app.next();
        app.page_down();
        app.last();
        assert_eq!(app.state.selected(), None);
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut app = app();
        app.next_page();

        app.cycle_status_filter();
        assert_eq!(app.status_filter, Some(RabbitStatus::Young));
        assert_eq!(app.row_count(), 1);
        assert_eq!(app.selected_rabbit().map(|r| r.name.as_str()), Some("Kit"));

        for _ in 0..RabbitStatus::ALL.len() {
            app.cycle_status_filter();
        }
        assert_eq!(app.status_filter, None);
        assert_eq!(app.row_count(), 3);
    }

    #[test]
    fn test_finance_filter_cycle_and_clear() {
        let mut app = app();
        app.current_page = Page::Finances;

        app.cycle_finance_filter();
        assert_eq!(app.finance_filter, Some(FinanceKind::Sale));
        assert_eq!(app.row_count(), 1);

        app.cycle_finance_filter();
        assert_eq!(app.visible_finances()[0].description, "Pellets");

        app.clear_filter();
        assert_eq!(app.finance_filter, None);
        assert_eq!(app.row_count(), 2);
    }

    #[test]
    fn test_kpis_and_period_cycle() {
        let mut app = app();
        let kpis = app.kpis();
        assert_eq!(kpis.total_rabbits, 3);
        assert_eq!(kpis.breeder_count, 1);
        assert_eq!(kpis.ready_for_sale_count, 1);
        assert_eq!(kpis.monthly_profit, 35.0);
        assert_eq!(kpis.low_stock_count, 1);

        assert_eq!(app.period, Period::ThisMonth);
        app.cycle_period();
        assert_eq!(app.period, Period::ThisYear);
        app.cycle_period();
        assert_eq!(app.report().revenue, 0.0);
        assert_eq!(app.report().expenses, 25.0);
    }

    #[test]
    fn test_toggle_locale_and_detail() {
        let mut app = app();
        app.toggle_locale();
        assert_eq!(app.locale, Locale::Fr);
        assert_eq!(app.t(MessageKey::NavStocks), "Stocks");

        app.current_page = Page::Stocks;
        assert!(app.selected_rabbit().is_none());
        app.toggle_detail();
        assert!(app.show_detail);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Médicament vétérinaire", 10), "Médicam...");
        assert_eq!(truncate("Rex", 10), "Rex");
    }
}
