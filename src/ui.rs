use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use secards::present::{self, Segment, StyleTable};
use secards::{normalize_amount, Card, Catalog, ComposedView, LookupError, ViewState};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Amount,
}

pub struct App {
    pub catalog: Catalog,
    pub view_state: ViewState,
    pub state: TableState,
    pub show_detail: bool,
    pub input_mode: InputMode,
    /// Typed but not yet applied FD amount (applied on Enter)
    pub pending_amount: String,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut state = TableState::default();
        if !catalog.is_empty() {
            state.select(Some(0));
        }

        Self {
            catalog,
            view_state: ViewState::default(),
            state,
            show_detail: false,
            input_mode: InputMode::Normal,
            pending_amount: String::new(),
        }
    }

    /// Recomposed on every call; the catalog is small
    pub fn visible(&self) -> ComposedView<'_> {
        self.catalog.compose(&self.view_state)
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.state.selected().and_then(|i| self.visible().get(i))
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    fn set_view_state(&mut self, next: ViewState) {
        self.view_state = next;

        // Reset selection to first item
        if self.visible().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn toggle_mode(&mut self) {
        let next = self.view_state.toggled();
        self.set_view_state(next);
    }

    pub fn push_search(&mut self, c: char) {
        let mut search = self.view_state.search.clone();
        search.push(c);
        let next = self.view_state.with_search(&search);
        self.set_view_state(next);
    }

    pub fn pop_search(&mut self) {
        let mut search = self.view_state.search.clone();
        search.pop();
        let next = self.view_state.with_search(&search);
        self.set_view_state(next);
    }

    pub fn push_amount_digit(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.pending_amount.push(c);
        }
    }

    pub fn apply_amount(&mut self) {
        let amount = normalize_amount(&self.pending_amount);
        let next = self.view_state.with_amount(amount);
        self.set_view_state(next);
    }

    pub fn clear_filters(&mut self) {
        self.pending_amount.clear();
        self.set_view_state(ViewState::default());
    }

    pub fn next(&mut self) {
        let len = self.visible().len();
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
        let len = self.visible().len();
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

    pub fn first(&mut self) {
        if !self.visible().is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    /// Handle one key press; returns false when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.pop_search(),
                KeyCode::Char(c) => self.push_search(c),
                _ => {}
            },
            InputMode::Amount => match key.code {
                KeyCode::Enter => {
                    self.apply_amount();
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => {
                    self.pending_amount.pop();
                }
                KeyCode::Char(c) => self.push_amount_digit(c),
                _ => {}
            },
            InputMode::Normal => match key.code {
                KeyCode::Esc if self.show_detail => self.show_detail = false,
                KeyCode::Char('q') | KeyCode::Esc => return false,
                KeyCode::Enter => self.toggle_detail(),
                KeyCode::Char('/') => self.input_mode = InputMode::Search,
                KeyCode::Char('f') => self.input_mode = InputMode::Amount,
                KeyCode::Char('m') => self.toggle_mode(),
                KeyCode::Char('c') => self.clear_filters(),
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.previous(),
                KeyCode::Home => self.first(),
                KeyCode::End => self.last(),
                _ => {}
            },
        }
        true
    }
}

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

    ui_outcome(res)
}

/// Loop errors surface only after the terminal has been restored
fn ui_outcome(res: io::Result<()>) -> Result<()> {
    if let Err(err) = &res {
        tracing::error!("terminal UI failed: {err:?}");
    }
    res.context("terminal UI failed")
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with filter state
            Constraint::Min(0),    // Card list
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(55), // Card list
                Constraint::Percentage(45), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let editing = Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED);

    let amount_text = match app.input_mode {
        InputMode::Amount => format!("{}_", app.pending_amount),
        _ if app.view_state.amount > 0 => present::format_inr(app.view_state.amount),
        _ => "any".to_string(),
    };

    let search_text = match app.input_mode {
        InputMode::Search => format!("{}_", app.view_state.search),
        _ if app.view_state.search.is_empty() => "-".to_string(),
        _ => app.view_state.search.clone(),
    };

    let spans = vec![
        Span::styled("SeCards", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        Span::raw("  |  "),
        Span::styled("Mode: ", key_style),
        Span::raw(app.view_state.mode.label()),
        Span::raw("  |  "),
        Span::styled("FD: ", key_style),
        Span::styled(
            amount_text,
            if app.input_mode == InputMode::Amount { editing } else { Style::default() },
        ),
        Span::raw("  |  "),
        Span::styled("Search: ", key_style),
        Span::styled(
            search_text,
            if app.input_mode == InputMode::Search { editing } else { Style::default() },
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("{}/{} cards", app.visible().len(), app.catalog.len()),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let visible = app.catalog.compose(&app.view_state);

    if visible.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No cards found matching your criteria",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(" Cards "));
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Bank", "Card", "Min. FD", "Joining Fee", "Credit Limit", "Network"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = visible.iter().map(|card| {
        let cells = vec![
            Cell::from(truncate(&present::issuer_line(card), 24))
                .style(Style::default().fg(bank_color(card))),
            Cell::from(truncate(&card.card_name, 28)),
            Cell::from(present::format_inr(card.min_fd)),
            Cell::from(present::fee_label(card.joining_fee)).style(fee_style(card.joining_fee)),
            Cell::from(format!("{}%", card.credit_limit)).style(credit_style(card.credit_limit)),
            Cell::from(card.network.join(", ")),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(30),
            Constraint::Length(12),
            Constraint::Length(13),
            Constraint::Length(13),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Cards (lowest FD first) "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.visible().len();
    let key = Style::default().fg(Color::Yellow);

    let mut status_spans = vec![Span::styled(
        format!(" Card: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    match app.input_mode {
        InputMode::Search => {
            status_spans.push(Span::raw(" | Typing search, "));
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" done"));
        }
        InputMode::Amount => {
            status_spans.push(Span::raw(" | Typing FD amount, "));
            status_spans.push(Span::styled("Enter", key));
            status_spans.push(Span::raw(" apply | "));
            status_spans.push(Span::styled("Esc", key));
            status_spans.push(Span::raw(" cancel"));
        }
        InputMode::Normal => {
            if app.view_state.is_filtering() {
                status_spans.push(Span::raw(" | "));
                status_spans.push(Span::styled("c", key));
                status_spans.push(Span::raw(" clear"));
            }
            for (k, label) in [
                ("Enter", " Details"),
                ("/", " Search"),
                ("f", " FD amount"),
                ("m", " Min/Max"),
                ("↑/↓", " Nav"),
            ] {
                status_spans.push(Span::raw(" | "));
                status_spans.push(Span::styled(k, key));
                status_spans.push(Span::raw(label));
            }
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let id = match app.selected_card() {
        Some(card) => card.id.clone(),
        None => {
            let no_selection = Paragraph::new("No card selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Card Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let detail = match app.catalog.detail(&id) {
        Ok(detail) => detail,
        Err(LookupError::NotFound { id }) => {
            tracing::warn!(%id, "selected card vanished from catalog");
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let good = Style::default().fg(Color::Green);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", detail.issuer_line),
            Style::default().fg(bank_color(detail.card)),
        )),
        Line::from(Span::styled(
            format!("  {}", detail.card.card_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("  Min. FD: ", label), Span::raw(detail.min_fd_label.clone())]),
        Line::from(vec![
            Span::styled("  Joining Fee: ", label),
            Span::styled(detail.joining_fee_label.clone(), fee_style(detail.card.joining_fee)),
        ]),
        Line::from(vec![
            Span::styled("  Annual Fee: ", label),
            Span::styled(detail.annual_fee_label.clone(), fee_style(detail.card.annual_fee)),
        ]),
        Line::from(vec![
            Span::styled("  Credit Limit: ", label),
            Span::styled(
                detail.credit_limit_label.clone(),
                if detail.credit_limit_emphasized { good } else { Style::default() },
            ),
        ]),
        Line::from(vec![Span::styled("  Network: ", label), Span::raw(detail.network_label.clone())]),
        Line::from(""),
        Line::from(Span::styled("  BEST FOR YOU IF", section)),
    ];
    content.extend(detail.best_for_you.iter().map(|segments| bullet(segments)));

    content.push(Line::from(""));
    content.push(Line::from(Span::styled("  HIGHLIGHTS", section)));
    content.extend(detail.highlights.iter().map(|segments| bullet(segments)));

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("  Website: ", label),
        Span::styled(detail.card.website_url.clone(), Style::default().fg(Color::Blue)),
    ]));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "  Press Enter or Esc to close",
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    )));

    let detail_panel = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent_color(detail.accent)))
                .title(" Card Details "),
        );

    f.render_widget(detail_panel, area);
}

fn bullet(segments: &[Segment]) -> Line<'static> {
    let mut spans = vec![Span::raw("  • ")];
    spans.extend(segments.iter().map(|s| {
        if s.emphasized {
            Span::styled(s.text.clone(), Style::default().add_modifier(Modifier::BOLD))
        } else {
            Span::raw(s.text.clone())
        }
    }));
    Line::from(spans)
}

fn fee_style(fee: u64) -> Style {
    if fee == 0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

fn credit_style(percent: u8) -> Style {
    if present::is_generous_credit_limit(percent) {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

fn bank_color(card: &Card) -> Color {
    StyleTable::bank_logo_colors()
        .resolve_bank(&card.bank_name)
        .parse()
        .unwrap_or(Color::White)
}

/// Terminal colour for the first half of an accent token ("purple-pink")
fn accent_color(token: &str) -> Color {
    match token.split('-').next().unwrap_or_default() {
        "purple" | "violet" => Color::Magenta,
        "pink" | "rose" | "fuchsia" => Color::LightMagenta,
        "blue" | "indigo" => Color::Blue,
        "sky" => Color::LightBlue,
        "emerald" | "teal" => Color::Green,
        "red" => Color::Red,
        "amber" | "yellow" | "orange" => Color::Yellow,
        _ => Color::Gray,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::new(Catalog::new(vec![
            Card::new("a", "Alpha Bank", "Alpha", 5000).with_network(&["VISA"]),
            Card::new("b", "Beta Bank", "Beta", 2000).with_network(&["RuPay"]),
            Card::new("c", "Gamma Bank", "Gamma", 10000).with_network(&["VISA"]),
        ]))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_initial_selection_is_lowest_fd() {
        let app = app();
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_search_updates_as_you_type() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "visa");
        assert_eq!(app.input_mode, InputMode::Search);
        assert_eq!(app.visible().len(), 2);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.view_state.search, "visa");
    }

    #[test]
    fn test_amount_applies_on_enter_only() {
        let mut app = app();
        press(&mut app, KeyCode::Char('f'));
        type_str(&mut app, "6x000");
        assert_eq!(app.pending_amount, "6000");
        assert_eq!(app.visible().len(), 3);

        press(&mut app, KeyCode::Enter);
        let ids: Vec<&str> = app.visible().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        press(&mut app, KeyCode::Char('m'));
        let ids: Vec<&str> = app.visible().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c"]);
    }

    #[test]
    fn test_empty_view_clears_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "nothing");
        assert!(app.visible().is_empty());
        assert!(app.selected_card().is_none());

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.visible().len(), 3);
        assert!(app.selected_card().is_some());
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("c"));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_card().map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_esc_closes_detail_before_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail);
        assert!(press(&mut app, KeyCode::Esc));
        assert!(!app.show_detail);
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_home_and_end_on_empty_view_select_nothing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "nothing");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.state.selected(), None);
        press(&mut app, KeyCode::End);
        assert_eq!(app.state.selected(), None);

        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_loop_error_is_reported() {
        assert!(ui_outcome(Ok(())).is_ok());

        let err = ui_outcome(Err(io::Error::new(io::ErrorKind::BrokenPipe, "tty gone"))).unwrap_err();
        assert_eq!(err.to_string(), "terminal UI failed");
        assert!(format!("{err:#}").contains("tty gone"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("₹₹₹₹₹₹₹₹", 6), "₹₹₹...");
    }
}
