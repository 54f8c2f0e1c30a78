use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, CardHitbox, InputMode};
use crate::types::VideoCard;

const PLACEHOLDER: &str = "Search videos...";
const WATCH_LABEL: &str = "▶ Watch Now";

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    app.tick_spinner();

    let show_debug = app.debug_visible() && !app.debug_log().is_empty();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(1));                    // header
    constraints.push(Constraint::Length(3));                    // search box
    constraints.push(Constraint::Min(0));                       // cards
    if show_debug { constraints.push(Constraint::Length(5)); }  // debug
    constraints.push(Constraint::Length(2));                    // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app); idx += 1;
    search_box(f, chunks[idx], app); idx += 1;
    cards(f, chunks[idx], app); idx += 1;
    if show_debug {
        debug_panel(f, chunks[idx], app); idx += 1;
    }
    footer(f, chunks[idx], app);

    // Overlays render last
    match app.input_mode() {
        InputMode::History => draw_history_overlay(f, app),
        InputMode::BlockedDialog => draw_blocked_dialog(f, app),
        _ => {}
    }
}

// ===============================
// Header / search box
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "🎥 Video Search",
        Style::default().fg(app.theme().header).add_modifier(Modifier::BOLD),
    )];
    if app.in_flight() {
        spans.push(Span::styled(
            format!("  {} searching…", app.spinner_char()),
            Style::default().fg(app.theme().text_dim),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn search_box(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.input_mode() == InputMode::Editing;
    let query = app.query();

    let border_color = if focused { app.theme().focus_border } else { app.theme().unfocused_border };
    let (shown, cursor_col) = visible_input(query, area.width.saturating_sub(2));
    let (text, style) = if query.is_empty() {
        (PLACEHOLDER, Style::default().fg(app.theme().text_dim))
    } else {
        (shown, Style::default().fg(app.theme().text))
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default()
            .title(" Search ")
            .title(Line::from(" Enter: Search Videos ").right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)));
    f.render_widget(paragraph, area);

    if focused && area.width > 2 {
        f.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
    }
}

/// The tail of `query` that fits in `width` columns with one column left
/// for the cursor, plus its display width.
fn visible_input(query: &str, width: u16) -> (&str, u16) {
    let avail = (width as usize).saturating_sub(1);
    let mut shown = query.width();
    let mut start = 0;
    for c in query.chars() {
        if shown <= avail {
            break;
        }
        shown -= c.width().unwrap_or(0);
        start += c.len_utf8();
    }
    (&query[start..], shown as u16)
}

// ===============================
// Result cards
// ===============================

/// Rows a card occupies: borders, optional thumbnail row, title, watch action
pub fn card_height(video: &VideoCard) -> u16 {
    if video.thumbnail.is_some() { 5 } else { 4 }
}

fn cards(f: &mut Frame, area: Rect, app: &mut App) {
    if app.videos().is_empty() {
        let hint = if app.in_flight() { "Searching…" } else { "Type a query and press Enter" };
        let p = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme().text_dim));
        f.render_widget(p, Rect { y: area.y + area.height / 2, height: 1, ..area });
        app.set_card_hitboxes(Vec::new());
        return;
    }

    let heights: Vec<u16> = app.videos().iter().map(card_height).collect();
    app.ensure_visible(&heights, area.height);

    let browsing = app.input_mode() == InputMode::Browse;
    let mut hitboxes = Vec::new();
    let mut y = area.y;
    let bottom = area.y + area.height;

    for index in app.scroll()..app.videos().len() {
        let h = heights[index];
        if y + h > bottom {
            break;
        }
        let rect = Rect { x: area.x, y, width: area.width, height: h };
        let selected = browsing && index == app.selected();
        hitboxes.push(render_card(f, rect, app, &app.videos()[index], index, selected));
        y += h;
    }

    app.set_card_hitboxes(hitboxes);
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    app: &App,
    video: &VideoCard,
    index: usize,
    selected: bool,
) -> CardHitbox {
    let theme = app.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
        .border_style(Style::default().fg(if selected { theme.focus_border } else { theme.unfocused_border }))
        .style(if selected { Style::default().bg(theme.background_focused) } else { Style::default() });
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut row = inner.y;
    let mut thumbnail = None;

    if let Some(url) = &video.thumbnail {
        let r = Rect { x: inner.x, y: row, width: inner.width, height: 1 };
        let line = Line::from(vec![
            Span::raw("🖼  "),
            Span::styled(url.as_str(), Style::default().fg(theme.text_dim).add_modifier(Modifier::UNDERLINED)),
        ]);
        f.render_widget(Paragraph::new(line), r);
        thumbnail = Some(r);
        row += 1;
    }

    let title = Rect { x: inner.x, y: row, width: inner.width, height: 1 };
    f.render_widget(
        Paragraph::new(video.title.as_str())
            .style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        title,
    );
    row += 1;

    let label_width = (WATCH_LABEL.chars().count() as u16 + 2).min(inner.width);
    let watch = Rect { x: inner.x, y: row, width: label_width, height: 1 };
    f.render_widget(
        Paragraph::new(format!(" {WATCH_LABEL} "))
            .style(Style::default().fg(theme.link).add_modifier(Modifier::BOLD | Modifier::REVERSED)),
        watch,
    );

    CardHitbox { index, thumbnail, watch }
}

// ===============================
// Footer / Debug
// ===============================
fn footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(app.theme().focus_border));
    let mut spans: Vec<Span> = Vec::with_capacity(24);

    match app.input_mode() {
        InputMode::Editing => {
            spans.extend([key("Enter"), Span::raw(" search │ "), key("Esc"), Span::raw(" results │ ")]);
        }
        InputMode::Browse => {
            spans.extend([
                key("↑/↓"), Span::raw(" select │ "),
                key("Enter/w"), Span::raw(" watch │ "),
                key("t"), Span::raw(" thumbnail │ "),
                key("y"), Span::raw(" copy link │ "),
                key("/"), Span::raw(" edit │ "),
            ]);
        }
        InputMode::History | InputMode::BlockedDialog => {}
    }
    spans.extend([
        key("Ctrl+H"), Span::raw(" history │ "),
        key("Ctrl+D"), Span::raw(" debug │ "),
        key("Ctrl+T"), Span::raw(" mouse │ "),
        key("Ctrl+C"), Span::raw(" quit"),
    ]);

    if app.debug_visible() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled("[DEBUG]", Style::default().fg(app.theme().debug_indicator)));
    }
    if let Some((toast, is_error)) = app.toast_message() {
        let color = if is_error { app.theme().toast_error } else { app.theme().toast_success };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(toast, Style::default().fg(color).add_modifier(Modifier::BOLD)));
    }

    let w = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).border_type(BorderType::Plain));
    f.render_widget(w, area);
}

fn debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let log = app.debug_log();
    let lines_to_show = (area.height.saturating_sub(2)) as usize;
    let start = log.len().saturating_sub(lines_to_show);
    let lines: Vec<Line> = log[start..].iter().map(|msg| Line::from(Span::raw(msg.as_str()))).collect();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(app.theme().text_dim))
        .block(Block::default()
            .title(" Debug ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme().text_dim)));

    f.render_widget(paragraph, area);
}

// ===============================
// Overlays
// ===============================
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn draw_history_overlay(f: &mut Frame, app: &App) {
    let entries = app.history_entries();
    let area = f.area();
    let overlay = centered(area, (area.width * 7) / 10, (entries.len() as u16 + 4).max(6));

    f.render_widget(Clear, overlay);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|e| ListItem::new(e.term.as_str()))
        .collect();

    let mut st = ListState::default();
    if !entries.is_empty() {
        st.select(Some(app.history_selection().min(entries.len() - 1)));
    }

    let title = if entries.is_empty() { " Recent Searches (none yet) " } else { " Recent Searches " };
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default()
            .title(title)
            .title_bottom(Line::from(" Enter: search again • Esc: close ").right_aligned())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(app.theme().focus_border))
            .style(Style::default().bg(app.theme().background)));
    f.render_stateful_widget(list, overlay, &mut st);
}

fn draw_blocked_dialog(f: &mut Frame, app: &App) {
    let area = f.area();
    let overlay = centered(area, ((area.width * 5) / 10).max(44), 6);

    f.render_widget(Clear, overlay);

    let block = Block::default()
        .title(Span::styled(" Blocked Search ", Style::default().add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme().toast_error))
        .style(Style::default().bg(app.theme().background));

    let text = vec![
        Line::from("This search contains a blocked keyword."),
        Line::from(""),
        Line::from(Span::styled("[ OK ]", Style::default().fg(app.theme().focus_border))),
    ];
    let p = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(app.theme().text))
        .block(block);

    f.render_widget(p, overlay);
}
