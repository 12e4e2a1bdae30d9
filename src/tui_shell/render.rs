use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::app::App;
use crate::resolver::Phase;
use crate::search::search_url;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(4),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);
    draw_columns(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let resolver = app.resolver();
    let root = resolver
        .selected_root()
        .and_then(|id| resolver.root_types().iter().find(|r| r.id == id))
        .map(|r| r.label().to_string())
        .unwrap_or_else(|| "(no root type)".to_string());

    let (phase, color) = match resolver.phase() {
        Phase::Empty => ("no selection".to_string(), Color::Gray),
        Phase::Loading { level } => (format!("loading level {}", level + 1), Color::Yellow),
        Phase::Ready if resolver.is_complete() => ("complete".to_string(), Color::Green),
        Phase::Ready => ("ready".to_string(), Color::White),
        Phase::Error { level } => (format!("lookup failed at level {}", level + 1), Color::Red),
    };

    let spans = vec![
        Span::styled("Fitment", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(root, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(phase, Style::default().fg(color)),
    ];
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_columns(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let resolver = app.resolver();
    let pending = matches!(resolver.phase(), Phase::Loading { .. } | Phase::Error { .. })
        && !matches!(resolver.phase(), Phase::Error { level } if level < resolver.levels().len());
    let columns = app.column_count() + usize::from(pending);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    let selected_root = resolver.selected_root();
    let items = resolver
        .root_types()
        .iter()
        .map(|r| option_item(r.label(), Some(r.id) == selected_root))
        .collect::<Vec<_>>();
    draw_list(frame, cols[0], "Type", items, app, 0);

    for (i, level) in resolver.levels().iter().enumerate() {
        let items = level
            .sorted_values()
            .into_iter()
            .map(|v| option_item(v.label(), level.is_selected() && v.id == level.selected_id))
            .collect::<Vec<_>>();
        let title = if level.values.is_empty() {
            format!("{} (none)", level.type_name())
        } else {
            level.type_name().to_string()
        };
        draw_list(frame, cols[i + 1], &title, items, app, i + 1);
    }

    if pending {
        let (text, color) = match resolver.phase() {
            Phase::Error { .. } => ("lookup failed", Color::Red),
            _ => ("loading...", Color::Yellow),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(color)))
                .block(Block::default().borders(Borders::ALL)),
            cols[columns - 1],
        );
    }
}

fn option_item(label: &str, chosen: bool) -> ListItem<'static> {
    if chosen {
        ListItem::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::styled(
                label.to_string(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]))
    } else {
        ListItem::new(Line::from(format!("  {}", label)))
    }
}

fn draw_list(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'static>>,
    app: &App,
    column: usize,
) {
    let focused = app.focus == column;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title.to_string()),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    if focused {
        state.select(app.cursors.get(column).copied());
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let selection = app.resolver().selection();
    let mut lines = vec![Line::from(vec![
        Span::styled("search ", Style::default().fg(Color::Gray)),
        Span::raw(search_url(&selection)),
    ])];
    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(Span::styled(
        "arrows move  enter select  r root type  c clear  s search  q quit",
        Style::default().fg(Color::Gray),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        area,
    );
}
