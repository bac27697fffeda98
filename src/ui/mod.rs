use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;

use crate::app::{App, Focus, InputMode, StatusLevel};
use crate::core::{ConnectionStatus, MessageLevel, SubmissionResult};
use crate::domain::{Field, FieldKind, CHAIN_ID, OPERATIONS};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_message(f, areas.message, app);
    draw_operations(f, areas.operations, app);
    draw_form(f, areas.form, app);
    draw_result(f, areas.result, app);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn status_color(status: ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Connected => Color::LightGreen,
        ConnectionStatus::Connecting => Color::LightCyan,
        ConnectionStatus::NetworkMismatch => Color::LightYellow,
        ConnectionStatus::Disconnected => Color::DarkGray,
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "Panarchy",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Wallet", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.endpoint)),
        Span::styled("Chain", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {}", CHAIN_ID)),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let status = app.session.status;
    let mut spans = vec![Span::styled(
        status.title(),
        Style::default()
            .fg(status_color(status))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(account) = app.session.account() {
        spans.push(Span::raw("  "));
        spans.push(Span::raw(account.to_checksum(None)));
    } else if app.can_connect() {
        spans.push(Span::styled("  c", Style::default().fg(Color::LightCyan)));
        spans.push(Span::raw(" Connect"));
    }
    let right = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_message(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.session.message {
        Some(message) => {
            let color = match message.level {
                MessageLevel::Info => Color::LightCyan,
                MessageLevel::Warning => Color::LightYellow,
            };
            Line::from(Span::styled(message.text.clone(), Style::default().fg(color)))
        }
        None => Line::from(""),
    };
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn focus_styles(focused: bool) -> (Style, Style) {
    if focused {
        (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    }
}

fn draw_operations(f: &mut Frame, area: Rect, app: &App) {
    let (border_style, highlight_style) = focus_styles(app.focus == Focus::Operations);
    let connected = app.session.is_connected();

    let items: Vec<ListItem> = OPERATIONS
        .iter()
        .map(|op| {
            let selected = app.session.selected_operation.as_deref() == Some(op.name);
            let marker = if op.is_mutation() { "tx " } else { "   " };
            let style = if !connected {
                Style::default().fg(Color::DarkGray)
            } else if selected {
                Style::default().fg(Color::LightGreen)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::styled(op.name, style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Functions")
                .border_style(border_style),
        )
        .highlight_style(highlight_style)
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    state.select(Some(app.operation_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn field_value(field: &Field) -> Span<'static> {
    match &field.kind {
        FieldKind::Checkbox => Span::raw(if field.is_checked() { "[x]" } else { "[ ]" }),
        FieldKind::Select(_) => Span::raw(format!(
            "< {} >",
            field.selected_label().unwrap_or("--")
        )),
        FieldKind::Text | FieldKind::Number => {
            if field.value.is_empty() {
                Span::styled(field.placeholder.clone(), Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(field.value.clone())
            }
        }
    }
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
    let (border_style, highlight_style) = focus_styles(app.focus == Focus::Form);
    let title = match app.session.selected_operation.as_deref() {
        Some(name) => format!("Form: {}", name),
        None => "Form".to_string(),
    };

    if !app.session.submit_visible {
        let hint = if app.session.is_connected() {
            "Select a function and press Enter"
        } else {
            "Connect a wallet to use the contract"
        };
        let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(border_style),
            );
        f.render_widget(paragraph, area);
        return;
    }

    let mut items: Vec<ListItem> = app
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let editing = app.input_mode == InputMode::Editing && index == app.field_cursor;
            let mut spans = vec![
                Span::styled(
                    format!("{}: ", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                field_value(field),
            ];
            if editing {
                spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();
    items.push(ListItem::new(Line::from(Span::styled(
        "[ Submit ]",
        Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
    ))));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .highlight_style(highlight_style)
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if app.focus == Focus::Form {
        state.select(Some(app.field_cursor));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_result(f: &mut Frame, area: Rect, app: &App) {
    let Some(result) = app.session.result.as_ref() else {
        f.render_widget(Block::default().borders(Borders::ALL).title("Result"), area);
        return;
    };
    let color = match result {
        SubmissionResult::Success(_) => Color::LightGreen,
        SubmissionResult::Failure(_) => Color::LightRed,
    };
    let paragraph = Paragraph::new(Text::from(result.text().to_string()))
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title("Result"))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let focus = match app.focus {
        Focus::Operations => "Functions",
        Focus::Form => "Form",
    };
    let mode = match app.input_mode {
        InputMode::Normal => "normal",
        InputMode::Editing => "editing",
    };
    let line = Line::from(vec![
        Span::styled("Focus ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", focus)),
        Span::styled("Mode ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}  ", mode)),
        Span::styled("Functions ", Style::default().fg(Color::DarkGray)),
        Span::raw(OPERATIONS.len().to_string()),
    ]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::White)),
        area,
    );
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    let content = if let Some((text, level)) = app.status_text() {
        let color = match level {
            StatusLevel::Info => Color::LightGreen,
            StatusLevel::Warn => Color::LightYellow,
        };
        Line::from(vec![
            Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
            Span::styled(text.to_string(), Style::default().fg(color)),
        ])
    } else if app.input_mode == InputMode::Editing {
        Line::from(vec![
            Span::styled("Enter/Esc", Style::default().fg(Color::LightCyan)),
            Span::raw(" Done  "),
            Span::styled("Backspace", Style::default().fg(Color::LightCyan)),
            Span::raw(" Delete"),
        ])
    } else {
        action_hints(app)
    };
    f.render_widget(
        Paragraph::new(content).style(Style::default().fg(Color::White)),
        area,
    );
}

fn action_hints(app: &App) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::LightCyan));
    let mut spans = Vec::new();
    if app.can_connect() && !app.session.is_connected() {
        spans.extend([key("c"), Span::raw(" Connect  ")]);
    }
    spans.extend([
        key("Tab"),
        Span::raw(" Focus  "),
        key("Enter"),
        Span::raw(" Select/Edit  "),
    ]);
    if app.focus == Focus::Form {
        spans.extend([
            key("←/→"),
            Span::raw(" Option  "),
            key("Space"),
            Span::raw(" Toggle  "),
            key("s"),
            Span::raw(" Submit  "),
        ]);
    }
    spans.extend([
        key("a"),
        Span::raw(" Account  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit"),
    ]);
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Wallet"),
        Line::from("  c          Connect wallet"),
        Line::from("  a          Switch to the next wallet account"),
        Line::from("  d          Disconnect wallet"),
        Line::from(""),
        Line::from("Functions"),
        Line::from("  Tab        Cycle focus"),
        Line::from("  j / k      Move selection"),
        Line::from("  Enter      Select function / edit field / submit"),
        Line::from("  Esc        Stop editing / clear selection"),
        Line::from(""),
        Line::from("Form"),
        Line::from("  ← / →      Change option"),
        Line::from("  Space      Toggle checkbox"),
        Line::from("  s          Submit"),
        Line::from(""),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
