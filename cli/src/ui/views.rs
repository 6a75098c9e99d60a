use super::app::{App, Focus, SplitBillForm, View};
use crate::ledger::split::Payer;
use crate::ledger::{format_amount, BalanceStatus, Friend};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

const NAME_WIDTH: usize = 14;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_main(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::all()
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let num = format!("[{}] ", i + 1);
            let style = if *v == app.current_view {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(num, Style::default().fg(Color::DarkGray)),
                Span::styled(v.title(), style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(" Eat 'n Split "))
        .highlight_style(Style::default().fg(Color::Yellow))
        .select(View::all().iter().position(|v| *v == app.current_view).unwrap_or(0));

    f.render_widget(tabs, area);
}

fn draw_main(f: &mut Frame, app: &mut App, area: Rect) {
    match app.current_view {
        View::Friends => draw_friends_view(f, app, area),
        View::History => draw_history(f, app, area),
    }
}

fn draw_friends_view(f: &mut Frame, app: &mut App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(if app.show_add_friend { 8 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(columns[0]);

    draw_friend_list(f, app, sidebar[0]);
    if app.show_add_friend {
        draw_add_friend(f, app, sidebar[1]);
    }

    let label = if app.show_add_friend { "close" } else { "Add friend" };
    let button = Paragraph::new(Line::from(vec![
        Span::styled(" a ", Style::default().fg(Color::Cyan)),
        Span::styled(format!("[{}]", label), Style::default().fg(Color::White)),
    ]));
    f.render_widget(button, sidebar[2]);

    draw_split_bill(f, app, columns[1]);
}

/// Pads or truncates to `width` terminal columns.
fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(&" ".repeat(width - used));
    out
}

fn friend_item<'a>(friend: &'a Friend, selected: bool, currency: &str) -> ListItem<'a> {
    let marker = if selected { "● " } else { "  " };
    let button = if selected { "[close]" } else { "[Select]" };

    let status = friend.status();
    let status_color = match status {
        BalanceStatus::Even => Color::White,
        BalanceStatus::YouOwe(_) => Color::Red,
        BalanceStatus::OwesYou(_) => Color::Green,
    };

    let header = Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Yellow)),
        Span::styled(
            fit_width(&friend.name, NAME_WIDTH),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(button, Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(friend.image.as_str(), Style::default().fg(Color::DarkGray)),
    ]);
    let detail = Line::from(vec![
        Span::raw("  "),
        Span::styled(status.describe(&friend.name, currency), Style::default().fg(status_color)),
    ]);

    ListItem::new(vec![header, detail])
}

fn draw_friend_list(f: &mut Frame, app: &mut App, area: Rect) {
    let total = app.ledger.len();
    let items: Vec<ListItem> = if app.ledger.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  No friends yet. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.ledger
            .friends()
            .iter()
            .map(|friend| friend_item(friend, app.ledger.is_selected(&friend.id), &app.currency))
            .collect()
    };

    let position = app.friend_state.selected().map(|i| i + 1).unwrap_or(0);
    let border = if app.focus == Focus::List { Color::Yellow } else { Color::DarkGray };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" Friends ({}/{}) ", position, total)),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("▶ ");

    f.render_stateful_widget(list, area, &mut app.friend_state);
}

/// One labelled input line, styled like a form field.
fn field_line<'a>(label: &str, value: &str, hint: &str, is_selected: bool, editable: bool) -> Paragraph<'a> {
    let (label_style, input_style, border_color) = if is_selected {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            Color::Yellow,
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(if editable { Color::Gray } else { Color::DarkGray }),
            Color::DarkGray,
        )
    };

    let cursor = if is_selected && editable { "█" } else { "" };
    let display_value = if value.is_empty() && !is_selected {
        format!("({})", hint)
    } else {
        format!("{}{}", value, cursor)
    };

    let indicator = if is_selected { "▶ " } else { "  " };
    Paragraph::new(Line::from(vec![
        Span::styled(indicator, label_style),
        Span::styled(format!("{}: ", label), label_style),
        Span::styled(display_value, input_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(border_color)),
    )
}

fn draw_add_friend(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::AddFriend;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
        .title(" Add friend ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let form = &app.add_form;
    let fields = [
        ("Friend name", &form.name, "required"),
        ("Image URL", &form.image, "required"),
    ];
    for (i, (label, value, hint)) in fields.iter().enumerate() {
        let selected = focused && form.selected_field == i;
        f.render_widget(field_line(label, value, hint, selected, true), chunks[i]);
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::styled(" Add  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::styled(" Close", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(hint, chunks[2]);
}

fn draw_split_bill(f: &mut Frame, app: &App, area: Rect) {
    let Some(friend) = app.ledger.selected() else {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            "Select a friend to split a bill.",
            Style::default().fg(Color::DarkGray),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        f.render_widget(placeholder, area);
        return;
    };

    let focused = app.focus == Focus::SplitBill;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
        .title(format!(" Split a bill with {} ", friend.name));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Bill value
            Constraint::Length(2), // Your expense
            Constraint::Length(2), // Friend's expense
            Constraint::Length(2), // Who is paying
            Constraint::Length(1), // Submit hint
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let form = &app.split_form;
    let on = |field: usize| focused && form.selected_field == field;
    let friend_expense = form.friend_expense().map(format_amount).unwrap_or_default();
    let payer = match form.payer {
        Payer::User => "You".to_string(),
        Payer::Friend => friend.name.clone(),
    };
    let payer_display = if on(SplitBillForm::PAYER_FIELD) {
        format!("‹ {} ›", payer)
    } else {
        payer
    };

    f.render_widget(field_line("Bill value", &form.bill_value, "amount", on(0), true), chunks[0]);
    f.render_widget(field_line("Your expense", &form.paid_by_user, "amount", on(1), true), chunks[1]);
    f.render_widget(
        field_line(&format!("{}'s expense", friend.name), &friend_expense, "derived", false, false),
        chunks[2],
    );
    f.render_widget(
        field_line(
            "Who is paying the bill?",
            &payer_display,
            "",
            on(SplitBillForm::PAYER_FIELD),
            false,
        ),
        chunks[3],
    );

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Cyan)),
        Span::styled(" Fields  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Green)),
        Span::styled(" Split bill  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Red)),
        Span::styled(" Close", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(hint, chunks[4]);
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let total = app.history.len();

    let items: Vec<ListItem> = if app.history.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "  Nothing yet. Split a bill or add a friend.",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.history
            .iter()
            .rev()
            .enumerate()
            .map(|(i, h)| {
                let num = format!("{:>3}. ", total - i);
                ListItem::new(Line::from(vec![
                    Span::styled(num, Style::default().fg(Color::DarkGray)),
                    Span::styled(h.as_str(), Style::default().fg(Color::White)),
                ]))
            })
            .collect()
    };

    let title = format!(" Session History ({} total) ", total);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(title),
    );

    f.render_widget(list, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = match (app.current_view, app.focus) {
        (View::History, _) => " ←/→:Tabs  q:Quit ".to_string(),
        (View::Friends, Focus::List) => {
            let back = if app.ledger.selected().is_some() { "s:Split  " } else { "" };
            format!(" ↑/↓:Move  Enter:Select  a:Add friend  {}←/→:Tabs  q:Quit ", back)
        }
        (View::Friends, Focus::AddFriend) => " Tab:Next field  Enter:Add  Esc:Close ".to_string(),
        (View::Friends, Focus::SplitBill) => {
            " Tab:Next field  ←/→:Payer  Enter:Split  Esc:Close ".to_string()
        }
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let help = match app.status_message {
        Some(ref msg) if app.focus == Focus::List => Paragraph::new(Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
        ])),
        _ => Paragraph::new(Line::from(Span::styled(help_text, Style::default().fg(Color::Cyan)))),
    }
    .block(Block::default().borders(Borders::ALL).title(" Keys "));

    let net = app.ledger.net_balance();
    let net_text = format!(
        "{}{}{}",
        if net < 0.0 { "-" } else { "" },
        app.currency,
        format_amount(net.abs())
    );
    let info = format!(" {} friends | net {} ", app.ledger.len(), net_text);
    let info_widget = Paragraph::new(Line::from(Span::styled(info, Style::default().fg(Color::DarkGray))))
        .block(Block::default().borders(Borders::ALL).title(" Info "));

    f.render_widget(help, chunks[0]);
    f.render_widget(info_widget, chunks[1]);
}
