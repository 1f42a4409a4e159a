//! TUI rendering for the salon finder.
//!
//! Draws a tab bar, the active view (nearby branch, suburb picker or text
//! search), the saved selection and a key-help footer.

use crate::app::{App, NearbyState, ViewMode, WHATSAPP_INQUIRY_URL};
use crate::models::Salon;
use crate::search::unique_suburbs;
use ratatui::{prelude::*, widgets::*};

/// Renders one frame of the TUI based on current application state.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.size());

    render_tabs(f, app, chunks[0]);

    match app.view_mode {
        ViewMode::Nearby => render_nearby_view(f, app, chunks[1]),
        ViewMode::Suburbs => render_suburbs_view(f, app, chunks[1]),
        ViewMode::Search => render_search_view(f, app, chunks[1]),
    }

    render_saved_selection(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let selected = match app.view_mode {
        ViewMode::Nearby => 0,
        ViewMode::Suburbs => 1,
        ViewMode::Search => 2,
    };
    let tabs = Tabs::new(vec![" 1 Nearby ", " 2 Suburbs ", " 3 Search "])
        .select(selected)
        .block(
            Block::default()
                .title(" The Salon Edit: find your branch ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

/// Nearby view: where the user appears to be and the closest branch.
fn render_nearby_view(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match &app.nearby {
        NearbyState::Resolving => {
            let spinner = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            lines.push(Line::from(Span::styled(
                format!(" {} Finding your location...", spinner[app.tick_count % spinner.len()]),
                Style::default().fg(Color::DarkGray),
            )));
        }
        NearbyState::Unresolved => {
            lines.extend(not_found_lines("We couldn't work out where you are."));
        }
        NearbyState::Resolved { location, nearest } => {
            lines.push(label_line("You appear to be in: ", location.label(), Color::Magenta));
            lines.push(Line::from(""));
            match nearest {
                Some(hit) => {
                    lines.push(Line::from(Span::styled(
                        "NEAREST LOCATION FOUND",
                        Style::default().fg(Color::DarkGray),
                    )));
                    lines.extend(salon_lines(&hit.candidate, Some(hit.distance_km)));
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "Enter to save this branch for checkout",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                None => lines.extend(not_found_lines("No nearby location found.")),
            }
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Nearest Branch ")
            .borders(Borders::ALL)
            .padding(Padding::new(2, 2, 1, 1)),
    );
    f.render_widget(p, area);
}

/// Suburbs view: picker list (35%) + outcome of the last pick (65%).
fn render_suburbs_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let items: Vec<ListItem> = app
        .suburbs
        .iter()
        .map(|s| ListItem::new(format!(" {}, {}", s.name, s.state)))
        .collect();
    let mut state = ListState::default().with_selected(Some(app.suburb_index));
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Select Suburb/City ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .bg(Color::Rgb(30, 30, 60))
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, chunks[0], &mut state);

    let lines = match &app.suburb_outcome {
        None => vec![Line::from(Span::styled(
            "Pick a suburb and press Enter to find your nearest location.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(outcome) => match &outcome.nearest {
            Some(hit) => {
                let mut lines = vec![Line::from(Span::styled(
                    "NEAREST LOCATION FOUND",
                    Style::default().fg(Color::DarkGray),
                ))];
                lines.extend(salon_lines(&hit.candidate, Some(hit.distance_km)));
                lines.push(Line::from(""));
                lines.push(if outcome.saved {
                    Line::from(Span::styled(
                        "✓ Location saved for checkout",
                        Style::default().fg(Color::Green),
                    ))
                } else {
                    Line::from(Span::styled(
                        app.status_message
                            .clone()
                            .unwrap_or_else(|| "Selection not saved".to_string()),
                        Style::default().fg(Color::Yellow),
                    ))
                });
                lines
            }
            None => not_found_lines(&format!(
                "We don't currently have a branch in {}.",
                outcome.suburb.name
            )),
        },
    };

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(
                " Within {:.0} km ",
                app.config.search.suburb_radius_km
            ))
            .borders(Borders::ALL)
            .padding(Padding::new(2, 2, 1, 1)),
    );
    f.render_widget(p, chunks[1]);
}

/// Search view: query box on top, matching branches below.
fn render_search_view(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let cursor = if app.tick_count % 6 < 3 { "▏" } else { " " };
    let input = Paragraph::new(format!(" {}{}", app.search_query, cursor)).block(
        Block::default()
            .title(" Search by suburb, address or name ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(input, chunks[0]);

    let results = app.search_results();
    if app.search_query.trim().is_empty() {
        let served = unique_suburbs(&app.salons);
        let lines = vec![
            Line::from(" Start typing to search available locations."),
            Line::from(""),
            Line::from(format!(" Suburbs with a branch: {}", served.join(", "))),
        ];
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
        return;
    }
    if results.is_empty() {
        let p = Paragraph::new(not_found_lines("No locations found in that area."))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).padding(Padding::new(2, 2, 1, 1)));
        f.render_widget(p, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {}", s.display_name())),
                Span::styled(
                    format!(" │ {}", s.display_address()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    let mut state = ListState::default().with_selected(Some(app.search_index));
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Found {} location(s) ", results.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn render_saved_selection(f: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.saved {
        Some(saved) => {
            let mut lines = salon_lines(&saved.salon, saved.distance_km);
            let when = saved.saved_at.format("%Y-%m-%d %H:%M UTC").to_string();
            let via = saved
                .suburb
                .as_ref()
                .map(|s| format!("picked from {}, ", s.name))
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("{}saved {}  (c to clear)", via, when),
                Style::default().fg(Color::DarkGray),
            )));
            lines
        }
        None => vec![Line::from(Span::styled(
            "No branch selected yet.",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let border = if app.saved.is_some() { Color::Green } else { Color::DarkGray };
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(" Selected Location ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.view_mode {
        ViewMode::Search => " type to search   ↑/↓ move   Enter select   Tab suburbs   Esc back",
        _ => " 1/2/3 views   ↑/↓ move   Enter select   c clear   q quit",
    };
    let mut spans = vec![Span::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(ref msg) = app.status_message {
        spans.push(Span::styled(
            format!("   {}", msg),
            Style::default().fg(Color::Yellow),
        ));
    }
    if !app.dataset_available {
        spans.push(Span::styled(
            "   branch list unavailable",
            Style::default().fg(Color::Red),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn salon_lines(salon: &Salon, distance_km: Option<u32>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        salon.display_name(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let mut address = format!("📍 {}", salon.display_address());
    if let Some(km) = distance_km {
        address.push_str(&format!("  ({} km away)", km));
    }
    lines.push(Line::from(address));
    if let Some(phone) = salon.phone() {
        lines.push(Line::from(format!("📞 {}", phone)));
    }
    lines
}

fn not_found_lines(headline: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            headline.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(
            "Check with our staff in nearby locations via WhatsApp for at-home service availability:",
        ),
        Line::from(Span::styled(
            WHATSAPP_INQUIRY_URL,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ]
}

fn label_line(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(value, Style::default().fg(color)),
    ])
}
