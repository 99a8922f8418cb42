//! UI rendering for the terminal interface.
//!
//! Two screens: the login prompt and the library list. The library
//! screen can overlay the now-playing panel, which carries the
//! cache-action menu.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{App, PlaybackState, Screen};
use crate::config::UiSettings;
use crate::cover;
use crate::player::LoopMode;

/// Render the entire UI into `frame` from the `app` model.
pub fn draw(frame: &mut Frame, app: &App, display: &[usize], ui_settings: &UiSettings) {
    match app.screen {
        Screen::Login => draw_login(frame, app),
        Screen::Library => draw_library(frame, app, display, ui_settings),
    }
}

fn draw_login(frame: &mut Frame, app: &App) {
    let area = centered_rect_sized(60, 8, frame.area());

    // Never echo the token itself.
    let masked: String = app.token_input.chars().map(|_| '*').collect();

    let mut lines = vec![
        Line::from("Paste your access token and press Enter."),
        Line::from(""),
        Line::from(format!("token: {masked}")),
    ];
    if let Some(msg) = &app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(msg.as_str()));
    }

    let prompt = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" sign in ")
                .title_alignment(Alignment::Center)
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(prompt, area);
}

fn draw_library(frame: &mut Frame, app: &App, display: &[usize], ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" attacca ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status_par = Paragraph::new(status_text(app))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    draw_track_list(frame, app, display, chunks[2]);

    // Footer
    let footer = Paragraph::new(controls_text(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    if app.now_playing_open() {
        draw_now_playing(frame, app, chunks[2]);
    }
}

fn status_text(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();

    let loop_text = match app.loop_mode {
        LoopMode::NoLoop => "PLAYBACK: No-loop",
        LoopMode::LoopAll => "PLAYBACK: Loop-around",
        LoopMode::LoopOne => "PLAYBACK: Repeat-one",
    };
    parts.push(loop_text.to_string());

    parts.push(if app.shuffle {
        "Shuffle: ON".to_string()
    } else {
        "Shuffle: OFF".to_string()
    });

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("FILTER: {q}"));
    }

    if !app.player_connected {
        parts.push("Playback service offline".to_string());
    }

    if let Some(ref h) = app.playback_handle {
        if let Ok(info) = h.lock() {
            match info.index.and_then(|i| app.tracks.get(i)) {
                Some(track) => {
                    let state = if info.playing { "Playing" } else { "Paused" };
                    let mark = if track.is_cached() { " [offline]" } else { "" };
                    let time = match track.duration {
                        Some(total) => {
                            format!("{} / {}", format_mmss(info.elapsed), format_mmss(total))
                        }
                        None => format_mmss(info.elapsed),
                    };
                    parts.push(format!("{state}: {}{mark} [{time}]", track.display));
                }
                None => parts.push("Stopped".to_string()),
            }
        }
    }

    if let Some(msg) = &app.status_message {
        parts.push(msg.clone());
    }

    parts.join(" • ")
}

fn draw_track_list(frame: &mut Frame, app: &App, display: &[usize], area: Rect) {
    // Center the selected item when possible by building only the
    // visible window of items.
    let total = display.len();
    let list_height = area.height as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = if sel_pos > half { sel_pos - half } else { 0 };
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let playing = app.playing_index();
    let visible_items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.tracks[i];
            let mut spans = vec![Span::raw(track.display.as_str())];
            if track.is_cached() {
                spans.push(Span::styled(
                    "  [offline]",
                    Style::default().fg(Color::Green),
                ));
            }
            let mut item = ListItem::new(Line::from(spans));
            if playing == Some(i) {
                item = item.style(Style::default().add_modifier(Modifier::BOLD));
            }
            item
        })
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ratatui::widgets::ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// The now-playing overlay: placeholder cover badge, track line and
/// the cache-action menu. Kept inside the list area so header, status
/// and footer stay visible under it.
fn draw_now_playing(frame: &mut Frame, app: &App, list_area: Rect) {
    let popup_area = centered_rect_sized(56, 9, list_area);
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = Vec::new();

    match app.playing_track() {
        Some(track) => {
            match cover::badge_from_audio(track) {
                Ok(badge) => {
                    let [r, g, b] = badge.color;
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("  {}  ", badge.initial),
                            Style::default()
                                .bg(Color::Rgb(r, g, b))
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::raw(track.display.as_str()),
                    ]));
                }
                Err(_) => lines.push(Line::from(track.display.as_str())),
            }

            lines.push(Line::from(""));
            if let Some(menu) = app.menu {
                if menu.cache_visible {
                    lines.push(Line::from("[c] Save for offline playback"));
                }
                if menu.remove_visible {
                    lines.push(Line::from("[c] Remove from cache"));
                }
            }
        }
        None => lines.push(Line::from("Nothing playing")),
    }

    lines.push(Line::from("[m] close"));

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" now playing ")
                .padding(Padding {
                    left: 1,
                    right: 1,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(panel, popup_area);
}

fn controls_text(app: &App) -> String {
    if app.filter_mode {
        return "[esc] clear filter | [enter] play | [backspace] erase".to_string();
    }
    "[j/k] up/down | [enter] play | [space/p] play/pause | [h/l] prev/next | [m] now playing | \
     [c] cache action | [/] filter | [s] shuffle | [r] loop mode | [Q] log out | [q] quit"
        .to_string()
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}
