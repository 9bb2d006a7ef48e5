//! Text layout for the 128×64 panel.
//!
//! Pure string work, shared by the display driver and host tests.

use heapless::Vec;

use crate::config::{DISPLAY_BODY_LINES, DISPLAY_COLUMNS};
use crate::screen::{self, ScreenState, Text};
use crate::service::Request;

/// Shown under the counts on the home screen.
pub const HOME_HINTS: [&str; 3] = ["Tap for tea", "Double tap for coffee", "Hold for undo"];

/// Wrapped body text, one slice per display line.
pub type Lines<'a> = Vec<&'a str, DISPLAY_BODY_LINES>;

/// "Doug's Drinks", "Louis' Drinks".
pub fn home_title(user: &str) -> Text {
    let mut chars = user.chars();
    let Some(first) = chars.next() else {
        return screen::text("Drinks");
    };
    let apostrophe = if user.ends_with(['s', 'S']) { "'" } else { "'s" };
    let mut title = Text::new();
    for c in first.to_uppercase() {
        let _ = title.push(c);
    }
    let rest = screen::format(format_args!("{}{} Drinks", chars.as_str(), apostrophe));
    let _ = title.push_str(&rest);
    title
}

/// "Welcome" sub-line: capitalised user name with an exclamation mark.
pub fn welcome_name(user: &str) -> Text {
    let mut chars = user.chars();
    let mut name = Text::new();
    if let Some(first) = chars.next() {
        for c in first.to_uppercase() {
            let _ = name.push(c);
        }
    }
    let _ = name.push_str(chars.as_str());
    let _ = name.push('!');
    name
}

pub fn count_lines(teas: u32, coffees: u32) -> [Text; 2] {
    [
        screen::format(format_args!("Teas drunk: {}", teas)),
        screen::format(format_args!("Coffees drunk: {}", coffees)),
    ]
}

/// "Sending tea...", "Sending undo...".
pub fn sending_label(request: Request) -> Text {
    let what = match request {
        Request::Register(drink) => drink.as_str(),
        Request::Undo => "undo",
    };
    screen::format(format_args!("Sending {}...", what))
}

/// First line drawn for screens that carry free text.
pub fn heading(state: &ScreenState) -> &'static str {
    match state {
        ScreenState::Welcome => "Welcome",
        ScreenState::Home { .. } => "",
        ScreenState::Sending { .. } => "Please wait",
        ScreenState::Result { .. } => "Done",
        ScreenState::Info { .. } => "Message",
        ScreenState::Celebration { .. } => "Celebration!",
        ScreenState::ErrorMsg { .. } => "Error",
    }
}

/// Greedy word wrap at `width` characters. Words longer than a line are
/// split; text past the last line is dropped.
pub fn wrap(text: &str, width: usize) -> Lines<'_> {
    let mut lines = Lines::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() && width > 0 {
        let (line, tail) = split_line(rest, width);
        if lines.push(line).is_err() {
            break;
        }
        rest = tail.trim_start();
    }
    lines
}

/// [`wrap`] at the panel width.
pub fn wrap_body(text: &str) -> Lines<'_> {
    wrap(text, DISPLAY_COLUMNS)
}

fn split_line(text: &str, width: usize) -> (&str, &str) {
    let limit = text
        .char_indices()
        .nth(width)
        .map_or(text.len(), |(i, _)| i);
    if limit == text.len() {
        return (text.trim_end(), "");
    }

    let window = &text[..limit];
    if text[limit..].starts_with(' ') {
        return (window.trim_end(), &text[limit..]);
    }
    match window.rfind(' ') {
        Some(space) if space > 0 => (window[..space].trim_end(), &text[space..]),
        _ => (window, &text[limit..]),
    }
}
