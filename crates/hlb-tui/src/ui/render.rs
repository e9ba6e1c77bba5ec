use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use hlb_core::routing::{Route, RouteDecision};
use hlb_core::utils::truncate_string;

use crate::app::{App, AppState, AuthForm, FormField, NavItem, NAV_ITEMS};

use super::styles;

const LOGO: [&str; 3] = [
    "        ╦ ╦╦  ╔╗ ",
    "        ╠═╣║  ╠╩╗",
    "        ╩ ╩╩═╝╚═╝",
];

/// Visible width of an input box
const FIELD_WIDTH: usize = 22;

const SIDEBAR_WIDTH: u16 = 24;

pub fn render(frame: &mut Frame, app: &App) {
    match &app.decision {
        RouteDecision::Pending | RouteDecision::Redirect { .. } => render_splash(frame),
        RouteDecision::Render(route) => render_auth_view(frame, app, route),
        RouteDecision::Shell(route) => render_shell(frame, app, route),
    }

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

/// Shown while the persisted session is being checked
pub fn render_splash(frame: &mut Frame) {
    let area = centered_rect_fixed(30, 6, frame.area());

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(*l, styles::title_style())))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "        Loading...",
        styles::muted_style(),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

// ============================================================================
// Public views
// ============================================================================

fn render_auth_view(frame: &mut Frame, app: &App, route: &Route) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(1)])
        .split(frame.area());

    render_auth_form(frame, app, route, chunks[0]);
    render_status_bar(frame, app, chunks[1], "[F2] login/register | [Esc] quit");
}

fn render_auth_form(frame: &mut Frame, app: &App, route: &Route, area: Rect) {
    let register = *route == Route::Register;
    let height = if register { 15 } else { 14 };
    let area = centered_rect_fixed(46, height, area);

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("      {}", l), styles::title_style())))
        .collect();

    let subtitle = match route {
        Route::Landing => "   Share your highs, lows and buffalos",
        Route::Register => "          Create an account",
        _ => "            Welcome back",
    };
    lines.push(Line::from(Span::styled(subtitle, styles::muted_style())));
    lines.push(Line::from(""));

    let form = &app.form;
    if register {
        lines.push(field_line(form, FormField::DisplayName, "Name:    ", &form.display_name));
    }
    lines.push(field_line(form, FormField::Email, "Email:   ", &form.email));
    let masked = "*".repeat(form.password.chars().count());
    lines.push(field_line(form, FormField::Password, "Password:", &masked));

    // Submit button (centered)
    let label = if register { "Sign Up" } else { "Log In" };
    let button_focused = form.focus == FormField::Submit;
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let button_text = if button_focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("             ["),
        Span::styled(format!("{:^13}", button_text), button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    let toggle_hint = if register {
        "Already have an account? "
    } else {
        "Don't have an account? "
    };
    let toggle_action = if register { "Log in" } else { "Sign up" };
    lines.push(Line::from(vec![
        Span::styled(format!("  {}", toggle_hint), styles::muted_style()),
        Span::styled("[F2] ", styles::help_key_style()),
        Span::styled(toggle_action, styles::highlight_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

/// One `Label: [value▌]` row of the auth form
fn field_line<'a>(form: &AuthForm, field: FormField, label: &'a str, value: &str) -> Line<'a> {
    let focused = form.focus == field;
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let cursor = if focused { "▌" } else { "" };

    // Show the tail of long values so the cursor stays visible
    let count = value.chars().count();
    let visible: String = value
        .chars()
        .skip(count.saturating_sub(FIELD_WIDTH))
        .collect();

    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{} [", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}", format!("{}{}", visible, cursor), width = FIELD_WIDTH + 1),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

// ============================================================================
// Application shell
// ============================================================================

fn render_shell(frame: &mut Frame, app: &App, route: &Route) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(10),   // Sidebar + content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, route, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_sidebar(frame, app, route, body[0]);
    render_content(frame, app, route, body[1]);
    render_status_bar(frame, app, chunks[2], "[L]ogout | [b]ack | [?] help | [q]uit");
}

fn render_title_bar(frame: &mut Frame, route: &Route, area: Rect) {
    let title = format!("  HLB · {}", route.title());
    let help_hint = "[?] Help";

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.chars().count() + help_hint.len() + 2),
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_sidebar(frame: &mut Frame, app: &App, route: &Route, area: Rect) {
    let active = NavItem::for_route(route);
    let mut lines = vec![Line::from("")];

    for (i, item) in NAV_ITEMS.iter().enumerate() {
        let selected = i == app.nav_selection;
        let marker = if active == Some(*item) { "▶" } else { " " };
        let style = if selected {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };

        let mut spans = vec![
            Span::styled(format!(" {} ", marker), styles::highlight_style()),
            Span::styled(format!("{} {}", i + 1, item.label()), style),
        ];
        if *item == NavItem::Notifications && app.unread_notifications > 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!(" {} ", badge_text(app.unread_notifications)),
                styles::badge_style(),
            ));
        }
        lines.push(Line::from(spans));
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(lines).block(block.clone()), sections[0]);

    let name = app
        .user()
        .map(|u| u.display_name.as_str())
        .unwrap_or("unknown");
    let footer = vec![
        Line::from(Span::styled(" Logged in as:", styles::muted_style())),
        Line::from(Span::styled(
            format!(" {}", truncate_string(name, SIDEBAR_WIDTH as usize - 3)),
            styles::highlight_style(),
        )),
    ];
    frame.render_widget(Paragraph::new(footer).block(block), sections[1]);
}

/// Unread badge label
fn badge_text(count: usize) -> String {
    if count > 99 {
        "99+".to_string()
    } else {
        count.to_string()
    }
}

fn render_content(frame: &mut Frame, app: &App, route: &Route, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", route.title()), styles::title_style())),
        Line::from(""),
    ];

    match route {
        Route::Home => {
            let name = app
                .user()
                .map(|u| u.display_name.as_str())
                .unwrap_or("there");
            lines.push(Line::from(format!(" Welcome back, {}!", name)));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                " What were your high, low and buffalo today?",
                styles::muted_style(),
            )));
        }
        Route::Profile => {
            if let Some(user) = app.user() {
                lines.push(profile_line("Name", &user.display_name));
                lines.push(profile_line("Email", &user.email));
                lines.push(profile_line("User ID", &user.id));
                if let Some(since) = user.member_since() {
                    lines.push(profile_line("Member since", &since));
                }
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(" [r] ", styles::help_key_style()),
                Span::styled("refresh profile", styles::help_desc_style()),
            ]));
        }
        Route::Notifications => {
            let text = match app.unread_notifications {
                0 => " You're all caught up.".to_string(),
                1 => " You have 1 unread notification.".to_string(),
                n => format!(" You have {} unread notifications.", n),
            };
            lines.push(Line::from(text));
        }
        Route::Reflection(id) | Route::Herd(id) => {
            lines.push(Line::from(Span::styled(
                format!(" id: {}", id),
                styles::muted_style(),
            )));
        }
        Route::NotFound(path) => {
            lines.push(Line::from(Span::styled(
                format!(" 404: nothing lives at {}", path),
                styles::muted_style(),
            )));
            lines.push(Line::from(vec![
                Span::styled(" [1] ", styles::help_key_style()),
                Span::styled("go home", styles::help_desc_style()),
            ]));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                " Nothing to show here yet.",
                styles::muted_style(),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn profile_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<14}", format!("{}:", label)), styles::muted_style()),
        Span::styled(value.to_string(), styles::list_item_style()),
    ])
}

// ============================================================================
// Status bar and overlays
// ============================================================================

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, shortcuts: &str) {
    let right_text = format!(" {} ", shortcuts);

    let left = match &app.toast {
        Some(toast) => Span::styled(
            format!(" {} ", toast.notice.message),
            styles::notice_style(toast.notice.level),
        ),
        None => Span::styled(
            format!(" {} ", app.navigator.current()),
            styles::muted_style(),
        ),
    };

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left.content.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        left,
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(48, 22, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("        {}", l), styles::title_style())))
        .collect();
    help_text.push(Line::from(Span::styled(
        format!("                version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Navigation", styles::highlight_style())));
    help_text.push(help_line("↑/↓ j/k", "Move in sidebar"));
    help_text.push(help_line("Enter", "Open selected view"));
    help_text.push(help_line("1-7", "Jump to view"));
    help_text.push(help_line("p", "Profile"));
    help_text.push(help_line("b Esc", "Go back"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(" Actions", styles::highlight_style())));
    help_text.push(help_line("r", "Refresh profile and notifications"));
    help_text.push(help_line("L", "Log out"));
    help_text.push(help_line("q", "Quit"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 9, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(format!("      {}", l), styles::title_style())))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "   Are you sure you want to quit?",
        styles::highlight_style(),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Press ", styles::muted_style()),
        Span::styled("[Y]", styles::help_key_style()),
        Span::styled(" to quit, ", styles::muted_style()),
        Span::styled("[N]", styles::help_key_style()),
        Span::styled(" to cancel", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}
