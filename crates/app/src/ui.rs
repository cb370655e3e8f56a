//! Terminal rendering.
//!
//! Pure projection of the app state onto a ratatui frame; nothing here
//! mutates state or performs I/O. One render function per screen plus
//! the picker overlay.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use punguin_core::Product;

use crate::app::App;
use crate::navigator::{AppScreen, AuthScreen, NavState, OwnerContext};
use crate::screens::{
    CredentialField, CredentialsForm, HomeScreen, Notice, ProductForm, ProductFormField,
};
use crate::viewmodel::{CategoryFilter, ProductListViewModel};

const ACCENT: Color = Color::Cyan;

/// Render the current screen.
pub fn render(frame: &mut Frame<'_>, app: &App) {
    match app.navigator.state() {
        NavState::Unauthenticated(screen) => {
            render_credentials(frame, &app.credentials, *screen);
        }
        NavState::Authenticated { owner, screen } => match screen {
            AppScreen::Home => render_home(frame, app, owner),
            AppScreen::AddProduct => {
                render_product_form(frame, &app.product_form, "Add product");
            }
            AppScreen::EditProduct(product) => {
                let title = format!("Edit product: {}", product.fields.name);
                render_product_form(frame, &app.product_form, &title);
            }
        },
    }
}

// =============================================================================
// Credential screens
// =============================================================================

fn render_credentials(frame: &mut Frame<'_>, form: &CredentialsForm, screen: AuthScreen) {
    let (title, action, switch_hint) = match screen {
        AuthScreen::SignIn => ("Sign in", "sign in", "Ctrl+T: create an account"),
        AuthScreen::SignUp => ("Sign up", "create account", "Ctrl+T: back to sign in"),
    };

    let area = centered_box(frame.area(), 50, 12);
    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        input_line("Email", &form.email, form.focus == CredentialField::Email),
        rows[0],
    );
    let masked = "*".repeat(form.password.chars().count());
    frame.render_widget(
        input_line("Password", &masked, form.focus == CredentialField::Password),
        rows[1],
    );

    let status = if form.is_busy() {
        Line::from(Span::styled("working...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from(format!("Enter: {action}  Tab: switch field  {switch_hint}"))
    };
    frame.render_widget(Paragraph::new(status), rows[2]);

    if let Some(notice) = &form.notice {
        frame.render_widget(notice_line(notice), rows[3]);
    }
}

// =============================================================================
// Home screen
// =============================================================================

fn render_home(frame: &mut Frame<'_>, app: &App, owner: &OwnerContext) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Header: signed-in identity.
    let header = Line::from(vec![
        Span::styled("Punguin", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw("  signed in as "),
        Span::styled(owner.email.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  (Ctrl+L: sign out)"),
    ]);
    frame.render_widget(Paragraph::new(header), rows[0]);

    frame.render_widget(
        input_line("Search", &app.home.view.query, true),
        rows[1],
    );

    frame.render_widget(category_line(&app.home, &app.products), rows[2]);

    let displayed = app.home.view.displayed(&app.products);
    render_product_list(frame, rows[3], &app.home, &displayed);

    let footer = footer_line(&app.home);
    frame.render_widget(Paragraph::new(footer), rows[4]);
}

fn category_line(home: &HomeScreen, products: &[Product]) -> Paragraph<'static> {
    let labels = ProductListViewModel::categories(products);
    let mut spans = vec![Span::raw("Category: ")];

    let selected_style = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let all_selected = home.view.selected == CategoryFilter::All;
    spans.push(Span::styled(
        "[All]",
        if all_selected { selected_style } else { Style::default() },
    ));
    for label in labels {
        let selected = home.view.selected == CategoryFilter::Category(label.clone());
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{label}]"),
            if selected { selected_style } else { Style::default() },
        ));
    }
    Paragraph::new(Line::from(spans))
}

fn render_product_list(frame: &mut Frame<'_>, area: Rect, home: &HomeScreen, displayed: &[&Product]) {
    let block = Block::default().borders(Borders::ALL).title("Products");

    if displayed.is_empty() {
        let empty = Paragraph::new("No products to show")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = displayed
        .iter()
        .map(|product| {
            ListItem::new(Line::from(vec![
                Span::raw(product.fields.name.clone()),
                Span::styled(
                    format!("  [{}]", product.bucket_label()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("  {}", product.fields.price),
                    Style::default().fg(Color::Green),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(ACCENT).fg(Color::Black));
    let mut state = ListState::default();
    state.select(Some(home.selected_row.min(displayed.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn footer_line(home: &HomeScreen) -> Line<'static> {
    if home.pending_delete.is_some() {
        return Line::from(Span::styled(
            "Delete this product? y: yes  n: no",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    if home.is_busy() {
        return Line::from(Span::styled("deleting...", Style::default().fg(Color::Yellow)));
    }
    if let Some(notice) = &home.notice {
        return notice_line(notice);
    }
    Line::from(
        "type: search  \u{2190}\u{2192}: category  \u{2191}\u{2193}: select  Enter: edit  Del: delete  Ctrl+N: add",
    )
}

// =============================================================================
// Product form screens
// =============================================================================

fn render_product_form(frame: &mut Frame<'_>, form: &ProductForm, title: &str) {
    let area = centered_box(frame.area(), 60, 18);
    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title(title.to_owned());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        input_line("Name", &form.draft.name, form.focus == ProductFormField::Name),
        rows[0],
    );
    let category = if form.draft.category.is_empty() {
        "\u{2190}\u{2192} to choose".to_owned()
    } else {
        form.draft.category.clone()
    };
    frame.render_widget(
        input_line("Category", &category, form.focus == ProductFormField::Category),
        rows[1],
    );
    frame.render_widget(
        input_line("Price", &form.draft.price, form.focus == ProductFormField::Price),
        rows[2],
    );
    let image = form.draft.image.as_deref().unwrap_or("Enter to pick an image");
    frame.render_widget(
        input_line("Image", image, form.focus == ProductFormField::Image),
        rows[3],
    );

    let status = if form.is_busy() {
        Line::from(Span::styled("saving...", Style::default().fg(Color::Yellow)))
    } else {
        Line::from("Enter: save  Tab: next field  Esc: back")
    };
    frame.render_widget(Paragraph::new(status), rows[4]);

    if let Some(notice) = &form.notice {
        frame.render_widget(Paragraph::new(notice_line(notice)), rows[5]);
    }

    if let Some(entries) = &form.gallery {
        render_gallery(frame, entries, form.gallery_index);
    }
}

fn render_gallery(frame: &mut Frame<'_>, entries: &[crate::picker::GalleryEntry], index: usize) {
    let area = centered_box(frame.area(), 44, 14);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Pick an image (Esc: cancel)");

    if entries.is_empty() {
        let empty = Paragraph::new("The gallery is empty")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem<'_>> = entries
        .iter()
        .map(|entry| ListItem::new(entry.name.clone()))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(ACCENT).fg(Color::Black));
    let mut state = ListState::default();
    state.select(Some(index.min(entries.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

// =============================================================================
// Shared widgets
// =============================================================================

fn input_line(label: &str, value: &str, focused: bool) -> Paragraph<'static> {
    let style = if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default()
    };
    Paragraph::new(value.to_owned()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_owned())
            .border_style(style),
    )
}

fn notice_line(notice: &Notice) -> Line<'static> {
    let (color, text) = match notice {
        Notice::Success(msg) => (Color::Green, msg.clone()),
        Notice::Error(msg) => (Color::Red, msg.clone()),
    };
    Line::from(Span::styled(text, Style::default().fg(color)))
}

/// A fixed-size box centered in `area`, clipped to it.
fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
