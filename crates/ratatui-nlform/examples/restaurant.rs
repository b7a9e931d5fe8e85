use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Position;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_nlform::crossterm_input::input_event_from_crossterm;
use ratatui_nlform::field::FieldOption;
use ratatui_nlform::form::FormAction;
use ratatui_nlform::form::NlForm;
use ratatui_nlform::help::HelpBar;
use ratatui_nlform::select::SelectField;
use ratatui_nlform::text_field::TextField;
use ratatui_nlform::theme::Theme;
use ratatui_nlform::theme::ThemeOverride;
use ratatui_nlform::theme::resolve_theme;
use std::io;
use std::time::Duration;

fn options(labels: &[&str]) -> Vec<FieldOption> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| FieldOption::new((i + 1).to_string(), *l))
        .collect()
}

fn restaurant_form() -> NlForm {
    NlForm::new()
        .with_id("restaurant")
        .text("I feel to eat ")
        .select(
            SelectField::new(
                options(&["any food", "Indian", "French", "Japanese", "Italian"]),
                "1",
            )
            .with_id("food"),
        )
        .line_break()
        .text("in a ")
        .select(
            SelectField::new(
                options(&["standard", "fancy", "hip", "traditional", "romantic"]),
                "1",
            )
            .with_id("kind"),
        )
        .text(" restaurant")
        .line_break()
        .text("at ")
        .select(
            SelectField::new(options(&["anytime", "7 p.m.", "8 p.m.", "9 p.m."]), "1")
                .with_id("time"),
        )
        .text(" in ")
        .input(
            TextField::new("")
                .with_id("city")
                .with_placeholder("any city")
                .with_subline("For example: <em>Los Angeles</em> or <em>New York</em>"),
        )
        .submit("Find a restaurant")
}

/// `restaurant [theme.toml]`
fn load_theme() -> Theme {
    let Some(path) = std::env::args().nth(1) else {
        return Theme::default();
    };
    match ThemeOverride::load(&path) {
        Ok(over) => resolve_theme(&Theme::default(), &over),
        Err(err) => {
            eprintln!("{err}; using the default theme");
            Theme::default()
        }
    }
}

fn main() -> io::Result<()> {
    let theme = load_theme();

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut form = restaurant_form();
    let res = run(&mut terminal, &theme, &mut form);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    theme: &Theme,
    form: &mut NlForm,
) -> io::Result<()> {
    let mut status = String::from("click a field, or tab to it and press enter");
    loop {
        terminal.draw(|f| {
            let [main, help, status_area] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(1),
                ])
                .areas(f.area());

            let block = Block::default()
                .title("Natural language form (q to quit)")
                .borders(Borders::ALL);
            let inner = block.inner(main);
            f.render_widget(block, main);

            let buf = f.buffer_mut();
            form.render_ref(inner, buf, theme);
            HelpBar::for_form(form, theme).render_ref(help, buf);
            let span = Span::styled(status.as_str(), Style::default());
            buf.set_span(status_area.x, status_area.y, &span, status_area.width);

            if let Some((x, y)) = form.cursor_position() {
                f.set_cursor_position(Position::new(x, y));
            }
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let quit = matches!(key.code, KeyCode::Char('q'))
                || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
            if quit && form.open_field().is_none() {
                return Ok(());
            }
        }

        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        match form.handle_event(ev, theme) {
            FormAction::Selected {
                index,
                value,
                label,
            } => {
                if let Some(field) = form.select_field_mut(index) {
                    field.set_value(value.clone());
                }
                status = format!("selected {label:?} (value {value:?}) in field {index}");
            }
            FormAction::Confirmed { index, value } => {
                if let Some(field) = form.text_field_mut(index) {
                    field.set_value(value.clone());
                }
                status = format!("confirmed {value:?} in field {index}");
            }
            FormAction::Submitted(values) => {
                let pairs: Vec<String> = values
                    .iter()
                    .map(|v| {
                        let id = v.id.as_deref().unwrap_or("?");
                        format!("{id}={:?}", v.label.as_deref().unwrap_or(&v.value))
                    })
                    .collect();
                status = format!("submitted: {}", pairs.join(", "));
            }
            FormAction::Opened(_) | FormAction::Closed | FormAction::Redraw | FormAction::None => {}
        }
    }
}
