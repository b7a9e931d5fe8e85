use crate::field::FieldAction;
use crate::field::FieldOption;
use crate::field::panel_inner;
use crate::field::panel_outer_size;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use ratatui_nlform_core::input::KeyCode;
use ratatui_nlform_core::input::KeyEvent;
use ratatui_nlform_core::keymap::FormBindings;
use ratatui_nlform_core::render;
use ratatui_nlform_core::theme::Theme;

pub const DEFAULT_PLACEHOLDER: &str = "Select option";

/// Inline dropdown: shows the label of the selected option and opens a list of every option.
///
/// The selected index is derived from the external value: the option whose value matches it,
/// or the first option when nothing matches. With duplicate values the last match wins. An empty
/// option list shows the placeholder.
///
/// When the panel is shorter than the list, the rows scroll so the highlighted option stays
/// visible.
#[derive(Clone, Debug)]
pub struct SelectField {
    options: Vec<FieldOption>,
    value: String,
    selected: usize,
    highlighted: usize,
    /// First option drawn in the panel.
    scroll: usize,
    placeholder: String,
    id: Option<String>,
}

impl SelectField {
    pub fn new(options: Vec<FieldOption>, value: impl Into<String>) -> Self {
        let mut field = Self {
            options,
            value: value.into(),
            selected: 0,
            highlighted: 0,
            scroll: 0,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            id: None,
        };
        field.resync();
        field
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Caller-chosen tag echoed in [`crate::field::FieldValue::id`].
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// The externally supplied value.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.resync();
    }

    pub fn set_options(&mut self, options: Vec<FieldOption>) {
        self.options = options;
        self.resync();
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_option(&self) -> Option<&FieldOption> {
        self.options.get(self.selected).or(self.options.first())
    }

    /// Text shown on the toggle.
    pub fn label(&self) -> &str {
        self.selected_option()
            .map(|o| o.label.as_str())
            .unwrap_or(self.placeholder.as_str())
    }

    /// Row under the keyboard/mouse highlight while open.
    pub fn highlighted_index(&self) -> usize {
        self.highlighted
    }

    /// First option visible in the panel as of the last render.
    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Moves the highlight one row, as the mouse wheel does.
    pub fn step_highlight(&mut self, down: bool) -> FieldAction {
        let next = if down {
            (self.highlighted + 1).min(self.options.len().saturating_sub(1))
        } else {
            self.highlighted.saturating_sub(1)
        };
        self.hover(next)
    }

    /// Keeps the highlighted row inside a window of `rows` options.
    fn scroll_to_highlight(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.highlighted < self.scroll {
            self.scroll = self.highlighted;
        } else if self.highlighted >= self.scroll + rows {
            self.scroll = self.highlighted + 1 - rows;
        }
        self.scroll = self.scroll.min(self.options.len().saturating_sub(rows));
    }

    fn resync(&mut self) {
        self.selected = self
            .options
            .iter()
            .rposition(|o| o.value == self.value)
            .unwrap_or(0);
        self.highlighted = self.selected;
    }

    /// Toggle click. Asks to be opened unless already open.
    pub fn toggle(&self, is_open: bool) -> FieldAction {
        if is_open {
            FieldAction::None
        } else {
            FieldAction::RequestOpen
        }
    }

    pub(crate) fn on_open(&mut self) {
        self.highlighted = self.selected;
    }

    /// Chooses the option at `index`.
    pub fn activate(&mut self, index: usize) -> FieldAction {
        let Some(option) = self.options.get(index) else {
            return FieldAction::None;
        };
        self.selected = index;
        self.highlighted = index;
        log::debug!("select option {index} ({:?})", option.value);
        FieldAction::Selected {
            value: option.value.clone(),
            label: option.label.clone(),
        }
    }

    pub fn hover(&mut self, index: usize) -> FieldAction {
        if index >= self.options.len() || index == self.highlighted {
            return FieldAction::None;
        }
        self.highlighted = index;
        FieldAction::Redraw
    }

    /// Keyboard handling while the list is open.
    pub fn handle_key(&mut self, key: &KeyEvent, bindings: &FormBindings) -> FieldAction {
        if bindings.close.matches(key) {
            return FieldAction::RequestClose;
        }
        if bindings.confirm.matches(key) {
            return self.activate(self.highlighted);
        }
        let last = self.options.len().saturating_sub(1);
        if bindings.up.matches(key) {
            return self.hover(self.highlighted.saturating_sub(1));
        }
        if bindings.down.matches(key) {
            return self.hover((self.highlighted + 1).min(last));
        }
        match key.code {
            KeyCode::Home | KeyCode::PageUp => self.hover(0),
            KeyCode::End | KeyCode::PageDown => self.hover(last),
            KeyCode::Char(c) if !key.modifiers.is_chord() => self.jump_to_prefix(c),
            _ => FieldAction::None,
        }
    }

    /// Moves the highlight to the next option whose label starts with `c`, wrapping around.
    fn jump_to_prefix(&mut self, c: char) -> FieldAction {
        let n = self.options.len();
        let c = c.to_lowercase().next().unwrap_or(c);
        let found = (1..=n)
            .map(|step| (self.highlighted + step) % n.max(1))
            .find(|&i| {
                self.options[i]
                    .label
                    .chars()
                    .next()
                    .and_then(|first| first.to_lowercase().next())
                    == Some(c)
            });
        match found {
            Some(i) => self.hover(i),
            None => FieldAction::None,
        }
    }

    /// Outer size of the open list.
    pub fn panel_size(&self, theme: &Theme) -> (u16, u16) {
        let item = &theme.option_item;
        let label_w = self
            .options
            .iter()
            .map(|o| render::str_width(&o.label))
            .max()
            .unwrap_or_else(|| render::str_width(&self.placeholder));
        let content_w = label_w
            .saturating_add(item.padding_left)
            .saturating_add(item.padding_right);
        let rows = self.options.len().clamp(1, u16::MAX as usize) as u16;
        panel_outer_size(content_w, rows, theme)
    }

    /// Option index under screen cell `(x, y)` of a panel drawn at `area`.
    pub fn option_at(&self, area: Rect, theme: &Theme, x: u16, y: u16) -> Option<usize> {
        let inner = panel_inner(area, theme);
        if x < inner.left() || x >= inner.right() || y < inner.top() || y >= inner.bottom() {
            return None;
        }
        let idx = self.scroll + (y - inner.y) as usize;
        (idx < self.options.len()).then_some(idx)
    }

    /// Click inside the open panel.
    pub fn panel_click(&mut self, area: Rect, theme: &Theme, x: u16, y: u16) -> FieldAction {
        match self.option_at(area, theme, x, y) {
            Some(idx) => self.activate(idx),
            None => FieldAction::None,
        }
    }

    pub fn render_panel(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.is_empty() {
            return;
        }
        render::fill(area, buf, theme.panel_style());
        if theme.options_list.border {
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .render(area, buf);
        }

        let inner = panel_inner(area, theme);
        let item = &theme.option_item;
        if self.options.is_empty() {
            render::render_str_clipped(
                inner.x + item.padding_left.min(inner.width),
                inner.y,
                0,
                inner.width.saturating_sub(item.padding_left),
                buf,
                &self.placeholder,
                theme.placeholder_style(),
            );
            return;
        }

        self.scroll_to_highlight(inner.height as usize);
        for (i, option) in self.options.iter().enumerate().skip(self.scroll) {
            let Some(dy) = u16::try_from(i - self.scroll)
                .ok()
                .filter(|dy| *dy < inner.height)
            else {
                break;
            };
            let y = inner.y + dy;
            let checked = i == self.selected;
            let style = theme.option_style(checked, i == self.highlighted);
            render::fill(Rect::new(inner.x, y, inner.width, 1), buf, style);

            let text_x = inner.x + item.padding_left.min(inner.width);
            let text_w = inner
                .width
                .saturating_sub(item.padding_left)
                .saturating_sub(item.padding_right);
            render::render_str_clipped(text_x, y, 0, text_w, buf, &option.label, style);

            if checked {
                let mark_w = render::str_width(&item.check_mark);
                // The mark sits one column in from the right edge when padding allows.
                let inset = if item.padding_right > mark_w { 1 } else { 0 };
                let mark_x = inner.right().saturating_sub(mark_w + inset).max(inner.x);
                render::render_str_clipped(mark_x, y, 0, mark_w, buf, &item.check_mark, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_nlform_core::keymap;

    fn food() -> Vec<FieldOption> {
        vec![
            FieldOption::new("1", "any food"),
            FieldOption::new("2", "Indian"),
            FieldOption::new("3", "French"),
        ]
    }

    #[test]
    fn label_follows_external_value() {
        let mut field = SelectField::new(food(), "2");
        assert_eq!(field.label(), "Indian");
        field.set_value("9");
        assert_eq!(field.label(), "any food");
        assert_eq!(field.selected_index(), 0);
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let field = SelectField::new(Vec::new(), "1");
        assert_eq!(field.label(), DEFAULT_PLACEHOLDER);
        let field = SelectField::new(Vec::new(), "").with_placeholder("pick");
        assert_eq!(field.label(), "pick");
    }

    #[test]
    fn duplicate_values_take_last_match() {
        let options = vec![
            FieldOption::new("a", "first"),
            FieldOption::new("a", "second"),
        ];
        assert_eq!(SelectField::new(options, "a").label(), "second");
    }

    #[test]
    fn options_change_resyncs() {
        let mut field = SelectField::new(food(), "3");
        assert_eq!(field.selected_index(), 2);
        field.set_options(vec![FieldOption::new("3", "Thai")]);
        assert_eq!(field.selected_index(), 0);
        assert_eq!(field.label(), "Thai");
    }

    #[test]
    fn toggle_is_noop_when_open() {
        let field = SelectField::new(food(), "1");
        assert_eq!(field.toggle(false), FieldAction::RequestOpen);
        assert_eq!(field.toggle(true), FieldAction::None);
    }

    #[test]
    fn activate_reports_value_and_label() {
        let mut field = SelectField::new(food(), "1");
        assert_eq!(
            field.activate(2),
            FieldAction::Selected {
                value: "3".to_string(),
                label: "French".to_string()
            }
        );
        assert_eq!(field.label(), "French");
        assert_eq!(field.activate(7), FieldAction::None);
    }

    #[test]
    fn keyboard_moves_highlight_and_confirms() {
        let bindings = FormBindings::default();
        let mut field = SelectField::new(food(), "1");
        field.on_open();
        let down = keymap::key(KeyCode::Down);
        assert_eq!(field.handle_key(&down, &bindings), FieldAction::Redraw);
        assert_eq!(field.handle_key(&down, &bindings), FieldAction::Redraw);
        assert_eq!(field.handle_key(&down, &bindings), FieldAction::None);
        assert_eq!(field.highlighted_index(), 2);
        assert_eq!(
            field.handle_key(&keymap::key(KeyCode::Enter), &bindings),
            FieldAction::Selected {
                value: "3".to_string(),
                label: "French".to_string()
            }
        );
        assert_eq!(
            field.handle_key(&keymap::key(KeyCode::Esc), &bindings),
            FieldAction::RequestClose
        );
    }

    #[test]
    fn typing_jumps_to_matching_label() {
        let bindings = FormBindings::default();
        let mut field = SelectField::new(food(), "1");
        field.handle_key(&keymap::key_char('f'), &bindings);
        assert_eq!(field.highlighted_index(), 2);
        field.handle_key(&keymap::key_char('I'), &bindings);
        assert_eq!(field.highlighted_index(), 1);
    }

    #[test]
    fn renders_check_mark_on_selected_row() {
        let theme = Theme::default();
        let mut field = SelectField::new(food(), "2");
        let (w, h) = field.panel_size(&theme);
        assert_eq!((w, h), (12, 3));
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        field.render_panel(area, &mut buf, &theme);
        assert_eq!(buf[(1, 1)].symbol(), "I");
        assert_eq!(buf[(10, 1)].symbol(), "✓");
        assert_eq!(buf[(10, 0)].symbol(), " ");
        assert_eq!(buf[(1, 1)].fg, theme.option_item.checked_color);
        assert_eq!(field.option_at(area, &theme, 3, 2), Some(2));
        assert_eq!(field.option_at(area, &theme, 3, 3), None);
    }

    #[test]
    fn short_panel_scrolls_to_highlight() {
        let theme = Theme::default();
        let bindings = FormBindings::default();
        let options = (1..=6)
            .map(|i| FieldOption::new(i.to_string(), format!("opt{i}")))
            .collect();
        let mut field = SelectField::new(options, "1");
        field.on_open();
        let end = keymap::key(KeyCode::End);
        assert_eq!(field.handle_key(&end, &bindings), FieldAction::Redraw);

        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        field.render_panel(area, &mut buf, &theme);
        assert_eq!(field.scroll_offset(), 3);
        assert_eq!(buf[(1, 0)].symbol(), "o");
        assert_eq!(buf[(4, 0)].symbol(), "4");
        assert_eq!(buf[(4, 2)].symbol(), "6");
        assert_eq!(field.option_at(area, &theme, 3, 2), Some(5));

        field.handle_key(&keymap::key(KeyCode::Home), &bindings);
        field.render_panel(area, &mut buf, &theme);
        assert_eq!(field.scroll_offset(), 0);
        assert_eq!(buf[(4, 0)].symbol(), "1");
    }
}
