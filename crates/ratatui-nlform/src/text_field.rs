use crate::field::FieldAction;
use crate::field::panel_inner;
use crate::field::panel_outer_size;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use ratatui_nlform_core::input::InputEvent;
use ratatui_nlform_core::keymap::FormBindings;
use ratatui_nlform_core::line_input::LineInput;
use ratatui_nlform_core::line_input::LineInputAction;
use ratatui_nlform_core::render;
use ratatui_nlform_core::subline::Subline;
use ratatui_nlform_core::theme::Theme;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputKind {
    #[default]
    Text,
    /// Masks the typed text, both in the editor and on the toggle.
    Password,
}

/// Regions of an open text-field panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PanelLayout {
    input: Rect,
    go: Rect,
    rule: Option<Rect>,
    subline: Rect,
}

/// Inline free-text field. The toggle shows the local text, or the placeholder when it is blank;
/// the open panel holds an editor, a go control and an optional hint.
#[derive(Clone, Debug)]
pub struct TextField {
    kind: InputKind,
    value: String,
    placeholder: String,
    subline: Option<Subline>,
    editor: LineInput,
    id: Option<String>,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let mut editor = LineInput::new();
        editor.set_text(value.clone());
        Self {
            kind: InputKind::Text,
            value,
            placeholder: String::new(),
            subline: None,
            editor,
            id: None,
        }
    }

    pub fn with_kind(mut self, kind: InputKind) -> Self {
        self.kind = kind;
        self.editor.set_masked(kind == InputKind::Password);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Hint shown under the editor. Strings are parsed as [`Subline::markup`].
    pub fn with_subline(mut self, subline: impl Into<Subline>) -> Self {
        let subline = subline.into();
        self.subline = (!subline.is_empty()).then_some(subline);
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

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn subline(&self) -> Option<&Subline> {
        self.subline.as_ref()
    }

    /// The externally supplied value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the external value; the local text follows it.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.editor.set_text(self.value.clone());
    }

    /// Local text, possibly edited but not yet confirmed.
    pub fn text(&self) -> &str {
        self.editor.text()
    }

    /// Text shown on the toggle.
    pub fn display_text(&self) -> String {
        let text = self.editor.text();
        if text.trim().is_empty() {
            return self.placeholder.clone();
        }
        match self.kind {
            InputKind::Text => text.to_string(),
            InputKind::Password => "•".repeat(text.chars().count()),
        }
    }

    /// Shows the placeholder on the toggle rather than typed text.
    pub fn shows_placeholder(&self) -> bool {
        self.editor.text().trim().is_empty()
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
        self.editor.move_to_end();
    }

    /// The go control: reports the local text and asks to close.
    pub fn confirm(&mut self) -> FieldAction {
        log::debug!("text field confirmed ({} chars)", self.editor.text().chars().count());
        FieldAction::Confirmed(self.editor.text().to_string())
    }

    /// Input while the panel is open. Enter confirms; every other key edits.
    pub fn handle_event(&mut self, event: InputEvent, bindings: &FormBindings) -> FieldAction {
        if let InputEvent::Key(key) = &event {
            if bindings.close.matches(key) {
                return FieldAction::RequestClose;
            }
            if bindings.confirm.matches(key) {
                return self.confirm();
            }
        }
        match self.editor.input(event) {
            LineInputAction::None => FieldAction::None,
            LineInputAction::Changed => FieldAction::Redraw,
            LineInputAction::Submitted(_) => self.confirm(),
        }
    }

    fn go_width(theme: &Theme) -> u16 {
        render::str_width(&theme.input.go_symbol).saturating_add(2)
    }

    pub fn panel_size(&self, theme: &Theme) -> (u16, u16) {
        let go_w = Self::go_width(theme);
        let input_w = render::str_width(self.editor.text())
            .saturating_add(1)
            .max(theme.input.width)
            .saturating_add(go_w);
        let (sub_w, sub_h) = match &self.subline {
            Some(sub) => {
                let rule = u16::from(theme.subline.border_top);
                (
                    sub.width()
                        .saturating_add(theme.subline.padding.saturating_mul(2)),
                    sub.height().saturating_add(rule),
                )
            }
            None => (0, 0),
        };
        panel_outer_size(input_w.max(sub_w), 1 + sub_h, theme)
    }

    fn layout(&self, area: Rect, theme: &Theme) -> PanelLayout {
        let inner = panel_inner(area, theme);
        let go_w = Self::go_width(theme).min(inner.width);
        let input = Rect::new(inner.x, inner.y, inner.width - go_w, inner.height.min(1));
        let go = Rect::new(input.right(), inner.y, go_w, inner.height.min(1));

        let mut y = inner.y.saturating_add(1);
        let mut rule = None;
        if self.subline.is_some() && theme.subline.border_top && y < inner.bottom() {
            rule = Some(Rect::new(inner.x, y, inner.width, 1));
            y += 1;
        }
        let pad = theme.subline.padding.min(inner.width / 2);
        let subline = Rect::new(
            inner.x + pad,
            y.min(inner.bottom()),
            inner.width - pad * 2,
            inner.bottom().saturating_sub(y),
        );
        PanelLayout {
            input,
            go,
            rule,
            subline,
        }
    }

    /// Where the terminal cursor belongs when the panel is drawn at `area`.
    pub fn cursor_pos(&self, area: Rect, theme: &Theme) -> Option<(u16, u16)> {
        self.editor.cursor_pos(self.layout(area, theme).input)
    }

    /// Click inside the open panel. Only the go control reacts.
    pub fn panel_click(&mut self, area: Rect, theme: &Theme, x: u16, y: u16) -> FieldAction {
        let go = self.layout(area, theme).go;
        if x >= go.left() && x < go.right() && y >= go.top() && y < go.bottom() {
            return self.confirm();
        }
        FieldAction::None
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

        let layout = self.layout(area, theme);
        render::fill(layout.input, buf, theme.input_style());
        self.editor
            .render_ref(layout.input, buf, theme.input_style());
        if self.editor.is_empty() {
            render::render_str_clipped(
                layout.input.x,
                layout.input.y,
                0,
                layout.input.width,
                buf,
                &self.placeholder,
                theme.placeholder_style(),
            );
        }

        render::fill(layout.go, buf, theme.go_style());
        render::render_str_clipped(
            layout.go.x.saturating_add(1),
            layout.go.y,
            0,
            layout.go.width.saturating_sub(1),
            buf,
            &theme.input.go_symbol,
            theme.go_style(),
        );

        let Some(subline) = &self.subline else {
            return;
        };
        if let Some(rule) = layout.rule {
            render::render_dashed_rule(rule.x, rule.y, rule.width, buf, theme.subline_rule_style());
        }
        let style = theme.subline_style();
        for (dy, line) in subline.lines().iter().enumerate() {
            let Some(dy) = u16::try_from(dy).ok().filter(|dy| *dy < layout.subline.height) else {
                break;
            };
            render::render_spans_clipped(
                layout.subline.x,
                layout.subline.y + dy,
                0,
                layout.subline.width,
                buf,
                &line.spans,
                style,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_nlform_core::input::KeyCode;
    use ratatui_nlform_core::input::KeyEvent;
    use ratatui_nlform_core::keymap;

    fn type_str(field: &mut TextField, s: &str) {
        let bindings = FormBindings::default();
        for c in s.chars() {
            field.handle_event(InputEvent::key(KeyCode::Char(c)), &bindings);
        }
    }

    #[test]
    fn blank_text_shows_placeholder() {
        let mut field = TextField::new("").with_placeholder("any city");
        assert_eq!(field.display_text(), "any city");
        field.set_value("   ");
        assert_eq!(field.display_text(), "any city");
        field.set_value("Rome");
        assert_eq!(field.display_text(), "Rome");
    }

    #[test]
    fn enter_and_go_confirm_identically() {
        let bindings = FormBindings::default();
        let mut by_key = TextField::new("");
        type_str(&mut by_key, "Oslo");
        let key_action = by_key.handle_event(InputEvent::key(KeyCode::Enter), &bindings);

        let mut by_go = TextField::new("");
        type_str(&mut by_go, "Oslo");
        let go_action = by_go.confirm();

        assert_eq!(key_action, FieldAction::Confirmed("Oslo".to_string()));
        assert_eq!(key_action, go_action);
    }

    #[test]
    fn other_keys_do_not_confirm() {
        let bindings = FormBindings::default();
        let mut field = TextField::new("a");
        for code in [KeyCode::Tab, KeyCode::Left, KeyCode::Up, KeyCode::Char('x')] {
            let action = field.handle_event(InputEvent::key(code), &bindings);
            assert!(!matches!(action, FieldAction::Confirmed(_)));
        }
        let shift_enter = KeyEvent::new(KeyCode::Enter)
            .with_modifiers(ratatui_nlform_core::input::KeyModifiers::shift());
        // Shift+Enter is not the confirm chord, but the editor still treats Enter as submit.
        assert_eq!(
            field.handle_event(InputEvent::Key(shift_enter), &bindings),
            FieldAction::Confirmed("xa".to_string())
        );
    }

    #[test]
    fn esc_requests_close_and_keeps_local_text() {
        let bindings = FormBindings::default();
        let mut field = TextField::new("Paris");
        field.on_open();
        type_str(&mut field, "!");
        assert_eq!(
            field.handle_event(InputEvent::Key(keymap::key(KeyCode::Esc)), &bindings),
            FieldAction::RequestClose
        );
        assert_eq!(field.text(), "Paris!");
        assert_eq!(field.value(), "Paris");
    }

    #[test]
    fn password_masks_toggle() {
        let field = TextField::new("abc").with_kind(InputKind::Password);
        assert_eq!(field.display_text(), "•••");
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn panel_renders_go_and_subline() {
        let theme = Theme::default();
        let mut field = TextField::new("")
            .with_placeholder("any city")
            .with_subline("For example: <em>Rome</em>");
        let (w, h) = field.panel_size(&theme);
        assert_eq!((w, h), (23, 3));
        let area = Rect::new(0, 0, w, h);
        let mut buf = Buffer::empty(area);
        field.render_panel(area, &mut buf, &theme);

        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(0, 0)].fg, theme.input.placeholder_color);
        assert_eq!(buf[(21, 0)].symbol(), "→");
        assert_eq!(buf[(0, 1)].symbol(), "╌");
        assert_eq!(buf[(1, 2)].symbol(), "F");
        assert_eq!(field.cursor_pos(area, &theme), Some((0, 0)));
        assert_eq!(
            field.panel_click(area, &theme, 21, 0),
            FieldAction::Confirmed(String::new())
        );
        assert_eq!(field.panel_click(area, &theme, 5, 0), FieldAction::None);
    }
}
