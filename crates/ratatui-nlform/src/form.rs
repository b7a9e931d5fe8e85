//! The form container: prose with embedded fields, at most one of them open.
//!
//! ```
//! use ratatui_nlform::field::FieldOption;
//! use ratatui_nlform::form::NlForm;
//! use ratatui_nlform::select::SelectField;
//! use ratatui_nlform::text_field::TextField;
//!
//! let food = vec![FieldOption::new("1", "any food"), FieldOption::new("2", "Indian")];
//! let mut form = NlForm::new()
//!     .text("I feel to eat ")
//!     .select(SelectField::new(food, "2"))
//!     .text(" in ")
//!     .input(TextField::new("").with_placeholder("any city"))
//!     .submit("Find a restaurant");
//!
//! assert!(form.open(1));
//! assert!(form.open(3));
//! assert_eq!(form.open_field(), Some(3));
//! ```

use crate::field::FieldAction;
use crate::field::FieldValue;
use crate::select::SelectField;
use crate::submit::SubmitButton;
use crate::text_field::TextField;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui_nlform_core::input::InputEvent;
use ratatui_nlform_core::input::KeyEvent;
use ratatui_nlform_core::input::MouseEvent;
use ratatui_nlform_core::input::MouseEventKind;
use ratatui_nlform_core::keymap::Binding;
use ratatui_nlform_core::keymap::FormBindings;
use ratatui_nlform_core::render;
use ratatui_nlform_core::theme::TextAlign;
use ratatui_nlform_core::theme::Theme;

/// One child of a form.
#[derive(Clone, Debug)]
pub enum FormItem {
    Text(Span<'static>),
    Break,
    Select(SelectField),
    Input(TextField),
    Submit(SubmitButton),
}

impl FormItem {
    pub fn is_field(&self) -> bool {
        matches!(self, Self::Select(_) | Self::Input(_))
    }

    fn is_focusable(&self) -> bool {
        self.is_field() || matches!(self, Self::Submit(_))
    }

    fn toggle_label(&self) -> Option<String> {
        match self {
            Self::Select(f) => Some(f.label().to_string()),
            Self::Input(f) => Some(f.display_text()),
            _ => None,
        }
    }
}

impl From<SelectField> for FormItem {
    fn from(f: SelectField) -> Self {
        Self::Select(f)
    }
}

impl From<TextField> for FormItem {
    fn from(f: TextField) -> Self {
        Self::Input(f)
    }
}

impl From<SubmitButton> for FormItem {
    fn from(b: SubmitButton) -> Self {
        Self::Submit(b)
    }
}

impl From<Span<'static>> for FormItem {
    fn from(s: Span<'static>) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FormItem {
    fn from(s: &str) -> Self {
        Self::Text(Span::raw(s.to_string()))
    }
}

impl From<String> for FormItem {
    fn from(s: String) -> Self {
        Self::Text(Span::raw(s))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Redraw,
    Opened(usize),
    Closed,
    Selected {
        index: usize,
        value: String,
        label: String,
    },
    Confirmed {
        index: usize,
        value: String,
    },
    /// Snapshot of every field. Nothing is validated.
    Submitted(Vec<FieldValue>),
}

/// Geometry recorded by the last render, used for mouse hit-testing.
#[derive(Clone, Debug, Default)]
struct FormLayout {
    hits: Vec<(usize, Rect)>,
    panel: Option<(usize, Rect)>,
    cursor: Option<(u16, u16)>,
}

/// Left-to-right flow of inline items, wrapping at the area's right edge.
struct Flow {
    area: Rect,
    x: u16,
    y: u16,
    line_spacing: u16,
}

impl Flow {
    fn new(area: Rect, line_spacing: u16) -> Self {
        Self {
            area,
            x: area.x,
            y: area.y,
            line_spacing,
        }
    }

    fn at_line_start(&self) -> bool {
        self.x == self.area.x
    }

    fn newline(&mut self) {
        self.x = self.area.x;
        self.y = self
            .y
            .saturating_add(self.line_spacing.saturating_add(1));
    }

    fn skip_rows(&mut self, rows: u16) {
        self.y = self.y.saturating_add(rows);
    }

    fn indent_to(&mut self, x: u16) {
        self.x = x.clamp(self.area.x, self.area.right());
    }

    /// Reserves `width` columns, wrapping first when `fit_width` columns do not fit. Returns the
    /// visible part, or `None` when it falls outside the area.
    fn place(&mut self, width: u16, fit_width: u16) -> Option<Rect> {
        if fit_width > self.area.right().saturating_sub(self.x) && !self.at_line_start() {
            self.newline();
        }
        let w = width.min(self.area.right().saturating_sub(self.x));
        let rect = Rect::new(self.x, self.y, w, 1);
        self.x = self.x.saturating_add(w);
        if w == 0 || self.y >= self.area.bottom() {
            return None;
        }
        Some(rect)
    }
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.left() && x < rect.right() && y >= rect.top() && y < rect.bottom()
}

/// Natural-language form: prose with inline fields.
///
/// The form owns the single piece of shared state: which child position is open, if any.
/// Opening one field closes whichever was open.
#[derive(Clone, Debug, Default)]
pub struct NlForm {
    items: Vec<FormItem>,
    open: Option<usize>,
    focus: Option<usize>,
    bindings: FormBindings,
    layout: FormLayout,
    id: Option<String>,
}

impl NlForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<FormItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn with_bindings(mut self, bindings: FormBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn bindings(&self) -> &FormBindings {
        &self.bindings
    }

    pub fn text(mut self, text: impl Into<FormItem>) -> Self {
        self.items.push(text.into());
        self
    }

    pub fn line_break(mut self) -> Self {
        self.items.push(FormItem::Break);
        self
    }

    pub fn select(mut self, field: SelectField) -> Self {
        self.items.push(FormItem::Select(field));
        self
    }

    pub fn input(mut self, field: TextField) -> Self {
        self.items.push(FormItem::Input(field));
        self
    }

    pub fn submit(mut self, label: impl Into<String>) -> Self {
        self.items.push(FormItem::Submit(SubmitButton::new(label)));
        self
    }

    /// Appends a child, returning its position.
    pub fn push(&mut self, item: impl Into<FormItem>) -> usize {
        self.items.push(item.into());
        self.items.len() - 1
    }

    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&FormItem> {
        self.items.get(index)
    }

    pub fn select_field(&self, index: usize) -> Option<&SelectField> {
        match self.items.get(index) {
            Some(FormItem::Select(f)) => Some(f),
            _ => None,
        }
    }

    pub fn select_field_mut(&mut self, index: usize) -> Option<&mut SelectField> {
        match self.items.get_mut(index) {
            Some(FormItem::Select(f)) => Some(f),
            _ => None,
        }
    }

    pub fn text_field(&self, index: usize) -> Option<&TextField> {
        match self.items.get(index) {
            Some(FormItem::Input(f)) => Some(f),
            _ => None,
        }
    }

    pub fn text_field_mut(&mut self, index: usize) -> Option<&mut TextField> {
        match self.items.get_mut(index) {
            Some(FormItem::Input(f)) => Some(f),
            _ => None,
        }
    }

    pub fn is_field(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(FormItem::is_field)
    }

    /// Position of the open field.
    pub fn open_field(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Opens the field at `index`, closing any other. Returns `false` for non-field positions
    /// and for the field that is already open.
    pub fn open(&mut self, index: usize) -> bool {
        if self.open == Some(index) {
            return false;
        }
        match self.items.get_mut(index) {
            Some(FormItem::Select(f)) => f.on_open(),
            Some(FormItem::Input(f)) => f.on_open(),
            _ => {
                log::trace!("ignoring open request for non-field child {index}");
                return false;
            }
        }
        log::debug!("open field {index} (was {:?})", self.open);
        self.open = Some(index);
        self.focus = Some(index);
        true
    }

    /// Closes the open field, if any.
    pub fn close(&mut self) -> bool {
        match self.open.take() {
            Some(index) => {
                log::debug!("close field {index}");
                true
            }
            None => false,
        }
    }

    /// Child position with keyboard focus.
    pub fn focused(&self) -> Option<usize> {
        self.focus
    }

    pub fn set_focus(&mut self, index: usize) -> bool {
        if !self.items.get(index).is_some_and(FormItem::is_focusable) {
            return false;
        }
        self.focus = Some(index);
        true
    }

    /// Current value of every field, in child order.
    pub fn values(&self) -> Vec<FieldValue> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                FormItem::Select(f) => Some(FieldValue {
                    index,
                    id: f.id().map(str::to_string),
                    value: f
                        .selected_option()
                        .map(|o| o.value.clone())
                        .unwrap_or_else(|| f.value().to_string()),
                    label: f.selected_option().map(|o| o.label.clone()),
                }),
                FormItem::Input(f) => Some(FieldValue {
                    index,
                    id: f.id().map(str::to_string),
                    value: f.text().to_string(),
                    label: None,
                }),
                _ => None,
            })
            .collect()
    }

    /// Closes any open field and reports every field's value.
    pub fn submit_values(&mut self) -> FormAction {
        self.close();
        let values = self.values();
        log::debug!("submit form with {} fields", values.len());
        FormAction::Submitted(values)
    }

    /// Where the terminal cursor belongs, when an open text field was rendered.
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        let (index, _) = self.layout.panel?;
        if self.open != Some(index) {
            return None;
        }
        self.layout.cursor
    }

    /// Area of the open panel in the last render.
    pub fn panel_area(&self) -> Option<Rect> {
        self.layout
            .panel
            .filter(|(index, _)| self.open == Some(*index))
            .map(|(_, rect)| rect)
    }

    /// Toggle (or submit button) area of child `index` in the last render.
    pub fn item_area(&self, index: usize) -> Option<Rect> {
        self.layout
            .hits
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, rect)| *rect)
    }

    /// Bindings that apply in the current state, for a help bar.
    pub fn help_bindings(&self) -> Vec<Binding> {
        let b = &self.bindings;
        match self.open.and_then(|k| self.items.get(k)) {
            Some(FormItem::Select(_)) => vec![
                b.up.clone(),
                b.down.clone(),
                b.confirm.clone(),
                b.close.clone(),
            ],
            Some(FormItem::Input(_)) => vec![
                Binding::new(b.confirm.help_key.clone(), "go", b.confirm.keys.clone()),
                b.close.clone(),
            ],
            _ => vec![b.next.clone(), b.prev.clone(), b.activate.clone()],
        }
    }

    pub fn handle_event(&mut self, event: InputEvent, theme: &Theme) -> FormAction {
        match event {
            InputEvent::Mouse(m) => self.handle_mouse(m, theme),
            InputEvent::Key(key) => match self.open {
                Some(k) => self.handle_open_key(k, key),
                None => self.handle_closed_key(key),
            },
            InputEvent::Paste(s) => match self.open {
                Some(k) => match self.items.get_mut(k) {
                    Some(FormItem::Input(f)) => {
                        let action = f.handle_event(InputEvent::Paste(s), &self.bindings);
                        self.apply(k, action)
                    }
                    _ => FormAction::None,
                },
                None => FormAction::None,
            },
        }
    }

    fn handle_open_key(&mut self, k: usize, key: KeyEvent) -> FormAction {
        let action = match self.items.get_mut(k) {
            Some(FormItem::Select(f)) => f.handle_key(&key, &self.bindings),
            Some(FormItem::Input(f)) => f.handle_event(InputEvent::Key(key), &self.bindings),
            _ => FieldAction::None,
        };
        self.apply(k, action)
    }

    fn handle_closed_key(&mut self, key: KeyEvent) -> FormAction {
        if self.bindings.next.matches(&key) {
            return self.step_focus(true);
        }
        if self.bindings.prev.matches(&key) {
            return self.step_focus(false);
        }
        if !self.bindings.activate.matches(&key) {
            log::trace!("unbound key {:?}", key.code);
            return FormAction::None;
        }
        let Some(k) = self.focus else {
            return self.step_focus(true);
        };
        self.activate_item(k)
    }

    fn activate_item(&mut self, k: usize) -> FormAction {
        let is_open = self.is_open(k);
        let action = match self.items.get(k) {
            Some(FormItem::Select(f)) => f.toggle(is_open),
            Some(FormItem::Input(f)) => f.toggle(is_open),
            Some(FormItem::Submit(_)) => return self.submit_values(),
            _ => FieldAction::None,
        };
        self.apply(k, action)
    }

    fn step_focus(&mut self, forward: bool) -> FormAction {
        let focusable: Vec<usize> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_focusable())
            .map(|(i, _)| i)
            .collect();
        let (Some(&first), Some(&last)) = (focusable.first(), focusable.last()) else {
            return FormAction::None;
        };
        let pos = self
            .focus
            .and_then(|f| focusable.iter().position(|&i| i == f));
        let next = match (pos, forward) {
            (None, true) => first,
            (None, false) => last,
            (Some(p), true) => focusable[(p + 1) % focusable.len()],
            (Some(p), false) => focusable[(p + focusable.len() - 1) % focusable.len()],
        };
        self.focus = Some(next);
        FormAction::Redraw
    }

    fn handle_mouse(&mut self, m: MouseEvent, theme: &Theme) -> FormAction {
        let Some(k) = self.open else {
            if !m.is_left_down() {
                return FormAction::None;
            }
            let Some(hit) = self
                .layout
                .hits
                .iter()
                .find(|(_, rect)| contains(*rect, m.x, m.y))
                .map(|(i, _)| *i)
            else {
                return FormAction::None;
            };
            self.focus = Some(hit);
            return self.activate_item(hit);
        };

        let panel = self.panel_area();
        let inside = panel.is_some_and(|rect| contains(rect, m.x, m.y));
        match m.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let (Some(panel), Some(FormItem::Select(f))) = (panel, self.items.get_mut(k))
                else {
                    return FormAction::None;
                };
                let action = match f.option_at(panel, theme, m.x, m.y) {
                    Some(row) => f.hover(row),
                    None => FieldAction::None,
                };
                self.apply(k, action)
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown if inside => {
                let down = m.kind == MouseEventKind::ScrollDown;
                let action = match self.items.get_mut(k) {
                    Some(FormItem::Select(f)) => f.step_highlight(down),
                    _ => FieldAction::None,
                };
                self.apply(k, action)
            }
            _ if !m.is_left_down() => FormAction::None,
            _ if !inside => {
                // Overlay click: dismiss without confirming.
                self.close();
                FormAction::Closed
            }
            _ => {
                let Some(panel) = panel else {
                    return FormAction::None;
                };
                let action = match self.items.get_mut(k) {
                    Some(FormItem::Select(f)) => f.panel_click(panel, theme, m.x, m.y),
                    Some(FormItem::Input(f)) => f.panel_click(panel, theme, m.x, m.y),
                    _ => FieldAction::None,
                };
                self.apply(k, action)
            }
        }
    }

    fn apply(&mut self, k: usize, action: FieldAction) -> FormAction {
        match action {
            FieldAction::None => FormAction::None,
            FieldAction::Redraw => FormAction::Redraw,
            FieldAction::RequestOpen => {
                if self.open(k) {
                    FormAction::Opened(k)
                } else {
                    FormAction::None
                }
            }
            FieldAction::RequestClose => {
                if self.close() {
                    FormAction::Closed
                } else {
                    FormAction::None
                }
            }
            FieldAction::Selected { value, label } => {
                self.close();
                FormAction::Selected {
                    index: k,
                    value,
                    label,
                }
            }
            FieldAction::Confirmed(value) => {
                self.close();
                FormAction::Confirmed { index: k, value }
            }
        }
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.layout = FormLayout::default();
        if area.is_empty() {
            return;
        }

        let base = theme.form_style();
        render::fill(area, buf, base);
        let margin = theme.form.margin.min(area.width / 2);
        let content = Rect::new(
            area.x + margin,
            area.y,
            area.width - margin * 2,
            area.height,
        );
        let mut flow = Flow::new(content, theme.form.line_spacing);

        for (idx, item) in self.items.iter().enumerate() {
            match item {
                FormItem::Text(span) => {
                    let style = base.patch(span.style);
                    for word in span.content.split_inclusive(' ') {
                        if flow.at_line_start() && word.trim().is_empty() {
                            continue;
                        }
                        let fit = render::str_width(word.trim_end());
                        if let Some(rect) = flow.place(render::str_width(word), fit) {
                            render::render_str_clipped(
                                rect.x, rect.y, 0, rect.width, buf, word, style,
                            );
                        }
                    }
                }
                FormItem::Break => flow.newline(),
                FormItem::Select(_) | FormItem::Input(_) => {
                    let label = item.toggle_label().unwrap_or_default();
                    let pad = theme.field.padding;
                    let w = render::str_width(&label).saturating_add(pad.saturating_mul(2));
                    if let Some(rect) = flow.place(w, w) {
                        let style = theme.toggle_style(self.focus == Some(idx));
                        let pad = pad.min(rect.width);
                        render::render_str_clipped(
                            rect.x + pad,
                            rect.y,
                            0,
                            rect.width - pad,
                            buf,
                            &label,
                            style,
                        );
                        self.layout.hits.push((idx, rect));
                    }
                }
                FormItem::Submit(button) => {
                    if !flow.at_line_start() {
                        flow.newline();
                    }
                    flow.skip_rows(theme.submit_wrap.margin_top);
                    let w = button.width(theme).min(content.width);
                    let x = match theme.submit_wrap.align {
                        TextAlign::Left => content.x,
                        TextAlign::Center => content.x + (content.width - w) / 2,
                        TextAlign::Right => content.right() - w,
                    };
                    flow.indent_to(x);
                    if let Some(rect) = flow.place(w, w) {
                        button.render_ref(rect, buf, theme, self.focus == Some(idx));
                        self.layout.hits.push((idx, rect));
                    }
                    flow.newline();
                }
            }
        }

        if let Some(k) = self.open {
            self.render_open_panel(k, area, content, buf, theme);
        }
    }

    fn render_open_panel(
        &mut self,
        k: usize,
        area: Rect,
        content: Rect,
        buf: &mut Buffer,
        theme: &Theme,
    ) {
        buf.set_style(area, theme.overlay_style());

        let anchor = self
            .item_area(k)
            .unwrap_or(Rect::new(content.x, content.y, 0, 1));
        let (w, h) = match self.items.get(k) {
            Some(FormItem::Select(f)) => f.panel_size(theme),
            Some(FormItem::Input(f)) => f.panel_size(theme),
            _ => return,
        };
        // One column left of the toggle, centred vertically on it.
        let panel = render::clamp_rect(
            Rect::new(
                anchor.x.saturating_sub(1),
                anchor.y.saturating_sub(h.saturating_sub(1) / 2),
                w,
                h,
            ),
            area,
        );

        match self.items.get_mut(k) {
            Some(FormItem::Select(f)) => f.render_panel(panel, buf, theme),
            Some(FormItem::Input(f)) => {
                f.render_panel(panel, buf, theme);
                self.layout.cursor = f.cursor_pos(panel, theme);
            }
            _ => return,
        }
        self.layout.panel = Some((k, panel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldOption;
    use ratatui_nlform_core::input::KeyCode;

    fn form() -> NlForm {
        let options = vec![FieldOption::new("1", "any"), FieldOption::new("2", "two")];
        NlForm::new()
            .text("a ")
            .select(SelectField::new(options.clone(), "1"))
            .text(" b ")
            .select(SelectField::new(options, "2"))
            .input(TextField::new("").with_placeholder("city"))
            .submit("Go")
    }

    #[test]
    fn starts_closed() {
        let f = form();
        assert_eq!(f.open_field(), None);
        assert!(!f.is_open(1));
    }

    #[test]
    fn opening_another_field_closes_the_first() {
        let mut f = form();
        assert!(f.open(1));
        assert!(f.open(3));
        assert!(!f.is_open(1));
        assert!(f.is_open(3));
        assert!(!f.open(3));
    }

    #[test]
    fn non_field_positions_cannot_open() {
        let mut f = form();
        assert!(!f.open(0));
        assert!(!f.open(5));
        assert!(!f.open(42));
        assert_eq!(f.open_field(), None);
    }

    #[test]
    fn close_resets_from_any_state() {
        let mut f = form();
        assert!(!f.close());
        f.open(4);
        assert!(f.close());
        assert_eq!(f.open_field(), None);
    }

    #[test]
    fn tab_cycles_focusable_children() {
        let mut f = form();
        let theme = Theme::default();
        let tab = || InputEvent::key(KeyCode::Tab);
        let order: Vec<Option<usize>> = (0..5)
            .map(|_| {
                f.handle_event(tab(), &theme);
                f.focused()
            })
            .collect();
        assert_eq!(order, vec![Some(1), Some(3), Some(4), Some(5), Some(1)]);
        f.handle_event(InputEvent::key(KeyCode::BackTab), &theme);
        assert_eq!(f.focused(), Some(5));
    }

    #[test]
    fn enter_opens_focused_field() {
        let mut f = form();
        let theme = Theme::default();
        f.set_focus(3);
        assert_eq!(
            f.handle_event(InputEvent::key(KeyCode::Enter), &theme),
            FormAction::Opened(3)
        );
        assert_eq!(
            f.handle_event(InputEvent::key(KeyCode::Esc), &theme),
            FormAction::Closed
        );
        assert_eq!(f.focused(), Some(3));
    }

    #[test]
    fn submit_reports_every_field_unvalidated() {
        let mut f = form();
        f.open(1);
        let FormAction::Submitted(values) = f.submit_values() else {
            panic!("expected submit");
        };
        assert_eq!(f.open_field(), None);
        let got: Vec<(usize, &str, Option<&str>)> = values
            .iter()
            .map(|v| (v.index, v.value.as_str(), v.label.as_deref()))
            .collect();
        assert_eq!(
            got,
            vec![(1, "1", Some("any")), (3, "2", Some("two")), (4, "", None)]
        );
    }

    #[test]
    fn flow_wraps_words_and_skips_leading_spaces() {
        let mut flow = Flow::new(Rect::new(0, 0, 6, 10), 1);
        assert_eq!(flow.place(4, 3), Some(Rect::new(0, 0, 4, 1)));
        assert_eq!(flow.place(3, 3), Some(Rect::new(0, 2, 3, 1)));
        assert!(!flow.at_line_start());
        flow.newline();
        assert_eq!(flow.place(10, 10), Some(Rect::new(0, 4, 6, 1)));
    }
}
