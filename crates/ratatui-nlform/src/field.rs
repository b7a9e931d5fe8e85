use ratatui::layout::Rect;
use ratatui_nlform_core::theme::Theme;

/// One choice of a [`crate::select::SelectField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for FieldOption {
    fn from((value, label): (V, L)) -> Self {
        Self::new(value, label)
    }
}

/// What a field asks of its container after handling input.
///
/// `Selected` and `Confirmed` report a change and also ask the container to close every field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldAction {
    None,
    Redraw,
    RequestOpen,
    RequestClose,
    Selected { value: String, label: String },
    Confirmed(String),
}

/// Snapshot of one field, as reported on submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldValue {
    /// Child position of the field inside its form.
    pub index: usize,
    pub id: Option<String>,
    pub value: String,
    /// Display label of the chosen option; `None` for text fields.
    pub label: Option<String>,
}

/// Area inside a panel's border and horizontal padding.
pub(crate) fn panel_inner(area: Rect, theme: &Theme) -> Rect {
    let list = &theme.options_list;
    let mut inner = area;
    if list.border {
        inner = Rect::new(
            inner.x.saturating_add(1),
            inner.y.saturating_add(1),
            inner.width.saturating_sub(2),
            inner.height.saturating_sub(2),
        );
    }
    let pad = list.padding.min(inner.width / 2);
    Rect::new(
        inner.x + pad,
        inner.y,
        inner.width - pad * 2,
        inner.height,
    )
}

/// Outer panel size for content of `content_w` x `content_h`, honoring the list's border,
/// padding and width bounds.
pub(crate) fn panel_outer_size(content_w: u16, content_h: u16, theme: &Theme) -> (u16, u16) {
    let list = &theme.options_list;
    let chrome = if list.border { 2 } else { 0 };
    let mut w = content_w
        .saturating_add(list.padding.saturating_mul(2))
        .saturating_add(chrome)
        .max(list.min_width);
    if list.max_width > 0 {
        w = w.min(list.max_width);
    }
    (w, content_h.saturating_add(chrome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_area_accounts_for_border_and_padding() {
        let mut theme = Theme::default();
        theme.options_list.border = true;
        theme.options_list.padding = 1;
        assert_eq!(
            panel_inner(Rect::new(0, 0, 10, 4), &theme),
            Rect::new(2, 1, 6, 2)
        );
        assert_eq!(panel_outer_size(6, 2, &theme), (12, 4));
    }

    #[test]
    fn outer_size_respects_bounds() {
        let mut theme = Theme::default();
        theme.options_list.min_width = 5;
        theme.options_list.max_width = 8;
        assert_eq!(panel_outer_size(2, 1, &theme), (5, 1));
        assert_eq!(panel_outer_size(20, 1, &theme), (8, 1));
    }
}
