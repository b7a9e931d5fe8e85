use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui_nlform_core::render;
use ratatui_nlform_core::theme::Theme;

/// Button that submits its form. Always laid out on its own line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitButton {
    label: String,
}

impl SubmitButton {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn display_label(&self, theme: &Theme) -> String {
        if theme.submit_button.uppercase {
            self.label.to_uppercase()
        } else {
            self.label.clone()
        }
    }

    pub fn width(&self, theme: &Theme) -> u16 {
        render::str_width(&self.display_label(theme))
            .saturating_add(theme.submit_button.padding.saturating_mul(2))
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.is_empty() {
            return;
        }
        let style = theme.submit_style(focused);
        render::fill(area, buf, style);
        let pad = theme.submit_button.padding.min(area.width);
        render::render_str_clipped(
            area.x + pad,
            area.y,
            0,
            area.width - pad,
            buf,
            &self.display_label(theme),
            style,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_follows_text_transform() {
        let mut theme = Theme::default();
        let button = SubmitButton::new("Find a restaurant");
        assert_eq!(button.display_label(&theme), "FIND A RESTAURANT");
        assert_eq!(button.width(&theme), 19);
        theme.submit_button.uppercase = false;
        assert_eq!(button.display_label(&theme), "Find a restaurant");
    }
}
