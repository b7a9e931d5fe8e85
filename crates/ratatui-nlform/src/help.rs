//! One-line key hints for a form.

use crate::form::NlForm;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui_nlform_core::keymap::Binding;
use ratatui_nlform_core::render;
use ratatui_nlform_core::theme::Theme;

const SEPARATOR: &str = " • ";

#[derive(Clone, Debug, PartialEq, Eq)]
struct HelpEntry {
    key: String,
    desc: String,
}

impl HelpEntry {
    fn width(&self) -> u16 {
        render::str_width(&self.key)
            .saturating_add(1)
            .saturating_add(render::str_width(&self.desc))
    }
}

/// `key desc • key desc`, keys in the toggle color and descriptions in the hint color.
///
/// Entries that do not fit are dropped whole, so the bar never ends mid-word. Only a first
/// entry wider than the area is clipped.
#[derive(Clone, Debug)]
pub struct HelpBar {
    entries: Vec<HelpEntry>,
    key_style: Style,
    desc_style: Style,
    separator: String,
}

impl HelpBar {
    /// Hints for the keys `form` accepts in its current state.
    pub fn for_form(form: &NlForm, theme: &Theme) -> Self {
        Self::from_bindings(&form.help_bindings(), theme)
    }

    pub fn from_bindings(bindings: &[Binding], theme: &Theme) -> Self {
        let base = theme.form_style();
        Self {
            entries: bindings
                .iter()
                .map(|b| HelpEntry {
                    key: b.help_key.clone(),
                    desc: b.help_desc.clone(),
                })
                .collect(),
            key_style: base.fg(theme.field_toggle.color),
            desc_style: base.fg(theme.subline.color),
            separator: SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Columns needed to show every entry.
    pub fn width(&self) -> u16 {
        let sep = render::str_width(&self.separator);
        self.entries
            .iter()
            .enumerate()
            .fold(0u16, |w, (i, e)| {
                let w = if i > 0 { w.saturating_add(sep) } else { w };
                w.saturating_add(e.width())
            })
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        render::fill(Rect::new(area.x, area.y, area.width, 1), buf, self.desc_style);

        let sep_w = render::str_width(&self.separator);
        let mut spans: Vec<Span<'_>> = Vec::new();
        let mut used = 0u16;
        for (i, entry) in self.entries.iter().enumerate() {
            let lead = if i > 0 { sep_w } else { 0 };
            if i > 0 && used.saturating_add(lead).saturating_add(entry.width()) > area.width {
                break;
            }
            if i > 0 {
                spans.push(Span::styled(self.separator.as_str(), self.desc_style));
            }
            spans.push(Span::styled(entry.key.as_str(), self.key_style));
            spans.push(Span::styled(" ", self.desc_style));
            spans.push(Span::styled(entry.desc.as_str(), self.desc_style));
            used = used.saturating_add(lead).saturating_add(entry.width());
        }
        render::render_spans_clipped(area.x, area.y, 0, area.width, buf, &spans, self.desc_style);
    }
}
