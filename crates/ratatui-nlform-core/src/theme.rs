//! Form theming: ten named style groups, partial overrides, and explicit provider scopes.
//!
//! A [`Theme`] is always complete. A [`ThemeOverride`] names only the properties it changes;
//! [`resolve_theme`] merges it over a base one group at a time, so unnamed properties keep the
//! base value. Overrides deserialize from TOML:
//!
//! ```toml
//! [field_toggle]
//! color = "#e0a030"
//!
//! [option_item]
//! checked_color = "black"
//! ```
//!
//! `Color::Reset` on a background means "transparent": the surface underneath shows through.

use crate::error::Error;
use crate::error::Result;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use serde::Deserialize;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

macro_rules! style_groups {
    ($(
        $(#[$group_meta:meta])*
        $group:ident: $Group:ident, $GroupOverride:ident {
            $( $(#[$field_meta:meta])* $field:ident: $ty:ty = $default:expr, )*
        }
    )*) => {
        $(
            $(#[$group_meta])*
            #[derive(Clone, Debug, PartialEq, Eq)]
            pub struct $Group {
                $( $(#[$field_meta])* pub $field: $ty, )*
            }

            impl Default for $Group {
                fn default() -> Self {
                    Self { $( $field: $default, )* }
                }
            }

            #[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
            #[serde(default, deny_unknown_fields)]
            pub struct $GroupOverride {
                $( pub $field: Option<$ty>, )*
            }

            impl $Group {
                /// Properties set in `over` replace ours; the rest are kept.
                pub fn merged(&self, over: &$GroupOverride) -> Self {
                    Self {
                        $( $field: over.$field.clone().unwrap_or_else(|| self.$field.clone()), )*
                    }
                }
            }

            impl $GroupOverride {
                pub fn is_empty(&self) -> bool {
                    true $( && self.$field.is_none() )*
                }

                fn then(self, later: Self) -> Self {
                    Self {
                        $( $field: later.$field.or(self.$field), )*
                    }
                }
            }
        )*

        /// Complete visual configuration of a form.
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct Theme {
            $( pub $group: $Group, )*
        }

        /// Partial theme: every group and every property is optional.
        #[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct ThemeOverride {
            $( pub $group: $GroupOverride, )*
        }

        impl Theme {
            /// Shallow per-group merge of `over` onto `self`.
            pub fn merged(&self, over: &ThemeOverride) -> Self {
                Self {
                    $( $group: self.$group.merged(&over.$group), )*
                }
            }
        }

        impl ThemeOverride {
            pub fn is_empty(&self) -> bool {
                true $( && self.$group.is_empty() )*
            }

            /// Layers `later` on top of `self`; properties named by both take `later`'s value.
            pub fn then(self, later: ThemeOverride) -> ThemeOverride {
                ThemeOverride {
                    $( $group: self.$group.then(later.$group), )*
                }
            }
        }
    };
}

style_groups! {
    /// The prose surrounding the fields.
    form: FormStyle, FormStyleOverride {
        color: Color = Color::Reset,
        background: Color = Color::Reset,
        bold: bool = false,
        /// Columns of indent on both sides.
        margin: u16 = 1,
        /// Blank rows between wrapped lines.
        line_spacing: u16 = 1,
    }

    field: FieldStyle, FieldStyleOverride {
        /// Blank columns on each side of a field's toggle.
        padding: u16 = 0,
        /// Reverse video on the toggle that has keyboard focus.
        focus_reversed: bool = true,
    }

    /// The compact inline label of a field.
    field_toggle: FieldToggleStyle, FieldToggleStyleOverride {
        color: Color = Color::Rgb(0xb1, 0x49, 0x43),
        background: Color = Color::Reset,
        underline: bool = true,
        bold: bool = false,
    }

    /// The panel a field opens.
    options_list: OptionsListStyle, OptionsListStyleOverride {
        background: Color = Color::Rgb(0x76, 0xc3, 0xbd),
        border: bool = false,
        border_color: Color = Color::White,
        min_width: u16 = 12,
        /// Zero means unbounded.
        max_width: u16 = 0,
        padding: u16 = 0,
    }

    option_item: OptionItemStyle, OptionItemStyleOverride {
        color: Color = Color::White,
        background: Color = Color::Reset,
        hover_background: Color = Color::Rgb(0x70, 0xb9, 0xb4),
        checked_color: Color = Color::Rgb(0x47, 0x89, 0x82),
        checked_background: Color = Color::Reset,
        check_mark: String = "✓".to_string(),
        padding_left: u16 = 1,
        padding_right: u16 = 3,
    }

    input: InputStyle, InputStyleOverride {
        color: Color = Color::White,
        background: Color = Color::Reset,
        placeholder_color: Color = Color::Rgb(0xe4, 0xf3, 0xf2),
        /// Minimum editable columns, excluding the go control.
        width: u16 = 20,
        go_symbol: String = "→".to_string(),
        go_color: Color = Color::White,
        go_background: Color = Color::Rgb(0x6a, 0xb0, 0xaa),
    }

    submit_button: SubmitButtonStyle, SubmitButtonStyleOverride {
        color: Color = Color::White,
        background: Color = Color::Rgb(0x76, 0xc3, 0xbd),
        bold: bool = true,
        uppercase: bool = true,
        /// Blank columns on each side of the label.
        padding: u16 = 1,
    }

    submit_wrap: SubmitWrapStyle, SubmitWrapStyleOverride {
        margin_top: u16 = 1,
        align: TextAlign = TextAlign::Left,
    }

    /// Dismissal layer drawn over the form while a field is open.
    overlay: OverlayStyle, OverlayStyleOverride {
        dim: bool = true,
        background: Color = Color::Reset,
    }

    /// Hint rendered under a text field's input.
    subline: SublineStyle, SublineStyleOverride {
        color: Color = Color::Rgb(0x5e, 0x9c, 0x97),
        italic: bool = true,
        bold: bool = false,
        padding: u16 = 1,
        border_top: bool = true,
        border_color: Color = Color::Rgb(0xd6, 0xed, 0xeb),
    }
}

/// Merges `over` onto `base`, group by group.
pub fn resolve_theme(base: &Theme, over: &ThemeOverride) -> Theme {
    base.merged(over)
}

impl ThemeOverride {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let over = Self::from_toml_str(&raw)?;
        log::debug!("loaded theme override from {}", path.display());
        Ok(over)
    }
}

fn with_modifier(style: Style, on: bool, modifier: Modifier) -> Style {
    if on {
        style.add_modifier(modifier)
    } else {
        style
    }
}

/// Uses `color` unless it is `Reset`, in which case `under` shows through.
fn opaque_or(color: Color, under: Color) -> Color {
    if color == Color::Reset { under } else { color }
}

impl Theme {
    pub fn form_style(&self) -> Style {
        let f = &self.form;
        with_modifier(
            Style::default().fg(f.color).bg(f.background),
            f.bold,
            Modifier::BOLD,
        )
    }

    pub fn toggle_style(&self, focused: bool) -> Style {
        let t = &self.field_toggle;
        let mut style = Style::default()
            .fg(t.color)
            .bg(opaque_or(t.background, self.form.background));
        style = with_modifier(style, t.underline, Modifier::UNDERLINED);
        style = with_modifier(style, t.bold, Modifier::BOLD);
        with_modifier(style, focused && self.field.focus_reversed, Modifier::REVERSED)
    }

    pub fn panel_style(&self) -> Style {
        Style::default()
            .fg(self.option_item.color)
            .bg(self.options_list.background)
    }

    pub fn border_style(&self) -> Style {
        Style::default()
            .fg(self.options_list.border_color)
            .bg(self.options_list.background)
    }

    pub fn option_style(&self, checked: bool, hovered: bool) -> Style {
        let item = &self.option_item;
        let list_bg = self.options_list.background;
        let (fg, bg) = if checked {
            (item.checked_color, opaque_or(item.checked_background, list_bg))
        } else {
            (item.color, opaque_or(item.background, list_bg))
        };
        let bg = if hovered {
            opaque_or(item.hover_background, bg)
        } else {
            bg
        };
        Style::default().fg(fg).bg(bg)
    }

    pub fn input_style(&self) -> Style {
        Style::default()
            .fg(self.input.color)
            .bg(opaque_or(self.input.background, self.options_list.background))
    }

    pub fn placeholder_style(&self) -> Style {
        self.input_style().fg(self.input.placeholder_color)
    }

    pub fn go_style(&self) -> Style {
        Style::default()
            .fg(self.input.go_color)
            .bg(opaque_or(self.input.go_background, self.options_list.background))
    }

    pub fn submit_style(&self, focused: bool) -> Style {
        let s = &self.submit_button;
        let style = with_modifier(
            Style::default().fg(s.color).bg(s.background),
            s.bold,
            Modifier::BOLD,
        );
        with_modifier(style, focused && self.field.focus_reversed, Modifier::REVERSED)
    }

    pub fn subline_style(&self) -> Style {
        let s = &self.subline;
        let mut style = Style::default()
            .fg(s.color)
            .bg(self.options_list.background);
        style = with_modifier(style, s.italic, Modifier::ITALIC);
        with_modifier(style, s.bold, Modifier::BOLD)
    }

    pub fn subline_rule_style(&self) -> Style {
        Style::default()
            .fg(self.subline.border_color)
            .bg(self.options_list.background)
    }

    /// Style patched over every cell outside the open panel.
    pub fn overlay_style(&self) -> Style {
        let o = &self.overlay;
        let mut style = Style::default();
        if o.background != Color::Reset {
            style = style.bg(o.background);
        }
        with_modifier(style, o.dim, Modifier::DIM)
    }
}

/// Explicit stack of theme scopes.
///
/// Each [`enter`](Self::enter) resolves its override against the default theme, not against the
/// enclosing scope, so nested scopes replace rather than accumulate.
#[derive(Clone, Debug, Default)]
pub struct ThemeProvider {
    base: Theme,
    scopes: Vec<Theme>,
}

impl ThemeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with one scope already entered.
    pub fn with_override(over: &ThemeOverride) -> Self {
        let mut provider = Self::new();
        provider.enter(over);
        provider
    }

    /// Uses `base` instead of [`Theme::default`] as the merge target for later scopes.
    pub fn with_base(base: Theme) -> Self {
        Self {
            base,
            scopes: Vec::new(),
        }
    }

    pub fn enter(&mut self, over: &ThemeOverride) -> &Theme {
        let theme = resolve_theme(&self.base, over);
        log::debug!("entering theme scope {}", self.scopes.len() + 1);
        self.scopes.push(theme);
        &self.scopes[self.scopes.len() - 1]
    }

    /// Leaves the innermost scope, returning its theme.
    pub fn exit(&mut self) -> Option<Theme> {
        let theme = self.scopes.pop();
        match theme {
            Some(_) => log::debug!("leaving theme scope {}", self.scopes.len() + 1),
            None => log::trace!("theme scope exit with no scope entered"),
        }
        theme
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Theme of the innermost scope.
    pub fn current(&self) -> Result<&Theme> {
        self.scopes.last().ok_or(Error::NoThemeScope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_keeps_default() {
        let over = ThemeOverride::default();
        assert!(over.is_empty());
        assert_eq!(resolve_theme(&Theme::default(), &over), Theme::default());
    }

    #[test]
    fn single_property_leaves_group_siblings() {
        let mut over = ThemeOverride::default();
        over.option_item.checked_color = Some(Color::Black);
        let base = Theme::default();
        let theme = resolve_theme(&base, &over);
        assert_eq!(theme.option_item.checked_color, Color::Black);
        assert_eq!(theme.option_item.color, base.option_item.color);
        assert_eq!(theme.option_item.check_mark, base.option_item.check_mark);
        assert_eq!(theme.options_list, base.options_list);
    }

    #[test]
    fn layered_overrides_match_sequential_merge() {
        let a = ThemeOverride::from_toml_str(
            "[field_toggle]\ncolor = \"red\"\nbold = true\n[overlay]\ndim = false\n",
        )
        .unwrap();
        let b = ThemeOverride::from_toml_str("[field_toggle]\ncolor = \"blue\"\n").unwrap();
        let base = Theme::default();
        let sequential = resolve_theme(&resolve_theme(&base, &a), &b);
        let layered = resolve_theme(&base, &a.then(b));
        assert_eq!(sequential, layered);
        assert_eq!(layered.field_toggle.color, Color::Blue);
        assert!(layered.field_toggle.bold);
        assert!(!layered.overlay.dim);
    }

    #[test]
    fn toml_parses_hex_colors_and_alignment() {
        let over = ThemeOverride::from_toml_str(
            "[options_list]\nbackground = \"#102030\"\n[submit_wrap]\nalign = \"center\"\n",
        )
        .unwrap();
        assert_eq!(
            over.options_list.background,
            Some(Color::Rgb(0x10, 0x20, 0x30))
        );
        assert_eq!(over.submit_wrap.align, Some(TextAlign::Center));
        assert_eq!(over.form, FormStyleOverride::default());
    }

    #[test]
    fn unknown_property_is_rejected() {
        let err = ThemeOverride::from_toml_str("[form]\nfont_size = 4\n").unwrap_err();
        assert!(matches!(err, Error::ThemeParse(_)));
    }

    #[test]
    fn provider_requires_a_scope() {
        let mut provider = ThemeProvider::new();
        assert!(matches!(provider.current(), Err(Error::NoThemeScope)));

        let mut outer = ThemeOverride::default();
        outer.form.bold = Some(true);
        provider.enter(&outer);
        assert!(provider.current().unwrap().form.bold);

        let mut inner = ThemeOverride::default();
        inner.form.margin = Some(4);
        provider.enter(&inner);
        let theme = provider.current().unwrap();
        assert_eq!(theme.form.margin, 4);
        assert!(!theme.form.bold);

        assert_eq!(provider.exit().map(|t| t.form.margin), Some(4));
        assert!(provider.exit().is_some_and(|t| t.form.bold));
        assert_eq!(provider.depth(), 0);
        assert!(provider.exit().is_none());
        assert!(provider.current().is_err());
    }

    #[test]
    fn transparent_item_background_shows_list() {
        let theme = Theme::default();
        let style = theme.option_style(false, false);
        assert_eq!(style.bg, Some(theme.options_list.background));
        let hovered = theme.option_style(true, true);
        assert_eq!(hovered.fg, Some(theme.option_item.checked_color));
        assert_eq!(hovered.bg, Some(theme.option_item.hover_background));
    }
}
