//! `ratatui-nlform-core` provides the building blocks behind `ratatui-nlform`'s natural-language
//! forms.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No ambient state: the [`theme::Theme`] is passed into every render call, and
//!   [`theme::ThemeProvider`] is an explicit value rather than a global.
//! - Widgets never fail; only theme configuration returns [`error::Result`].
//!
//! Useful entry points:
//! - [`theme::resolve_theme`]: merge a partial [`theme::ThemeOverride`] onto a complete theme.
//! - [`line_input::LineInput`]: single-line editor used by text fields.
//! - [`subline::Subline`]: sanitized hint text with minimal inline markup.
//! - [`keymap::FormBindings`]: the default keyboard layout of a form.
pub mod error;
pub mod theme;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod input;
pub mod keymap;
pub mod line_input;
pub mod render;
pub mod subline;
