//! `ratatui-nlform` renders sentence-like forms for terminal UIs: inline dropdowns and text
//! inputs embedded in prose, each opening a panel of choices when activated.
//!
//! ```text
//! I feel to eat any food
//! in a standard restaurant
//! at anytime in any city
//! ```
//!
//! Entry points:
//! - [`form::NlForm`]: the container. Owns which field is open (at most one) and routes input.
//! - [`select::SelectField`] and [`text_field::TextField`]: the inline fields.
//! - [`theme::Theme`] / [`theme::ThemeOverride`]: styling, merged per group.
//!
//! Input is toolkit-neutral ([`input::InputEvent`]); enable the `crossterm` feature for
//! [`crossterm_input`] conversions. Interactions are reported as [`form::FormAction`] values
//! rather than callbacks:
//!
//! ```
//! use ratatui_nlform::field::FieldOption;
//! use ratatui_nlform::form::{FormAction, NlForm};
//! use ratatui_nlform::input::{InputEvent, KeyCode};
//! use ratatui_nlform::select::SelectField;
//! use ratatui_nlform::theme::Theme;
//!
//! let theme = Theme::default();
//! let times = vec![FieldOption::new("1", "anytime"), FieldOption::new("2", "7 p.m.")];
//! let mut form = NlForm::new().text("at ").select(SelectField::new(times, "1"));
//!
//! form.open(1);
//! form.handle_event(InputEvent::key(KeyCode::Down), &theme);
//! let action = form.handle_event(InputEvent::key(KeyCode::Enter), &theme);
//! assert_eq!(
//!     action,
//!     FormAction::Selected { index: 1, value: "2".into(), label: "7 p.m.".into() }
//! );
//! assert_eq!(form.open_field(), None);
//! ```
pub use ratatui_nlform_core::error;
pub use ratatui_nlform_core::input;
pub use ratatui_nlform_core::keymap;
pub use ratatui_nlform_core::line_input;
pub use ratatui_nlform_core::render;
pub use ratatui_nlform_core::subline;
pub use ratatui_nlform_core::theme;

#[cfg(feature = "crossterm")]
pub use ratatui_nlform_core::crossterm_input;

pub mod field;
pub mod form;
pub mod help;
pub mod select;
pub mod submit;
pub mod text_field;
