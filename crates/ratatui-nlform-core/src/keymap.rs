use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    pattern.shift == event.shift && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_shift(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(KeyModifiers::shift())
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    })
}

/// Key bindings understood by a natural-language form.
///
/// `next`/`prev`/`activate` apply while every field is closed; `up`/`down`/`confirm`/`close`
/// apply to the open field. Text fields only see `confirm` and `close`: every other key edits
/// the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormBindings {
    pub next: Binding,
    pub prev: Binding,
    pub activate: Binding,
    pub close: Binding,
    pub up: Binding,
    pub down: Binding,
    pub confirm: Binding,
}

impl Default for FormBindings {
    fn default() -> Self {
        Self {
            next: Binding::new(
                "tab",
                "next field",
                vec![key(KeyCode::Tab), key(KeyCode::Right)],
            ),
            prev: Binding::new(
                "shift+tab",
                "previous field",
                vec![
                    key(KeyCode::BackTab),
                    key_shift(KeyCode::Tab),
                    key(KeyCode::Left),
                ],
            ),
            activate: Binding::new(
                "enter",
                "open",
                vec![key(KeyCode::Enter), key_char(' ')],
            ),
            close: Binding::new("esc", "close", vec![key(KeyCode::Esc)]),
            up: Binding::new("↑", "up", vec![key(KeyCode::Up), key_ctrl('p')]),
            down: Binding::new("↓", "down", vec![key(KeyCode::Down), key_ctrl('n')]),
            confirm: Binding::new("enter", "choose", vec![key(KeyCode::Enter)]),
        }
    }
}
