use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

const MASK_CHAR: char = '•';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineInputAction {
    None,
    Changed,
    Submitted(String),
}

/// Single-line text editor.
///
/// The cursor is a char index. `scroll` is the first visible display column and is kept so the
/// cursor stays inside the last rendered width.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    cursor: usize,
    scroll: u32,
    width: u16,
    masked: bool,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every char as `•`. Editing is unaffected.
    pub fn set_masked(&mut self, masked: bool) {
        self.masked = masked;
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Replaces the text and moves the cursor to its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = single_line(&text.into());
        self.cursor = self.text.chars().count();
        self.scroll = 0;
        self.ensure_cursor_visible();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.chars().count();
        self.ensure_cursor_visible();
    }

    pub fn input(&mut self, event: InputEvent) -> LineInputAction {
        match event {
            InputEvent::Paste(s) => {
                let s = single_line(&s);
                if s.is_empty() {
                    return LineInputAction::None;
                }
                for ch in s.chars() {
                    self.insert_char(ch);
                }
                self.ensure_cursor_visible();
                LineInputAction::Changed
            }
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(_) => LineInputAction::None,
        }
    }

    /// Screen position of the cursor when rendered into `area`.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let x = self.cursor_display_x().saturating_sub(self.scroll);
        if x >= area.width as u32 {
            return None;
        }
        Some((area.x + x as u16, area.y))
    }

    pub fn render_ref(&mut self, area: Rect, buf: &mut Buffer, style: Style) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.width = area.width;
        self.ensure_cursor_visible();

        let row = Rect::new(area.x, area.y, area.width, 1);
        buf.set_style(row, render::see_through(style));
        let shown = self.display_text();
        render::render_str_clipped(area.x, area.y, self.scroll, area.width, buf, &shown, style);
    }

    fn display_text(&self) -> String {
        if self.masked {
            self.text.chars().map(|_| MASK_CHAR).collect()
        } else {
            self.text.clone()
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> LineInputAction {
        match key.code {
            KeyCode::Char(c) => {
                if key.modifiers.is_chord() {
                    return LineInputAction::None;
                }
                self.insert_char(c);
                self.ensure_cursor_visible();
                LineInputAction::Changed
            }
            KeyCode::Enter => LineInputAction::Submitted(self.text.clone()),
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return LineInputAction::None;
                }
                self.remove_char_at(self.cursor - 1);
                self.cursor -= 1;
                self.ensure_cursor_visible();
                LineInputAction::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.char_len() {
                    return LineInputAction::None;
                }
                self.remove_char_at(self.cursor);
                self.ensure_cursor_visible();
                LineInputAction::Changed
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                self.ensure_cursor_visible();
                LineInputAction::None
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                self.ensure_cursor_visible();
                LineInputAction::None
            }
            KeyCode::Home => {
                self.cursor = 0;
                self.ensure_cursor_visible();
                LineInputAction::None
            }
            KeyCode::End => {
                self.move_to_end();
                LineInputAction::None
            }
            KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Esc
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown => LineInputAction::None,
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn insert_char(&mut self, ch: char) {
        let byte_idx = byte_index_from_char_index(&self.text, self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
    }

    fn remove_char_at(&mut self, char_idx: usize) {
        let start = byte_index_from_char_index(&self.text, char_idx);
        let end = byte_index_from_char_index(&self.text, char_idx + 1);
        self.text.replace_range(start..end, "");
    }

    fn cursor_display_x(&self) -> u32 {
        if self.masked {
            return self.cursor as u32 * UnicodeWidthChar::width(MASK_CHAR).unwrap_or(1) as u32;
        }
        let mut cols = 0usize;
        for (i, ch) in self.text.chars().enumerate() {
            if i >= self.cursor {
                break;
            }
            cols += UnicodeWidthChar::width(ch).unwrap_or(0);
        }
        cols as u32
    }

    fn ensure_cursor_visible(&mut self) {
        if self.width == 0 {
            return;
        }
        let cx = self.cursor_display_x();
        // The cursor may sit one column past the last char, so it needs a free cell.
        let visible = self.width as u32;
        if cx < self.scroll {
            self.scroll = cx;
        } else if cx >= self.scroll + visible {
            self.scroll = cx + 1 - visible;
        }
        let content = UnicodeWidthStr::width(self.display_text().as_str()) as u32;
        let max_scroll = (content + 1).saturating_sub(visible);
        self.scroll = self.scroll.min(max_scroll);
    }
}

fn byte_index_from_char_index(s: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    match s.char_indices().nth(char_idx) {
        Some((i, _)) => i,
        None => s.len(),
    }
}

/// Collapses line breaks into spaces and drops other control characters.
fn single_line(s: &str) -> String {
    s.replace("\r\n", " ")
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}
