//! Hint text shown under a text field.
//!
//! Sublines are read as CommonMark inline text. On top of Markdown emphasis, a few raw tags are
//! honoured: `<em>`/`<i>` (italic), `<strong>`/`<b>` (bold), `<u>` (underline) and `<br>`. Any
//! other HTML is shown literally, entities are decoded by the parser, and control characters are
//! dropped so a hint can never carry terminal escape sequences.

use pulldown_cmark::Event;
use pulldown_cmark::Options;
use pulldown_cmark::Parser;
use pulldown_cmark::Tag;
use pulldown_cmark::TagEnd;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subline {
    lines: Vec<Line<'static>>,
}

impl Subline {
    /// Parses the supported inline tags.
    pub fn markup(src: &str) -> Self {
        Self {
            lines: parse_markup(src),
        }
    }

    /// Uses `src` verbatim (minus control characters) with no tag handling.
    pub fn plain(src: &str) -> Self {
        let lines = src
            .split('\n')
            .map(|l| Line::from(Span::raw(strip_controls(l))))
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.width() == 0)
    }

    /// Widest line, in columns.
    pub fn width(&self) -> u16 {
        self.lines
            .iter()
            .map(|l| l.width().min(u16::MAX as usize) as u16)
            .max()
            .unwrap_or(0)
    }

    pub fn height(&self) -> u16 {
        self.lines.len().min(u16::MAX as usize) as u16
    }
}

impl From<&str> for Subline {
    fn from(src: &str) -> Self {
        Self::markup(src)
    }
}

impl From<String> for Subline {
    fn from(src: String) -> Self {
        Self::markup(&src)
    }
}

fn tag_modifier(name: &str) -> Option<Modifier> {
    match name {
        "em" | "i" => Some(Modifier::ITALIC),
        "strong" | "b" => Some(Modifier::BOLD),
        "u" => Some(Modifier::UNDERLINED),
        _ => None,
    }
}

enum Markup {
    Open(Modifier),
    Close(Modifier),
    Break,
}

/// Recognises raw HTML that is exactly one whitelisted tag, such as `<em>`, `</b>` or `<br/>`.
fn single_tag(html: &str) -> Option<Markup> {
    let inner = html.trim().strip_prefix('<')?.strip_suffix('>')?;
    if inner.contains(['<', '>']) {
        return None;
    }
    let (closing, name) = match inner.trim().strip_prefix('/') {
        Some(rest) => (true, rest.trim()),
        None => (false, inner.trim().trim_end_matches('/').trim()),
    };
    let name = name.to_ascii_lowercase();
    if name == "br" {
        return Some(Markup::Break);
    }
    let modifier = tag_modifier(&name)?;
    Some(if closing {
        Markup::Close(modifier)
    } else {
        Markup::Open(modifier)
    })
}

#[derive(Default)]
struct Builder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    text: String,
    stack: Vec<Modifier>,
}

impl Builder {
    fn style(&self) -> Style {
        self.stack
            .iter()
            .fold(Style::default(), |s, m| s.add_modifier(*m))
    }

    fn has_content(&self) -> bool {
        !self.lines.is_empty() || !self.spans.is_empty() || !self.text.is_empty()
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let style = self.style();
        self.spans
            .push(Span::styled(std::mem::take(&mut self.text), style));
    }

    fn end_line(&mut self) {
        self.flush_text();
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }

    /// Appends text as-is: newlines end the line, other control characters are dropped.
    fn push_literal(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\n' => self.end_line(),
                c if c.is_control() => {}
                c => self.text.push(c),
            }
        }
    }

    fn apply(&mut self, markup: Markup) {
        self.flush_text();
        match markup {
            Markup::Open(m) => self.stack.push(m),
            Markup::Close(m) => {
                // Unbalanced closers are ignored.
                if let Some(pos) = self.stack.iter().rposition(|x| *x == m) {
                    self.stack.remove(pos);
                }
            }
            Markup::Break => self.end_line(),
        }
    }
}

fn parse_markup(src: &str) -> Vec<Line<'static>> {
    let mut b = Builder::default();
    for event in Parser::new_ext(src, Options::ENABLE_STRIKETHROUGH) {
        match event {
            Event::Start(Tag::Paragraph) => {
                if b.has_content() {
                    b.end_line();
                }
            }
            Event::Start(Tag::Emphasis) => b.apply(Markup::Open(Modifier::ITALIC)),
            Event::End(TagEnd::Emphasis) => b.apply(Markup::Close(Modifier::ITALIC)),
            Event::Start(Tag::Strong) => b.apply(Markup::Open(Modifier::BOLD)),
            Event::End(TagEnd::Strong) => b.apply(Markup::Close(Modifier::BOLD)),
            Event::Start(Tag::Strikethrough) => b.apply(Markup::Open(Modifier::CROSSED_OUT)),
            Event::End(TagEnd::Strikethrough) => b.apply(Markup::Close(Modifier::CROSSED_OUT)),
            Event::Text(text) | Event::Code(text) => b.push_literal(&text),
            Event::InlineHtml(html) | Event::Html(html) => match single_tag(&html) {
                Some(markup) => b.apply(markup),
                None => b.push_literal(html.trim_end_matches('\n')),
            },
            Event::SoftBreak | Event::HardBreak => b.end_line(),
            _ => {}
        }
    }
    b.end_line();
    b.lines
}

fn strip_controls(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn emphasis_becomes_italic_spans() {
        let sub = Subline::markup("For example: <em>Los Angeles</em> or <em>New York</em>");
        assert_eq!(sub.lines().len(), 1);
        let line = &sub.lines()[0];
        assert_eq!(plain_text(line), "For example: Los Angeles or New York");
        assert_eq!(line.spans[1].content, "Los Angeles");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::ITALIC));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn unknown_tags_stay_literal() {
        let sub = Subline::markup("<span>x</span> &lt;ok&gt;");
        assert_eq!(plain_text(&sub.lines()[0]), "<span>x</span> <ok>");
        let sub = Subline::markup("<script>alert(1)</script>");
        assert_eq!(plain_text(&sub.lines()[0]), "<script>alert(1)</script>");
    }

    #[test]
    fn entities_and_markdown_emphasis() {
        let sub = Subline::markup("Caf&eacute; &amp; *fast*");
        let line = &sub.lines()[0];
        assert_eq!(plain_text(line), "Café & fast");
        let last = line.spans.last().unwrap();
        assert_eq!(last.content, "fast");
        assert!(last.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn escape_sequences_are_stripped() {
        let sub = Subline::markup("a\u{1b}[31mb");
        assert_eq!(plain_text(&sub.lines()[0]), "a[31mb");
        let sub = Subline::plain("<em>x</em>\u{7}");
        assert_eq!(plain_text(&sub.lines()[0]), "<em>x</em>");
    }

    #[test]
    fn break_tag_splits_lines() {
        let sub = Subline::markup("one<br/>two <b>three</b>");
        assert_eq!(sub.height(), 2);
        assert_eq!(plain_text(&sub.lines()[1]), "two three");
        assert_eq!(sub.width(), 9);
    }

    #[test]
    fn empty_source_is_empty() {
        assert!(Subline::markup("").is_empty());
    }
}
