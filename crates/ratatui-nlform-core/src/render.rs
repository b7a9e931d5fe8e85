use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Drops a `Color::Reset` background so the cell keeps the background already drawn there.
pub fn see_through(style: Style) -> Style {
    if style.bg == Some(Color::Reset) {
        Style { bg: None, ..style }
    } else {
        style
    }
}

/// Display width of a run of spans, in terminal columns.
pub fn spans_width(spans: &[Span<'_>]) -> u16 {
    let w: usize = spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    w.min(u16::MAX as usize) as u16
}

pub fn str_width(s: &str) -> u16 {
    UnicodeWidthStr::width(s).min(u16::MAX as usize) as u16
}

/// Draws `spans` on row `y` starting at `x`, skipping the first `start_col` columns and writing
/// at most `max_cols` columns. Spans with the default style fall back to `fallback_style`.
/// A `Color::Reset` background leaves the existing cell background in place.
///
/// Returns the number of columns written.
pub fn render_spans_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    spans: &[Span<'_>],
    fallback_style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;

    for span in spans {
        let style = see_through(if span.style == Style::default() {
            fallback_style
        } else {
            fallback_style.patch(span.style)
        });
        for ch in span.content.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            // Skip anything that starts before the visible window, including a wide char
            // straddling its left edge.
            if col < start_col {
                col += w;
                continue;
            }
            if out_cols + w > max_cols {
                return out_cols as u16;
            }

            let cx = x.saturating_add(out_cols as u16);
            if let Some(cell) = buf.cell_mut((cx, y)) {
                cell.set_style(style);
                cell.set_symbol(ch.encode_utf8(&mut [0u8; 4]));
            }
            if w == 2 {
                if let Some(cell) = buf.cell_mut((cx.saturating_add(1), y)) {
                    cell.set_style(style);
                    cell.set_symbol("");
                }
            }
            out_cols += w;
            col += w;
        }
    }

    out_cols as u16
}

pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    s: &str,
    style: Style,
) -> u16 {
    render_spans_clipped(x, y, start_col, max_cols, buf, &[Span::raw(s)], style)
}

/// Paints every cell of `area` with blanks in `style`. A `Color::Reset` background is
/// transparent: the cells keep their current background.
pub fn fill(area: Rect, buf: &mut Buffer, style: Style) {
    let style = see_through(style);
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                let under = cell.bg;
                cell.reset();
                cell.set_symbol(" ");
                cell.set_style(style);
                if style.bg.is_none() {
                    cell.bg = under;
                }
            }
        }
    }
}

/// Horizontal dashed rule, used above sublines.
pub fn render_dashed_rule(x: u16, y: u16, width: u16, buf: &mut Buffer, style: Style) {
    for dx in 0..width {
        if let Some(cell) = buf.cell_mut((x.saturating_add(dx), y)) {
            cell.set_symbol("╌");
            cell.set_style(see_through(style));
        }
    }
}

/// Moves `rect` (keeping its size when possible) so it lies inside `bounds`.
pub fn clamp_rect(rect: Rect, bounds: Rect) -> Rect {
    let width = rect.width.min(bounds.width);
    let height = rect.height.min(bounds.height);
    let max_x = bounds.right().saturating_sub(width);
    let max_y = bounds.bottom().saturating_sub(height);
    Rect::new(
        rect.x.clamp(bounds.x, max_x.max(bounds.x)),
        rect.y.clamp(bounds.y, max_y.max(bounds.y)),
        width,
        height,
    )
}
