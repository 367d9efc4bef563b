use crate::rect::EPSILON;

/// Break `text` into lines no wider than `max_width`, the way a text block is
/// typeset: explicit newlines always start a new line, lines break at the last
/// space that still fits, and a single word wider than the line is split
/// between characters. Spaces at a break hang off the end of the line and are
/// not part of it.
///
/// `advance` returns the width of a single character in the same unit as
/// `max_width`. Empty text produces no lines; an empty paragraph between two
/// newlines produces an empty line.
///
/// ```
/// use report_gen::layout::wrap_lines;
///
/// let lines = wrap_lines("the quick brown fox", 10.0, |_| 1.0);
/// assert_eq!(lines, vec!["the quick", "brown fox"]);
/// ```
pub fn wrap_lines<F>(text: &str, max_width: f32, mut advance: F) -> Vec<&str>
where
    F: FnMut(char) -> f32,
{
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }

    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        wrap_paragraph(paragraph, max_width, &mut advance, &mut lines);
    }
    lines
}

fn wrap_paragraph<'t, F>(
    paragraph: &'t str,
    max_width: f32,
    advance: &mut F,
    lines: &mut Vec<&'t str>,
) where
    F: FnMut(char) -> f32,
{
    let mut start = 0usize;
    let mut width = 0.0f32;
    let mut last_space: Option<usize> = None;

    for (i, ch) in paragraph.char_indices() {
        if ch == ' ' {
            // spaces may hang past the edge
            last_space = Some(i);
            width += advance(ch);
            continue;
        }

        let w = advance(ch);
        if width + w <= max_width + EPSILON || i == start {
            width += w;
            continue;
        }

        match last_space.filter(|&sp| sp >= start) {
            Some(sp) => {
                lines.push(paragraph[start..sp].trim_end_matches(' '));
                start = sp + 1;
                width = paragraph[start..i].chars().map(&mut *advance).sum::<f32>() + w;
            }
            None => {
                lines.push(&paragraph[start..i]);
                start = i;
                width = w;
            }
        }
        last_space = None;
    }

    lines.push(paragraph[start..].trim_end_matches(' '));
}

/// The widest of the explicit lines in `text`, measured with `advance`
pub fn widest_line<F>(text: &str, mut advance: F) -> f32
where
    F: FnMut(char) -> f32,
{
    text.split('\n')
        .map(|line| line.chars().map(&mut advance).sum::<f32>())
        .fold(0.0, f32::max)
}
