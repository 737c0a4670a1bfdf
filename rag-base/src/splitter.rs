//! Markdown → ordered fragments, split on `#`, `##` and `###` headings.
//!
//! Rules:
//! - every line is trimmed and stripped of control/format characters;
//! - a heading is the marker alone or the marker followed by a space
//!   (`####` and `#tag` are body text); longer markers are matched first;
//! - a level-L heading pops all active headings of level ≥ L, then is pushed;
//! - heading lines never appear in a body;
//! - inside ``` / ~~~ fences every line (blank ones too) is body text;
//! - outside fences a blank line closes the current paragraph;
//! - consecutive paragraphs under the same heading stack form one fragment;
//!   lines inside a paragraph are joined with `\n`, paragraphs with
//!   [`PARAGRAPH_BREAK`] (a markdown hard break).
//!
//! [`render`] is the inverse used to re-serialise fragments:
//! `split(&render(&split(md))) == split(md)`.

use crate::structs::fragment::{Fragment, Heading};

/// Supported markers, longest first.
const MARKERS: [(&str, u8); 3] = [("###", 3), ("##", 2), ("#", 1)];

/// Separator between paragraphs merged into one fragment body. Cleaned lines
/// never end with a space, so it cannot occur inside a paragraph.
pub const PARAGRAPH_BREAK: &str = "  \n";

/// Splits normalised markdown into fragments. An empty document yields no fragments.
pub fn split(markdown: &str) -> Vec<Fragment> {
    let mut out: Vec<Fragment> = Vec::new();
    let mut stack: Vec<Heading> = Vec::new();
    let mut body: Vec<String> = Vec::new();
    let mut fence: Option<&'static str> = None;

    for raw in markdown.split('\n') {
        let line = clean_line(raw);

        match fence {
            None => fence = opening_fence(&line),
            Some(open) => {
                if line.starts_with(open) {
                    fence = None;
                }
            }
        }

        if fence.is_some() {
            body.push(line);
            continue;
        }

        if let Some(heading) = parse_heading(&line) {
            flush(&mut out, &stack, &mut body);
            stack.retain(|h| h.level < heading.level);
            stack.push(heading);
        } else if line.is_empty() {
            flush(&mut out, &stack, &mut body);
        } else {
            body.push(line);
        }
    }
    flush(&mut out, &stack, &mut body);

    out
}

/// Serialises fragments back to markdown that splits into the same fragments.
pub fn render(fragments: &[Fragment]) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut prev: &[Heading] = &[];

    for (i, fragment) in fragments.iter().enumerate() {
        if i > 0 {
            out.push(String::new());
        }
        let next = fragment.headings.as_slice();
        let start = reemit_from(prev, next);
        out.extend(next[start..].iter().map(ToString::to_string));
        for (p, paragraph) in fragment.body.split(PARAGRAPH_BREAK).enumerate() {
            if p > 0 {
                out.push(String::new());
            }
            out.extend(paragraph.split('\n').map(str::to_string));
        }
        prev = next;
    }

    out.join("\n")
}

/// Index of the first heading in `next` that has to be written so that the
/// active stack becomes exactly `next` when coming from `prev`.
fn reemit_from(prev: &[Heading], next: &[Heading]) -> usize {
    let mut start = prev
        .iter()
        .zip(next)
        .take_while(|(a, b)| a == b)
        .count();

    // A written heading only pops entries of its level or deeper; step back
    // until it also clears every stale entry of `prev`.
    while start > 0
        && prev.len() > start
        && next.get(start).map_or(true, |h| prev[start].level < h.level)
    {
        start -= 1;
    }
    start
}

fn flush(out: &mut Vec<Fragment>, stack: &[Heading], body: &mut Vec<String>) {
    if body.is_empty() {
        return;
    }
    let text = body.join("\n");
    body.clear();

    if let Some(last) = out.last_mut() {
        if last.headings == stack {
            last.body.push_str(PARAGRAPH_BREAK);
            last.body.push_str(&text);
            return;
        }
    }
    out.push(Fragment {
        index: out.len(),
        headings: stack.to_vec(),
        body: text,
    });
}

fn parse_heading(line: &str) -> Option<Heading> {
    MARKERS.iter().find_map(|(marker, level)| {
        let rest = line.strip_prefix(marker)?;
        if rest.is_empty() || rest.starts_with(' ') {
            Some(Heading::new(*level, rest.trim()))
        } else {
            None
        }
    })
}

fn opening_fence(line: &str) -> Option<&'static str> {
    if line.starts_with("```") && line.matches("```").count() == 1 {
        Some("```")
    } else if line.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Filters first and trims after, so a space left next to a removed
/// zero-width character does not survive.
fn clean_line(raw: &str) -> String {
    let kept: String = raw.chars().filter(|c| is_printable(*c)).collect();
    kept.trim().to_string()
}

/// Drops control, format and separator characters other than the plain space.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || c.is_whitespace()
        || matches!(
            c,
            '\u{00AD}'
                | '\u{061C}'
                | '\u{180E}'
                | '\u{200B}'..='\u{200F}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2060}'..='\u{2064}'
                | '\u{2066}'..='\u{206F}'
                | '\u{FEFF}'
                | '\u{FFF9}'..='\u{FFFB}'
        ))
}
