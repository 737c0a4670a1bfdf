//! Plain-text → heading-annotated markdown.
//!
//! Two rewrites, applied in order:
//! 1. A line starting with a Roman numeral I–V, a dot and a space
//!    (`II. Опыт работы`) becomes a level-1 heading followed by the title.
//! 2. Any `*emphasised phrase*` becomes a level-2 heading followed by the phrase.
//!
//! The captured text is repeated on the line after the heading, so it stays
//! in the fragment body even though the splitter strips heading lines.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(I{1,3}|IV|V)\. (.+)").expect("section pattern is a valid regex")
});

static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]+)\*").expect("emphasis pattern is a valid regex"));

/// Deterministic; the same input always yields the same output.
pub fn text_to_markdown(text: &str) -> String {
    let sections = SECTION_RE.replace_all(text, |caps: &Captures| {
        format!("# {title}\n{title}", title = &caps[2])
    });

    EMPHASIS_RE
        .replace_all(&sections, |caps: &Captures| {
            format!("## {phrase}\n{phrase}", phrase = &caps[1])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_sections_become_h1() {
        let md = text_to_markdown("I. Опыт\nтекст\nIV. Навыки\n");
        assert_eq!(md, "# Опыт\nОпыт\nтекст\n# Навыки\nНавыки\n");
    }

    #[test]
    fn only_numerals_one_to_five_match() {
        let src = "VI. Шесть\nX. Десять\nI.без пробела\n";
        assert_eq!(text_to_markdown(src), src);
    }

    #[test]
    fn section_must_start_the_line() {
        let src = "см. раздел I. Опыт";
        assert_eq!(text_to_markdown(src), src);
    }

    #[test]
    fn emphasis_becomes_h2() {
        let md = text_to_markdown("До *Зарплата* после");
        assert_eq!(md, "До ## Зарплата\nЗарплата после");
    }

    #[test]
    fn emphasis_may_span_lines() {
        assert_eq!(text_to_markdown("*a\nb*"), "## a\nb\na\nb");
    }

    #[test]
    fn section_and_emphasis_combine() {
        let md = text_to_markdown("II. *Цели*\n");
        assert_eq!(md, "# ## Цели\nЦели\n## Цели\nЦели\n");
    }

    #[test]
    fn text_without_markers_is_unchanged() {
        let src = "обычный текст, 2 * 3 = 6";
        assert_eq!(text_to_markdown(src), src);
    }
}
