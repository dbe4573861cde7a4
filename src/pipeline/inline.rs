//! Inline markup tokenizer: one line of markup → flat [`InlineRun`]s.
//!
//! Spans are matched left to right with priority bold (`**…**`), italic
//! (`*…*`), strikethrough (`~~…~~`), link (`[text](url)`), then plain text up
//! to the next `*`, `~` or `[`. Each delimiter pair matches non-greedily and
//! may span line breaks. A marker character that opens no complete span is
//! kept as plain text, so no visible character is ever dropped.
//!
//! Spans nest the way the renderer writes them: `***x***` is bold italic,
//! `~~**x**~~` bold struck through, `[*x*](u)` an italic link. The inside of
//! every span is tokenized again and inherits the span's formatting, so the
//! result is still a flat run list.

use crate::block::InlineRun;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)",
        r"\*\*\*(?P<strong_em>.+?)\*\*\*",
        r"|\*\*(?P<bold>.+?)\*\*",
        r"|\*(?P<italic>.+?)\*",
        r"|~~(?P<strike>.+?)~~",
        r"|\[(?P<label>.+?)\]\((?P<url>.+?)\)",
        r"|(?P<plain>[^*~\[]+)",
    ))
    .unwrap()
});

/// Tokenize `text` into runs. Never returns an empty vector: input with no
/// recognisable content comes back as a single plain run holding `text`.
pub fn parse_inline(text: &str) -> Vec<InlineRun> {
    let mut runs: Vec<InlineRun> = Vec::new();
    tokenize(text, &InlineRun::default(), &mut runs);
    if runs.is_empty() {
        runs.push(InlineRun::plain(text));
    }
    runs
}

/// Tokenize `text` with every run inheriting the formatting of `style`.
fn tokenize(text: &str, style: &InlineRun, runs: &mut Vec<InlineRun>) {
    let mut last = 0;

    for caps in RE_INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(runs, style, &text[last..whole.start()]);
        last = whole.end();

        if let Some(m) = caps.name("strong_em") {
            let inner = InlineRun {
                bold: true,
                italic: true,
                ..style.clone()
            };
            tokenize(m.as_str(), &inner, runs);
        } else if let Some(m) = caps.name("bold") {
            let inner = InlineRun {
                bold: true,
                ..style.clone()
            };
            tokenize(m.as_str(), &inner, runs);
        } else if let Some(m) = caps.name("italic") {
            let inner = InlineRun {
                italic: true,
                ..style.clone()
            };
            tokenize(m.as_str(), &inner, runs);
        } else if let Some(m) = caps.name("strike") {
            let inner = InlineRun {
                strikethrough: true,
                ..style.clone()
            };
            tokenize(m.as_str(), &inner, runs);
        } else if let (Some(label), Some(url)) = (caps.name("label"), caps.name("url")) {
            let inner = InlineRun {
                link: Some(url.as_str().to_string()),
                ..style.clone()
            };
            tokenize(label.as_str(), &inner, runs);
        } else if let Some(m) = caps.name("plain") {
            push_text(runs, style, m.as_str());
        }
    }
    push_text(runs, style, &text[last..]);
}

/// Append text in `style`, merging into a preceding run with the same
/// formatting.
fn push_text(runs: &mut Vec<InlineRun>, style: &InlineRun, text: &str) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(prev) if same_format(prev, style) => prev.content.push_str(text),
        _ => runs.push(style.with_content(text)),
    }
}

fn same_format(a: &InlineRun, b: &InlineRun) -> bool {
    a.bold == b.bold
        && a.italic == b.italic
        && a.strikethrough == b.strikethrough
        && a.link == b.link
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::runs_text;

    #[test]
    fn mixed_spans_tokenize_in_order() {
        let runs = parse_inline("**Bold** and *italic* and ~~gone~~");
        assert_eq!(
            runs,
            vec![
                InlineRun::bold("Bold"),
                InlineRun::plain(" and "),
                InlineRun::italic("italic"),
                InlineRun::plain(" and "),
                InlineRun::strikethrough("gone"),
            ]
        );
    }

    #[test]
    fn link_span() {
        let runs = parse_inline("see [docs](https://docs.rs) now");
        assert_eq!(
            runs,
            vec![
                InlineRun::plain("see "),
                InlineRun::link("docs", "https://docs.rs"),
                InlineRun::plain(" now"),
            ]
        );
    }

    #[test]
    fn empty_input_yields_single_plain_run() {
        assert_eq!(parse_inline(""), vec![InlineRun::plain("")]);
    }

    #[test]
    fn plain_text_is_one_run() {
        assert_eq!(parse_inline("just text"), vec![InlineRun::plain("just text")]);
    }

    #[test]
    fn unmatched_markers_are_kept_as_text() {
        let runs = parse_inline("a ~ b * c [image: logo]");
        assert_eq!(runs, vec![InlineRun::plain("a ~ b * c [image: logo]")]);
    }

    #[test]
    fn span_may_cross_line_break() {
        let runs = parse_inline("**two\nlines**");
        assert_eq!(runs, vec![InlineRun::bold("two\nlines")]);
    }

    #[test]
    fn visible_text_survives_tokenization() {
        let line = "x **b** y *i* z ~~s~~ [l](u) w";
        assert_eq!(runs_text(&parse_inline(line)), "x b y i z s l w");
    }

    #[test]
    fn bold_italic_span() {
        let runs = parse_inline("***key*** rest");
        assert_eq!(
            runs,
            vec![
                InlineRun {
                    content: "key".into(),
                    bold: true,
                    italic: true,
                    ..InlineRun::default()
                },
                InlineRun::plain(" rest"),
            ]
        );
    }

    #[test]
    fn formatted_link_label() {
        let runs = parse_inline("[**x**](https://u.test) and [~~*y*~~](https://v.test)");
        assert_eq!(
            runs,
            vec![
                InlineRun {
                    content: "x".into(),
                    bold: true,
                    link: Some("https://u.test".into()),
                    ..InlineRun::default()
                },
                InlineRun::plain(" and "),
                InlineRun {
                    content: "y".into(),
                    italic: true,
                    strikethrough: true,
                    link: Some("https://v.test".into()),
                    ..InlineRun::default()
                },
            ]
        );
    }

    #[test]
    fn span_inside_bold_inherits_bold() {
        let runs = parse_inline("**a *b* c**");
        assert_eq!(
            runs,
            vec![
                InlineRun::bold("a "),
                InlineRun {
                    content: "b".into(),
                    bold: true,
                    italic: true,
                    ..InlineRun::default()
                },
                InlineRun::bold(" c"),
            ]
        );
    }

    #[test]
    fn stray_marker_inside_span_stays_in_the_run() {
        assert_eq!(parse_inline("~~a ~ b~~"), vec![InlineRun::strikethrough("a ~ b")]);
    }

    #[test]
    fn non_ascii_text() {
        let runs = parse_inline("**重要**：確認");
        assert_eq!(runs, vec![InlineRun::bold("重要"), InlineRun::plain("：確認")]);
    }
}
