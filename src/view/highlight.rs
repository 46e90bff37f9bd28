use regex::RegexBuilder;
use serde::Serialize;

/// Byte range of one query-term occurrence inside a message's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Every case-insensitive, non-overlapping occurrence of `term` in `text`.
/// An empty term yields no spans - never a match-everything result.
pub fn match_spans(text: &str, term: &str) -> Vec<MatchSpan> {
    if term.is_empty() {
        return Vec::new();
    }
    // The term is matched literally; escaping makes user input like "a+b"
    // safe, and the regex engine handles Unicode case folding.
    let Ok(pattern) = RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    pattern
        .find_iter(text)
        .map(|m| MatchSpan {
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Split `text` into (is_match, segment) runs covering the whole string,
/// in order. Renderers style the matching runs without re-scanning.
pub fn split_spans<'a>(text: &'a str, spans: &[MatchSpan]) -> Vec<(bool, &'a str)> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            segments.push((false, &text[cursor..span.start]));
        }
        segments.push((true, &text[span.start..span.end]));
        cursor = span.end;
    }
    if cursor < text.len() {
        segments.push((false, &text[cursor..]));
    }
    segments
}
