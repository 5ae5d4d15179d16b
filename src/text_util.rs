use std::str::CharIndices;

/// Characters that close a sentence-like segment. Runs of them count as one
/// boundary.
pub const SEGMENT_DELIMITERS: [char; 3] = ['.', '!', '?'];

/// Segments up to this many characters are used whole as a snippet.
pub const SNIPPET_FULL_SEGMENT_CHARS: usize = 200;

/// Characters kept on each side of the match in a long segment.
pub const SNIPPET_CONTEXT_CHARS: usize = 100;

/// Snippets this short or shorter are treated as noise.
pub const SNIPPET_MIN_CHARS: usize = 10;

const ELLIPSIS: &str = "...";

/// Iterator over the sentence-like segments of a text.
///
/// Delimiters are dropped and never produce empty segments, so leading,
/// trailing and repeated delimiters are all absorbed. Whitespace between
/// segments stays attached to the following segment.
pub struct Segments<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut start = None;

        for (idx, c) in self.chars.by_ref() {
            let delimiter = SEGMENT_DELIMITERS.contains(&c);
            match (start, delimiter) {
                (None, true) => {}
                (None, false) => start = Some(idx),
                (Some(s), true) => return Some(&self.text[s..idx]),
                (Some(_), false) => {}
            }
        }

        start.map(|s| &self.text[s..])
    }
}

/// Split `text` into sentence-like segments on runs of `.`, `!` and `?`.
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        text,
        chars: text.char_indices(),
    }
}

/// Character position of the first case-insensitive occurrence of
/// `query_lower` (already lowercased) in `text`.
pub fn find_ignore_case(text: &str, query_lower: &str) -> Option<usize> {
    let lowered = text.to_lowercase();
    let byte_pos = lowered.find(query_lower)?;
    Some(lowered[..byte_pos].chars().count())
}

/// Build the snippet shown for a segment that contains the query.
///
/// Short segments are returned trimmed. Long ones are cut to a window of
/// [`SNIPPET_CONTEXT_CHARS`] around the first match, with `...` marking each
/// side that was cut. Returns `None` when the result is too short to be
/// useful.
pub fn snippet(segment: &str, query_lower: &str) -> Option<String> {
    let len = segment.chars().count();

    let context = if len <= SNIPPET_FULL_SEGMENT_CHARS {
        segment.trim().to_string()
    } else {
        let pos = find_ignore_case(segment, query_lower)
            .unwrap_or(0)
            .min(len);
        let start = pos.saturating_sub(SNIPPET_CONTEXT_CHARS);
        let end = (pos + SNIPPET_CONTEXT_CHARS).min(len);
        let window: String =
            segment.chars().skip(start).take(end - start).collect();

        let mut context = String::with_capacity(window.len() + 6);
        if start > 0 {
            context.push_str(ELLIPSIS);
        }
        context.push_str(window.trim());
        if end < len {
            context.push_str(ELLIPSIS);
        }
        context
    };

    (context.chars().count() > SNIPPET_MIN_CHARS).then_some(context)
}
