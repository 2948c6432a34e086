//! Splits a finished reply into ordered fragments for incremental delivery.
//!
//! The fragment size adapts to the reply length so a reply is delivered in
//! roughly twenty pieces: `clamp(chars / 20, 1, 24)` characters each.
//! Fragments are cut on `char` boundaries, so multi-byte text is never split
//! inside a code point.

use parley_types::chat::{Fragment, StreamItem};

use super::orchestrator::EMPTY_INPUT_REPLY;

/// Upper bound on characters per fragment.
pub const MAX_CHUNK_CHARS: usize = 24;

/// Target number of fragments per reply.
pub const TARGET_FRAGMENTS: usize = 20;

/// Characters per fragment for a reply of `char_len` characters.
pub fn chunk_size(char_len: usize) -> usize {
    (char_len / TARGET_FRAGMENTS).clamp(1, MAX_CHUNK_CHARS)
}

/// Split `text` into fragment strings whose concatenation is exactly `text`.
///
/// Empty input yields no fragments.
pub fn split_fragments(text: &str) -> Vec<String> {
    let size = chunk_size(text.chars().count());
    let mut out = Vec::new();
    let mut current = String::new();
    let mut count = 0;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == size {
            out.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Lazy, finite fragment stream terminated by [`StreamItem::Done`].
///
/// Yields each fragment in order, then `Done` once, then `None` forever.
/// The stream cannot be restarted.
#[derive(Debug)]
pub struct StreamChunker {
    fragments: std::vec::IntoIter<String>,
    finished: bool,
}

impl StreamChunker {
    /// Stream the fragments of `text`. Empty text streams [`EMPTY_INPUT_REPLY`].
    pub fn new(text: &str) -> Self {
        if text.is_empty() {
            return Self::notice(EMPTY_INPUT_REPLY);
        }
        Self {
            fragments: split_fragments(text).into_iter(),
            finished: false,
        }
    }

    /// A stream carrying `message` as one fragment, used for rejection and
    /// apology messages.
    pub fn notice(message: &str) -> Self {
        Self {
            fragments: vec![message.to_string()].into_iter(),
            finished: false,
        }
    }
}

impl Iterator for StreamChunker {
    type Item = StreamItem;

    fn next(&mut self) -> Option<StreamItem> {
        if self.finished {
            return None;
        }
        match self.fragments.next() {
            Some(token) => Some(StreamItem::Fragment(Fragment { token })),
            None => {
                self.finished = true;
                Some(StreamItem::Done)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.finished { 0 } else { self.fragments.len() + 1 };
        (n, Some(n))
    }
}

impl ExactSizeIterator for StreamChunker {}

impl std::iter::FusedIterator for StreamChunker {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(chunker: StreamChunker) -> (Vec<String>, usize) {
        let mut out = Vec::new();
        let mut done = 0;
        for item in chunker {
            match item {
                StreamItem::Fragment(f) => {
                    assert_eq!(done, 0, "fragment after sentinel");
                    out.push(f.token);
                }
                StreamItem::Done => done += 1,
            }
        }
        (out, done)
    }

    #[test]
    fn test_chunk_size_bounds() {
        assert_eq!(chunk_size(0), 1);
        assert_eq!(chunk_size(19), 1);
        assert_eq!(chunk_size(40), 2);
        assert_eq!(chunk_size(47), 2);
        assert_eq!(chunk_size(480), 24);
        assert_eq!(chunk_size(100_000), 24);
    }

    #[test]
    fn test_round_trip_lengths() {
        for len in [0usize, 1, 23, 24, 1000] {
            let text: String = (0..len)
                .map(|i| char::from(b'a' + (i % 26) as u8))
                .collect();
            let joined: String = split_fragments(&text).concat();
            assert_eq!(joined, text, "length {len}");
        }
    }

    #[test]
    fn test_stream_round_trip() {
        let text = "The quick brown fox jumps over the lazy dog, twice over.";
        let (frags, done) = tokens(StreamChunker::new(text));
        assert_eq!(done, 1);
        assert_eq!(frags.concat(), text);
    }

    #[test]
    fn test_forty_seven_chars_yield_24_fragments() {
        let text = "x".repeat(47);
        let chunker = StreamChunker::new(&text);
        assert_eq!(chunker.len(), 25);
        let (frags, done) = tokens(chunker);
        assert_eq!(frags.len(), 24);
        assert_eq!(done, 1);
        assert!(frags[..23].iter().all(|f| f.len() == 2));
        assert_eq!(frags[23], "x");
    }

    #[test]
    fn test_long_text_caps_fragment_size() {
        let text = "y".repeat(1000);
        let frags = split_fragments(&text);
        assert!(frags.iter().all(|f| f.chars().count() <= MAX_CHUNK_CHARS));
        assert_eq!(frags.len(), 42);
    }

    #[test]
    fn test_empty_text_streams_notice() {
        let (frags, done) = tokens(StreamChunker::new(""));
        assert_eq!(frags, vec![EMPTY_INPUT_REPLY.to_string()]);
        assert_eq!(done, 1);
    }

    #[test]
    fn test_exhausted_after_sentinel() {
        let mut chunker = StreamChunker::new("hi");
        assert!(matches!(chunker.next(), Some(StreamItem::Fragment(_))));
        assert!(matches!(chunker.next(), Some(StreamItem::Fragment(_))));
        assert_eq!(chunker.next(), Some(StreamItem::Done));
        assert_eq!(chunker.next(), None);
        assert_eq!(chunker.next(), None);
    }

    #[test]
    fn test_multibyte_text_not_split_inside_code_points() {
        let text = "héllo wörld ✓ ".repeat(5);
        let frags = split_fragments(&text);
        assert_eq!(frags.concat(), text);
        let size = chunk_size(text.chars().count());
        assert!(frags.iter().all(|f| f.chars().count() <= size));
    }

    #[test]
    fn test_notice_is_single_fragment() {
        let (frags, done) = tokens(StreamChunker::notice("Sorry."));
        assert_eq!(frags, vec!["Sorry.".to_string()]);
        assert_eq!(done, 1);
    }
}
