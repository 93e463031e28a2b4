//! Keyword lists.
//!
//! A [`WordList`] keeps every word in one contiguous buffer, sorted, with a
//! 256-entry index from first byte to the first word starting with it. A
//! lookup jumps straight to that bucket and scans only the words sharing the
//! first byte.
//!
//! Words beginning with `^` are prefix entries: `^gtk_` matches every query
//! starting with `gtk_`.

use std::ops::Range;

/// Sorted, bucketed list of words.
#[derive(Clone)]
pub struct WordList {
    /// All words back to back.
    buffer: Box<[u8]>,
    /// Byte range of each word in `buffer`, in sorted order.
    words: Vec<Range<usize>>,
    /// Index of the first word starting with each byte, -1 for none.
    starts: [i32; 256],
    only_line_ends: bool,
}

impl Default for WordList {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte at `index`, or NUL past the end.
#[inline]
fn at(s: &[u8], index: usize) -> u8 {
    s.get(index).copied().unwrap_or(0)
}

impl WordList {
    /// An empty list separating words on spaces, tabs and line ends.
    pub fn new() -> Self {
        Self {
            buffer: Box::default(),
            words: Vec::new(),
            starts: [-1; 256],
            only_line_ends: false,
        }
    }

    /// An empty list separating words on line ends only.
    ///
    /// Words may then contain spaces, as in lists of phrases.
    pub fn only_line_ends() -> Self {
        Self {
            only_line_ends: true,
            ..Self::new()
        }
    }

    /// Build a list from `list` in one step.
    pub fn from_words(list: &str) -> Self {
        let mut words = Self::new();
        words.set(list);
        words
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the list holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Remove every word.
    pub fn clear(&mut self) {
        self.buffer = Box::default();
        self.words.clear();
        self.starts = [-1; 256];
    }

    /// The `n`th word in sorted order.
    pub fn word_at(&self, n: usize) -> Option<&[u8]> {
        self.words.get(n).map(|range| &self.buffer[range.clone()])
    }

    /// Iterate the words in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.words.iter().map(|range| &self.buffer[range.clone()])
    }

    /// Replace the contents with the words of `list`.
    ///
    /// Returns `false` when the new words equal the current ones, in any
    /// order, so callers can skip relexing.
    pub fn set(&mut self, list: &str) -> bool {
        self.set_bytes(list.as_bytes())
    }

    /// Like [`WordList::set`] but lowercases every word first.
    pub fn set_lowered(&mut self, list: &str) -> bool {
        self.set_bytes(&list.as_bytes().to_ascii_lowercase())
    }

    fn set_bytes(&mut self, list: &[u8]) -> bool {
        let only_line_ends = self.only_line_ends;
        let is_separator = |ch: u8| {
            ch == b'\r' || ch == b'\n' || (!only_line_ends && (ch == b' ' || ch == b'\t'))
        };

        let mut pieces: Vec<&[u8]> = list
            .split(|&ch| is_separator(ch))
            .filter(|word| !word.is_empty())
            .collect();
        pieces.sort_unstable();

        if pieces.len() == self.words.len() && pieces.iter().copied().eq(self.iter()) {
            return false;
        }

        let mut buffer = Vec::with_capacity(list.len());
        let mut words = Vec::with_capacity(pieces.len());
        for piece in pieces {
            let start = buffer.len();
            buffer.extend_from_slice(piece);
            words.push(start..buffer.len());
        }
        self.buffer = buffer.into_boxed_slice();
        self.words = words;
        self.starts = [-1; 256];
        for (index, range) in self.words.iter().enumerate().rev() {
            self.starts[self.buffer[range.start] as usize] = index as i32;
        }
        true
    }

    /// Indices of the words starting with `first`.
    fn bucket(&self, first: u8) -> impl Iterator<Item = &[u8]> + '_ {
        let start = self.starts[first as usize];
        let skip = if start < 0 {
            self.words.len()
        } else {
            start as usize
        };
        self.words[skip..]
            .iter()
            .map(|range| &self.buffer[range.clone()])
            .take_while(move |word| word[0] == first)
    }

    fn in_prefix_bucket(&self, s: &[u8]) -> bool {
        self.bucket(b'^').any(|word| s.starts_with(&word[1..]))
    }

    /// Whether `s` is in the list, exactly or through a `^` prefix entry.
    ///
    /// The empty string is never in the list.
    pub fn in_list(&self, s: impl AsRef<[u8]>) -> bool {
        let s = s.as_ref();
        if self.words.is_empty() || s.is_empty() {
            return false;
        }
        if self.bucket(s[0]).any(|word| word == s) {
            return true;
        }
        self.in_prefix_bucket(s)
    }

    /// Whether `s` matches a word with an optional tail.
    ///
    /// A stored word such as `stru~ct` matches `stru`, `struc` and `struct`:
    /// everything before the marker is required.
    pub fn in_list_abbreviated(&self, s: impl AsRef<[u8]>, marker: u8) -> bool {
        let s = s.as_ref();
        if self.words.is_empty() || s.is_empty() {
            return false;
        }
        for word in self.bucket(s[0]) {
            let mut is_subword = false;
            let mut start = 1;
            if at(word, 1) == marker {
                is_subword = true;
                start += 1;
            }
            if at(s, 1) != at(word, start) {
                continue;
            }
            let mut a = start;
            let mut b = 1;
            while at(word, a) != 0 && at(word, a) == at(s, b) {
                a += 1;
                if at(word, a) == marker {
                    is_subword = true;
                    a += 1;
                }
                b += 1;
            }
            if (at(word, a) == 0 || is_subword) && at(s, b) == 0 {
                return true;
            }
        }
        self.in_prefix_bucket(s)
    }

    /// Whether `s` matches a word with an elided middle.
    ///
    /// A stored word `w.~.active` matches any query starting with `w.` and
    /// ending with `.active`; a word starting with the marker, such as
    /// `~_frozen`, matches any query ending with the rest of it.
    pub fn in_list_abridged(&self, s: impl AsRef<[u8]>, marker: u8) -> bool {
        let s = s.as_ref();
        if self.words.is_empty() || s.is_empty() {
            return false;
        }
        for word in self.bucket(s[0]) {
            let mut a = 0;
            let mut b = 0;
            while at(word, a) != 0 && at(word, a) == at(s, b) {
                a += 1;
                if at(word, a) == marker {
                    a += 1;
                    let suffix_a = word.len() - a;
                    let suffix_b = s.len() - b;
                    if suffix_a >= suffix_b {
                        break;
                    }
                    b += suffix_b - suffix_a - 1;
                }
                b += 1;
            }
            if at(word, a) == 0 && at(s, b) == 0 {
                return true;
            }
        }

        self.bucket(marker).any(|word| {
            let suffix = &word[1..];
            suffix.len() <= s.len() && s.ends_with(suffix)
        })
    }
}

impl PartialEq for WordList {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for WordList {}

impl std::fmt::Debug for WordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_initially() {
        let wl = WordList::new();
        assert_eq!(wl.len(), 0);
        assert!(wl.is_empty());
        assert!(!wl.in_list("struct"));
        assert!(!wl.in_list_abbreviated("struct", b'~'));
        assert!(!wl.in_list_abridged("struct", b'~'));
    }

    #[test]
    fn test_in_list() {
        let wl = WordList::from_words("else struct");
        assert_eq!(wl.len(), 2);
        assert!(wl.in_list("struct"));
        assert!(wl.in_list("else"));
        assert!(!wl.in_list("class"));
        assert!(!wl.in_list("els"));
        assert!(!wl.in_list("elsewhere"));
        assert!(!wl.in_list(""));
    }

    #[test]
    fn test_single_chars_and_prefix() {
        let wl = WordList::from_words("else struct i ^gtk");
        assert!(wl.in_list("i"));
        assert!(!wl.in_list("a"));
        assert!(wl.in_list("gtk_prefix"));
        assert!(wl.in_list("gtk"));
        assert!(!wl.in_list("gt"));
    }

    #[test]
    fn test_in_list_unicode() {
        let wl = WordList::from_words("cheese k\u{e4}se \u{441}\u{44b}\u{440}");
        assert_eq!(wl.len(), 3);
        assert!(wl.in_list("cheese"));
        assert!(wl.in_list("k\u{e4}se"));
        assert!(wl.in_list("\u{441}\u{44b}\u{440}"));
    }

    #[test]
    fn test_set_reports_changes() {
        let mut wl = WordList::new();
        assert!(wl.set("else struct"));
        assert!(!wl.set("else struct"));
        assert!(!wl.set("struct else"));
        assert!(!wl.set("  struct\n\telse\r\n"));
        assert!(wl.set("struct"));
        assert!(wl.set(""));
        assert!(wl.is_empty());
    }

    #[test]
    fn test_word_at_sorted() {
        let wl = WordList::from_words("while else struct");
        assert_eq!(wl.word_at(0), Some(&b"else"[..]));
        assert_eq!(wl.word_at(2), Some(&b"while"[..]));
        assert_eq!(wl.word_at(3), None);
    }

    #[test]
    fn test_only_line_ends() {
        let mut wl = WordList::only_line_ends();
        wl.set("end if\nend while");
        assert_eq!(wl.len(), 2);
        assert!(wl.in_list("end if"));
        assert!(!wl.in_list("end"));
    }

    #[test]
    fn test_set_lowered() {
        let mut wl = WordList::new();
        wl.set_lowered("BEGIN End");
        assert!(wl.in_list("begin"));
        assert!(wl.in_list("end"));
        assert!(!wl.in_list("BEGIN"));
    }

    #[test]
    fn test_in_list_abbreviated() {
        let wl = WordList::from_words("else stru~ct w~hile \u{441}~\u{44b}\u{440}");
        assert!(wl.in_list_abbreviated("else", b'~'));

        assert!(wl.in_list_abbreviated("struct", b'~'));
        assert!(wl.in_list_abbreviated("stru", b'~'));
        assert!(wl.in_list_abbreviated("struc", b'~'));
        assert!(!wl.in_list_abbreviated("str", b'~'));
        assert!(!wl.in_list_abbreviated("structs", b'~'));

        assert!(wl.in_list_abbreviated("while", b'~'));
        assert!(wl.in_list_abbreviated("wh", b'~'));
        assert!(!wl.in_list_abbreviated("", b'~'));

        assert!(wl.in_list_abbreviated("\u{441}\u{44b}\u{440}", b'~'));
    }

    #[test]
    fn test_in_list_abridged() {
        let wl = WordList::from_words("list w.~.active bo~k a~z ~_frozen \u{441}~\u{440}");
        assert!(wl.in_list_abridged("list", b'~'));

        assert!(wl.in_list_abridged("w.front.active", b'~'));
        assert!(wl.in_list_abridged("w.x.active", b'~'));
        assert!(wl.in_list_abridged("w..active", b'~'));
        assert!(!wl.in_list_abridged("w.active", b'~'));
        assert!(!wl.in_list_abridged("w.x.closed", b'~'));

        assert!(wl.in_list_abridged("book", b'~'));
        assert!(wl.in_list_abridged("bok", b'~'));
        assert!(!wl.in_list_abridged("bk", b'~'));

        assert!(wl.in_list_abridged("a_frozen", b'~'));
        assert!(wl.in_list_abridged("_frozen", b'~'));
        assert!(!wl.in_list_abridged("frozen", b'~'));

        assert!(wl.in_list_abridged("abcz", b'~'));
        assert!(wl.in_list_abridged("abz", b'~'));
        assert!(wl.in_list_abridged("az", b'~'));

        assert!(wl.in_list_abridged("\u{441}\u{44b}\u{440}", b'~'));
    }

    #[test]
    fn test_equality() {
        let a = WordList::from_words("one two");
        let b = WordList::from_words("two one");
        let c = WordList::from_words("one");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
