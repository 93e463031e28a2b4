//! Character classification shared by the lexers.
//!
//! Lexers see the document as bytes (or, through
//! [`StyleContext`](crate::context::StyleContext), as code points widened to
//! `u32`). Everything here is ASCII-only on purpose: bytes above 0x7F are
//! never letters, digits or operators unless a helper says "or high".

/// Whether `ch` is a line terminator byte.
#[inline]
pub fn is_eol(ch: u8) -> bool {
    ch == b'\r' || ch == b'\n'
}

/// Space or tab.
#[inline]
pub fn is_space_or_tab(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

/// ASCII whitespace: space and `\t` through `\r`.
#[inline]
pub fn is_space_char(ch: u32) -> bool {
    ch == b' ' as u32 || (0x09..=0x0d).contains(&ch)
}

/// Whether `ch` is outside 7-bit ASCII.
#[inline]
pub fn is_high_bit(ch: u8) -> bool {
    ch > 0x7f
}

/// ASCII decimal digit.
#[inline]
pub fn is_digit(ch: u32) -> bool {
    (b'0' as u32..=b'9' as u32).contains(&ch)
}

/// ASCII letter.
#[inline]
pub fn is_alpha(ch: u32) -> bool {
    ch < 0x80 && (ch as u8).is_ascii_alphabetic()
}

/// ASCII letter or digit.
#[inline]
pub fn is_alnum(ch: u32) -> bool {
    ch < 0x80 && (ch as u8).is_ascii_alphanumeric()
}

/// ASCII letter or underscore.
#[inline]
pub fn is_safe_alpha(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

/// ASCII letter, digit or underscore.
#[inline]
pub fn is_safe_alnum(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

/// Letter, digit, underscore or any byte above 0x7F.
///
/// `.` is not a word character here so receivers and methods stay apart.
#[inline]
pub fn is_word_char_or_high(ch: u8) -> bool {
    is_high_bit(ch) || is_safe_alnum(ch)
}

/// Letter, digit, underscore or `.`.
#[inline]
pub fn is_word_char(ch: u8) -> bool {
    is_safe_alnum(ch) || ch == b'.'
}

/// Letter, digit or underscore.
#[inline]
pub fn is_word_start(ch: u8) -> bool {
    is_safe_alnum(ch)
}

/// ASCII punctuation that acts as an operator.
#[inline]
pub fn is_operator(ch: u8) -> bool {
    !ch.is_ascii_alphanumeric()
        && matches!(
            ch,
            b'%' | b'^'
                | b'&'
                | b'*'
                | b'('
                | b')'
                | b'-'
                | b'+'
                | b'='
                | b'|'
                | b'{'
                | b'}'
                | b'['
                | b']'
                | b':'
                | b';'
                | b'<'
                | b'>'
                | b','
                | b'/'
                | b'?'
                | b'!'
                | b'.'
                | b'~'
        )
}

/// A set of ASCII bytes, built once and queried per character.
#[derive(Clone)]
pub struct CharacterSet {
    members: [bool; 128],
    value_after: bool,
}

impl CharacterSet {
    /// A set containing the bytes of `initial`.
    ///
    /// `value_after` is the answer for code points above 0x7F.
    pub fn new(initial: &str, value_after: bool) -> Self {
        let mut set = Self {
            members: [false; 128],
            value_after,
        };
        set.add_string(initial);
        set
    }

    /// Letters and digits plus the bytes of `extra`.
    pub fn alnum(extra: &str) -> Self {
        let mut set = Self::new(extra, false);
        for ch in b'a'..=b'z' {
            set.add(ch);
            set.add(ch.to_ascii_uppercase());
        }
        for ch in b'0'..=b'9' {
            set.add(ch);
        }
        set
    }

    /// Add a single byte.
    pub fn add(&mut self, ch: u8) {
        if let Some(slot) = self.members.get_mut(ch as usize) {
            *slot = true;
        }
    }

    /// Add every byte of `chars`.
    pub fn add_string(&mut self, chars: &str) {
        for ch in chars.bytes() {
            self.add(ch);
        }
    }

    /// Whether `ch` is in the set.
    pub fn contains(&self, ch: u32) -> bool {
        match self.members.get(ch as usize) {
            Some(&member) => member,
            None => self.value_after,
        }
    }
}

impl std::fmt::Debug for CharacterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: String = (0u8..128)
            .filter(|&ch| self.members[ch as usize])
            .map(char::from)
            .collect();
        f.debug_struct("CharacterSet")
            .field("members", &members)
            .field("value_after", &self.value_after)
            .finish()
    }
}
