// Percent-encoding policy for placeholder output

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

/// How rendered placeholder values are escaped before they are spliced into
/// the template. Literal text is never escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    /// Only unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through
    #[default]
    Unreserved,
    /// Reserved characters and existing `%XX` escapes pass through as well.
    /// Inside a collection element the separator is still encoded, so
    /// `["a,b"]` and `["a", "b"]` render differently.
    Reserved,
    /// No escaping at all. Collection elements containing the separator
    /// are indistinguishable from separate elements.
    Verbatim,
}

impl EscapePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            EscapePolicy::Unreserved => "unreserved",
            EscapePolicy::Reserved => "reserved",
            EscapePolicy::Verbatim => "verbatim",
        }
    }

    pub fn apply<'a>(&self, value: &'a str) -> Cow<'a, str> {
        match self {
            EscapePolicy::Unreserved => urlencoding::encode(value),
            EscapePolicy::Reserved => encode_reserved(value),
            EscapePolicy::Verbatim => Cow::Borrowed(value),
        }
    }

    /// Escape `value` straight into `out`
    pub fn push_escaped(&self, out: &mut String, value: &str) {
        out.push_str(&self.apply(value));
    }

    /// Escape one collection element, keeping `separator` unambiguous
    pub fn push_escaped_element(&self, out: &mut String, value: &str, separator: char) {
        match self {
            EscapePolicy::Reserved => {
                let mut buf = [0u8; 4];
                for ch in self.apply(value).chars() {
                    if ch == separator {
                        out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
                    } else {
                        out.push(ch);
                    }
                }
            }
            _ => self.push_escaped(out, value),
        }
    }
}

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

fn is_pct_triplet(bytes: &[u8]) -> bool {
    bytes.len() >= 3 && bytes[0] == b'%' && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit()
}

fn encode_reserved(value: &str) -> Cow<'_, str> {
    let passes = |(idx, ch): (usize, char)| {
        is_unreserved(ch) || RESERVED.contains(ch) || (ch == '%' && is_pct_triplet(&value.as_bytes()[idx..]))
    };
    if value.char_indices().all(passes) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    let mut buf = [0u8; 4];
    for (idx, ch) in value.char_indices() {
        if passes((idx, ch)) {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }
    Cow::Owned(out)
}
