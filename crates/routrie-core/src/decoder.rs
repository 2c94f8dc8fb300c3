//! Segment decoders.
//!
//! A [`Decoder`] turns one path segment (or query value) into a typed
//! capture. Decoders carry a stable identity tag: the trie keys its typed
//! edges on that tag, so two decoders with the same *name* but different
//! parse functions produce distinct edges, while clones of one decoder
//! share an edge.
//!
//! # Built-ins
//!
//! | Constructor | Output | Accepts |
//! |-------------|--------|---------|
//! | [`int`]     | `i64`  | signed base-10; leading zeros ok; no leading `+` |
//! | [`int32`]   | `i32`  | as `int`, 32-bit range |
//! | [`int64`]   | `i64`  | as `int` |
//! | [`float`]   | `f64`  | whatever `f64::from_str` accepts |
//! | [`bool`]    | `bool` | exactly `true` or `false` |
//! | [`string`]  | `String` | any non-empty token |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::handler::Capture;

/// Stable identity of a decoder.
///
/// Built-in decoders have fixed identities; user decoders are tagged by
/// the address of their parse-closure allocation, which is unique among
/// decoders that are alive at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecoderTag(TagRepr);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TagRepr {
    Int,
    Int32,
    Int64,
    Float,
    Bool,
    Str,
    Custom(usize),
}

impl DecoderTag {
    /// Preference rank for built-in decoders, or `None` for user decoders.
    ///
    /// The rank orders overlapping typed edges at a trie node: `int` is
    /// tried before `float` before `string`, so `/home/100001/` reaches an
    /// `:int` route even though `:float` would also parse the segment.
    #[must_use]
    pub fn builtin_rank(&self) -> Option<u32> {
        match self.0 {
            TagRepr::Int => Some(0),
            TagRepr::Int32 => Some(1),
            TagRepr::Int64 => Some(2),
            TagRepr::Float => Some(3),
            TagRepr::Bool => Some(4),
            TagRepr::Str => Some(5),
            TagRepr::Custom(_) => None,
        }
    }
}

/// A named, typed segment decoder.
///
/// # Example
///
/// ```
/// use routrie_core::{decoder, int};
///
/// let id = int();
/// assert_eq!(id.decode("42"), Some(42));
/// assert_eq!(id.decode("+42"), None);
///
/// let hex = decoder("hex", |s| u32::from_str_radix(s, 16).ok());
/// assert_eq!(hex.decode("ff"), Some(255));
/// ```
pub struct Decoder<T> {
    name: &'static str,
    tag: DecoderTag,
    parse: Arc<dyn Fn(&str) -> Option<T> + Send + Sync>,
}

impl<T> Clone for Decoder<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tag: self.tag,
            parse: Arc::clone(&self.parse),
        }
    }
}

impl<T> fmt::Debug for Decoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl<T: Send + Sync + 'static> Decoder<T> {
    fn builtin(name: &'static str, repr: TagRepr, parse: fn(&str) -> Option<T>) -> Self {
        Self {
            name,
            tag: DecoderTag(repr),
            parse: Arc::new(parse),
        }
    }

    /// Informational decoder name (used by pattern display).
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The decoder's identity tag.
    #[must_use]
    pub fn tag(&self) -> DecoderTag {
        self.tag
    }

    /// Attempt to decode one token.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<T> {
        (self.parse)(token)
    }

    /// Type-erase into the form stored in patterns and trie edges.
    #[must_use]
    pub fn erase(&self) -> DynDecoder {
        let parse = Arc::clone(&self.parse);
        DynDecoder {
            name: self.name,
            tag: self.tag,
            parse: Arc::new(move |s| parse(s).map(|v| Box::new(v) as Capture)),
        }
    }
}

/// Build a user decoder.
///
/// Identity is per construction: calling `decoder` twice with the same
/// name yields two distinct trie edges. Clone the returned value to reuse
/// one identity across several patterns.
#[must_use]
pub fn decoder<T, F>(name: &'static str, parse: F) -> Decoder<T>
where
    T: Send + Sync + 'static,
    F: Fn(&str) -> Option<T> + Send + Sync + 'static,
{
    let parse: Arc<dyn Fn(&str) -> Option<T> + Send + Sync> = Arc::new(parse);
    let tag = DecoderTag(TagRepr::Custom(Arc::as_ptr(&parse) as *const () as usize));
    Decoder { name, tag, parse }
}

fn parse_signed<T: FromStr>(s: &str) -> Option<T> {
    // i64::from_str accepts a leading '+'; route segments do not.
    if s.is_empty() || s.starts_with('+') {
        return None;
    }
    s.parse().ok()
}

/// Signed 64-bit integer decoder (the default integer width).
#[must_use]
pub fn int() -> Decoder<i64> {
    Decoder::builtin("int", TagRepr::Int, parse_signed::<i64>)
}

/// Signed 32-bit integer decoder.
#[must_use]
pub fn int32() -> Decoder<i32> {
    Decoder::builtin("int32", TagRepr::Int32, parse_signed::<i32>)
}

/// Signed 64-bit integer decoder, distinct in identity from [`int`].
#[must_use]
pub fn int64() -> Decoder<i64> {
    Decoder::builtin("int64", TagRepr::Int64, parse_signed::<i64>)
}

/// Floating-point decoder.
#[must_use]
pub fn float() -> Decoder<f64> {
    Decoder::builtin("float", TagRepr::Float, |s| s.parse().ok())
}

/// Boolean decoder; accepts exactly `true` and `false`.
#[must_use]
pub fn bool() -> Decoder<bool> {
    Decoder::builtin("bool", TagRepr::Bool, |s| match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    })
}

/// String decoder; accepts any non-empty token.
#[must_use]
pub fn string() -> Decoder<String> {
    Decoder::builtin("string", TagRepr::Str, |s| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    })
}

/// A type-erased decoder, as stored in [`PathNode::Capture`] and query
/// clauses.
///
/// [`PathNode::Capture`]: crate::PathNode::Capture
#[derive(Clone)]
pub struct DynDecoder {
    name: &'static str,
    tag: DecoderTag,
    parse: Arc<dyn Fn(&str) -> Option<Capture> + Send + Sync>,
}

impl DynDecoder {
    /// Informational decoder name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The identity tag shared with the typed [`Decoder`].
    #[must_use]
    pub fn tag(&self) -> DecoderTag {
        self.tag
    }

    /// Decode one token into an erased capture.
    #[must_use]
    pub fn decode(&self, token: &str) -> Option<Capture> {
        (self.parse)(token)
    }
}

impl fmt::Debug for DynDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynDecoder")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

impl PartialEq for DynDecoder {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for DynDecoder {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_rejects_plus_and_empty() {
        let d = int();
        assert_eq!(d.decode("42"), Some(42));
        assert_eq!(d.decode("-42"), Some(-42));
        assert_eq!(d.decode("+42"), None);
        assert_eq!(d.decode(""), None);
    }

    #[test]
    fn int_accepts_leading_zeros() {
        assert_eq!(int().decode("007"), Some(7));
        assert_eq!(int().decode("0"), Some(0));
    }

    #[test]
    fn int_rejects_overflow() {
        assert_eq!(int().decode("9223372036854775807"), Some(i64::MAX));
        assert_eq!(int().decode("9223372036854775808"), None);
        assert_eq!(int32().decode("2147483648"), None);
        assert_eq!(int32().decode("2147483647"), Some(i32::MAX));
    }

    #[test]
    fn bool_is_strict() {
        let d = bool();
        assert_eq!(d.decode("true"), Some(true));
        assert_eq!(d.decode("false"), Some(false));
        assert_eq!(d.decode("True"), None);
        assert_eq!(d.decode("1"), None);
    }

    #[test]
    fn string_rejects_empty() {
        assert_eq!(string().decode(""), None);
        assert_eq!(string().decode("x"), Some("x".to_string()));
    }

    #[test]
    fn float_decodes_decimals() {
        assert_eq!(float().decode("100001.1"), Some(100001.1));
        assert_eq!(float().decode("1"), Some(1.0));
        assert_eq!(float().decode("abc"), None);
    }

    #[test]
    fn builtin_identity_is_fixed() {
        assert_eq!(int().tag(), int().tag());
        assert_ne!(int().tag(), int64().tag());
    }

    #[test]
    fn user_decoders_are_distinct_per_construction() {
        let a = decoder("hex", |s| u32::from_str_radix(s, 16).ok());
        let b = decoder("hex", |s| u32::from_str_radix(s, 16).ok());
        assert_ne!(a.tag(), b.tag());
        assert_eq!(a.tag(), a.clone().tag());
    }

    #[test]
    fn erased_decoder_shares_identity() {
        let d = decoder("hex", |s| u32::from_str_radix(s, 16).ok());
        assert_eq!(d.erase().tag(), d.tag());
        assert!(d.erase().decode("ff").is_some());
        assert!(d.erase().decode("zz").is_none());
    }
}
