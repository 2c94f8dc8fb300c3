//! HTTP method type.

use std::fmt;
use std::hash::{Hash, Hasher};

/// HTTP request method.
///
/// The eight named verbs compare by tag. [`Method::Other`] carries an
/// arbitrary verb and compares ASCII-case-insensitively, so a router built
/// with `Other("purge")` serves requests normalized to `Other("PURGE")`.
///
/// # Example
///
/// ```
/// use routrie_core::Method;
///
/// assert_eq!(Method::parse("GET"), Method::Get);
/// assert_eq!(Method::parse("PURGE"), Method::Other("PURGE".to_string()));
/// assert_eq!(Method::Other("purge".into()), Method::Other("PURGE".into()));
/// ```
#[derive(Debug, Clone)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
    /// Any other verb; equality is ASCII-case-insensitive.
    Other(String),
}

impl Method {
    /// Normalize a verb string.
    ///
    /// Canonical uppercase strings map to the named variants; anything
    /// else — including lowercase spellings of the named verbs — becomes
    /// [`Method::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            "PATCH" => Self::Patch,
            "OPTIONS" => Self::Options,
            "TRACE" => Self::Trace,
            other => Self::Other(other.to_string()),
        }
    }

    /// The verb as it would appear on the request line.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Canonical sort rank; `Other` verbs sort after the named set.
    #[must_use]
    pub(crate) fn order(&self) -> u8 {
        match self {
            Self::Get => 0,
            Self::Head => 1,
            Self::Post => 2,
            Self::Put => 3,
            Self::Delete => 4,
            Self::Patch => 5,
            Self::Options => 6,
            Self::Trace => 7,
            Self::Other(_) => 8,
        }
    }
}

impl PartialEq for Method {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Other(a), Self::Other(b)) => a.eq_ignore_ascii_case(b),
            (a, b) => a.order() == b.order(),
        }
    }
}

impl Eq for Method {}

impl Hash for Method {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order().hash(state);
        if let Self::Other(s) = self {
            for b in s.bytes() {
                state.write_u8(b.to_ascii_uppercase());
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_uppercase() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("DELETE"), Method::Delete);
        assert_eq!(Method::parse("TRACE"), Method::Trace);
    }

    #[test]
    fn parse_non_canonical_is_other() {
        assert_eq!(Method::parse("get"), Method::Other("get".into()));
        assert_eq!(Method::parse("PURGE"), Method::Other("PURGE".into()));
    }

    #[test]
    fn other_eq_is_case_insensitive() {
        assert_eq!(Method::Other("purge".into()), Method::Other("PURGE".into()));
        assert_ne!(Method::Other("purge".into()), Method::Other("link".into()));
    }

    #[test]
    fn named_never_equals_other() {
        assert_ne!(Method::Get, Method::Other("GET".into()));
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::hash_map::DefaultHasher;

        fn h(m: &Method) -> u64 {
            let mut hasher = DefaultHasher::new();
            m.hash(&mut hasher);
            hasher.finish()
        }

        assert_eq!(
            h(&Method::Other("purge".into())),
            h(&Method::Other("PURGE".into()))
        );
    }

    #[test]
    fn display_round_trip() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Other("purge".into()).to_string(), "purge");
    }
}
