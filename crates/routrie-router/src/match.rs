//! The match engine and lookup result types.
//!
//! A request target is split into path segments (a trailing `/` is kept
//! as a marker segment) and parsed query pairs, then walked through the
//! trie. Edge preference at each node: exact, decoders by rank, slash,
//! wildcard, splat. Decoder, wildcard, and splat alternatives backtrack;
//! an exact edge whose literal equals the head segment commits the walk
//! to its subtree, so a literal can never lose to a typed sibling.

use routrie_core::{Capture, Method, QueryClause};

use crate::trie::{Node, Terminal, Trie};

/// Result of attempting to locate a route by method and target.
#[derive(Debug)]
pub enum RouteLookup<T> {
    /// A route matched; carries the handler's result.
    Match(T),
    /// The path and query matched at least one route, but no route with
    /// this method.
    MethodNotAllowed {
        /// Methods that would have matched.
        allowed: AllowedMethods,
    },
    /// Nothing matched.
    NotFound,
}

impl<T> RouteLookup<T> {
    /// The handler result, discarding the miss distinction.
    #[must_use]
    pub fn into_match(self) -> Option<T> {
        match self {
            Self::Match(value) => Some(value),
            _ => None,
        }
    }
}

/// Allowed methods for a matched path, for `405` responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedMethods {
    methods: Vec<Method>,
}

impl AllowedMethods {
    /// Create a normalized allow list.
    ///
    /// - Adds `HEAD` if `GET` is present.
    /// - Sorts canonically and de-duplicates for stable output.
    #[must_use]
    pub fn new(mut methods: Vec<Method>) -> Self {
        if methods.contains(&Method::Get) && !methods.contains(&Method::Head) {
            methods.push(Method::Head);
        }
        methods.sort_by_key(sort_key);
        methods.dedup();
        Self { methods }
    }

    /// Access the normalized methods.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Check whether a method is allowed.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Format as an HTTP `Allow` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        let mut out = String::new();
        for (idx, method) in self.methods.iter().enumerate() {
            if idx > 0 {
                out.push_str(", ");
            }
            out.push_str(method.as_str());
        }
        out
    }
}

fn sort_key(method: &Method) -> (u8, String) {
    let rank = match method {
        Method::Get => 0,
        Method::Head => 1,
        Method::Post => 2,
        Method::Put => 3,
        Method::Delete => 4,
        Method::Patch => 5,
        Method::Options => 6,
        Method::Trace => 7,
        Method::Other(_) => 8,
    };
    let name = match method {
        Method::Other(s) => s.to_ascii_uppercase(),
        _ => String::new(),
    };
    (rank, name)
}

struct RequestTarget<'a> {
    segments: Vec<&'a str>,
    raw_query: &'a str,
    query: Vec<(&'a str, &'a str)>,
}

/// Split a target into segments and query pairs.
///
/// Returns `None` for malformed targets: a missing leading `/` or an
/// empty query clause (`a=1&&b=2`). A clause without `=` parses as
/// `(name, "")`. The trailing empty segment produced by a trailing `/`
/// is preserved as the trailing-slash marker.
fn parse_target(target: &str) -> Option<RequestTarget<'_>> {
    let (path, raw_query) = match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    };
    let rest = path.strip_prefix('/')?;
    let segments: Vec<&str> = rest.split('/').collect();
    let query = parse_query(raw_query)?;
    Some(RequestTarget {
        segments,
        raw_query,
        query,
    })
}

fn parse_query(raw: &str) -> Option<Vec<(&str, &str)>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    let mut pairs = Vec::new();
    for clause in raw.split('&') {
        if clause.is_empty() {
            return None;
        }
        match clause.split_once('=') {
            Some((name, value)) => pairs.push((name, value)),
            None => pairs.push((clause, "")),
        }
    }
    Some(pairs)
}

struct Walker<'a> {
    method: &'a Method,
    raw_query: &'a str,
    query: &'a [(&'a str, &'a str)],
    captures: Vec<Capture>,
    allowed: Vec<Method>,
}

impl<'a> Walker<'a> {
    fn walk<T>(&mut self, node: &Node<T>, segs: &[&str]) -> Option<T> {
        if segs.is_empty() {
            return self.resolve_terminals(node);
        }
        let head = segs[0];
        let rest = &segs[1..];

        // A matching literal commits; its siblings are never retried.
        if let Some(child) = node.exact.get(head) {
            return self.walk(child, rest);
        }

        let depth = self.captures.len();

        for branch in &node.decoders {
            if let Some(value) = branch.decoder.decode(head) {
                self.captures.push(value);
                if let Some(out) = self.walk(&branch.node, rest) {
                    return Some(out);
                }
                self.captures.truncate(depth);
            }
        }

        if segs.len() == 1 && head.is_empty() {
            if let Some(child) = &node.slash {
                if let Some(out) = self.walk(child, &[]) {
                    return Some(out);
                }
            }
        }

        if !head.is_empty() {
            if let Some(child) = &node.wildcard {
                self.captures.push(Box::new(head.to_string()));
                if let Some(out) = self.walk(child, rest) {
                    return Some(out);
                }
                self.captures.truncate(depth);
            }
        }

        if let Some(child) = &node.splat {
            let mut remainder = segs.join("/");
            if !self.raw_query.is_empty() {
                remainder.push('?');
                remainder.push_str(self.raw_query);
            }
            self.captures.push(Box::new(remainder));
            if let Some(out) = self.resolve_terminals(child) {
                return Some(out);
            }
            self.captures.truncate(depth);
        }

        None
    }

    fn resolve_terminals<T>(&mut self, node: &Node<T>) -> Option<T> {
        let mut best: Option<(usize, Vec<Capture>, &Terminal<T>)> = None;
        for terminal in &node.terminals {
            let Some(query_captures) = self.eval_clauses(&terminal.clauses) else {
                continue;
            };
            if &terminal.method != self.method {
                // Path and query are satisfied; only the verb differs.
                if !self.allowed.contains(&terminal.method) {
                    self.allowed.push(terminal.method.clone());
                }
                continue;
            }
            // Strictly-greater keeps the first candidate on ties.
            let better = best
                .as_ref()
                .map_or(true, |(count, _, _)| terminal.exact_clauses > *count);
            if better {
                best = Some((terminal.exact_clauses, query_captures, terminal));
            }
        }
        let (_, query_captures, terminal) = best?;

        let mut args = std::mem::take(&mut self.captures);
        args.extend(query_captures);
        Some((terminal.handler)(args))
    }

    /// Evaluate a terminal's clauses against the request query. Extra
    /// request parameters are ignored; the first occurrence of a
    /// duplicated name wins.
    fn eval_clauses(&self, clauses: &[QueryClause]) -> Option<Vec<Capture>> {
        let mut captures = Vec::new();
        for clause in clauses {
            let value = self
                .query
                .iter()
                .find(|(name, _)| *name == clause.name())
                .map(|(_, value)| *value)?;
            match clause {
                QueryClause::Exact { value: expected, .. } => {
                    if value != expected.as_str() {
                        return None;
                    }
                }
                QueryClause::Capture { decoder, .. } => {
                    captures.push(decoder.decode(value)?);
                }
            }
        }
        Some(captures)
    }
}

pub(crate) fn lookup<T>(trie: &Trie<T>, method: &Method, target: &str) -> RouteLookup<T> {
    let Some(parsed) = parse_target(target) else {
        return RouteLookup::NotFound;
    };
    let mut walker = Walker {
        method,
        raw_query: parsed.raw_query,
        query: &parsed.query,
        captures: Vec::new(),
        allowed: Vec::new(),
    };
    match walker.walk(trie.root(), &parsed.segments) {
        Some(out) => RouteLookup::Match(out),
        None if !walker.allowed.is_empty() => RouteLookup::MethodNotAllowed {
            allowed: AllowedMethods::new(walker.allowed),
        },
        None => RouteLookup::NotFound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_splits_segments() {
        let t = parse_target("/home/about").expect("valid target");
        assert_eq!(t.segments, ["home", "about"]);
        assert_eq!(t.raw_query, "");
    }

    #[test]
    fn parse_target_keeps_trailing_slash_marker() {
        let t = parse_target("/home/about/").expect("valid target");
        assert_eq!(t.segments, ["home", "about", ""]);
    }

    #[test]
    fn parse_target_bare_slash() {
        let t = parse_target("/").expect("valid target");
        assert_eq!(t.segments, [""]);
    }

    #[test]
    fn parse_target_rejects_missing_leading_slash() {
        assert!(parse_target("home/about").is_none());
        assert!(parse_target("").is_none());
    }

    #[test]
    fn parse_target_splits_query_at_first_question_mark() {
        let t = parse_target("/p?section=2&q=true").expect("valid target");
        assert_eq!(t.segments, ["p"]);
        assert_eq!(t.raw_query, "section=2&q=true");
        assert_eq!(t.query, [("section", "2"), ("q", "true")]);
    }

    #[test]
    fn parse_target_rejects_empty_query_clause() {
        assert!(parse_target("/p?a=1&&b=2").is_none());
        assert!(parse_target("/p?&a=1").is_none());
    }

    #[test]
    fn clause_without_equals_has_empty_value() {
        let t = parse_target("/p?flag&a=1").expect("valid target");
        assert_eq!(t.query, [("flag", ""), ("a", "1")]);
    }

    #[test]
    fn allowed_methods_normalization() {
        let allowed = AllowedMethods::new(vec![Method::Post, Method::Get, Method::Post]);
        assert_eq!(
            allowed.methods(),
            [Method::Get, Method::Head, Method::Post]
        );
        assert_eq!(allowed.header_value(), "GET, HEAD, POST");
        assert!(allowed.contains(&Method::Head));
    }

    #[test]
    fn allowed_methods_other_sorts_after_named() {
        let allowed = AllowedMethods::new(vec![
            Method::Other("purge".into()),
            Method::Other("LINK".into()),
            Method::Trace,
        ]);
        assert_eq!(allowed.header_value(), "TRACE, LINK, purge");
    }
}
