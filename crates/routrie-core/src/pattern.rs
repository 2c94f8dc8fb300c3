//! The typed pattern algebra.
//!
//! A route pattern is built in two phases. [`PathBuilder`] grows the path
//! one node at a time; its type parameter is the tuple of capture types
//! accumulated so far. A terminator — [`end`](PathBuilder::end),
//! [`slash`](PathBuilder::slash), or [`splat`](PathBuilder::splat) — seals
//! the builder into a [`Pattern`], to which query clauses may then be
//! attached in declared order.
//!
//! ```
//! use routrie_core::{int, root, string};
//!
//! // /home/:int/            one i64 capture
//! let product = root().seg("home").capture(int()).slash();
//!
//! // /product/:string?section=:int    a path and a query capture
//! let detail = root().seg("product").capture(string()).end().q("section", int());
//!
//! assert_eq!(product.to_string(), "/home/:int/");
//! assert_eq!(detail.to_string(), "/product/:string?section=:int");
//! ```
//!
//! Because only terminators produce a `Pattern`, a splat can never be
//! followed by further segments, and a pattern always carries exactly one
//! terminator.

use std::fmt;
use std::marker::PhantomData;

use crate::decoder::{
    bool as bool_decoder, float, int, int32, int64, string, Decoder, DynDecoder,
};
use crate::handler::{Args, Push};

/// One element of a pattern's path.
#[derive(Debug, Clone)]
pub enum PathNode {
    /// Literal segment, matched by string equality.
    Exact(String),
    /// Typed single-segment capture.
    Capture(DynDecoder),
    /// Untyped single-segment capture (`*`), always a `String`.
    Wildcard,
    /// Greedy terminal capture (`**`) of the remaining target.
    Splat,
    /// Terminator: a trailing `/` must be present, then the path ends.
    Slash,
    /// Terminator: no more segments.
    End,
}

impl PathNode {
    /// Whether this node ends a path.
    #[must_use]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Splat | Self::Slash | Self::End)
    }
}

/// One clause of a pattern's query sub-language.
#[derive(Debug, Clone)]
pub enum QueryClause {
    /// Requires the parameter to be present with this exact value.
    Exact {
        /// Parameter name.
        name: String,
        /// Required literal value.
        value: String,
    },
    /// Requires the parameter to be present and decodable.
    Capture {
        /// Parameter name.
        name: String,
        /// Value decoder.
        decoder: DynDecoder,
    },
}

impl QueryClause {
    /// The clause's parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exact { name, .. } | Self::Capture { name, .. } => name,
        }
    }
}

impl PartialEq for QueryClause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Exact { name: a, value: av },
                Self::Exact { name: b, value: bv },
            ) => a == b && av == bv,
            (
                Self::Capture { name: a, decoder: ad },
                Self::Capture { name: b, decoder: bd },
            ) => a == b && ad == bd,
            _ => false,
        }
    }
}

impl Eq for QueryClause {}

/// An open path under construction; `A` is the capture tuple so far.
pub struct PathBuilder<A: Args> {
    nodes: Vec<PathNode>,
    _args: PhantomData<fn() -> A>,
}

impl<A: Args> Clone for PathBuilder<A> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            _args: PhantomData,
        }
    }
}

impl<A: Args> fmt::Debug for PathBuilder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathBuilder")
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Start a pattern at the root.
#[must_use]
pub fn root() -> PathBuilder<()> {
    PathBuilder {
        nodes: Vec::new(),
        _args: PhantomData,
    }
}

impl<A: Args> PathBuilder<A> {
    fn push(mut self, node: PathNode) -> Self {
        self.nodes.push(node);
        self
    }

    fn cast<B: Args>(self) -> PathBuilder<B> {
        PathBuilder {
            nodes: self.nodes,
            _args: PhantomData,
        }
    }

    /// Append a literal segment.
    #[must_use]
    pub fn seg(self, literal: impl Into<String>) -> Self {
        self.push(PathNode::Exact(literal.into()))
    }

    /// Append a typed capture; the handler gains an argument of type `T`.
    #[must_use]
    pub fn capture<T>(mut self, decoder: Decoder<T>) -> PathBuilder<A::Output>
    where
        T: Send + Sync + 'static,
        A: Push<T>,
    {
        self.nodes.push(PathNode::Capture(decoder.erase()));
        self.cast()
    }

    /// Append a single-segment wildcard (`*`), captured as `String`.
    #[must_use]
    pub fn wildcard(mut self) -> PathBuilder<A::Output>
    where
        A: Push<String>,
    {
        self.nodes.push(PathNode::Wildcard);
        self.cast()
    }

    /// Terminate: the path ends here with no trailing slash.
    #[must_use]
    pub fn end(self) -> Pattern<A> {
        Pattern::sealed(self.push(PathNode::End).nodes)
    }

    /// Terminate: a trailing slash must be present, then the path ends.
    ///
    /// A bare `/` target is matched by `root().slash()`.
    #[must_use]
    pub fn slash(self) -> Pattern<A> {
        Pattern::sealed(self.push(PathNode::Slash).nodes)
    }

    /// Terminate with a full splat (`**`): the remainder of the target —
    /// all remaining segments, plus `?query` when a query is present — is
    /// captured verbatim as one `String`.
    #[must_use]
    pub fn splat(mut self) -> Pattern<A::Output>
    where
        A: Push<String>,
    {
        self.nodes.push(PathNode::Splat);
        Pattern::sealed(self.nodes)
    }
}

/// A sealed pattern: a terminated path plus query clauses.
pub struct Pattern<A: Args> {
    path: Vec<PathNode>,
    query: Vec<QueryClause>,
    _args: PhantomData<fn() -> A>,
}

impl<A: Args> Clone for Pattern<A> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            query: self.query.clone(),
            _args: PhantomData,
        }
    }
}

impl<A: Args> fmt::Debug for Pattern<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("path", &self.path)
            .field("query", &self.query)
            .finish()
    }
}

impl<A: Args> Pattern<A> {
    fn sealed(path: Vec<PathNode>) -> Self {
        Self {
            path,
            query: Vec::new(),
            _args: PhantomData,
        }
    }

    fn cast<B: Args>(self) -> Pattern<B> {
        Pattern {
            path: self.path,
            query: self.query,
            _args: PhantomData,
        }
    }

    /// Require a query parameter with an exact literal value.
    #[must_use]
    pub fn q_exact(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push(QueryClause::Exact {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Require a query parameter and capture its decoded value; the
    /// handler gains an argument of type `T`, after all path captures.
    #[must_use]
    pub fn q<T>(mut self, name: impl Into<String>, decoder: Decoder<T>) -> Pattern<A::Output>
    where
        T: Send + Sync + 'static,
        A: Push<T>,
    {
        self.query.push(QueryClause::Capture {
            name: name.into(),
            decoder: decoder.erase(),
        });
        self.cast()
    }

    /// `q(name, int())`.
    #[must_use]
    pub fn q_int(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<i64>,
    {
        self.q(name, int())
    }

    /// `q(name, int32())`.
    #[must_use]
    pub fn q_int32(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<i32>,
    {
        self.q(name, int32())
    }

    /// `q(name, int64())`.
    #[must_use]
    pub fn q_int64(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<i64>,
    {
        self.q(name, int64())
    }

    /// `q(name, float())`.
    #[must_use]
    pub fn q_float(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<f64>,
    {
        self.q(name, float())
    }

    /// `q(name, bool())`.
    #[must_use]
    pub fn q_bool(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<bool>,
    {
        self.q(name, bool_decoder())
    }

    /// `q(name, string())`.
    #[must_use]
    pub fn q_string(self, name: impl Into<String>) -> Pattern<A::Output>
    where
        A: Push<String>,
    {
        self.q(name, string())
    }

    /// The path nodes, terminator last.
    #[must_use]
    pub fn path(&self) -> &[PathNode] {
        &self.path
    }

    /// The query clauses in declared order.
    #[must_use]
    pub fn query(&self) -> &[QueryClause] {
        &self.query
    }

    /// Decompose into path nodes and query clauses.
    #[must_use]
    pub fn into_parts(self) -> (Vec<PathNode>, Vec<QueryClause>) {
        (self.path, self.query)
    }
}

impl<A: Args> fmt::Display for Pattern<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut wrote_path = false;
        for node in &self.path {
            match node {
                PathNode::Exact(s) => write!(f, "/{s}")?,
                PathNode::Capture(d) => write!(f, "/:{}", d.name())?,
                PathNode::Wildcard => f.write_str("/*")?,
                PathNode::Splat => f.write_str("/**")?,
                PathNode::Slash => f.write_str("/")?,
                PathNode::End => continue,
            }
            wrote_path = true;
        }
        if !wrote_path {
            f.write_str("/")?;
        }
        for (i, clause) in self.query.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            match clause {
                QueryClause::Exact { name, value } => write!(f, "{name}={value}")?,
                QueryClause::Capture { name, decoder } => {
                    write!(f, "{name}=:{}", decoder.name())?;
                }
            }
        }
        Ok(())
    }
}
