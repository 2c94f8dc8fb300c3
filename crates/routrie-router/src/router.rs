//! Routes and the router.
//!
//! A [`Route`] pairs a method and a sealed pattern with a handler whose
//! argument list the pattern's capture tuple dictates; the handler is
//! type-erased here, at registration, so the match walk stays
//! monomorphic. [`Router`] folds routes into the trie once and is
//! immutable — and freely shareable across threads — afterwards.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use routrie_core::{
    Args, Handler, Method, PathNode, Pattern, QueryClause, RouteError,
};

use crate::r#match::{self, RouteLookup};
use crate::trie::{ErasedHandler, Trie};

/// A registered route: method, pattern, and erased handler.
///
/// Construct with [`route`], [`get`], [`routes`], or [`route_value`].
pub struct Route<T> {
    method: Method,
    path: Vec<PathNode>,
    query: Vec<QueryClause>,
    handler: ErasedHandler<T>,
    pattern: String,
}

impl<T> Clone for Route<T> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            handler: Arc::clone(&self.handler),
            pattern: self.pattern.clone(),
        }
    }
}

impl<T> fmt::Debug for Route<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

impl<T> Route<T> {
    /// Bind a handler to a pattern under one method.
    ///
    /// The handler's parameter list must equal the pattern's capture
    /// tuple — path captures in order, then query captures in declared
    /// order; a mismatch is a compile error. Construction fails on a
    /// duplicate query-parameter name or a malformed literal segment.
    pub fn new<A, H>(method: Method, pattern: Pattern<A>, handler: H) -> Result<Self, RouteError>
    where
        A: Args,
        H: Handler<A, Out = T>,
    {
        let rendered = pattern.to_string();

        for node in pattern.path() {
            if let PathNode::Exact(literal) = node {
                if literal.is_empty() {
                    return Err(RouteError::EmptySegment { pattern: rendered });
                }
                if literal.contains('/') {
                    return Err(RouteError::SegmentContainsSlash {
                        literal: literal.clone(),
                        pattern: rendered,
                    });
                }
            }
        }

        let clauses = pattern.query();
        for (idx, clause) in clauses.iter().enumerate() {
            if clauses[..idx].iter().any(|c| c.name() == clause.name()) {
                return Err(RouteError::DuplicateQueryParam {
                    name: clause.name().to_string(),
                    pattern: rendered,
                });
            }
        }

        let (path, query) = pattern.into_parts();
        let handler: ErasedHandler<T> =
            Arc::new(move |captures| handler.invoke(A::from_captures(captures)));
        Ok(Self {
            method,
            path,
            query,
            handler,
            pattern: rendered,
        })
    }

    /// The route's method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern in surface syntax, e.g. `/home/:int/`.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Method, Vec<PathNode>, Vec<QueryClause>, ErasedHandler<T>) {
        (self.method, self.path, self.query, self.handler)
    }
}

/// Bind a handler to a pattern under one method.
pub fn route<A, H, T>(
    method: Method,
    pattern: Pattern<A>,
    handler: H,
) -> Result<Route<T>, RouteError>
where
    A: Args,
    H: Handler<A, Out = T>,
{
    Route::new(method, pattern, handler)
}

/// Bind a handler under `GET`, the default method.
pub fn get<A, H, T>(pattern: Pattern<A>, handler: H) -> Result<Route<T>, RouteError>
where
    A: Args,
    H: Handler<A, Out = T>,
{
    Route::new(Method::Get, pattern, handler)
}

/// Bind one handler to one pattern under several methods.
///
/// The handler is erased once and shared; the returned routes differ
/// only in method, in the order given.
pub fn routes<A, H, T>(
    methods: &[Method],
    pattern: Pattern<A>,
    handler: H,
) -> Result<Vec<Route<T>>, RouteError>
where
    A: Args,
    H: Handler<A, Out = T>,
{
    let Some((first, rest)) = methods.split_first() else {
        return Ok(Vec::new());
    };
    let base = Route::new(first.clone(), pattern, handler)?;
    let mut out = Vec::with_capacity(methods.len());
    out.push(base);
    for method in rest {
        let mut route = out[0].clone();
        route.method = method.clone();
        out.push(route);
    }
    Ok(out)
}

/// Register a constant result under a captureless pattern.
///
/// The value is returned directly on every match — the "non-function
/// handler" form.
pub fn route_value<T>(
    method: Method,
    pattern: Pattern<()>,
    value: T,
) -> Result<Route<T>, RouteError>
where
    T: Clone + Send + Sync + 'static,
{
    Route::new(method, pattern, move || value.clone())
}

/// An immutable trie router over routes sharing a result type.
///
/// Built once from a route list; matching is read-only and safe to call
/// concurrently from any number of threads.
///
/// # Example
///
/// ```
/// use routrie_core::{int, root, Method};
/// use routrie_router::{get, Router};
///
/// let router = Router::new([
///     get(root().seg("home").seg("about").end(), || "about".to_string()).unwrap(),
///     get(root().seg("home").capture(int()).slash(), |id: i64| format!("product {id}")).unwrap(),
/// ]);
///
/// let hit = router.match_route(&Method::Get, "/home/42/");
/// assert_eq!(hit.as_deref(), Some("product 42"));
/// assert_eq!(router.match_route(&Method::Get, "/home/42"), None);
/// ```
pub struct Router<T> {
    trie: Trie<T>,
    routes: usize,
}

impl<T> Router<T> {
    /// Fold routes into a trie.
    ///
    /// When two routes share a method and an identical query clause set
    /// on the same terminal node, the later registration replaces the
    /// earlier one.
    #[must_use]
    pub fn new(routes: impl IntoIterator<Item = Route<T>>) -> Self {
        let mut trie = Trie::new();
        let mut count = 0;
        for route in routes {
            debug!(method = %route.method, pattern = %route.pattern, "route registered");
            if trie.insert(route) {
                debug!("previous registration replaced");
            } else {
                count += 1;
            }
        }
        Self {
            trie,
            routes: count,
        }
    }

    /// Match a request, returning the handler's result.
    ///
    /// Any miss — no path, failed decoders, unsatisfied query clauses,
    /// wrong method, malformed target — is `None`. When a request
    /// repeats a query parameter name, the first occurrence wins.
    #[must_use]
    pub fn match_route(&self, method: &Method, target: &str) -> Option<T> {
        self.lookup(method, target).into_match()
    }

    /// Match a request, distinguishing a wrong-method miss.
    ///
    /// [`RouteLookup::MethodNotAllowed`] is returned when at least one
    /// route's path and query clauses are satisfied and only the verb
    /// differs; its allow list is normalized for an `Allow` header.
    #[must_use]
    pub fn lookup(&self, method: &Method, target: &str) -> RouteLookup<T> {
        let outcome = r#match::lookup(&self.trie, method, target);
        trace!(
            method = %method,
            uri = target,
            outcome = match &outcome {
                RouteLookup::Match(_) => "match",
                RouteLookup::MethodNotAllowed { .. } => "method-not-allowed",
                RouteLookup::NotFound => "not-found",
            },
            "lookup"
        );
        outcome
    }

    /// Number of live routes (replaced registrations not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
