//! A compile-time-typed, trie-structured HTTP request router.
//!
//! routrie maps an HTTP method plus request target to a handler whose
//! argument list is dictated, in the type system, by the pattern's
//! capture sequence. A pattern with an `:int` and a `:string` capture
//! only accepts handlers of shape `Fn(i64, String) -> R`; the mismatch
//! is a compile error, not a runtime surprise.
//!
//! # Quick Start
//!
//! ```
//! use routrie::prelude::*;
//!
//! let router = Router::new([
//!     get(root().seg("home").seg("about").end(), || "about page".to_string()).unwrap(),
//!     get(root().seg("home").capture(int()).slash(), |id: i64| {
//!         format!("Product Page. Product Id : {id}")
//!     })
//!     .unwrap(),
//!     get(
//!         root().seg("product").capture(string()).end().q("section", int()),
//!         |name: String, section: i64| format!("{name}, section {section}"),
//!     )
//!     .unwrap(),
//! ]);
//!
//! assert_eq!(
//!     router.match_route(&Method::Get, "/home/100001/").as_deref(),
//!     Some("Product Page. Product Id : 100001")
//! );
//! assert_eq!(
//!     router.match_route(&Method::Get, "/product/dyson?section=2").as_deref(),
//!     Some("dyson, section 2")
//! );
//! assert_eq!(router.match_route(&Method::Get, "/home/about/"), None);
//! ```
//!
//! # Matching rules
//!
//! - A literal segment beats any typed capture, unconditionally.
//! - Overlapping typed captures are tried in decoder-specificity order:
//!   `int`, `int32`, `int64`, `float`, `bool`, `string`, then user
//!   decoders in registration order — and backtrack on failure.
//! - `/a` and `/a/` are distinct: a trailing slash matches only a
//!   pattern terminated with [`slash`](PathBuilder::slash) (or absorbed
//!   by a splat).
//! - Query clauses are unordered; extra request parameters are ignored;
//!   exact clauses outrank capture clauses when several routes survive.
//!
//! # Crate Structure
//!
//! - [`routrie_core`] — methods, decoders, the typed pattern algebra
//! - [`routrie_router`] — the trie and the match engine
//!
//! This crate re-exports both.

#![forbid(unsafe_code)]

pub use routrie_core::{
    bool, decoder, float, int, int32, int64, root, string, Args, Capture, Decoder, DecoderTag,
    DynDecoder, Handler, Method, PathBuilder, PathNode, Pattern, Push, QueryClause, RouteError,
};
pub use routrie_router::{
    get, route, route_value, routes, AllowedMethods, Route, RouteLookup, Router,
};

/// Everything needed to declare and match routes.
pub mod prelude {
    pub use routrie_core::{
        bool, decoder, float, int, int32, int64, root, string, Decoder, Method, Pattern,
        RouteError,
    };
    pub use routrie_router::{
        get, route, route_value, routes, AllowedMethods, Route, RouteLookup, Router,
    };
}
