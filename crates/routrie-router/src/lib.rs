//! Trie-based typed router.
//!
//! This crate folds registered routes into an immutable decision trie and
//! walks request targets through it.
//!
//! # Features
//!
//! - Radix-style trie with structural sharing of common prefixes
//! - Explicit decoder preference (`int` before `float` before `string`)
//! - Backtracking across typed alternatives; literal edges commit
//! - Method-not-allowed reporting with a normalized `Allow` list
//!
//! The pattern algebra and decoders live in `routrie-core`; most users
//! depend on the `routrie` facade crate instead of this one.

#![forbid(unsafe_code)]

mod r#match;
mod router;
mod trie;

pub use r#match::{AllowedMethods, RouteLookup};
pub use router::{get, route, route_value, routes, Route, Router};
