//! Core types for the routrie router.
//!
//! This crate provides the building blocks the trie router is assembled
//! from:
//! - [`Method`] — HTTP method with case-insensitive custom verbs
//! - [`Decoder`] — named, identity-tagged segment decoders
//! - [`PathBuilder`] and [`Pattern`] — the typed pattern algebra
//! - [`Args`] / [`Handler`] — compile-time arity binding between a
//!   pattern's captures and its handler
//!
//! # Design Principles
//!
//! - Capture types are tracked in the type system: a pattern with an `i64`
//!   capture and a `String` capture only accepts handlers of shape
//!   `Fn(i64, String) -> R`
//! - Patterns and decoders are plain values with no mutable state
//! - No unsafe, no runtime reflection beyond the capture-stack downcasts
//!   the typed builder makes infallible

#![forbid(unsafe_code)]

mod decoder;
mod error;
mod handler;
mod method;
mod pattern;

pub use decoder::{bool, decoder, float, int, int32, int64, string, Decoder, DecoderTag, DynDecoder};
pub use error::RouteError;
pub use handler::{Args, Capture, Handler, Push};
pub use method::Method;
pub use pattern::{root, PathBuilder, PathNode, Pattern, QueryClause};
