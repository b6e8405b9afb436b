//! Prefix-trie HTTP request router.
//!
//! Routes are `{name}` templates compiled into a trie of static and param
//! segments with a method map at each terminal node. Static segments win
//! over params, and request paths are normalized before matching.

pub mod trie;

pub use trie::{normalize_path, InsertError, Params, RouteMatch, Router};
