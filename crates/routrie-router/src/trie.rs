//! The decision trie.
//!
//! Routes are folded into a tree of nodes whose edges are segment
//! matchers. Within a node there is at most one exact edge per literal,
//! one decoder edge per decoder identity, and one slash, wildcard, and
//! splat edge each. Decoder edges are kept sorted by preference rank so
//! the match engine can try them in order without consulting a table.

use std::collections::HashMap;
use std::sync::Arc;

use routrie_core::{Capture, DecoderTag, DynDecoder, Method, PathNode, QueryClause};

use crate::router::Route;

/// A registration-erased handler: captures in, result out.
pub(crate) type ErasedHandler<T> = Arc<dyn Fn(Vec<Capture>) -> T + Send + Sync>;

/// User decoders rank after every built-in.
const USER_RANK_BASE: u32 = 6;

/// A completed match attached to a node, selectable by method and query.
pub(crate) struct Terminal<T> {
    pub(crate) method: Method,
    pub(crate) clauses: Vec<QueryClause>,
    /// Count of exact clauses, precomputed for specificity ranking.
    pub(crate) exact_clauses: usize,
    pub(crate) handler: ErasedHandler<T>,
}

/// A typed edge plus its subtree.
pub(crate) struct DecoderBranch<T> {
    pub(crate) decoder: DynDecoder,
    pub(crate) rank: u32,
    pub(crate) node: Node<T>,
}

pub(crate) struct Node<T> {
    pub(crate) exact: HashMap<String, Node<T>>,
    /// Sorted ascending by `rank`.
    pub(crate) decoders: Vec<DecoderBranch<T>>,
    pub(crate) slash: Option<Box<Node<T>>>,
    pub(crate) wildcard: Option<Box<Node<T>>>,
    /// Absorbing: the splat child carries terminals and no edges.
    pub(crate) splat: Option<Box<Node<T>>>,
    pub(crate) terminals: Vec<Terminal<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            exact: HashMap::new(),
            decoders: Vec::new(),
            slash: None,
            wildcard: None,
            splat: None,
            terminals: Vec::new(),
        }
    }
}

pub(crate) struct Trie<T> {
    root: Node<T>,
    /// First-seen registration order for user decoders.
    custom_ranks: HashMap<DecoderTag, u32>,
}

fn rank_of(custom_ranks: &mut HashMap<DecoderTag, u32>, tag: DecoderTag) -> u32 {
    if let Some(rank) = tag.builtin_rank() {
        return rank;
    }
    if let Some(rank) = custom_ranks.get(&tag) {
        return *rank;
    }
    let rank = USER_RANK_BASE + custom_ranks.len() as u32;
    custom_ranks.insert(tag, rank);
    rank
}

/// Unordered clause-set equality; names are unique within a pattern, so
/// length plus membership suffices.
fn clause_set_eq(a: &[QueryClause], b: &[QueryClause]) -> bool {
    a.len() == b.len() && a.iter().all(|clause| b.contains(clause))
}

impl<T> Trie<T> {
    pub(crate) fn new() -> Self {
        Self {
            root: Node::default(),
            custom_ranks: HashMap::new(),
        }
    }

    pub(crate) fn root(&self) -> &Node<T> {
        &self.root
    }

    /// Fold one route in. Returns `true` when an existing terminal with
    /// the same `(method, query clause set)` was replaced — last
    /// insertion wins, keeping the original slot for tie-break order.
    pub(crate) fn insert(&mut self, route: Route<T>) -> bool {
        let (method, path, clauses, handler) = route.into_parts();
        let custom_ranks = &mut self.custom_ranks;
        let mut node = &mut self.root;

        for path_node in path {
            match path_node {
                PathNode::Exact(literal) => {
                    node = node.exact.entry(literal).or_default();
                }
                PathNode::Capture(decoder) => {
                    let tag = decoder.tag();
                    let idx = match node.decoders.iter().position(|b| b.decoder.tag() == tag) {
                        Some(idx) => idx,
                        None => {
                            let rank = rank_of(custom_ranks, tag);
                            let idx = node
                                .decoders
                                .iter()
                                .position(|b| b.rank > rank)
                                .unwrap_or(node.decoders.len());
                            node.decoders.insert(
                                idx,
                                DecoderBranch {
                                    decoder,
                                    rank,
                                    node: Node::default(),
                                },
                            );
                            idx
                        }
                    };
                    node = &mut node.decoders[idx].node;
                }
                PathNode::Wildcard => {
                    node = node.wildcard.get_or_insert_with(Box::default);
                }
                PathNode::Splat => {
                    node = node.splat.get_or_insert_with(Box::default);
                }
                PathNode::Slash => {
                    node = node.slash.get_or_insert_with(Box::default);
                }
                PathNode::End => {}
            }
        }

        let exact_clauses = clauses
            .iter()
            .filter(|c| matches!(c, QueryClause::Exact { .. }))
            .count();
        let terminal = Terminal {
            method,
            clauses,
            exact_clauses,
            handler,
        };

        let existing = node
            .terminals
            .iter_mut()
            .find(|t| t.method == terminal.method && clause_set_eq(&t.clauses, &terminal.clauses));
        match existing {
            Some(slot) => {
                *slot = terminal;
                true
            }
            None => {
                node.terminals.push(terminal);
                false
            }
        }
    }
}
