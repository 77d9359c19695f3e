//! The term graph: an append-only arena of nodes addressed by [`TermId`].
//!
//! Subterms are shared by id, never copied. Each node carries a write-once
//! memo slot holding its weak head normal form once the reducer has found
//! it; the first write wins and later writes are ignored.
//!
//! Allocation fails with [`StoreFull`] once every id is in use. A store can
//! be cut back to an earlier length with [`TermStore::truncate`], which also
//! forgets any memo pointing past the cut.

use crate::primitive::Primitive;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Stable handle to a node in a [`TermStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(u32);

impl TermId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the expression graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Signed 64-bit integer.
    Number(i64),
    /// Empty list; also the false-pair sentinel (`ap nil x = t`).
    Nil,
    /// Unevaluated application of a function to one argument.
    Application(TermId, TermId),
    /// A built-in operator.
    Primitive(Primitive),
    /// Name resolved through the definition table on first evaluation.
    Reference(Rc<str>),
    /// List literal; lowers to a `cons` chain ending in `nil` when evaluated.
    List(Vec<TermId>),
    /// Modulated bit string produced by `mod` and consumed by `dem`.
    Bits(Rc<str>),
}

/// Allocation failed: the store holds as many nodes as it may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("term store is full ({limit} nodes)")]
pub struct StoreFull {
    pub limit: u32,
}

/// Result of allocating into a [`TermStore`].
pub type AllocResult = Result<TermId, StoreFull>;

#[derive(Debug)]
struct Node {
    term: Term,
    memo: OnceCell<TermId>,
}

/// Arena holding every term of a machine.
///
/// `nil` and one node per primitive are allocated up front, so those leaves
/// are shared by every term that mentions them.
#[derive(Debug)]
pub struct TermStore {
    nodes: Vec<Node>,
    nil: TermId,
    primitives: Vec<TermId>,
    limit: u32,
}

impl TermStore {
    /// Create a store pre-populated with `nil` and the primitive leaves.
    pub fn new() -> Self {
        Self::with_limit(u32::MAX)
    }

    /// Like [`new`](Self::new), but refusing to grow past `limit` nodes.
    /// The shared leaves are always allocated.
    pub fn with_limit(limit: u32) -> Self {
        let leaves = Primitive::ALL.iter().map(|&p| Term::Primitive(p));
        let nodes: Vec<Node> = std::iter::once(Term::Nil)
            .chain(leaves)
            .map(|term| Node {
                term,
                memo: OnceCell::new(),
            })
            .collect();
        let primitives = (1..nodes.len()).map(|i| TermId(i as u32)).collect();
        Self {
            nodes,
            nil: TermId(0),
            primitives,
            limit,
        }
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, term: Term) -> AllocResult {
        let full = StoreFull { limit: self.limit };
        let index = u32::try_from(self.nodes.len()).map_err(|_| full)?;
        if index >= self.limit {
            return Err(full);
        }
        self.nodes.push(Node {
            term,
            memo: OnceCell::new(),
        });
        Ok(TermId(index))
    }

    /// Drop every node from `len` on and clear memos that point at them.
    /// The shared leaves are never removed.
    pub fn truncate(&mut self, len: usize) {
        let len = len.max(self.primitives.len() + 1);
        if len >= self.nodes.len() {
            return;
        }
        self.nodes.truncate(len);
        for node in &mut self.nodes {
            if node.memo.get().is_some_and(|memo| memo.index() >= len) {
                node.memo.take();
            }
        }
    }

    /// Look up the term stored at `id`.
    pub fn term(&self, id: TermId) -> &Term {
        &self.nodes[id.index()].term
    }

    /// The cached normal form of `id`, if it has been reduced.
    pub fn memo(&self, id: TermId) -> Option<TermId> {
        self.nodes[id.index()].memo.get().copied()
    }

    /// Record the normal form of `id`. Returns `false` when the slot was
    /// already filled, in which case the existing value is kept.
    pub fn set_memo(&self, id: TermId, result: TermId) -> bool {
        self.nodes[id.index()].memo.set(result).is_ok()
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Constructors ──────────────────────────────────────────────────────

    pub fn nil(&self) -> TermId {
        self.nil
    }

    /// The shared leaf for a primitive.
    pub fn primitive(&self, p: Primitive) -> TermId {
        self.primitives[p.index()]
    }

    pub fn number(&mut self, value: i64) -> AllocResult {
        self.alloc(Term::Number(value))
    }

    pub fn app(&mut self, function: TermId, argument: TermId) -> AllocResult {
        self.alloc(Term::Application(function, argument))
    }

    /// `ap ap f x y`
    pub fn app2(&mut self, function: TermId, x: TermId, y: TermId) -> AllocResult {
        let inner = self.app(function, x)?;
        self.app(inner, y)
    }

    /// `ap ap ap f x y z`
    pub fn app3(&mut self, function: TermId, x: TermId, y: TermId, z: TermId) -> AllocResult {
        let inner = self.app2(function, x, y)?;
        self.app(inner, z)
    }

    /// Apply a primitive to one argument.
    pub fn call1(&mut self, p: Primitive, x: TermId) -> AllocResult {
        let f = self.primitive(p);
        self.app(f, x)
    }

    /// Apply a primitive to two arguments.
    pub fn call2(&mut self, p: Primitive, x: TermId, y: TermId) -> AllocResult {
        let f = self.primitive(p);
        self.app2(f, x, y)
    }

    /// Apply a primitive to three arguments.
    pub fn call3(&mut self, p: Primitive, x: TermId, y: TermId, z: TermId) -> AllocResult {
        let f = self.primitive(p);
        self.app3(f, x, y, z)
    }

    /// `ap ap cons head tail`
    pub fn cons(&mut self, head: TermId, tail: TermId) -> AllocResult {
        self.call2(Primitive::Cons, head, tail)
    }

    pub fn reference(&mut self, name: &str) -> AllocResult {
        self.alloc(Term::Reference(Rc::from(name)))
    }

    pub fn list(&mut self, items: Vec<TermId>) -> AllocResult {
        self.alloc(Term::List(items))
    }

    pub fn bits(&mut self, bits: &str) -> AllocResult {
        self.alloc(Term::Bits(Rc::from(bits)))
    }

    /// Right-fold `items` into a `cons` chain ending in `nil`.
    pub fn cons_chain(&mut self, items: &[TermId]) -> AllocResult {
        items
            .iter()
            .rev()
            .try_fold(self.nil, |tail, &head| self.cons(head, tail))
    }
}

impl Default for TermStore {
    fn default() -> Self {
        Self::new()
    }
}
