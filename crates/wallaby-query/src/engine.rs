//! Selector execution engine.
//!
//! Applies a parsed operation list against a document tree (or a
//! caller-supplied starting set) and produces the final, deduplicated,
//! document-order element array.
//!
//! Transposes are lazy: a transpose only registers a pending mapping, which
//! runs when the working set is next read - by the next filter, by a union
//! snapshot, or by final materialization. Filters therefore never need to
//! know whether the preceding operation already executed.

use std::collections::HashSet;

use wallaby_dom::{Document, NodeId};

use crate::error::QueryError;
use crate::ops::SelectorOp;
use crate::parser::parse_query;

/// A pending transpose: maps each element of the working set to a new set
/// of elements when forced.
#[derive(Debug, Clone, Copy)]
enum PendingTranspose {
    /// Map each element to all of its element descendants.
    Descendants,
    /// Map each element to its element children.
    Children,
    /// Map each element to its immediately following element sibling.
    NextSibling,
}

/// Per-execution state: the current working set, the finalized sets
/// accumulated across unions, and the not-yet-applied transpose.
struct ExecutionContext<'a> {
    tree: &'a Document,
    /// The caller-supplied starting set, if any. Each union sub-pipeline
    /// restarts from this same set.
    start: Option<&'a [NodeId]>,
    /// `None` means "not yet materialized": the starting set (or every
    /// element in the document) is produced on first read.
    current: Option<Vec<NodeId>>,
    finalized: Vec<Vec<NodeId>>,
    pending: Option<PendingTranspose>,
}

impl<'a> ExecutionContext<'a> {
    const fn new(tree: &'a Document, start: Option<&'a [NodeId]>) -> Self {
        Self {
            tree,
            start,
            current: None,
            finalized: Vec::new(),
            pending: None,
        }
    }

    /// The default working set: every element in the document, root
    /// element included.
    fn all_elements(&self) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .filter(|&id| self.tree.as_element(id).is_some())
            .collect()
    }

    /// Read the working set, materializing the lazy initial set and
    /// applying any pending transpose.
    fn force(&mut self) -> Vec<NodeId> {
        let set = self
            .current
            .take()
            .or_else(|| self.start.map(<[NodeId]>::to_vec))
            .unwrap_or_else(|| self.all_elements());
        match self.pending.take() {
            Some(transpose) => self.apply_transpose(transpose, &set),
            None => set,
        }
    }

    fn apply_transpose(&self, transpose: PendingTranspose, set: &[NodeId]) -> Vec<NodeId> {
        let tree = self.tree;
        match transpose {
            PendingTranspose::Descendants => set
                .iter()
                .flat_map(|&id| {
                    tree.descendants(id)
                        .filter(|&d| tree.as_element(d).is_some())
                })
                .collect(),
            PendingTranspose::Children => set
                .iter()
                .flat_map(|&id| {
                    tree.children(id)
                        .iter()
                        .copied()
                        .filter(|&c| tree.as_element(c).is_some())
                })
                .collect(),
            PendingTranspose::NextSibling => set
                .iter()
                .filter_map(|&id| tree.next_element_sibling(id))
                .collect(),
        }
    }

    /// Narrow the working set by a filter predicate.
    fn filter(&mut self, op: &SelectorOp) {
        let mut set = self.force();
        set.retain(|&id| op.matches(self.tree, id));
        self.current = Some(set);
    }

    /// Register a transpose. A transpose arriving while another is still
    /// pending forces the earlier one first.
    fn transpose(&mut self, transpose: PendingTranspose) {
        if self.pending.is_some() {
            let set = self.force();
            self.current = Some(set);
        }
        self.pending = Some(transpose);
    }

    /// Snapshot the current sub-pipeline and start a fresh one.
    fn union(&mut self) {
        let set = self.force();
        self.finalized.push(set);
        self.current = None;
    }

    /// Materialize everything into the final deduplicated, document-order
    /// result. Duplicates are identified by node identity, not value
    /// equality: structurally identical but distinct elements both appear.
    fn finish(mut self) -> Vec<NodeId> {
        let last = self.force();
        self.finalized.push(last);

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut result: Vec<NodeId> = self
            .finalized
            .iter()
            .flatten()
            .copied()
            .filter(|&id| seen.insert(id))
            .collect();

        // Stable document order, computed by pre-order traversal rank so
        // results stay correct even across post-parse tree mutation.
        let mut rank = vec![usize::MAX; self.tree.len()];
        for (position, id) in self.tree.descendants(self.tree.root()).enumerate() {
            if let Some(slot) = rank.get_mut(id.0) {
                *slot = position;
            }
        }
        result.sort_by_key(|id| rank.get(id.0).copied().unwrap_or(usize::MAX));
        result
    }
}

/// Run an already-parsed operation list.
///
/// `start` supplies an explicit starting working set; without it the
/// engine starts from every element in the document.
#[must_use]
pub fn run_ops(ops: &[SelectorOp], tree: &Document, start: Option<&[NodeId]>) -> Vec<NodeId> {
    let mut context = ExecutionContext::new(tree, start);
    for op in ops {
        match op {
            SelectorOp::Descendant => context.transpose(PendingTranspose::Descendants),
            SelectorOp::Child => context.transpose(PendingTranspose::Children),
            SelectorOp::AdjacentSibling => context.transpose(PendingTranspose::NextSibling),
            SelectorOp::Union => context.union(),
            filter => context.filter(filter),
        }
    }
    context.finish()
}

/// Parse and execute a query against a whole document.
///
/// # Errors
///
/// Returns a [`QueryError`] if the query does not parse; execution itself
/// cannot fail.
pub fn execute(query: &str, tree: &Document) -> Result<Vec<NodeId>, QueryError> {
    let ops = parse_query(query)?;
    Ok(run_ops(&ops, tree, None))
}

/// Parse and execute a query against an explicit starting element set.
///
/// Used for scoped sub-queries: descendant/child matching is restricted to
/// the supplied set and can never return elements outside it (beyond what
/// the set itself contains).
///
/// # Errors
///
/// Returns a [`QueryError`] if the query does not parse.
pub fn execute_within(
    query: &str,
    tree: &Document,
    start: &[NodeId],
) -> Result<Vec<NodeId>, QueryError> {
    let ops = parse_query(query)?;
    Ok(run_ops(&ops, tree, Some(start)))
}
