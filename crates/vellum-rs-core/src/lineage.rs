//! Ancestor chains and descendant trees derived from parent pointers.

use crate::error::StoreError;
use crate::store::PromptStore;
use crate::types::PromptRecord;
use log::warn;
use std::collections::{HashMap, HashSet};

/// Full lineage view for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineage {
    /// The record the lineage was requested for.
    pub record: PromptRecord,
    /// Ancestor chain, root first.
    pub ancestors: Vec<PromptRecord>,
    /// Direct and transitive descendants as a tree.
    pub descendants: Vec<LineageNode>,
}

/// One node of a descendant tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageNode {
    /// Record at this node.
    pub record: PromptRecord,
    /// Records whose `parent_id` points at this node, oldest first.
    pub children: Vec<LineageNode>,
}

impl PromptStore {
    /// Ancestor chain of a record, ordered root-first.
    ///
    /// A dangling parent reference ends the walk with a warning rather
    /// than failing the query. The walk is bounded by the store size;
    /// exceeding it means the on-disk parent pointers form a cycle.
    pub fn ancestors(&self, id: &str) -> Result<Vec<PromptRecord>, StoreError> {
        let bound = self.record_count()?;
        let subject = self.get(id)?;
        let mut chain = Vec::new();
        let mut cursor = subject.parent_id;
        while let Some(parent_id) = cursor {
            if chain.len() >= bound {
                return Err(StoreError::CycleDetected(parent_id));
            }
            match self.get(&parent_id) {
                Ok(parent) => {
                    cursor = parent.parent_id.clone();
                    chain.push(parent);
                }
                Err(StoreError::NotFound(_)) => {
                    warn!(
                        "dangling parent reference, ancestry truncated (record_id={id}, parent_id={parent_id})"
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        chain.reverse();
        Ok(chain)
    }

    /// Descendant tree of a record, built from a single full scan.
    ///
    /// Children are ordered oldest-first. Cost is proportional to store
    /// size times tree depth; callers needing the tree repeatedly should
    /// request it once and reuse it.
    pub fn descendants(&self, id: &str) -> Result<Vec<LineageNode>, StoreError> {
        if !self.record_exists(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let records = self.load_all_joined()?;
        let mut by_parent: HashMap<String, Vec<PromptRecord>> = HashMap::new();
        for record in records {
            if let Some(parent_id) = record.parent_id.clone() {
                by_parent.entry(parent_id).or_default().push(record);
            }
        }
        for children in by_parent.values_mut() {
            children.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        }

        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        build_tree(id, &mut by_parent, &mut visited)
    }

    /// Record, ancestors, and descendants in one view.
    pub fn lineage(&self, id: &str) -> Result<Lineage, StoreError> {
        let record = self.get(id)?;
        let ancestors = self.ancestors(id)?;
        let descendants = self.descendants(id)?;
        Ok(Lineage {
            record,
            ancestors,
            descendants,
        })
    }
}

/// Recursively attach children; a revisited id means the on-disk parent
/// pointers form a cycle.
fn build_tree(
    id: &str,
    by_parent: &mut HashMap<String, Vec<PromptRecord>>,
    visited: &mut HashSet<String>,
) -> Result<Vec<LineageNode>, StoreError> {
    let Some(children) = by_parent.remove(id) else {
        return Ok(Vec::new());
    };
    let mut nodes = Vec::new();
    for child in children {
        if !visited.insert(child.id.clone()) {
            return Err(StoreError::CycleDetected(child.id));
        }
        let grandchildren = build_tree(&child.id, by_parent, visited)?;
        nodes.push(LineageNode {
            record: child,
            children: grandchildren,
        });
    }
    Ok(nodes)
}
