//! Task hierarchy arena.
//!
//! Tasks form a forest per project through their `parent_id` column. The
//! hierarchy is held as an id-keyed arena of parent links rather than as
//! in-memory pointers, which keeps cycle checks and tree assembly cheap and
//! independent of the row type.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Forest
// ---------------------------------------------------------------------------

/// Parent links for every task in one project.
#[derive(Debug, Clone, Default)]
pub struct TaskForest {
    parents: HashMap<DbId, Option<DbId>>,
}

impl TaskForest {
    /// Build the arena from `(id, parent_id)` pairs.
    pub fn new(links: impl IntoIterator<Item = (DbId, Option<DbId>)>) -> Self {
        Self {
            parents: links.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.parents.contains_key(&id)
    }

    /// Parent of `id`, or `None` for roots and unknown ids.
    pub fn parent_of(&self, id: DbId) -> Option<DbId> {
        self.parents.get(&id).copied().flatten()
    }

    /// Walk from the parent of `id` up to its root.
    ///
    /// Stops early if the stored links already contain a loop, so the
    /// iterator always terminates.
    pub fn ancestors(&self, id: DbId) -> impl Iterator<Item = DbId> + '_ {
        let mut seen = HashSet::new();
        let mut current = self.parent_of(id);
        std::iter::from_fn(move || {
            let next = current?;
            if !seen.insert(next) {
                return None;
            }
            current = self.parent_of(next);
            Some(next)
        })
    }

    /// Check that `task_id` may take `new_parent` as its parent.
    ///
    /// Rejects self-parenting, parents outside this forest (i.e. another
    /// project or a missing task), and parents that are descendants of
    /// `task_id`.
    pub fn validate_parent(&self, task_id: DbId, new_parent: Option<DbId>) -> Result<(), CoreError> {
        let Some(parent) = new_parent else {
            return Ok(());
        };

        if parent == task_id {
            return Err(CoreError::Validation(
                "A task cannot be its own parent".to_string(),
            ));
        }

        if !self.contains(parent) {
            return Err(CoreError::Validation(format!(
                "Parent task {parent} does not exist in this project"
            )));
        }

        if self.ancestors(parent).any(|ancestor| ancestor == task_id) {
            return Err(CoreError::Validation(format!(
                "Setting parent {parent} on task {task_id} would create a cycle"
            )));
        }

        Ok(())
    }

    /// Apply a validated parent change to the arena.
    pub fn reparent(&mut self, task_id: DbId, new_parent: Option<DbId>) -> Result<(), CoreError> {
        self.validate_parent(task_id, new_parent)?;
        self.parents.insert(task_id, new_parent);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree assembly
// ---------------------------------------------------------------------------

/// One node of an assembled task tree. The item's own fields are flattened
/// next to `children` when serialized.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    pub children: Vec<TreeNode<T>>,
}

/// Assemble a flat, already-ordered list into a forest.
///
/// `key` returns `(id, parent_id)` for an item. Sibling order follows input
/// order. Items whose parent is not in the list become roots. Items caught
/// in a stored loop are unreachable from any root and are omitted.
pub fn build_tree<T, F>(items: Vec<T>, key: F) -> Vec<TreeNode<T>>
where
    F: Fn(&T) -> (DbId, Option<DbId>),
{
    let keys: Vec<(DbId, Option<DbId>)> = items.iter().map(&key).collect();
    let present: HashSet<DbId> = keys.iter().map(|(id, _)| *id).collect();

    let mut children: HashMap<DbId, Vec<usize>> = HashMap::new();
    let mut roots = Vec::new();
    for (idx, (_, parent)) in keys.iter().enumerate() {
        match parent {
            Some(p) if present.contains(p) => children.entry(*p).or_default().push(idx),
            _ => roots.push(idx),
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    roots
        .into_iter()
        .filter_map(|idx| assemble(idx, &keys, &children, &mut slots))
        .collect()
}

fn assemble<T>(
    idx: usize,
    keys: &[(DbId, Option<DbId>)],
    children: &HashMap<DbId, Vec<usize>>,
    slots: &mut [Option<T>],
) -> Option<TreeNode<T>> {
    let item = slots[idx].take()?;
    let kids = match children.get(&keys[idx].0) {
        Some(child_idxs) => child_idxs
            .iter()
            .filter_map(|&child| assemble(child, keys, children, slots))
            .collect(),
        None => Vec::new(),
    };
    Some(TreeNode {
        item,
        children: kids,
    })
}
