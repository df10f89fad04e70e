//! Process-wide cache of bracket trees. A tree is a pure function of `(kind, participants)`,
//! so entries are never invalidated.

use crate::logic::tree;
use crate::models::{MatchTree, TreeKind};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

type TreeKey = (TreeKind, usize);

/// Append-only map of built trees. Concurrent readers share the read lock; on a miss the
/// tree is built outside the lock and the first insert for a key wins.
#[derive(Debug, Default)]
pub struct MatchTreeCache {
    trees: RwLock<HashMap<TreeKey, Arc<MatchTree>>>,
}

impl MatchTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TreeKind, participants: usize) -> Arc<MatchTree> {
        let key = (kind, participants);
        {
            // Entries are only ever inserted whole, so a poisoned map is still consistent.
            let trees = self.trees.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(tree) = trees.get(&key) {
                return Arc::clone(tree);
            }
        }

        let built = Arc::new(tree::build(kind, participants));
        log::debug!(
            "Built {:?} tree for {} participants ({} matches)",
            kind,
            participants,
            built.len()
        );
        let mut trees = self.trees.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(trees.entry(key).or_insert(built))
    }

    /// Number of cached trees.
    pub fn len(&self) -> usize {
        self.trees
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

static TREES: OnceLock<MatchTreeCache> = OnceLock::new();

/// Shared tree for `(kind, participants)`, built on first request.
pub fn match_tree(kind: TreeKind, participants: usize) -> Arc<MatchTree> {
    TREES.get_or_init(MatchTreeCache::new).get(kind, participants)
}
