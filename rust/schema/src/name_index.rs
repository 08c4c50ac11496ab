// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Substring index over entity names.
//!
//! [`EntityNameIndex`] is a character trie in which every node records all
//! names that contain the node's root path *anywhere*, not just as a prefix.
//! Each name is inserted once per starting offset, and a new node's name list
//! is the parent's list filtered down to names containing the longer path.
//! Nodes are only created for substrings that some name actually has, so a
//! query either walks off the trie (no match) or ends on a node whose list is
//! exactly the answer.
//!
//! Built once, queried many times:
//!
//! ```
//! use ifc_lite_schema::EntityNameIndex;
//!
//! let index = EntityNameIndex::new(["IfcWall", "IfcWallType", "IfcCurtainWall"]);
//! assert_eq!(index.search("wall"), vec!["IfcCurtainWall", "IfcWall", "IfcWallType"]);
//! assert!(index.search("zzz").is_empty());
//! ```

use smallvec::SmallVec;
use std::fmt::Write as _;

use crate::hierarchy::EntityHierarchy;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct TrieNode {
    /// Character as first inserted; matching folds case.
    ch: char,
    parent: Option<usize>,
    children: SmallVec<[usize; 4]>,
    /// Keys of every name containing the path to this node, ascending.
    keys: Vec<usize>,
}

/// Case-insensitive "name contains" index.
#[derive(Debug, Clone)]
pub struct EntityNameIndex {
    names: Vec<String>,
    // Per-character folds of `names`, the same fold trie paths use
    folded: Vec<String>,
    nodes: Vec<TrieNode>,
}

impl EntityNameIndex {
    /// Builds the index. Names are keyed by their position in `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let folded: Vec<String> = names
            .iter()
            .map(|n| n.chars().flat_map(fold_char).collect::<String>())
            .collect();
        let root = TrieNode {
            ch: '\0',
            parent: None,
            children: SmallVec::new(),
            keys: (0..names.len()).collect(),
        };

        let mut index = Self {
            names,
            folded,
            nodes: vec![root],
        };

        for key in 0..index.names.len() {
            let chars: Vec<char> = index.names[key].chars().collect();
            for start in 0..chars.len() {
                index.insert_suffix(&chars[start..]);
            }
        }

        tracing::debug!(
            names = index.names.len(),
            nodes = index.nodes.len(),
            "Built entity name index"
        );
        index
    }

    /// Indexes every entity name of `hierarchy`, in insertion order.
    pub fn from_hierarchy(hierarchy: &EntityHierarchy) -> Self {
        Self::new(hierarchy.entity_names())
    }

    fn insert_suffix(&mut self, chars: &[char]) {
        let mut current = ROOT;
        let mut path = String::new();

        for &c in chars {
            path.extend(fold_char(c));
            current = match self.child(current, c) {
                Some(next) => next,
                None => match self.create_child(current, c, &path) {
                    Some(next) => next,
                    None => return,
                },
            };
        }
    }

    fn create_child(&mut self, parent: usize, ch: char, path: &str) -> Option<usize> {
        let keys: Vec<usize> = self.nodes[parent]
            .keys
            .iter()
            .copied()
            .filter(|&k| self.folded[k].contains(path))
            .collect();
        if keys.is_empty() {
            return None;
        }

        let id = self.nodes.len();
        self.nodes.push(TrieNode {
            ch,
            parent: Some(parent),
            children: SmallVec::new(),
            keys,
        });
        self.nodes[parent].children.push(id);
        Some(id)
    }

    fn child(&self, node: usize, ch: char) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .copied()
            .find(|&id| chars_eq_ignore_case(self.nodes[id].ch, ch))
    }

    /// Node reached by walking `partial` from the root.
    fn walk(&self, partial: &str) -> Option<usize> {
        partial
            .chars()
            .try_fold(ROOT, |node, ch| self.child(node, ch))
    }

    /// Names containing `partial`, sorted and deduplicated.
    ///
    /// An empty query returns every indexed name.
    pub fn search(&self, partial: &str) -> Vec<&str> {
        let Some(node) = self.walk(partial) else {
            return Vec::new();
        };
        let mut result: Vec<&str> = self.nodes[node]
            .keys
            .iter()
            .map(|&k| self.names[k].as_str())
            .collect();
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Keys of the names containing `partial`, ascending.
    pub fn search_keys(&self, partial: &str) -> &[usize] {
        self.walk(partial)
            .map(|node| self.nodes[node].keys.as_slice())
            .unwrap_or(&[])
    }

    /// Name stored under `key`.
    pub fn name(&self, key: usize) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of trie nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first dump of every node as `path [key, key, ...]`, one per line.
    pub fn dump_index(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(usize, String)> = self.nodes[ROOT]
            .children
            .iter()
            .rev()
            .map(|&id| (id, String::new()))
            .collect();

        while let Some((id, mut path)) = stack.pop() {
            let node = &self.nodes[id];
            debug_assert!(node.parent.is_some());
            path.push(node.ch);

            let keys: Vec<String> = node.keys.iter().map(usize::to_string).collect();
            let _ = writeln!(out, "{} [{}]", path, keys.join(", "));

            stack.extend(node.children.iter().rev().map(|&child| (child, path.clone())));
        }
        out
    }
}

/// Simple case fold of one character: upper-case, then lower-case, so that
/// every variant of a letter (e.g. `Σ`, `σ`, `ς`) folds the same way.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_uppercase().flat_map(char::to_lowercase)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || fold_char(a).eq(fold_char(b))
}
