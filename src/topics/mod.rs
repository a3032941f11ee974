//! Topic tree over deck paths and candidate-pool selection.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{string_to_topic_path, topic_path_to_string, Document, TopicPath};
use crate::error::TopicError;

/// Every topic node present in a corpus, ancestors included.
#[derive(Debug, Clone, Default)]
pub struct TopicTree {
    nodes: BTreeSet<TopicPath>,
    direct_counts: BTreeMap<TopicPath, usize>,
}

/// Card counts for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCount {
    pub path: TopicPath,
    pub direct: usize,
    pub subtree: usize,
}

/// `path` equals `root` or lies beneath it.
pub fn path_is_in_subtree(path: &[String], root: &[String]) -> bool {
    path.starts_with(root)
}

impl TopicTree {
    pub fn build(documents: &[Document]) -> Self {
        let mut tree = TopicTree::default();
        for document in documents {
            let path = &document.topic_path;
            for depth in 1..=path.len() {
                tree.nodes.insert(path[..depth].to_vec());
            }
            *tree.direct_counts.entry(path.clone()).or_default() += 1;
        }
        tree
    }

    /// All nodes in sorted order.
    pub fn list(&self) -> impl Iterator<Item = &TopicPath> + '_ {
        self.nodes.iter()
    }

    /// Parse `A::B` style text and check that the node exists.
    pub fn resolve(&self, text: &str, separator: &str) -> Result<TopicPath, TopicError> {
        let target = string_to_topic_path(text, separator);
        if target.is_empty() {
            return Err(TopicError::Empty);
        }
        if self.nodes.contains(&target) {
            return Ok(target);
        }
        let known =
            self.nodes.iter().map(|node| topic_path_to_string(node)).collect::<Vec<_>>().join(", ");
        Err(TopicError::Unknown { requested: text.to_string(), known })
    }

    /// Cards attached directly to each node that has any.
    pub fn counts(&self) -> &BTreeMap<TopicPath, usize> {
        &self.direct_counts
    }

    /// Direct and subtree counts for every node, in sorted order.
    pub fn summary(&self) -> Vec<TopicCount> {
        self.nodes
            .iter()
            .map(|node| TopicCount {
                path: node.clone(),
                direct: self.direct_counts.get(node).copied().unwrap_or(0),
                subtree: self
                    .direct_counts
                    .iter()
                    .filter(|(path, _)| path_is_in_subtree(path, node))
                    .map(|(_, count)| count)
                    .sum(),
            })
            .collect()
    }
}

/// Documents at `root` (and beneath it when `include_subtree`), in corpus order.
pub fn candidates(documents: &[Document], root: &[String], include_subtree: bool) -> Vec<Document> {
    documents
        .iter()
        .filter(|document| {
            if include_subtree {
                path_is_in_subtree(&document.topic_path, root)
            } else {
                document.topic_path == root
            }
        })
        .cloned()
        .collect()
}
