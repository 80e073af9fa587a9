//! Knowledge tree construction from extraction results.

use crate::types::{ExtractionResult, KnowledgeNode};
use serde::{Deserialize, Serialize};

/// How sections are arranged under one another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Nesting {
    /// Every section becomes a top-level node with no children.
    #[default]
    Flat,
}

/// Builds the knowledge forest from per-file extraction results.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    nesting: Nesting,
}

impl TreeBuilder {
    /// Create a builder using flat nesting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the nesting strategy.
    pub fn with_nesting(mut self, nesting: Nesting) -> Self {
        self.nesting = nesting;
        self
    }

    /// Map every section of every result to a node, in input order.
    ///
    /// Same-titled sections from different files are kept apart; nothing is
    /// merged, dropped or reordered.
    pub fn build(&self, results: &[ExtractionResult]) -> Vec<KnowledgeNode> {
        match self.nesting {
            Nesting::Flat => results
                .iter()
                .flat_map(|result| {
                    result.sections.iter().map(move |section| {
                        KnowledgeNode::new(section.title.clone(), section.content.join("\n"))
                            .with_source(result.source.clone())
                    })
                })
                .collect(),
        }
    }
}
