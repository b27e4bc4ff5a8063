//! Taxonomy tree model
//!
//! The source taxonomy is a nested mapping: interior keys are topic names,
//! list values are groups of WikiProject labels, and a key carrying a
//! trailing `*` marks a catch-all group. The string-suffix convention is
//! resolved at parse time into a tagged tree, so the inversion never has
//! to inspect key spelling.

use crate::error::TaxonomyError;

/// Marker suffix flagging a catch-all key in the source mapping
pub const CATCH_ALL_MARKER: char = '*';

/// One node of the taxonomy tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyNode {
    /// Interior topic with named children
    Branch {
        /// Child topics in source order
        children: Vec<TaxonomyChild>,
    },

    /// Leaf group of WikiProject labels
    Leaf {
        /// WikiProject labels in source order
        labels: Vec<String>,
    },
}

/// A named child of a branch node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyChild {
    /// Topic name, with any catch-all marker stripped
    pub name: String,

    /// Whether this child is a catch-all group
    pub catch_all: bool,

    /// The child node itself
    pub node: TaxonomyNode,
}

impl TaxonomyNode {
    /// Parse a taxonomy tree from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, TaxonomyError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a taxonomy tree from a parsed YAML value.
    ///
    /// The root must be a mapping; a catch-all key must hold a label list
    /// (catch-alls do not recurse).
    pub fn from_value(value: &serde_yaml::Value) -> Result<Self, TaxonomyError> {
        match value {
            serde_yaml::Value::Mapping(mapping) => {
                let mut children = Vec::with_capacity(mapping.len());
                for (key, child_value) in mapping {
                    let raw = key.as_str().ok_or_else(|| {
                        TaxonomyError::InvalidTree(format!("non-string key: {:?}", key))
                    })?;
                    let catch_all = raw.ends_with(CATCH_ALL_MARKER);
                    let name = raw.trim_end_matches(CATCH_ALL_MARKER).to_string();
                    let node = Self::from_value(child_value)?;

                    if catch_all && !matches!(node, TaxonomyNode::Leaf { .. }) {
                        return Err(TaxonomyError::InvalidTree(format!(
                            "catch-all key {:?} must hold a label list",
                            raw
                        )));
                    }
                    children.push(TaxonomyChild {
                        name,
                        catch_all,
                        node,
                    });
                }
                Ok(TaxonomyNode::Branch { children })
            }
            serde_yaml::Value::Sequence(items) => {
                let labels = items
                    .iter()
                    .map(|item| {
                        item.as_str().map(String::from).ok_or_else(|| {
                            TaxonomyError::InvalidTree(format!("non-string label: {:?}", item))
                        })
                    })
                    .collect::<Result<Vec<String>, TaxonomyError>>()?;
                Ok(TaxonomyNode::Leaf { labels })
            }
            other => Err(TaxonomyError::InvalidTree(format!(
                "expected mapping or label list, found {:?}",
                other
            ))),
        }
    }
}
