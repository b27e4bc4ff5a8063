//! Taxonomy inversion
//!
//! Turns the topic tree into a flat label → dotted-topic-path mapping.
//! Explicit branches always take precedence: a catch-all is resolved only
//! after all its explicit siblings, and it claims only leaf names left
//! unclaimed at its level. A label maps to several topics only when the
//! source tree lists it under several branches, never through the
//! catch-all mechanism alone.

use crate::tree::{TaxonomyChild, TaxonomyNode};
use std::collections::{BTreeSet, HashMap, HashSet};
use steward_domain::traits::LabelNormalizer;

/// Invert a taxonomy tree into raw label → set of dotted topic paths.
pub fn invert(root: &TaxonomyNode) -> HashMap<String, BTreeSet<String>> {
    let mut inverted = HashMap::new();
    let mut path = Vec::new();
    walk(root, &mut path, &mut inverted);
    inverted
}

/// Invert a taxonomy tree, merging labels under their normalized form.
pub fn invert_normalized<N: LabelNormalizer>(
    root: &TaxonomyNode,
    normalizer: &N,
) -> HashMap<String, BTreeSet<String>> {
    let mut merged: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (label, topics) in invert(root) {
        merged
            .entry(normalizer.normalize(&label))
            .or_default()
            .extend(topics);
    }
    merged
}

fn walk(
    node: &TaxonomyNode,
    path: &mut Vec<String>,
    inverted: &mut HashMap<String, BTreeSet<String>>,
) {
    let TaxonomyNode::Branch { children } = node else {
        return;
    };

    // First pass: explicit siblings claim their labels and recurse.
    // Their leaf labels also form the candidate pool a catch-all may
    // absorb from.
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut pool: Vec<&str> = Vec::new();
    for child in children.iter().filter(|child| !child.catch_all) {
        path.push(child.name.clone());
        match &child.node {
            TaxonomyNode::Leaf { labels } => {
                let topic = path.join(".");
                for label in labels {
                    inverted
                        .entry(label.clone())
                        .or_default()
                        .insert(topic.clone());
                    claimed.insert(label.as_str());
                    pool.push(label.as_str());
                }
            }
            branch => walk(branch, path, inverted),
        }
        path.pop();
    }

    // Second pass: catch-alls take whatever their siblings left unclaimed,
    // plus their own labels.
    for child in children.iter().filter(|child| child.catch_all) {
        let TaxonomyChild {
            name,
            node: TaxonomyNode::Leaf { labels },
            ..
        } = child
        else {
            continue;
        };
        path.push(name.clone());
        let topic = path.join(".");
        path.pop();

        for label in labels.iter().map(String::as_str).chain(pool.iter().copied()) {
            if !claimed.contains(label) {
                inverted
                    .entry(label.to_string())
                    .or_default()
                    .insert(topic.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::EnglishNormalizer;

    fn topics(inverted: &HashMap<String, BTreeSet<String>>, label: &str) -> Vec<String> {
        inverted
            .get(label)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_catch_all_never_claims_explicit_names() {
        let tree = TaxonomyNode::from_yaml_str("A:\n  - x\nB*:\n  - y\n").unwrap();
        let inverted = invert(&tree);

        assert_eq!(topics(&inverted, "x"), vec!["A".to_string()]);
        assert_eq!(topics(&inverted, "y"), vec!["B".to_string()]);
    }

    #[test]
    fn test_nested_paths_are_dotted() {
        let tree =
            TaxonomyNode::from_yaml_str("Culture:\n  Arts:\n    Music:\n      - Opera\n").unwrap();
        let inverted = invert(&tree);
        assert_eq!(topics(&inverted, "Opera"), vec!["Culture.Arts.Music".to_string()]);
    }

    #[test]
    fn test_duplicate_leaves_map_to_both_branches() {
        let tree = TaxonomyNode::from_yaml_str("A:\n  - x\nB:\n  - x\n").unwrap();
        let inverted = invert(&tree);
        assert_eq!(topics(&inverted, "x"), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_catch_all_keeps_its_own_unclaimed_labels() {
        // y appears only under the catch-all; x is claimed by a sibling
        // and must not pick up the catch-all topic
        let tree = TaxonomyNode::from_yaml_str("A:\n  - x\nOther*:\n  - y\n  - x\n").unwrap();
        let inverted = invert(&tree);
        assert_eq!(topics(&inverted, "x"), vec!["A".to_string()]);
        assert_eq!(topics(&inverted, "y"), vec!["Other".to_string()]);
    }

    #[test]
    fn test_catch_all_resolves_per_level() {
        let tree = TaxonomyNode::from_yaml_str(
            "STEM:\n  Biology:\n    - Genetics\n  STEM*:\n    - Science\nHistory:\n  - Rome\n",
        )
        .unwrap();
        let inverted = invert(&tree);

        assert_eq!(topics(&inverted, "Genetics"), vec!["STEM.Biology".to_string()]);
        assert_eq!(topics(&inverted, "Science"), vec!["STEM.STEM".to_string()]);
        // The top-level sibling is untouched by the nested catch-all
        assert_eq!(topics(&inverted, "Rome"), vec!["History".to_string()]);
    }

    #[test]
    fn test_invert_normalized_merges_label_variants() {
        let tree = TaxonomyNode::from_yaml_str(
            "A:\n  - WikiProject Opera\nB:\n  - Wikipedia:WikiProject opera\n",
        )
        .unwrap();
        let inverted = invert_normalized(&tree, &EnglishNormalizer);

        assert_eq!(
            topics(&inverted, "opera"),
            vec!["A".to_string(), "B".to_string()]
        );
    }
}
