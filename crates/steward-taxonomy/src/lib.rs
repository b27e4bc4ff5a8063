//! Steward Taxonomy Layer
//!
//! WikiProject → topic mapping for the importance-bias analysis: a tagged
//! taxonomy tree parsed from YAML, the catch-all inversion that flattens
//! it into a label → topic mapping, per-language label normalizers, the
//! cross-language sitelink fetch, and the JSON-lines article topic dump.
//!
//! This component is independent of the candidate evaluation pipelines;
//! they share only the domain counters and the batch requester.

#![warn(missing_docs)]

pub mod dump;
pub mod error;
pub mod invert;
pub mod normalize;
pub mod sitelinks;
pub mod tree;

pub use dump::{assign_topics, cross_language_map, translate_templates, write_dump, ArticleRecord, TopicStats};
pub use error::TaxonomyError;
pub use invert::{invert, invert_normalized};
pub use normalize::{normalizer_for, EnglishNormalizer};
pub use sitelinks::{fetch_project_sitelinks, read_sitelinks, write_sitelinks, ProjectSitelinks};
pub use tree::{TaxonomyChild, TaxonomyNode};
