//! Trait interfaces for pluggable collaborators

/// Per-language WikiProject label normalization.
///
/// Each wiki has its own conventions for naming WikiProject pages
/// (namespace prefixes, project words, punctuation). Implementations
/// canonicalize a raw label so that labels from different sources compare
/// equal. A normalizer is selected once at startup from the wiki id and
/// injected into the taxonomy pipeline rather than looked up ad hoc.
pub trait LabelNormalizer {
    /// Canonicalize a raw WikiProject label
    fn normalize(&self, raw: &str) -> String;
}

impl<N: LabelNormalizer + ?Sized> LabelNormalizer for &N {
    fn normalize(&self, raw: &str) -> String {
        (**self).normalize(raw)
    }
}

impl<N: LabelNormalizer + ?Sized> LabelNormalizer for Box<N> {
    fn normalize(&self, raw: &str) -> String {
        (**self).normalize(raw)
    }
}
