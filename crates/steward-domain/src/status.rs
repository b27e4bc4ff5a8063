//! Caption status - existing structured data classification

/// Existing caption/description state for a surviving candidate.
///
/// Every annotated candidate ends in exactly one of these four states.
/// `Missing` and `NoLabel` have different bias implications and
/// `NotReturned` signals an API-layer problem, so the classification is a
/// four-way enum rather than a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptionStatus {
    /// The API explicitly reported that the entity does not exist
    Missing,

    /// A caption/label is present in the target language
    Exists,

    /// The entity exists but carries no label in the target language
    NoLabel,

    /// The API response omitted this identifier entirely (soft failure,
    /// not equivalent to `Missing`)
    NotReturned,
}

impl CaptionStatus {
    /// Get the status name as used in counters and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionStatus::Missing => "missing",
            CaptionStatus::Exists => "exists",
            CaptionStatus::NoLabel => "none",
            CaptionStatus::NotReturned => "N/A",
        }
    }

    /// Whether a candidate in this state may still be recommended.
    ///
    /// Only an existing target-language caption disqualifies a candidate;
    /// the other three states are retained as recommendable.
    pub fn is_recommendable(&self) -> bool {
        !matches!(self, CaptionStatus::Exists)
    }
}

impl std::fmt::Display for CaptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
