//! Per-language WikiProject label normalizers
//!
//! Each wiki names its WikiProject pages differently (namespace prefix,
//! project word, punctuation). These normalizers strip the local
//! conventions so labels compare equal across sources. The stripping
//! rules are empirical, carried over from the wikis' observed naming.

use crate::error::TaxonomyError;
use steward_domain::traits::LabelNormalizer;

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Normalizer for English Wikipedia WikiProject names
#[derive(Debug, Clone, Copy)]
pub struct EnglishNormalizer;

impl LabelNormalizer for EnglishNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let stripped = raw
            .to_lowercase()
            .replace("wikipedia:", "")
            .replace("wikiproject", "");
        collapse_whitespace(&stripped)
    }
}

/// Normalizer for French Wikipedia WikiProject names
#[derive(Debug, Clone, Copy)]
pub struct FrenchNormalizer;

impl LabelNormalizer for FrenchNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let stripped = raw.to_lowercase().replace("projet:", "");
        collapse_whitespace(&stripped)
    }
}

/// Normalizer for Arabic Wikipedia WikiProject names
#[derive(Debug, Clone, Copy)]
pub struct ArabicNormalizer;

impl LabelNormalizer for ArabicNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let stripped = raw
            .to_lowercase()
            .replace("ويكيبيديا:", "")
            .replace("مشروع ويكي", "");
        collapse_whitespace(&stripped)
    }
}

/// Normalizer for Turkish Wikipedia WikiProject names
#[derive(Debug, Clone, Copy)]
pub struct TurkishNormalizer;

impl LabelNormalizer for TurkishNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let stripped = raw
            .to_lowercase()
            .replace("vikipedi", "")
            .replace("vikiproje", "")
            .replace(':', "");
        collapse_whitespace(&stripped)
    }
}

/// Normalizer for Hungarian Wikipedia WikiProject names
#[derive(Debug, Clone, Copy)]
pub struct HungarianNormalizer;

/// Workshop names whose topic form is irregular
const HUNGARIAN_ALIASES: [(&str, &str); 4] = [
    ("Wikipédia:Harry Potter-műhely", "Harry Potterrel kapcsolatos"),
    ("Wikipédia:USA-műhely", "USA-val kapcsolatos"),
    ("Wikipédia:Anime- és mangaműhely", "anime-manga témájú"),
    ("Wikipédia:Első világháború műhely", "első világháborús témájú"),
];

/// Suffixes and fillers stripped from Hungarian workshop names.
/// Order matters: longer forms come before their prefixes.
const HUNGARIAN_STRIP: [&str; 9] = [
    "wikipédia:",
    "témájú",
    "kapcsolatos",
    "műhelyek",
    "műhely",
    "-es ",
    "-",
    "országgal",
    "ország",
];

impl LabelNormalizer for HungarianNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let mut label = raw.to_string();
        for (workshop, topic) in HUNGARIAN_ALIASES {
            if label == workshop {
                label = topic.to_string();
            }
        }
        label = label.to_lowercase();
        for pattern in HUNGARIAN_STRIP {
            label = label.replace(pattern, " ");
        }
        collapse_whitespace(&label)
    }
}

/// Select the normalizer for a wiki database id (e.g. `enwiki`).
///
/// An unknown wiki is a fatal precondition error, raised before any
/// network or file activity.
pub fn normalizer_for(wiki: &str) -> Result<Box<dyn LabelNormalizer>, TaxonomyError> {
    match wiki {
        "enwiki" => Ok(Box::new(EnglishNormalizer)),
        "frwiki" => Ok(Box::new(FrenchNormalizer)),
        "arwiki" => Ok(Box::new(ArabicNormalizer)),
        "huwiki" => Ok(Box::new(HungarianNormalizer)),
        "trwiki" => Ok(Box::new(TurkishNormalizer)),
        other => Err(TaxonomyError::UnknownWiki(other.to_string())),
    }
}
