//! # Reconciler Module
//!
//! Orchestrates one scan: the primary extractor first, the deterministic
//! extractor when the primary yields nothing, then sanitization, validation and
//! deduplication of whatever came out.
//!
//! ```text
//! Init -> PrimaryAttempted -> FallbackAttempted | FallbackSkipped -> Validated -> Done
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::candidate_extractor::CandidateExtractor;
use crate::code_model::{CodeGroup, RawCodeGroup};
use crate::normalizer::strip_pictographs;
use crate::primary_extractor::{PrimaryExtractor, PrimaryExtractorAdapter};
use crate::sanitizer::Sanitizer;
use crate::scan_config::ScanConfig;
use crate::validator::CodeValidator;

/// Stages of a scan, reported in debug logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    Init,
    PrimaryAttempted,
    FallbackAttempted,
    FallbackSkipped,
    Validated,
    Done,
}

/// Which extractor produced the working result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Primary,
    Fallback,
}

/// Final outcome of scanning one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// At least one group with at least one valid code
    Found {
        groups: Vec<CodeGroup>,
        source: ExtractionSource,
    },
    /// Extraction ran but no code survived validation
    NoCodes,
    /// Empty or command-prefixed input, nothing was scanned
    Skipped,
}

impl ScanOutcome {
    pub fn groups(&self) -> &[CodeGroup] {
        match self {
            ScanOutcome::Found { groups, .. } => groups,
            ScanOutcome::NoCodes | ScanOutcome::Skipped => &[],
        }
    }
}

/// Check whether text should bypass extraction entirely
pub fn should_skip(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.starts_with('/')
}

/// Two-stage extraction pipeline
pub struct Reconciler {
    primary: Option<PrimaryExtractorAdapter>,
    fallback: CandidateExtractor,
    sanitizer: Sanitizer,
    validator: CodeValidator,
    sentinel_app_name: String,
}

impl Reconciler {
    /// Pipeline without a primary extractor, fallback only
    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: CandidateExtractor::new(),
            sanitizer: Sanitizer::new(),
            validator: CodeValidator::new(),
            sentinel_app_name: ScanConfig::default().sentinel_app_name,
        }
    }

    /// Pipeline with default vocabularies and the given primary extractor
    pub fn new(primary: Arc<dyn PrimaryExtractor>) -> Self {
        let config = ScanConfig::default();
        Self {
            primary: Some(PrimaryExtractorAdapter::new(primary, config.recovery.clone())),
            ..Self::fallback_only()
        }
    }

    /// Pipeline with custom configuration
    pub fn with_config(
        primary: Option<Arc<dyn PrimaryExtractor>>,
        config: ScanConfig,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            primary: primary.map(|p| PrimaryExtractorAdapter::new(p, config.recovery.clone())),
            sanitizer: Sanitizer::with_config(&config)?,
            validator: CodeValidator::with_config(&config),
            sentinel_app_name: config.sentinel_app_name.clone(),
            fallback: CandidateExtractor::with_config(config)?,
        })
    }

    /// Scan one message
    pub async fn scan(&self, raw: &str) -> ScanOutcome {
        if should_skip(raw) {
            debug!("Skipping empty or command text");
            return ScanOutcome::Skipped;
        }
        debug!(stage = ?ScanStage::Init, text_length = raw.len(), "Scan started");

        let primary_groups = match &self.primary {
            Some(adapter) => adapter.extract(raw).await,
            None => Vec::new(),
        };
        debug!(
            stage = ?ScanStage::PrimaryAttempted,
            groups = primary_groups.len(),
            "Primary extraction finished"
        );

        let (working, source) = if primary_groups.iter().any(RawCodeGroup::has_codes) {
            debug!(stage = ?ScanStage::FallbackSkipped, "Using primary result");
            (primary_groups, ExtractionSource::Primary)
        } else {
            info!("Primary extractor found nothing, switching to pattern scan");
            let groups = self.fallback.extract(raw);
            debug!(stage = ?ScanStage::FallbackAttempted, "Fallback extraction finished");
            (groups, ExtractionSource::Fallback)
        };

        let groups = self.validate_groups(working);
        debug!(stage = ?ScanStage::Validated, groups = groups.len(), "Validation finished");

        let outcome = if groups.is_empty() {
            ScanOutcome::NoCodes
        } else {
            ScanOutcome::Found { groups, source }
        };
        debug!(stage = ?ScanStage::Done, ?source, "Scan finished");
        outcome
    }

    /// Sanitize, validate and dedupe every group, dropping groups left empty
    pub fn validate_groups(&self, raw_groups: Vec<RawCodeGroup>) -> Vec<CodeGroup> {
        raw_groups
            .into_iter()
            .filter_map(|raw| {
                let app_name = self.display_app_name(raw.app_name.as_deref());
                let mut group = CodeGroup::new(&app_name, &self.sentinel_app_name);
                for code in &raw.codes {
                    let cleaned = self.sanitizer.sanitize(code);
                    if self.validator.is_valid(&cleaned) {
                        group.insert(cleaned);
                    }
                }
                if group.is_empty() {
                    debug!(app_name = %group.app_name(), raw_codes = raw.codes.len(), "Dropping group without valid codes");
                    None
                } else {
                    Some(group)
                }
            })
            .collect()
    }

    fn display_app_name(&self, name: Option<&str>) -> String {
        let name = name.map(strip_pictographs).unwrap_or_default();
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("null") {
            self.sentinel_app_name.clone()
        } else {
            name.to_string()
        }
    }
}
