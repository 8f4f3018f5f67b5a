use std::fmt;

use docsync_types::PathAddress;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{ClassifierConfig, ClassifierMode};
use crate::error::{ClassifyError, ClassifyResult};
use crate::pattern::PathPattern;

// ---------------------------------------------------------------------------
// Direction / Classification
// ---------------------------------------------------------------------------

/// Where a change at some address is allowed to flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Contract shape; never auto-merged from the non-authoritative side.
    Structural,
    /// Descriptive content; safe to merge from either side.
    Enrichment,
    /// Generated-side content carried in a reserved namespace.
    Artifact,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::Enrichment => write!(f, "enrichment"),
            Self::Artifact => write!(f, "artifact"),
        }
    }
}

/// The classifier's verdict for one address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub direction: Direction,
    /// Human-readable name of the rule that decided.
    pub reason: String,
}

impl Classification {
    fn new(direction: Direction, reason: impl Into<String>) -> Self {
        Self {
            direction,
            reason: reason.into(),
        }
    }
}

/// A compiled pattern and the direction it assigns.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub pattern: PathPattern,
    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// PathClassifier
// ---------------------------------------------------------------------------

/// Assigns a [`Direction`] to document addresses.
///
/// Evaluation order is fixed and the first match wins:
///
/// 1. structural rules, except that an address ending in a documentation
///    field (`description`, `summary`, ...) is enrichment even inside a
///    structural region;
/// 2. enrichment rules;
/// 3. artifact namespaces (any segment containing a reserved substring);
/// 4. the configured default: structural in strict mode, enrichment in
///    lenient mode.
///
/// The classifier is immutable after construction and `Send + Sync`.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    rules: Vec<ClassificationRule>,
    artifact_namespaces: Vec<String>,
    documentation_fields: Vec<String>,
    mode: ClassifierMode,
}

impl PathClassifier {
    /// Compile every pattern in `config`.
    pub fn new(config: &ClassifierConfig) -> ClassifyResult<Self> {
        let structural = config
            .structural
            .iter()
            .map(|p| compile(p, Direction::Structural));
        let enrichment = config
            .enrichment
            .iter()
            .map(|p| compile(p, Direction::Enrichment));
        let rules = structural.chain(enrichment).collect::<ClassifyResult<Vec<_>>>()?;

        Ok(Self {
            rules,
            artifact_namespaces: config.artifact_namespaces.clone(),
            documentation_fields: config.documentation_fields.clone(),
            mode: config.mode,
        })
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn mode(&self) -> ClassifierMode {
        self.mode
    }

    /// Classify one address.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::EmptyAddress`] for an address with no
    /// segments.
    pub fn classify(&self, address: &PathAddress) -> ClassifyResult<Classification> {
        let last = address.last().ok_or(ClassifyError::EmptyAddress)?;

        let verdict = self
            .rules
            .iter()
            .find(|rule| rule.pattern.matches(address))
            .map(|rule| match rule.direction {
                Direction::Structural => {
                    let field = last.as_text();
                    if self.documentation_fields.iter().any(|f| *f == field) {
                        Classification::new(
                            Direction::Enrichment,
                            format!(
                                "documentation field '{field}' inside structural rule '{}'",
                                rule.pattern
                            ),
                        )
                    } else {
                        Classification::new(
                            Direction::Structural,
                            format!("structural rule '{}'", rule.pattern),
                        )
                    }
                }
                direction => {
                    Classification::new(direction, format!("{direction} rule '{}'", rule.pattern))
                }
            })
            .or_else(|| self.artifact_namespace(address))
            .unwrap_or_else(|| self.fallback());

        trace!(address = %address, direction = %verdict.direction, "classified");
        Ok(verdict)
    }

    fn artifact_namespace(&self, address: &PathAddress) -> Option<Classification> {
        address.segments().iter().find_map(|segment| {
            let text = segment.as_text();
            self.artifact_namespaces
                .iter()
                .find(|ns| text.contains(ns.as_str()))
                .map(|ns| {
                    Classification::new(Direction::Artifact, format!("artifact namespace '{ns}'"))
                })
        })
    }

    fn fallback(&self) -> Classification {
        match self.mode {
            ClassifierMode::Strict => {
                Classification::new(Direction::Structural, "no rule matched (strict mode)")
            }
            ClassifierMode::Lenient => {
                Classification::new(Direction::Enrichment, "no rule matched (lenient mode)")
            }
        }
    }
}

fn compile(pattern: &str, direction: Direction) -> ClassifyResult<ClassificationRule> {
    Ok(ClassificationRule {
        pattern: PathPattern::parse(pattern)?,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PathClassifier {
        PathClassifier::new(&ClassifierConfig::default()).unwrap()
    }

    fn direction(c: &PathClassifier, address: &str) -> Direction {
        c.classify(&PathAddress::decode(address)).unwrap().direction
    }

    #[test]
    fn new_endpoint_and_operation_are_structural() {
        let c = classifier();
        assert_eq!(direction(&c, "paths./users"), Direction::Structural);
        assert_eq!(direction(&c, "paths./a.post"), Direction::Structural);
        assert_eq!(direction(&c, "paths./a.get.parameters.0.schema"), Direction::Structural);
    }

    #[test]
    fn documentation_fields_inside_structure_are_enrichment() {
        let c = classifier();
        let verdict = c.classify(&PathAddress::decode("paths./a.get.description")).unwrap();
        assert_eq!(verdict.direction, Direction::Enrichment);
        assert!(verdict.reason.contains("documentation field 'description'"));

        for field in ["summary", "example", "examples", "externalDocs"] {
            let address = format!("paths./a.get.responses.200.{field}");
            assert_eq!(direction(&c, &address), Direction::Enrichment, "{address}");
        }
        assert_eq!(
            direction(&c, "components.schemas.User.properties.id.example"),
            Direction::Enrichment
        );
    }

    #[test]
    fn override_only_applies_to_the_final_segment() {
        let c = classifier();
        assert_eq!(
            direction(&c, "paths./a.get.description.extra"),
            Direction::Structural
        );
    }

    #[test]
    fn explicit_enrichment_rules() {
        let c = classifier();
        assert_eq!(direction(&c, "info.description"), Direction::Enrichment);
        assert_eq!(direction(&c, "info.contact.email"), Direction::Enrichment);
        assert_eq!(direction(&c, "info.x-logo"), Direction::Enrichment);
        assert_eq!(direction(&c, "tags.0.name"), Direction::Enrichment);

        let verdict = c.classify(&PathAddress::decode("tags")).unwrap();
        assert_eq!(verdict.reason, "enrichment rule 'tags'");
    }

    #[test]
    fn structural_rules_win_over_enrichment() {
        let c = classifier();
        assert_eq!(direction(&c, "info.version"), Direction::Structural);
        assert_eq!(direction(&c, "info.title"), Direction::Structural);
    }

    #[test]
    fn artifact_namespace_substring() {
        let c = classifier();
        let verdict = c
            .classify(&PathAddress::decode("x-docsync-artifacts.tests./a.get"))
            .unwrap();
        assert_eq!(verdict.direction, Direction::Artifact);
        assert_eq!(verdict.reason, "artifact namespace 'x-docsync-'");
        assert_eq!(direction(&c, "x-tests.smoke"), Direction::Artifact);
    }

    #[test]
    fn unmatched_addresses_follow_mode() {
        let strict = classifier();
        assert_eq!(direction(&strict, "x-internal"), Direction::Structural);

        let lenient = PathClassifier::new(&ClassifierConfig::lenient()).unwrap();
        assert_eq!(direction(&lenient, "x-internal"), Direction::Enrichment);
        assert_eq!(direction(&lenient, "paths./a.post"), Direction::Structural);
        assert_eq!(direction(&lenient, "paths./admin"), Direction::Structural);

        let verdict = lenient.classify(&PathAddress::decode("paths")).unwrap();
        assert_eq!(verdict.direction, Direction::Structural);
        assert_eq!(verdict.reason, "structural rule 'paths'");
    }

    #[test]
    fn empty_address_is_rejected() {
        let err = classifier().classify(&PathAddress::root()).unwrap_err();
        assert_eq!(err, ClassifyError::EmptyAddress);
    }

    #[test]
    fn first_matching_rule_wins() {
        let config = ClassifierConfig {
            structural: vec!["a.b".into()],
            enrichment: vec!["a".into()],
            ..ClassifierConfig::default()
        };
        let c = PathClassifier::new(&config).unwrap();
        assert_eq!(direction(&c, "a.b.c"), Direction::Structural);
        assert_eq!(direction(&c, "a.z"), Direction::Enrichment);
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let config = ClassifierConfig {
            structural: vec!["paths..get".into()],
            ..ClassifierConfig::default()
        };
        assert!(matches!(
            PathClassifier::new(&config),
            Err(ClassifyError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn rules_are_listed_in_priority_order() {
        let c = classifier();
        let first_enrichment = c
            .rules()
            .iter()
            .position(|r| r.direction == Direction::Enrichment)
            .unwrap();
        assert!(c.rules()[..first_enrichment]
            .iter()
            .all(|r| r.direction == Direction::Structural));
    }
}
