use creative_core::config::RulebookConfig;
use creative_core::types::{Analysis, Creative, FixOutcome, Issue, ScoreResult};
use tracing::info;

use crate::fixer::FixEngine;
use crate::rules::RuleEngine;
use crate::scorer;

/// Entry point for creative compliance: evaluate, score, analyze and fix.
///
/// Holds only the immutable rulebook, so one instance can be shared behind an
/// `Arc` and called concurrently.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    rules: RuleEngine,
    fixer: FixEngine,
}

impl ComplianceEngine {
    pub fn new(rulebook: &RulebookConfig) -> Self {
        let rules = RuleEngine::new(rulebook);
        info!(
            banned_keywords = rules.banned_keywords().len(),
            max_headline_chars = rules.max_headline_chars(),
            "compliance engine initialized"
        );
        Self {
            fixer: FixEngine::new(rules.clone()),
            rules,
        }
    }

    pub fn evaluate(&self, creative: &Creative) -> Vec<Issue> {
        self.rules.evaluate(creative)
    }

    pub fn score(&self, issues: &[Issue]) -> ScoreResult {
        scorer::score(issues)
    }

    /// Evaluate and score in one step.
    pub fn analyze(&self, creative: &Creative) -> Analysis {
        let issues = self.rules.evaluate(creative);
        let result = scorer::score(&issues);

        metrics::counter!("compliance.analyze").increment(1);
        metrics::counter!("compliance.verdict", "verdict" => result.verdict.as_str())
            .increment(1);

        Analysis {
            status: result.verdict,
            score: result.score,
            issues,
        }
    }

    pub fn fix(&self, creative: &Creative) -> FixOutcome {
        let outcome = self.fixer.fix(creative);
        metrics::counter!("compliance.fix").increment(1);
        outcome
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new(&RulebookConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use creative_core::types::{RuleId, Verdict};

    #[test]
    fn test_analyze_default_creative() {
        let engine = ComplianceEngine::default();
        let analysis = engine.analyze(&Creative::default());
        assert_eq!(analysis.score, 80);
        assert_eq!(analysis.status, Verdict::Approved);
        assert_eq!(analysis.issues.len(), 2);
    }

    #[test]
    fn test_analyze_clubcard_alcohol_rejected() {
        let engine = ComplianceEngine::default();
        let creative = Creative {
            alcohol: true,
            clubcard: true,
            ..Default::default()
        };
        let analysis = engine.analyze(&creative);
        assert_eq!(analysis.score, 30);
        assert_eq!(analysis.status, Verdict::Rejected);
    }

    #[test]
    fn test_analyze_matches_evaluate_then_score() {
        let engine = ComplianceEngine::default();
        let creative = Creative {
            headline: "Save 50% on everything today plus more".to_string(),
            ..Default::default()
        };
        let issues = engine.evaluate(&creative);
        let result = engine.score(&issues);
        let analysis = engine.analyze(&creative);
        assert_eq!(analysis.issues, issues);
        assert_eq!(analysis.score, result.score);
        assert_eq!(result.score, 20);
        assert_eq!(result.verdict, Verdict::Rejected);
    }

    #[test]
    fn test_fix_uses_configured_rulebook() {
        let rulebook = RulebookConfig {
            banned_keywords: vec!["cheap".to_string()],
            ..Default::default()
        };
        let engine = ComplianceEngine::new(&rulebook);
        let creative = Creative {
            headline: "cheap cheerful cheese".to_string(),
            cta: "Shop now".to_string(),
            image_ref: "img".to_string(),
            ..Default::default()
        };
        let outcome = engine.fix(&creative);
        assert_eq!(outcome.original_issues[0].rule_id, RuleId::BannedCopy);
        assert_eq!(outcome.fixed_creative.headline, "cheerful cheese");
        assert!(outcome.issues_after_fix.is_empty());
    }
}
