//! Deterministic auto-remediation.
//!
//! [`FixEngine::fix`] walks the issues raised against a creative in catalog
//! order and applies one transformation per issue, logging a line for each.
//! Some violations (missing image, missing logo, CTA overlap) cannot be fixed
//! mechanically and only produce a suggestion; the re-evaluated issue list in
//! the [`FixOutcome`] is authoritative.

use creative_core::types::{Creative, FixOutcome, RuleId, ValueTile};
use tracing::{debug, info};

use crate::rules::{is_valid_end_date, RuleEngine};
use crate::scorer::score;

const DEFAULT_CTA: &str = "Shop Now";
/// Day/month only; end dates carry no year.
const DEFAULT_CLUBCARD_END_DATE: &str = "31/12";

const LOG_BANNED_COPY: &str = "Removed banned keywords from text fields";
const LOG_DEFAULT_CTA: &str = "Set CTA to 'Shop Now'";
const LOG_WEAK_CTA_KEPT: &str = "CTA kept as written - replace it with an approved call-to-action";
const LOG_MISSING_IMAGE: &str = "Missing image - user should upload a product image";
const LOG_CLUBCARD_DATE: &str = "Set Clubcard end date to 31/12";
const LOG_ALCOHOL: &str = "Marked as alcohol and added disclaimer suggestion";
const LOG_LOGO: &str = "Logo missing - please add the Tesco logo to the creative";
const LOG_CTA_PLACEMENT: &str = "Adjust CTA placement in editor to avoid overlap";
const LOG_ACCESSIBILITY: &str = "Adjusted font/contrast recommendations";
const LOG_PRICE_TILE: &str = "Removed disallowed price tile";
const LOG_TESCO_TAG: &str = "Added CTA for Tesco tag";

/// Applies rule-specific fixes and re-evaluates the result.
#[derive(Debug, Clone)]
pub struct FixEngine {
    rules: RuleEngine,
}

impl FixEngine {
    pub fn new(rules: RuleEngine) -> Self {
        Self { rules }
    }

    /// Remediate a creative. Never fails; returns the best-effort result.
    pub fn fix(&self, creative: &Creative) -> FixOutcome {
        let original_issues = self.rules.evaluate(creative);

        let mut fixed = creative.clone();
        let mut applied_fixes = Vec::new();
        for issue in &original_issues {
            debug!(rule = %issue.rule_id, "applying fix");
            self.apply(issue.rule_id, &mut fixed, &mut applied_fixes);
        }

        let issues_after_fix = self.rules.evaluate(&fixed);
        let score_after_fix = score(&issues_after_fix);

        info!(
            issues_before = original_issues.len(),
            issues_after = issues_after_fix.len(),
            fixes = applied_fixes.len(),
            score_after = score_after_fix.score,
            verdict = score_after_fix.verdict.as_str(),
            "creative remediated"
        );

        FixOutcome {
            original_issues,
            applied_fixes,
            fixed_creative: fixed,
            score_after_fix,
            issues_after_fix,
        }
    }

    fn apply(&self, rule: RuleId, fixed: &mut Creative, log: &mut Vec<String>) {
        match rule {
            RuleId::BannedCopy => {
                self.strip_banned_keywords(fixed);
                log.push(LOG_BANNED_COPY.to_string());
            }
            RuleId::HeadlineLength => {
                if !fixed.headline.is_empty() {
                    let max = self.rules.max_headline_chars();
                    fixed.headline = fixed.headline.chars().take(max).collect();
                    log.push(format!("Truncated headline to {} chars", max));
                }
            }
            RuleId::WeakCta => {
                if fixed.cta.is_empty() {
                    fixed.cta = DEFAULT_CTA.to_string();
                    log.push(LOG_DEFAULT_CTA.to_string());
                } else {
                    log.push(LOG_WEAK_CTA_KEPT.to_string());
                }
            }
            RuleId::MissingImage => log.push(LOG_MISSING_IMAGE.to_string()),
            RuleId::ClubcardEndDate | RuleId::ClubcardTile => {
                if fixed.clubcard_end_date.is_empty() {
                    fixed.clubcard_end_date = DEFAULT_CLUBCARD_END_DATE.to_string();
                    log.push(LOG_CLUBCARD_DATE.to_string());
                } else if !is_valid_end_date(&fixed.clubcard_end_date) {
                    log.push(format!(
                        "Clubcard end date '{}' must be corrected to DD/MM format",
                        fixed.clubcard_end_date
                    ));
                } else {
                    // Set by an earlier clubcard fix in this pass.
                    log.push(LOG_CLUBCARD_DATE.to_string());
                }
            }
            RuleId::AlcoholCompliance => {
                fixed.alcohol = true;
                log.push(LOG_ALCOHOL.to_string());
            }
            RuleId::LogoPresence => log.push(LOG_LOGO.to_string()),
            RuleId::CtaPlacement => log.push(LOG_CTA_PLACEMENT.to_string()),
            RuleId::AccessibilityFontSize | RuleId::AccessibilityContrast => {
                fixed.font_readable = true;
                fixed.contrast_ok = true;
                log.push(LOG_ACCESSIBILITY.to_string());
            }
            RuleId::PriceTileUsage => {
                fixed.value_tile = ValueTile::NoTile;
                log.push(LOG_PRICE_TILE.to_string());
            }
            RuleId::TescoTagCta => {
                if fixed.cta.is_empty() {
                    fixed.cta = DEFAULT_CTA.to_string();
                    log.push(LOG_TESCO_TAG.to_string());
                }
            }
        }
    }

    /// Removes every literal (case-sensitive) occurrence of each banned
    /// keyword, then trims. Detection is case-insensitive, so e.g. "Save"
    /// is flagged but survives removal.
    fn strip_banned_keywords(&self, fixed: &mut Creative) {
        for field in [&mut fixed.headline, &mut fixed.subhead, &mut fixed.cta] {
            if field.is_empty() {
                continue;
            }
            let mut text = field.clone();
            for keyword in self.rules.banned_keywords() {
                text = text.replace(keyword.as_str(), "");
            }
            *field = text.trim().to_string();
        }
    }
}

impl Default for FixEngine {
    fn default() -> Self {
        Self::new(RuleEngine::default())
    }
}
