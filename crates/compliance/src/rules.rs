//! Rule catalog and evaluator.
//!
//! [`RuleEngine`] inspects a [`Creative`] and emits one [`Issue`] per
//! violation. Checks run in a fixed order (copy, commercial/legal, design,
//! accessibility, value tile) and the resulting issue order is part of the
//! contract: the fix engine walks issues in exactly this order.

use creative_core::config::RulebookConfig;
use creative_core::types::{Creative, Issue, RuleId, ValueTile};
use tracing::debug;

type RuleCheck = fn(&RuleEngine, &Creative, &mut Vec<Issue>);

/// Every rule check, in evaluation order.
const RULE_CHECKS: [RuleCheck; 13] = [
    // Copy
    RuleEngine::check_banned_copy,
    RuleEngine::check_headline_length,
    RuleEngine::check_weak_cta,
    RuleEngine::check_missing_image,
    // Commercial / legal
    RuleEngine::check_clubcard_end_date,
    RuleEngine::check_alcohol,
    // Design
    RuleEngine::check_logo_presence,
    RuleEngine::check_cta_placement,
    // Accessibility
    RuleEngine::check_font_size,
    RuleEngine::check_contrast,
    // Value tile
    RuleEngine::check_price_tile,
    RuleEngine::check_clubcard_tile,
    RuleEngine::check_tesco_tag_cta,
];

/// Stateless evaluator over an immutable rulebook.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    banned_keywords: Vec<String>,
    /// Lower-cased copies of `banned_keywords`, used for detection.
    detection_keywords: Vec<String>,
    approved_ctas: Vec<String>,
    max_headline_chars: usize,
}

impl RuleEngine {
    pub fn new(rulebook: &RulebookConfig) -> Self {
        let banned_keywords: Vec<String> = rulebook
            .banned_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect();
        let detection_keywords = banned_keywords.iter().map(|k| k.to_lowercase()).collect();
        let approved_ctas = rulebook
            .approved_ctas
            .iter()
            .map(|c| c.to_lowercase())
            .collect();

        Self {
            banned_keywords,
            detection_keywords,
            approved_ctas,
            max_headline_chars: rulebook.max_headline_chars,
        }
    }

    /// Banned keywords with their configured casing.
    pub fn banned_keywords(&self) -> &[String] {
        &self.banned_keywords
    }

    pub fn max_headline_chars(&self) -> usize {
        self.max_headline_chars
    }

    /// Evaluate a creative. Pure: the same creative always yields the same
    /// issues in the same order.
    pub fn evaluate(&self, creative: &Creative) -> Vec<Issue> {
        let mut issues = Vec::new();
        for check in RULE_CHECKS {
            check(self, creative, &mut issues);
        }
        debug!(issues = issues.len(), "creative evaluated");
        issues
    }

    // -- copy ----------------------------------------------------------------

    fn check_banned_copy(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        let full_text = format!(
            "{} {} {}",
            creative.headline, creative.subhead, creative.cta
        )
        .to_lowercase();

        for (keyword, needle) in self.banned_keywords.iter().zip(&self.detection_keywords) {
            if full_text.contains(needle.as_str()) {
                issues.push(Issue::hard_fail(
                    RuleId::BannedCopy,
                    format!("Banned keyword detected: '{}'", keyword),
                ));
            }
        }
    }

    fn check_headline_length(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.headline.chars().count() > self.max_headline_chars {
            issues.push(Issue::warning(
                RuleId::HeadlineLength,
                format!("Headline exceeds {} characters", self.max_headline_chars),
            ));
        }
    }

    fn check_weak_cta(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        let cta = creative.cta.to_lowercase();
        if !self.approved_ctas.contains(&cta) {
            issues.push(Issue::warning(
                RuleId::WeakCta,
                "CTA should clearly indicate an action",
            ));
        }
    }

    fn check_missing_image(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.image_ref.is_empty() {
            issues.push(Issue::warning(
                RuleId::MissingImage,
                "Product image is missing",
            ));
        }
    }

    // -- commercial / legal --------------------------------------------------

    fn check_clubcard_end_date(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.clubcard && !is_valid_end_date(&creative.clubcard_end_date) {
            issues.push(Issue::hard_fail(
                RuleId::ClubcardEndDate,
                "Clubcard ads must include end date in DD/MM format",
            ));
        }
    }

    fn check_alcohol(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.alcohol {
            issues.push(Issue::hard_fail(
                RuleId::AlcoholCompliance,
                "Drinkaware responsibility message required",
            ));
        }
    }

    // -- design --------------------------------------------------------------

    fn check_logo_presence(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if !creative.logo_present {
            issues.push(Issue::hard_fail(
                RuleId::LogoPresence,
                "Tesco logo must be present",
            ));
        }
    }

    fn check_cta_placement(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.cta_overlaps_other_element {
            issues.push(Issue::hard_fail(
                RuleId::CtaPlacement,
                "CTA must not overlap image or value tile",
            ));
        }
    }

    // -- accessibility -------------------------------------------------------

    fn check_font_size(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if !creative.font_readable {
            issues.push(Issue::hard_fail(
                RuleId::AccessibilityFontSize,
                "Font size is too small for accessibility",
            ));
        }
    }

    fn check_contrast(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if !creative.contrast_ok {
            issues.push(Issue::warning(
                RuleId::AccessibilityContrast,
                "Text contrast does not meet accessibility standards",
            ));
        }
    }

    // -- value tile ----------------------------------------------------------

    fn check_price_tile(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.value_tile == ValueTile::PriceTile {
            issues.push(Issue::hard_fail(
                RuleId::PriceTileUsage,
                "Price tiles are not allowed in retail media ads",
            ));
        }
    }

    fn check_clubcard_tile(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.value_tile == ValueTile::ClubcardTile
            && !is_valid_end_date(&creative.clubcard_end_date)
        {
            issues.push(Issue::hard_fail(
                RuleId::ClubcardTile,
                "Clubcard tile must display an end date",
            ));
        }
    }

    fn check_tesco_tag_cta(&self, creative: &Creative, issues: &mut Vec<Issue>) {
        if creative.value_tile == ValueTile::OnlyAtTesco && creative.cta.is_empty() {
            issues.push(Issue::warning(
                RuleId::TescoTagCta,
                "CTA required when using 'Only at Tesco' tag",
            ));
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(&RulebookConfig::default())
    }
}

/// `true` when `value` is exactly two digits, a slash, and two digits.
pub fn is_valid_end_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'/'
        && bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit)
}
