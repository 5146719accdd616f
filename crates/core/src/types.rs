//! Creative compliance data model: the creative under review, the issues the
//! rulebook raises against it, and the derived score/verdict.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Value tile placed on a creative. The rulebook depends on the exact tile,
/// so unknown labels collapse to [`ValueTile::NoTile`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ValueTile {
    #[default]
    #[serde(rename = "None")]
    NoTile,
    #[serde(rename = "Price Tile")]
    PriceTile,
    #[serde(rename = "Clubcard Tile")]
    ClubcardTile,
    #[serde(rename = "Only at Tesco")]
    OnlyAtTesco,
}

impl ValueTile {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Price Tile" => Self::PriceTile,
            "Clubcard Tile" => Self::ClubcardTile,
            "Only at Tesco" => Self::OnlyAtTesco,
            _ => Self::NoTile,
        }
    }
}

/// An advertising creative under evaluation.
///
/// Lives for a single request: built from caller input, optionally rewritten
/// by the fix engine, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Creative {
    pub headline: String,
    pub subhead: String,
    pub cta: String,
    /// Opaque image reference (URL or asset id); empty when no image is attached.
    pub image_ref: String,
    pub category: String,
    pub layout: String,
    pub logo_present: bool,
    pub clubcard: bool,
    /// Expected as `DD/MM`. Validated by pattern only, never parsed as a date.
    pub clubcard_end_date: String,
    pub alcohol: bool,
    pub cta_overlaps_other_element: bool,
    pub font_readable: bool,
    pub contrast_ok: bool,
    pub value_tile: ValueTile,
}

impl Default for Creative {
    fn default() -> Self {
        Self {
            headline: String::new(),
            subhead: String::new(),
            cta: String::new(),
            image_ref: String::new(),
            category: "Default".to_string(),
            layout: "Instagram Square".to_string(),
            logo_present: true,
            clubcard: false,
            clubcard_end_date: String::new(),
            alcohol: false,
            cta_overlaps_other_element: false,
            font_readable: true,
            contrast_ok: true,
            value_tile: ValueTile::NoTile,
        }
    }
}

/// Loosely-typed creative as submitted by callers. Every field is optional and
/// `null` means "use the default". Accepts the legacy snake-case field names.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreativeInput {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub subhead: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default, alias = "image_url", alias = "image")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub logo_present: Option<bool>,
    #[serde(default)]
    pub clubcard: Option<bool>,
    #[serde(default, alias = "clubcard_end")]
    pub clubcard_end_date: Option<String>,
    #[serde(default)]
    pub alcohol: Option<bool>,
    #[serde(default, alias = "cta_overlap")]
    pub cta_overlaps_other_element: Option<bool>,
    #[serde(default)]
    pub font_readable: Option<bool>,
    #[serde(default)]
    pub contrast_ok: Option<bool>,
    #[serde(default)]
    pub value_tile: Option<String>,
}

impl From<CreativeInput> for Creative {
    fn from(input: CreativeInput) -> Self {
        let defaults = Creative::default();
        Self {
            headline: input.headline.unwrap_or(defaults.headline),
            subhead: input.subhead.unwrap_or(defaults.subhead),
            cta: input.cta.unwrap_or(defaults.cta),
            image_ref: input.image_ref.unwrap_or(defaults.image_ref),
            category: input.category.unwrap_or(defaults.category),
            layout: input.layout.unwrap_or(defaults.layout),
            logo_present: input.logo_present.unwrap_or(defaults.logo_present),
            clubcard: input.clubcard.unwrap_or(defaults.clubcard),
            clubcard_end_date: input
                .clubcard_end_date
                .unwrap_or(defaults.clubcard_end_date),
            alcohol: input.alcohol.unwrap_or(defaults.alcohol),
            cta_overlaps_other_element: input
                .cta_overlaps_other_element
                .unwrap_or(defaults.cta_overlaps_other_element),
            font_readable: input.font_readable.unwrap_or(defaults.font_readable),
            contrast_ok: input.contrast_ok.unwrap_or(defaults.contrast_ok),
            value_tile: input
                .value_tile
                .as_deref()
                .map(ValueTile::from_label)
                .unwrap_or(defaults.value_tile),
        }
    }
}

/// Identifier of a rulebook rule. Serialized as its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum RuleId {
    #[serde(rename = "Banned Copy")]
    BannedCopy,
    #[serde(rename = "Headline Length")]
    HeadlineLength,
    #[serde(rename = "Weak CTA")]
    WeakCta,
    #[serde(rename = "Missing Image")]
    MissingImage,
    #[serde(rename = "Clubcard End Date")]
    ClubcardEndDate,
    #[serde(rename = "Alcohol Compliance")]
    AlcoholCompliance,
    #[serde(rename = "Logo Presence")]
    LogoPresence,
    #[serde(rename = "CTA Placement")]
    CtaPlacement,
    #[serde(rename = "Accessibility: Font Size")]
    AccessibilityFontSize,
    #[serde(rename = "Accessibility: Contrast")]
    AccessibilityContrast,
    #[serde(rename = "Price Tile Usage")]
    PriceTileUsage,
    #[serde(rename = "Clubcard Tile")]
    ClubcardTile,
    #[serde(rename = "Tesco Tag CTA")]
    TescoTagCta,
}

impl RuleId {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BannedCopy => "Banned Copy",
            Self::HeadlineLength => "Headline Length",
            Self::WeakCta => "Weak CTA",
            Self::MissingImage => "Missing Image",
            Self::ClubcardEndDate => "Clubcard End Date",
            Self::AlcoholCompliance => "Alcohol Compliance",
            Self::LogoPresence => "Logo Presence",
            Self::CtaPlacement => "CTA Placement",
            Self::AccessibilityFontSize => "Accessibility: Font Size",
            Self::AccessibilityContrast => "Accessibility: Contrast",
            Self::PriceTileUsage => "Price Tile Usage",
            Self::ClubcardTile => "Clubcard Tile",
            Self::TescoTagCta => "Tesco Tag CTA",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Severity of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Severity {
    #[serde(rename = "Hard Fail")]
    HardFail,
    Warning,
}

/// A single rule violation found during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Issue {
    pub rule_id: RuleId,
    pub message: String,
    pub severity: Severity,
}

impl Issue {
    pub fn hard_fail(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            message: message.into(),
            severity: Severity::HardFail,
        }
    }

    pub fn warning(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

/// Binary outcome derived from the score threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

/// Compliance score in `0..=100` with its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScoreResult {
    pub score: u32,
    pub verdict: Verdict,
}

/// Evaluation plus score for a single creative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Analysis {
    pub status: Verdict,
    pub score: u32,
    pub issues: Vec<Issue>,
}

/// Result of a remediation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FixOutcome {
    pub original_issues: Vec<Issue>,
    /// One human-readable line per applied fix or suggestion, in issue order.
    pub applied_fixes: Vec<String>,
    pub fixed_creative: Creative,
    pub score_after_fix: ScoreResult,
    /// Authoritative post-fix state; may still contain issues.
    pub issues_after_fix: Vec<Issue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creative_input_nulls_become_defaults() {
        let input: CreativeInput = serde_json::from_str(
            r#"{"headline": null, "logo_present": null, "font_readable": false, "value_tile": null}"#,
        )
        .unwrap();
        let creative = Creative::from(input);
        assert_eq!(creative.headline, "");
        assert!(creative.logo_present);
        assert!(!creative.font_readable);
        assert!(creative.contrast_ok);
        assert_eq!(creative.value_tile, ValueTile::NoTile);
        assert_eq!(creative.category, "Default");
    }

    #[test]
    fn test_creative_input_legacy_aliases() {
        let input: CreativeInput = serde_json::from_str(
            r#"{"image_url": "https://cdn.example.com/a.png", "clubcard_end": "01/02", "cta_overlap": true, "value_tile": "Price Tile"}"#,
        )
        .unwrap();
        let creative = Creative::from(input);
        assert_eq!(creative.image_ref, "https://cdn.example.com/a.png");
        assert_eq!(creative.clubcard_end_date, "01/02");
        assert!(creative.cta_overlaps_other_element);
        assert_eq!(creative.value_tile, ValueTile::PriceTile);
    }

    #[test]
    fn test_unknown_value_tile_collapses() {
        assert_eq!(ValueTile::from_label("price tile"), ValueTile::NoTile);
        assert_eq!(ValueTile::from_label("Only at Tesco"), ValueTile::OnlyAtTesco);
    }

    #[test]
    fn test_issue_serializes_with_labels() {
        let issue = Issue::hard_fail(RuleId::AccessibilityFontSize, "too small");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["rule_id"], "Accessibility: Font Size");
        assert_eq!(json["severity"], "Hard Fail");
        assert_eq!(RuleId::AccessibilityContrast.to_string(), "Accessibility: Contrast");
    }
}
