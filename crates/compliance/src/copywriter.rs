//! Placeholder copy and category disclaimers for creative previews.

use creative_core::types::Creative;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const FALLBACK_HEADLINE: &str = "Discover Quality Products";
const FALLBACK_SUBHEAD: &str = "Designed for everyday needs";
const FALLBACK_CTA: &str = "Shop Now";

/// Preview copy with empty fields filled in and the category disclaimer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedCopy {
    pub headline: String,
    pub subhead: String,
    pub cta: String,
    pub disclaimer: String,
}

pub fn generate_copy(creative: &Creative) -> GeneratedCopy {
    GeneratedCopy {
        headline: or_fallback(&creative.headline, FALLBACK_HEADLINE),
        subhead: or_fallback(&creative.subhead, FALLBACK_SUBHEAD),
        cta: or_fallback(&creative.cta, FALLBACK_CTA),
        disclaimer: disclaimer_for(&creative.category).to_string(),
    }
}

/// Disclaimer required for a category; empty when none applies.
pub fn disclaimer_for(category: &str) -> &'static str {
    match category {
        "alcohol" => "Please drink responsibly. Visit drinkaware.co.uk",
        "lep" => "This product complies with applicable regulations.",
        _ => "",
    }
}

fn or_fallback(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        trimmed => trimmed.to_string(),
    }
}
