//! Creative compliance: evaluates ad creatives against the retail media
//! rulebook, scores them, and deterministically remediates common violations.

pub mod copywriter;
pub mod engine;
pub mod fixer;
pub mod rules;
pub mod scorer;

pub use copywriter::{generate_copy, GeneratedCopy};
pub use engine::ComplianceEngine;
pub use fixer::FixEngine;
pub use rules::RuleEngine;
pub use scorer::score;
