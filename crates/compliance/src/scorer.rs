use creative_core::types::{Issue, ScoreResult, Severity, Verdict};

const STARTING_SCORE: u32 = 100;
const HARD_FAIL_PENALTY: u32 = 25;
const WARNING_PENALTY: u32 = 10;

/// Minimum score for an `Approved` verdict.
pub const APPROVAL_THRESHOLD: u32 = 70;

/// Score a list of issues: 100 minus 25 per hard fail and 10 per warning,
/// floored at 0. Order-insensitive.
pub fn score(issues: &[Issue]) -> ScoreResult {
    let penalty = total_penalty(issues.iter().map(|issue| issue.severity));
    let score = STARTING_SCORE.saturating_sub(penalty);
    let verdict = if score >= APPROVAL_THRESHOLD {
        Verdict::Approved
    } else {
        Verdict::Rejected
    };

    ScoreResult { score, verdict }
}

/// Sum of per-severity penalties, saturating instead of overflowing.
fn total_penalty(severities: impl Iterator<Item = Severity>) -> u32 {
    severities
        .map(|severity| match severity {
            Severity::HardFail => HARD_FAIL_PENALTY,
            Severity::Warning => WARNING_PENALTY,
        })
        .fold(0u32, u32::saturating_add)
}
