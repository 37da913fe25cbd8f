mod eligibility;
mod tiers;

pub use eligibility::EligibilityPolicy;
pub use tiers::{CertificationTier, TierCutoff, TierTable, TierTableError};

use crate::checklist::Checklist;

/// The single producer of the derived (percent, tier) pair. Every write path
/// that touches checklist data goes through here before persisting, so the
/// stored score can never drift from the stored categories.
pub fn evaluate(checklist: &Checklist, tiers: &TierTable) -> (u8, CertificationTier) {
    let percent = checklist.completion_percent();
    (percent, tiers.classify(percent))
}
