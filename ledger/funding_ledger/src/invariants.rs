#![allow(dead_code)]

use crate::amount::Amount;
use crate::progress::Percentage;
use crate::types::{CampaignFunding, ContributionStatus};

/// INV-1: a confirmation never lowers the raised total.
pub fn assert_raised_monotonic(before: Amount, after: Amount) {
    assert!(
        after >= before,
        "INV-1 violated: raised decreased from {} to {}",
        before,
        after
    );
}

/// INV-2: after confirming `amount`, raised grows by exactly `amount`.
pub fn assert_confirm_invariant(before: Amount, after: Amount, amount: Amount) {
    assert_eq!(
        after,
        before + amount,
        "INV-2 violated: {} + {} != {}",
        before,
        amount,
        after
    );
}

/// INV-3: the goal is fixed for the lifetime of a campaign.
pub fn assert_goal_unchanged(original: &CampaignFunding, current: &CampaignFunding) {
    assert_eq!(
        original.goal, current.goal,
        "INV-3 violated: goal changed from {} to {}",
        original.goal, current.goal
    );
}

/// INV-4: a progress percentage lies in [0, 100].
pub fn assert_percent_bounded(p: Percentage) {
    let hundred = 100 * 10u64.pow(p.precision());
    assert!(
        p.scaled() <= hundred,
        "INV-4 violated: percentage {} exceeds 100",
        p
    );
}

/// INV-5: status transitions are forward-only.
///   Pending   -> Confirmed | Failed
///   Confirmed -> (none)
///   Failed    -> (none)
pub fn assert_valid_status_transition(from: ContributionStatus, to: ContributionStatus) {
    let valid = matches!(
        (from, to),
        (ContributionStatus::Pending, ContributionStatus::Confirmed)
            | (ContributionStatus::Pending, ContributionStatus::Failed)
    );
    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// Run all stateless campaign invariants.
pub fn assert_all_campaign_invariants(campaign: &CampaignFunding, precision: u32) {
    assert_percent_bounded(campaign.funding_percent(precision));
    assert!(
        campaign.remaining() <= campaign.goal,
        "remaining exceeds goal"
    );
}
