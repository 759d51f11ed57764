use crate::invariants::{
    assert_all_campaign_invariants, assert_confirm_invariant, assert_goal_unchanged,
    assert_raised_monotonic, assert_valid_status_transition,
};
use crate::{
    apply_confirmed_contribution, checked_apply_confirmed_contribution, fold_confirmed,
    parse_ether, Amount, CampaignFunding, Contribution, ContributionStatus, FundingSummary,
    InvestorPortfolio, LedgerError, U256,
};

fn eth(s: &str) -> Amount {
    parse_ether(s).unwrap()
}

#[test]
fn test_apply_adds_exactly() {
    let before = eth("8.5");
    let after = apply_confirmed_contribution(before, eth("1.25"));
    assert_eq!(after, eth("9.75"));
    assert_raised_monotonic(before, after);
    assert_confirm_invariant(before, after, eth("1.25"));
}

#[test]
fn test_apply_zero_is_identity() {
    assert_eq!(apply_confirmed_contribution(eth("3"), Amount::ZERO), eth("3"));
}

#[test]
fn test_checked_apply_detects_overflow() {
    let max = Amount::new(U256::MAX);
    assert_eq!(checked_apply_confirmed_contribution(max, Amount::from_wei(1)), None);
    assert_eq!(
        checked_apply_confirmed_contribution(eth("1"), eth("2")),
        Some(eth("3"))
    );
}

#[test]
fn test_fold_is_order_independent() {
    let contributions = [eth("2.5"), eth("0.000000000000000001"), eth("7")];
    let forward = fold_confirmed(Amount::ZERO, contributions);
    let backward = fold_confirmed(Amount::ZERO, contributions.into_iter().rev());
    assert_eq!(forward, backward);
    assert_eq!(forward, eth("9.500000000000000001"));
}

#[test]
fn test_confirm_folds_once() {
    let mut campaign = CampaignFunding::new(eth("15"));
    let original = campaign;
    let mut contribution = Contribution::pending(eth("2.5"));

    let raised = contribution.confirm(&mut campaign).unwrap();
    assert_eq!(raised, eth("2.5"));
    assert_eq!(campaign.raised, eth("2.5"));
    assert_eq!(contribution.status, ContributionStatus::Confirmed);
    assert_valid_status_transition(ContributionStatus::Pending, contribution.status);

    // Second confirmation is rejected and leaves the campaign untouched.
    let err = contribution.confirm(&mut campaign).unwrap_err();
    assert_eq!(
        err,
        LedgerError::InvalidTransition {
            from: ContributionStatus::Confirmed,
            to: ContributionStatus::Confirmed,
        }
    );
    assert_eq!(campaign.raised, eth("2.5"));
    assert_goal_unchanged(&original, &campaign);
    assert_all_campaign_invariants(&campaign, 2);
}

#[test]
fn test_failed_contribution_never_counts() {
    let mut campaign = CampaignFunding::new(eth("10"));
    let mut contribution = Contribution::pending(eth("4"));

    contribution.fail().unwrap();
    assert_eq!(contribution.status, ContributionStatus::Failed);
    assert_eq!(campaign.raised, Amount::ZERO);

    assert!(matches!(
        contribution.confirm(&mut campaign),
        Err(LedgerError::InvalidTransition { .. })
    ));
    assert!(contribution.fail().is_err());
    assert_eq!(campaign.raised, Amount::ZERO);
}

#[test]
fn test_status_transitions() {
    use ContributionStatus::*;
    assert!(Pending.can_transition_to(Confirmed));
    assert!(Pending.can_transition_to(Failed));
    assert!(!Pending.can_transition_to(Pending));
    assert!(!Confirmed.can_transition_to(Failed));
    assert!(!Failed.can_transition_to(Confirmed));
    assert!(Confirmed.is_terminal() && Failed.is_terminal() && !Pending.is_terminal());
}

#[test]
fn test_status_string_form() {
    for status in [
        ContributionStatus::Pending,
        ContributionStatus::Confirmed,
        ContributionStatus::Failed,
    ] {
        assert_eq!(status.as_str().parse::<ContributionStatus>().unwrap(), status);
    }
    assert!("settled".parse::<ContributionStatus>().is_err());
}

#[test]
fn test_remaining_and_fully_funded() {
    let mut campaign = CampaignFunding::new(eth("3"));
    assert_eq!(campaign.remaining(), eth("3"));
    assert!(!campaign.is_fully_funded());

    Contribution::pending(eth("5")).confirm(&mut campaign).unwrap();
    assert_eq!(campaign.remaining(), Amount::ZERO);
    assert!(campaign.is_fully_funded());
    assert_all_campaign_invariants(&campaign, 2);

    assert!(!CampaignFunding::new(Amount::ZERO).is_fully_funded());
}

#[test]
fn test_funding_summary_aggregates() {
    let campaigns = [
        CampaignFunding::with_raised(eth("20"), eth("8.5")),
        CampaignFunding::with_raised(eth("10"), eth("10")),
        CampaignFunding::with_raised(eth("10"), Amount::ZERO),
    ];
    let summary = FundingSummary::from_campaigns(&campaigns, 2).unwrap();
    assert_eq!(summary.campaigns, 3);
    assert_eq!(summary.fully_funded, 1);
    assert_eq!(summary.total_goal, eth("40"));
    assert_eq!(summary.total_raised, eth("18.5"));
    assert_eq!(summary.funding_percent.to_string(), "46.25");
}

#[test]
fn test_funding_summary_empty() {
    let summary = FundingSummary::from_campaigns(&[] as &[CampaignFunding], 2).unwrap();
    assert_eq!(summary.campaigns, 0);
    assert!(summary.funding_percent.is_zero());
}

#[test]
fn test_investor_portfolio() {
    let confirmed = |s: &str| Contribution {
        amount: eth(s),
        status: ContributionStatus::Confirmed,
    };
    let entries = vec![
        (1u64, eth("15"), confirmed("2.5")),
        (1u64, eth("15"), confirmed("0.5")),
        (2u64, eth("20"), confirmed("1")),
        (2u64, eth("20"), Contribution::pending(eth("9"))),
        (
            3u64,
            eth("10"),
            Contribution {
                amount: eth("1"),
                status: ContributionStatus::Failed,
            },
        ),
    ];
    let portfolio = InvestorPortfolio::build(entries, 2).unwrap();
    assert_eq!(portfolio.confirmed, 3);
    assert_eq!(portfolio.pending, 1);
    assert_eq!(portfolio.failed, 1);
    assert_eq!(portfolio.campaigns, 2);
    assert_eq!(portfolio.total_invested, eth("4"));
    // 3/15 = 20.00% plus 1/20 = 5.00%
    assert_eq!(portfolio.total_equity.to_string(), "25.00");
}

#[test]
fn test_funding_summary_overflow_is_an_error() {
    let near_max = Amount::new(U256::MAX / U256::from(2u64) + U256::from(1u64));
    let campaigns = [
        CampaignFunding::new(near_max),
        CampaignFunding::new(near_max),
    ];
    assert_eq!(
        FundingSummary::from_campaigns(&campaigns, 2),
        Err(LedgerError::AmountOverflow)
    );
}

#[test]
fn test_investor_portfolio_overflow_is_an_error() {
    let near_max = Amount::new(U256::MAX / U256::from(2u64) + U256::from(1u64));
    let confirmed = Contribution {
        amount: near_max,
        status: ContributionStatus::Confirmed,
    };
    // Each campaign total fits; the cross-campaign total does not.
    let entries = vec![(1u64, near_max, confirmed), (2u64, near_max, confirmed)];
    assert_eq!(
        InvestorPortfolio::build(entries, 2),
        Err(LedgerError::AmountOverflow)
    );
}
