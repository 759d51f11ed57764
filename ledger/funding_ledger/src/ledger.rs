//! # Ledger accumulator
//!
//! The fold step that moves a campaign's raised total forward when a
//! contribution confirms. It is pure and does no deduplication: the caller
//! applies each confirmed contribution exactly once, and serializes the
//! applications for a given campaign.

use crate::amount::Amount;

/// `raised_before + contribution`, exactly.
///
/// Panics only if the sum leaves the 256-bit range; see
/// [`checked_apply_confirmed_contribution`] for the non-panicking form.
pub fn apply_confirmed_contribution(raised_before: Amount, contribution: Amount) -> Amount {
    raised_before + contribution
}

/// Like [`apply_confirmed_contribution`], returning `None` on overflow.
pub fn checked_apply_confirmed_contribution(
    raised_before: Amount,
    contribution: Amount,
) -> Option<Amount> {
    raised_before.checked_add(contribution)
}

/// Fold a sequence of confirmed contributions onto `start`.
pub fn fold_confirmed<I>(start: Amount, contributions: I) -> Amount
where
    I: IntoIterator<Item = Amount>,
{
    contributions
        .into_iter()
        .fold(start, apply_confirmed_contribution)
}
