use serde::Serialize;

use super::types::{EstateOutcome, Horizon};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    Spouse,
    Children,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub recipient: Recipient,
    pub amount: f64,
    pub fraction: f64,
}

/// Recipient slices for charting one horizon of an outcome. Children only
/// get a slice when there are children to receive it.
pub fn distribution_slices(outcome: &EstateOutcome, horizon: Horizon) -> Vec<DistributionSlice> {
    let (spouse_amount, children_amount) = outcome.horizon_totals(horizon);
    let fraction_of = |amount: f64| {
        if outcome.total_estate_value > 0.0 {
            amount / outcome.total_estate_value
        } else {
            0.0
        }
    };

    let mut slices = vec![DistributionSlice {
        recipient: Recipient::Spouse,
        amount: spouse_amount,
        fraction: fraction_of(spouse_amount),
    }];
    if outcome.total_children > 0 {
        slices.push(DistributionSlice {
            recipient: Recipient::Children,
            amount: children_amount,
            fraction: fraction_of(children_amount),
        });
    }
    slices
}
