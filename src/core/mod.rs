mod currency;
mod distribution;
mod engine;
mod types;

pub use currency::format_nok;
pub use distribution::{DistributionSlice, Recipient, distribution_slices};
pub use engine::{
    BASE_AMOUNT, CHILD_MINIMUM_FACTOR, SPOUSE_MINIMUM_FACTOR, calculate, child_minimum,
    spouse_minimum,
};
pub use types::{
    ChildrenShare, EstateInput, EstateOutcome, Horizon, HorizonShare, Scenario, SpouseShare,
};
