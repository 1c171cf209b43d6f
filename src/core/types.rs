use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    ImmediateSettlement,
    UndividedEstate,
    MinimumChildShare,
    Will,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Horizon {
    ShortTerm,
    LongTerm,
}

/// Validated estate facts for one calculation.
///
/// `joint_children + separate_children == total_children` and
/// `0 <= separate_property_amount <= net_worth` are upheld by whoever builds
/// the value; the engine does not recheck them.
#[derive(Debug, Clone)]
pub struct EstateInput {
    pub scenario: Scenario,
    pub surviving_spouse_is_wife: bool,
    pub total_children: u32,
    pub joint_children: u32,
    pub separate_children: u32,
    pub net_worth: f64,
    pub has_separate_property: bool,
    pub separate_property_amount: f64,
    pub has_life_insurance: bool,
    pub life_insurance_amount: f64,
}

impl EstateInput {
    pub fn effective_separate_property(&self) -> f64 {
        if self.has_separate_property {
            self.separate_property_amount
        } else {
            0.0
        }
    }

    pub fn effective_life_insurance(&self) -> f64 {
        if self.has_life_insurance {
            self.life_insurance_amount
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpouseShare {
    pub total: f64,
    pub life_insurance_portion: f64,
    pub joint_property_portion: f64,
    pub separate_property_portion: f64,
    pub minimum_guarantee_adjustment: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildrenShare {
    pub total: f64,
    pub per_child: f64,
}

/// One horizon of an undivided estate.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonShare {
    pub spouse_amount: f64,
    pub children_amount: f64,
    pub per_child_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstateOutcome {
    pub scenario: Scenario,
    pub total_estate_value: f64,
    pub spouse_share: SpouseShare,
    pub children_share: ChildrenShare,
    pub total_children: u32,
    pub derivation_log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_term: Option<HorizonShare>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_term: Option<HorizonShare>,
}

impl EstateOutcome {
    /// Spouse and children totals for the requested horizon. Scenarios with a
    /// single horizon answer both with the top-level shares.
    pub fn horizon_totals(&self, horizon: Horizon) -> (f64, f64) {
        let split = match horizon {
            Horizon::ShortTerm => self.short_term,
            Horizon::LongTerm => self.long_term,
        };
        match split {
            Some(share) => (share.spouse_amount, share.children_amount),
            None => (self.spouse_share.total, self.children_share.total),
        }
    }
}
