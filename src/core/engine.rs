use super::currency::format_nok;
use super::types::{
    ChildrenShare, EstateInput, EstateOutcome, HorizonShare, Scenario, SpouseShare,
};

/// Statutory base amount ("G") in NOK.
pub const BASE_AMOUNT: f64 = 124_028.0;
/// Spouse minimum guarantee, in multiples of G.
pub const SPOUSE_MINIMUM_FACTOR: f64 = 4.0;
/// Per-child minimum, in multiples of G.
pub const CHILD_MINIMUM_FACTOR: f64 = 15.0;

const SPOUSE_JOINT_FRACTION: f64 = 0.5;
const SPOUSE_SEPARATE_FRACTION: f64 = 0.25;
const CHILDREN_FRACTION: f64 = 0.75;

const WILL_NOT_IMPLEMENTED: &str = "Testament-beregning er ikke implementert ennå.";

pub fn spouse_minimum() -> f64 {
    BASE_AMOUNT * SPOUSE_MINIMUM_FACTOR
}

pub fn child_minimum() -> f64 {
    BASE_AMOUNT * CHILD_MINIMUM_FACTOR
}

/// Distributes the estate between the surviving spouse and the children
/// according to `input.scenario`.
///
/// Pure: every call builds its own outcome and derivation log. Input is
/// assumed validated; out-of-range values produce meaningless figures, never
/// a panic.
pub fn calculate(input: &EstateInput) -> EstateOutcome {
    if input.scenario == Scenario::Will {
        return will_not_implemented(input);
    }

    let life_insurance = input.effective_life_insurance();
    let total_estate_value = input.net_worth + life_insurance;

    let mut log = vec![format!(
        "1. Total formue til fordeling: {}",
        format_nok(total_estate_value)
    )];
    log.push(format!("   - Nettoformue: {}", format_nok(input.net_worth)));
    if input.has_life_insurance {
        log.push(format!("   - Livsforsikring: {}", format_nok(life_insurance)));
    }

    match input.scenario {
        Scenario::ImmediateSettlement => immediate_settlement(input, total_estate_value, log),
        Scenario::UndividedEstate => undivided_estate(input, total_estate_value, log),
        Scenario::MinimumChildShare => minimum_child_share(input, total_estate_value, log),
        Scenario::Will => will_not_implemented(input),
    }
}

fn immediate_settlement(
    input: &EstateInput,
    total_estate_value: f64,
    mut log: Vec<String>,
) -> EstateOutcome {
    let life_insurance_portion = input.effective_life_insurance();
    let separate_property = input.effective_separate_property();

    log.push("\n2. Beregning av gjenlevende ektefelles arv:".to_string());

    let joint_property = input.net_worth - separate_property;
    let joint_property_portion = joint_property * SPOUSE_JOINT_FRACTION;
    log.push(format!("   - Felleseie: {}", format_nok(joint_property)));
    log.push(format!(
        "   - Andel av felleseie (50%): {}",
        format_nok(joint_property_portion)
    ));

    let separate_property_portion = separate_property * SPOUSE_SEPARATE_FRACTION;
    if input.has_separate_property {
        log.push(format!("   - Særeie: {}", format_nok(separate_property)));
        log.push(format!(
            "   - Andel av særeie (1/4): {}",
            format_nok(separate_property_portion)
        ));
    }

    let minimum = spouse_minimum();
    log.push(format!("   - Minstearv (4G): {}", format_nok(minimum)));

    let raw_spouse_total =
        joint_property_portion + separate_property_portion + life_insurance_portion;

    let (spouse_total, minimum_guarantee_adjustment) = if total_estate_value < minimum {
        log.push(format!(
            "   - Total formue er mindre enn minstearv, gjenlevende får hele formuen: {}",
            format_nok(total_estate_value)
        ));
        (total_estate_value, 0.0)
    } else if raw_spouse_total < minimum {
        let adjustment = minimum - raw_spouse_total;
        log.push(format!(
            "   - Justering for minstearv: {}",
            format_nok(adjustment)
        ));
        log.push(format!(
            "   - Gjenlevende ektefelle får minstearv: {}",
            format_nok(minimum)
        ));
        (minimum, adjustment)
    } else {
        log.push(format!(
            "   - Gjenlevende ektefelles arv: {}",
            format_nok(raw_spouse_total)
        ));
        (raw_spouse_total, 0.0)
    };

    log.push("\n3. Beregning av barnas arv:".to_string());

    let children_total = total_estate_value - spouse_total;
    let per_child = if input.total_children > 0 && children_total > 0.0 {
        let per_child = children_total / f64::from(input.total_children);
        log.push(format!(
            "   - Total arv til barn: {}",
            format_nok(children_total)
        ));
        log.push(format!(
            "   - Arv per barn ({} barn): {}",
            input.total_children,
            format_nok(per_child)
        ));
        per_child
    } else {
        if input.total_children > 0 {
            log.push(
                "   - Ingen arv til barn da gjenlevende ektefelle får hele formuen.".to_string(),
            );
        } else {
            log.push("   - Ingen barn, gjenlevende ektefelle får hele formuen.".to_string());
        }
        0.0
    };

    push_verification(&mut log, spouse_total, children_total, total_estate_value);

    EstateOutcome {
        scenario: input.scenario,
        total_estate_value,
        spouse_share: SpouseShare {
            total: spouse_total,
            life_insurance_portion,
            joint_property_portion,
            separate_property_portion,
            minimum_guarantee_adjustment,
        },
        children_share: ChildrenShare {
            total: children_total,
            per_child,
        },
        total_children: input.total_children,
        derivation_log: log,
        short_term: None,
        long_term: None,
    }
}

fn undivided_estate(
    input: &EstateInput,
    total_estate_value: f64,
    mut log: Vec<String>,
) -> EstateOutcome {
    let children = f64::from(input.total_children);
    let separate_property = input.effective_separate_property();

    log.push("\n2. Beregning for uskiftet bo:".to_string());

    let short_term = if input.has_separate_property && input.total_children > 0 {
        let children_amount = separate_property * CHILDREN_FRACTION;
        let per_child_amount = children_amount / children;
        log.push(format!(
            "   - Kort sikt: Barna får 75% av særeie umiddelbart: {}",
            format_nok(children_amount)
        ));
        log.push(format!(
            "   - Kort sikt: Per barn: {}",
            format_nok(per_child_amount)
        ));
        HorizonShare {
            spouse_amount: total_estate_value - children_amount,
            children_amount,
            per_child_amount,
        }
    } else {
        if input.total_children > 0 {
            log.push(
                "   - Kort sikt: Ingen særeie, barna får ikke umiddelbar arv".to_string(),
            );
        }
        HorizonShare {
            spouse_amount: total_estate_value,
            children_amount: 0.0,
            per_child_amount: 0.0,
        }
    };
    log.push(format!(
        "   - Kort sikt: Gjenlevende beholder i uskiftet bo: {}",
        format_nok(short_term.spouse_amount)
    ));

    let long_term = if input.total_children > 0 {
        let separate_property_share = separate_property * CHILDREN_FRACTION;
        let joint_property = input.net_worth - separate_property;
        let joint_property_share = (joint_property / 2.0) * CHILDREN_FRACTION;
        let children_amount = separate_property_share + joint_property_share;
        let per_child_amount = children_amount / children;

        log.push("\n   - Lang sikt: Beregning av barnas arv:".to_string());
        if input.has_separate_property {
            log.push(format!(
                "   - Lang sikt: 75% av særeie: {}",
                format_nok(separate_property_share)
            ));
        }
        log.push(format!(
            "   - Lang sikt: 75% av halvparten av felleseie: {}",
            format_nok(joint_property_share)
        ));
        log.push(format!(
            "   - Lang sikt: Total arv til barn: {}",
            format_nok(children_amount)
        ));
        log.push(format!(
            "   - Lang sikt: Per barn: {}",
            format_nok(per_child_amount)
        ));

        HorizonShare {
            spouse_amount: total_estate_value - children_amount,
            children_amount,
            per_child_amount,
        }
    } else {
        HorizonShare {
            spouse_amount: total_estate_value,
            children_amount: 0.0,
            per_child_amount: 0.0,
        }
    };
    log.push(format!(
        "   - Lang sikt: Gjenlevende får: {}",
        format_nok(long_term.spouse_amount)
    ));

    log.push("\n4. Verifisering:".to_string());
    for (label, share) in [("Kort sikt", short_term), ("Lang sikt", long_term)] {
        log.push(format!(
            "   - {label}: {} (gjenlevende) + {} (barn) = {}",
            format_nok(share.spouse_amount),
            format_nok(share.children_amount),
            format_nok(total_estate_value)
        ));
    }

    EstateOutcome {
        scenario: input.scenario,
        total_estate_value,
        spouse_share: SpouseShare {
            total: long_term.spouse_amount,
            life_insurance_portion: input.effective_life_insurance(),
            ..SpouseShare::default()
        },
        children_share: ChildrenShare {
            total: long_term.children_amount,
            per_child: long_term.per_child_amount,
        },
        total_children: input.total_children,
        derivation_log: log,
        short_term: Some(short_term),
        long_term: Some(long_term),
    }
}

fn minimum_child_share(
    input: &EstateInput,
    total_estate_value: f64,
    mut log: Vec<String>,
) -> EstateOutcome {
    let children = f64::from(input.total_children);

    log.push("\n2. Beregning med minimumsarv til barn:".to_string());

    let minimum = child_minimum();
    log.push(format!(
        "   - Minimumsarv per barn (15G): {}",
        format_nok(minimum)
    ));

    let (mut children_total, mut per_child) = if input.total_children > 0 {
        let separate_share_per_child = if input.has_separate_property {
            let share = input.separate_property_amount * CHILDREN_FRACTION / children;
            log.push(format!(
                "   - Særeieandel per barn: {}",
                format_nok(share)
            ));
            share
        } else {
            0.0
        };

        let per_child = separate_share_per_child.max(minimum);
        log.push(format!(
            "   - Valgt beløp per barn: {}",
            format_nok(per_child)
        ));

        let children_total = per_child * children;
        log.push(format!(
            "   - Total arv til barn: {}",
            format_nok(children_total)
        ));
        (children_total, per_child)
    } else {
        (0.0, 0.0)
    };

    let mut spouse_total = (total_estate_value - children_total).max(0.0);

    if children_total > total_estate_value {
        children_total = total_estate_value;
        per_child = if input.total_children > 0 {
            total_estate_value / children
        } else {
            0.0
        };
        spouse_total = 0.0;

        log.push(format!(
            "   - Barnas arv overstiger totalformuen, justert til: {}",
            format_nok(children_total)
        ));
        log.push(format!(
            "   - Justert arv per barn: {}",
            format_nok(per_child)
        ));
    }

    log.push(format!(
        "   - Gjenlevende ektefelle får: {}",
        format_nok(spouse_total)
    ));

    push_verification(&mut log, spouse_total, children_total, total_estate_value);

    EstateOutcome {
        scenario: input.scenario,
        total_estate_value,
        spouse_share: SpouseShare {
            total: spouse_total,
            life_insurance_portion: input.effective_life_insurance(),
            ..SpouseShare::default()
        },
        children_share: ChildrenShare {
            total: children_total,
            per_child,
        },
        total_children: input.total_children,
        derivation_log: log,
        short_term: None,
        long_term: None,
    }
}

fn will_not_implemented(input: &EstateInput) -> EstateOutcome {
    EstateOutcome {
        scenario: Scenario::Will,
        total_estate_value: 0.0,
        spouse_share: SpouseShare::default(),
        children_share: ChildrenShare::default(),
        total_children: input.total_children,
        derivation_log: vec![WILL_NOT_IMPLEMENTED.to_string()],
        short_term: None,
        long_term: None,
    }
}

fn push_verification(
    log: &mut Vec<String>,
    spouse_total: f64,
    children_total: f64,
    total_estate_value: f64,
) {
    log.push("\n4. Verifisering:".to_string());
    log.push(format!(
        "   - Total fordelt arv: {}",
        format_nok(spouse_total + children_total)
    ));
    log.push(format!(
        "   - Total formue: {}",
        format_nok(total_estate_value)
    ));
}
