use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{
    BASE_AMOUNT, CHILD_MINIMUM_FACTOR, DistributionSlice, EstateInput, EstateOutcome, Horizon,
    Recipient, SPOUSE_MINIMUM_FACTOR, Scenario, calculate, child_minimum, distribution_slices,
    format_nok, spouse_minimum,
};

mod error;
pub use error::{ApiError, InputError};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenario {
    ImmediateSettlement,
    UndividedEstate,
    MinimumChildShare,
    Will,
}

impl From<CliScenario> for Scenario {
    fn from(value: CliScenario) -> Self {
        match value {
            CliScenario::ImmediateSettlement => Scenario::ImmediateSettlement,
            CliScenario::UndividedEstate => Scenario::UndividedEstate,
            CliScenario::MinimumChildShare => Scenario::MinimumChildShare,
            CliScenario::Will => Scenario::Will,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliDeceased {
    Husband,
    Wife,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiScenario {
    #[serde(
        alias = "immediateSettlement",
        alias = "IMMEDIATE_SETTLEMENT",
        alias = "oppgjor_idag"
    )]
    ImmediateSettlement,
    #[serde(
        alias = "undividedEstate",
        alias = "UNDIVIDED_ESTATE",
        alias = "uskiftet_bo"
    )]
    UndividedEstate,
    #[serde(
        alias = "minimumChildShare",
        alias = "MINIMUM_CHILD_SHARE",
        alias = "minimumsarv"
    )]
    MinimumChildShare,
    #[serde(alias = "WILL", alias = "testament")]
    Will,
}

impl From<ApiScenario> for CliScenario {
    fn from(value: ApiScenario) -> Self {
        match value {
            ApiScenario::ImmediateSettlement => CliScenario::ImmediateSettlement,
            ApiScenario::UndividedEstate => CliScenario::UndividedEstate,
            ApiScenario::MinimumChildShare => CliScenario::MinimumChildShare,
            ApiScenario::Will => CliScenario::Will,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiDeceased {
    #[serde(alias = "mann")]
    Husband,
    #[serde(alias = "kone")]
    Wife,
}

impl From<ApiDeceased> for CliDeceased {
    fn from(value: ApiDeceased) -> Self {
        match value {
            ApiDeceased::Husband => CliDeceased::Husband,
            ApiDeceased::Wife => CliDeceased::Wife,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    scenario: Option<ApiScenario>,
    deceased: Option<ApiDeceased>,
    surviving_spouse_is_wife: Option<bool>,

    total_children: Option<u32>,
    joint_children: Option<u32>,
    separate_children: Option<u32>,

    net_worth: Option<f64>,
    has_separate_property: Option<bool>,
    separate_property_amount: Option<f64>,
    has_life_insurance: Option<bool>,
    life_insurance_amount: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "arv",
    about = "Statutory inheritance split between a surviving spouse and children (no will)"
)]
struct Cli {
    #[arg(long, value_enum, default_value_t = CliScenario::ImmediateSettlement)]
    scenario: CliScenario,
    #[arg(
        long,
        value_enum,
        default_value_t = CliDeceased::Husband,
        help = "Which spouse died first"
    )]
    deceased: CliDeceased,
    #[arg(long, default_value_t = 0)]
    total_children: u32,
    #[arg(
        long,
        help = "Children of both spouses; all children count as joint when no split is given"
    )]
    joint_children: Option<u32>,
    #[arg(long, help = "Children from an earlier relationship")]
    separate_children: Option<u32>,
    #[arg(long, help = "Estate value net of debt, excluding life insurance")]
    net_worth: f64,
    #[arg(long, help = "Separate property amount; omit when there is none")]
    separate_property: Option<f64>,
    #[arg(long, help = "Life insurance payout; omit when there is none")]
    life_insurance: Option<f64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DistributionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    short_term: Option<Vec<DistributionSlice>>,
    long_term: Vec<DistributionSlice>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateResponse {
    outcome: EstateOutcome,
    distribution: DistributionResponse,
}

impl From<EstateOutcome> for CalculateResponse {
    fn from(outcome: EstateOutcome) -> Self {
        let short_term = outcome
            .short_term
            .is_some()
            .then(|| distribution_slices(&outcome, Horizon::ShortTerm));
        let long_term = distribution_slices(&outcome, Horizon::LongTerm);
        Self {
            outcome,
            distribution: DistributionResponse {
                short_term,
                long_term,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConstantsResponse {
    base_amount: f64,
    spouse_minimum_factor: f64,
    child_minimum_factor: f64,
    spouse_minimum: f64,
    child_minimum: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

fn build_inputs(cli: Cli) -> Result<EstateInput, InputError> {
    if !cli.net_worth.is_finite() || cli.net_worth < 0.0 {
        return Err(InputError::InvalidNetWorth(cli.net_worth));
    }

    if let Some(separate) = cli.separate_property {
        if !separate.is_finite() || separate < 0.0 {
            return Err(InputError::InvalidSeparateProperty(separate));
        }
        if separate > cli.net_worth {
            return Err(InputError::SeparatePropertyExceedsNetWorth {
                separate,
                net_worth: cli.net_worth,
            });
        }
    }

    if let Some(insurance) = cli.life_insurance {
        if !insurance.is_finite() || insurance < 0.0 {
            return Err(InputError::InvalidLifeInsurance(insurance));
        }
    }

    let total = cli.total_children;
    let (joint, separate) = match (cli.joint_children, cli.separate_children) {
        (None, None) => (total, 0),
        (Some(joint), None) => (joint, total.saturating_sub(joint)),
        (None, Some(separate)) => (total.saturating_sub(separate), separate),
        (Some(joint), Some(separate)) => (joint, separate),
    };
    if joint.checked_add(separate) != Some(total) {
        return Err(InputError::ChildCountMismatch {
            joint,
            separate,
            total,
        });
    }

    Ok(EstateInput {
        scenario: cli.scenario.into(),
        surviving_spouse_is_wife: cli.deceased == CliDeceased::Husband,
        total_children: total,
        joint_children: joint,
        separate_children: separate,
        net_worth: cli.net_worth,
        has_separate_property: cli.separate_property.is_some(),
        separate_property_amount: cli.separate_property.unwrap_or(0.0),
        has_life_insurance: cli.life_insurance.is_some(),
        life_insurance_amount: cli.life_insurance.unwrap_or(0.0),
    })
}

/// Parses command-line arguments, runs one calculation and prints it to
/// stdout.
pub fn run_cli<I, T>(args: I) -> Result<(), ApiError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let format = cli.format;
    let input = build_inputs(cli)?;
    let outcome = calculate(&input);
    debug!(
        scenario = ?outcome.scenario,
        total = outcome.total_estate_value,
        "calculated distribution"
    );

    match format {
        OutputFormat::Json => {
            let response = CalculateResponse::from(outcome);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => println!("{}", render_text(&outcome)),
    }
    Ok(())
}

fn render_text(outcome: &EstateOutcome) -> String {
    let mut out = outcome.derivation_log.join("\n");
    if outcome.scenario == Scenario::Will {
        return out;
    }

    let horizons: &[(&str, Horizon)] = if outcome.long_term.is_some() {
        &[("Kort sikt", Horizon::ShortTerm), ("Lang sikt", Horizon::LongTerm)]
    } else {
        &[("Fordeling", Horizon::LongTerm)]
    };

    for (label, horizon) in horizons {
        out.push_str(&format!("\n\n{label}:"));
        for slice in distribution_slices(outcome, *horizon) {
            let recipient = match slice.recipient {
                Recipient::Spouse => "Gjenlevende ektefelle",
                Recipient::Children => "Barn",
            };
            out.push_str(&format!(
                "\n   {recipient}: {} ({:.1}%)",
                format_nok(slice.amount),
                slice.fraction * 100.0
            ));
        }
    }
    out
}

fn router() -> Router {
    Router::new()
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .route("/api/constants", get(constants_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = router();

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "inheritance calculator HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/constants");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn constants_handler() -> Response {
    json_response(
        StatusCode::OK,
        ConstantsResponse {
            base_amount: BASE_AMOUNT,
            spouse_minimum_factor: SPOUSE_MINIMUM_FACTOR,
            child_minimum_factor: CHILD_MINIMUM_FACTOR,
            spouse_minimum: spouse_minimum(),
            child_minimum: child_minimum(),
        },
    )
}

async fn calculate_get_handler(
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    calculate_handler_impl(payload.map(|Query(payload)| payload).map_err(ApiError::from)).await
}

async fn calculate_post_handler(
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Response {
    calculate_handler_impl(payload.map(|Json(payload)| payload).map_err(ApiError::from)).await
}

async fn calculate_handler_impl(payload: Result<CalculatePayload, ApiError>) -> Response {
    let input = match payload
        .and_then(|payload| estate_input_from_payload(payload).map_err(ApiError::from))
    {
        Ok(input) => input,
        Err(err) => {
            warn!(%err, "rejected calculation request");
            return bad_request_response(&err);
        }
    };

    let outcome = calculate(&input);
    info!(
        scenario = ?outcome.scenario,
        total = outcome.total_estate_value,
        children = outcome.total_children,
        "calculated distribution"
    );
    json_response(StatusCode::OK, CalculateResponse::from(outcome))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            field: None,
        },
    )
}

fn bad_request_response(err: &ApiError) -> Response {
    json_response(
        StatusCode::BAD_REQUEST,
        ErrorResponse {
            error: err.to_string(),
            field: err.field(),
        },
    )
}

#[cfg(test)]
fn estate_input_from_json(json: &str) -> Result<EstateInput, ApiError> {
    let payload = serde_json::from_str::<CalculatePayload>(json)?;
    Ok(estate_input_from_payload(payload)?)
}

fn estate_input_from_payload(payload: CalculatePayload) -> Result<EstateInput, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.scenario {
        cli.scenario = v.into();
    }
    if let Some(v) = payload.deceased {
        cli.deceased = v.into();
    }
    if let Some(wife_survives) = payload.surviving_spouse_is_wife {
        cli.deceased = if wife_survives {
            CliDeceased::Husband
        } else {
            CliDeceased::Wife
        };
    }

    if let Some(v) = payload.total_children {
        cli.total_children = v;
    }
    cli.joint_children = payload.joint_children;
    cli.separate_children = payload.separate_children;

    if let Some(v) = payload.net_worth {
        cli.net_worth = v;
    }

    // Amounts only count when their flag is set; a bare amount implies the flag.
    let has_separate = payload
        .has_separate_property
        .unwrap_or(payload.separate_property_amount.is_some());
    cli.separate_property =
        has_separate.then(|| payload.separate_property_amount.unwrap_or(0.0));

    let has_insurance = payload
        .has_life_insurance
        .unwrap_or(payload.life_insurance_amount.is_some());
    cli.life_insurance = has_insurance.then(|| payload.life_insurance_amount.unwrap_or(0.0));

    build_inputs(cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        scenario: CliScenario::ImmediateSettlement,
        deceased: CliDeceased::Husband,
        total_children: 0,
        joint_children: None,
        separate_children: None,
        net_worth: 0.0,
        separate_property: None,
        life_insurance: None,
        format: OutputFormat::Json,
    }
}
