use price_forecast::{
    AnalyticsConfig, ForecastError, ForecastRequest, ForecastService, PriceRecord,
};
use serde::Deserialize;
use std::env;
use std::fs;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: price-forecast <input.json> [config.json]";

/// Forecast job read from the input file
#[derive(Debug, Deserialize)]
struct ForecastInput {
    request: ForecastRequest,
    #[serde(default)]
    history: Vec<PriceRecord>,
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(input_path: &str, config_path: Option<&str>) -> Result<(), ForecastError> {
    let config = match config_path {
        Some(path) => AnalyticsConfig::from_path(path)?,
        None => AnalyticsConfig::default(),
    };

    let input: ForecastInput = serde_json::from_str(&fs::read_to_string(input_path)?)?;
    let service = ForecastService::new(config.forecast)?;

    let output = match service.run(&input.request, &input.history) {
        Ok(report) => serde_json::to_value(&report)?,
        Err(err @ ForecastError::InsufficientData { actual, .. }) => serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "dataPoints": actual,
        }),
        Err(err) => return Err(err),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input_path) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    match run(input_path, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(input = %input_path, "{err}");
            ExitCode::FAILURE
        }
    }
}
