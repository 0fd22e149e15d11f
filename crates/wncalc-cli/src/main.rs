use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use wncalc_core::explain::{prompt, summary};
use wncalc_core::observe::{init_logging, LogConfig};
use wncalc_core::prelude::*;
use wncalc_core::{OutputFormat, WncalcConfig};

#[derive(Parser, Debug)]
#[command(name = "wncalc", version, about = "Wireless network design calculators")]
struct Args {
    /// Scenario: wireless_comm, ofdm, link_budget or cellular_design.
    scenario: ScenarioId,

    /// Field value, repeatable. Overrides values from --input.
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    set: Vec<(String, String)>,

    /// YAML file mapping field names to values.
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Report format (defaults to the configured one).
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Request an explanation of the result.
    #[arg(long)]
    explain: bool,

    /// Configuration file (otherwise the standard search path is used).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => WncalcConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WncalcConfig::load().context("loading config")?,
    };

    init_logging(&LogConfig {
        level: config.logging.level.more_verbose(args.verbose),
        ..config.logging.clone()
    });

    let mut raw = match &args.input {
        Some(path) => read_input_file(path)?,
        None => ScenarioInput::new(),
    };
    for (key, value) in &args.set {
        raw.set(key.as_str(), value.as_str());
    }
    tracing::debug!(scenario = %args.scenario, fields = raw.len(), "input assembled");

    let calc = run(args.scenario, &raw)?;
    let request = ExplanationRequest::build(&calc.input, &calc.result)?;
    let format = args.format.map(OutputFormat::from).unwrap_or(config.output.format);

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&request));
            if args.explain {
                println!();
                println!("Explanation");
                println!("{}", explain(&config, &request)?);
            }
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&request).context("serializing result")?;
            if args.explain {
                value["explanation"] = serde_json::Value::String(explain(&config, &request)?);
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Read a YAML mapping of field name to scalar into raw text.
fn read_input_file(path: &Path) -> Result<ScenarioInput> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut raw = ScenarioInput::new();
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            bail!("{}: field names must be strings", path.display());
        };
        let text = match value {
            serde_yaml::Value::Null => continue,
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => bail!("{}: field '{}' must be a scalar", path.display(), key),
        };
        raw.set(key, text);
    }
    Ok(raw)
}

fn render_text(request: &ExplanationRequest) -> String {
    let mut out = format!("{}\n\nInputs\n", request.scenario().title());
    for line in prompt::input_lines(request.inputs()) {
        out.push_str(&format!("  {}\n", line));
    }
    out.push_str("\nResults\n");
    for line in prompt::result_lines(request.results()) {
        out.push_str(&format!("  {}\n", line));
    }
    out
}

#[cfg(feature = "explain")]
fn explain(config: &WncalcConfig, request: &ExplanationRequest) -> Result<String> {
    use wncalc_core::explain::HttpTransport;

    if !config.explain.enabled {
        return Ok(summary::summary(request));
    }

    let transport = HttpTransport::from_config(&config.explain)?;
    let session = ExplanationSession::new(transport);
    let pending = session
        .submit(request.clone())
        .context("starting explanation worker")?;
    let explanation = pending
        .wait()
        .context("explanation worker panicked")?;
    Ok(explanation.text().to_string())
}

#[cfg(not(feature = "explain"))]
fn explain(_config: &WncalcConfig, request: &ExplanationRequest) -> Result<String> {
    Ok(summary::summary(request))
}
