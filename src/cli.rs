//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{parse_date, parse_number, validate_simulation_config};
use crate::domain::error::PredtraderError;
use crate::domain::ledger::TradeLedger;
use crate::domain::metrics::Metrics;
use crate::domain::params::{SimulationConfig, SimulationParams, DEFAULT_INITIAL_CAPITAL};
use crate::domain::price_record::PriceRecord;
use crate::domain::price_summary::PriceSummary;
use crate::domain::simulation::{self, SimulationResult};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "predtrader", about = "Prediction-driven trading simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate the threshold strategy for one ticker
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Predictions CSV (Date, Ticker, Close, Predicted_Close)
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        capital: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        buy_threshold: Option<f64>,
        #[arg(long)]
        take_profit: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        stop_loss: Option<f64>,
        /// Directory for the trade log and portfolio value CSVs
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tickers present in a predictions file
    ListTickers {
        #[arg(long)]
        data: PathBuf,
    },
    /// Show data range, closing price summary and prediction error for a ticker
    Info {
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub ticker: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub capital: Option<f64>,
    pub buy_threshold: Option<f64>,
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    pub output: Option<PathBuf>,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Simulate {
            config,
            data,
            ticker,
            start,
            end,
            capital,
            buy_threshold,
            take_profit,
            stop_loss,
            output,
        } => {
            let overrides = Overrides {
                data,
                ticker,
                start,
                end,
                capital,
                buy_threshold,
                take_profit,
                stop_loss,
                output,
            };
            run_simulate(config.as_ref(), overrides)
        }
        Command::ListTickers { data } => run_list_tickers(&data),
        Command::Info {
            data,
            ticker,
            start,
            end,
        } => run_info(&data, &ticker, start, end),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &PredtraderError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PredtraderError> {
    FileConfigAdapter::from_file(path).map_err(|e| PredtraderError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Build a typed config from the `[simulation]` section. Expects
/// [`validate_simulation_config`] to have passed.
pub fn build_simulation_config(
    adapter: &dyn ConfigPort,
) -> Result<SimulationConfig, PredtraderError> {
    let defaults = SimulationParams::default();
    Ok(SimulationConfig {
        ticker: adapter
            .get_string("simulation", "ticker")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
        start_date: parse_date(adapter, "start_date")?,
        end_date: parse_date(adapter, "end_date")?,
        initial_capital: adapter.get_double("simulation", "initial_capital", DEFAULT_INITIAL_CAPITAL),
        params: SimulationParams {
            buy_threshold: parse_number(adapter, "buy_threshold")?.unwrap_or(defaults.buy_threshold),
            take_profit: parse_number(adapter, "take_profit")?.unwrap_or(defaults.take_profit),
            stop_loss: parse_number(adapter, "stop_loss")?.unwrap_or(defaults.stop_loss),
        },
    })
}

pub fn apply_overrides(mut config: SimulationConfig, overrides: &Overrides) -> SimulationConfig {
    if let Some(ticker) = &overrides.ticker {
        config.ticker = Some(ticker.clone());
    }
    if let Some(start) = overrides.start {
        config.start_date = Some(start);
    }
    if let Some(end) = overrides.end {
        config.end_date = Some(end);
    }
    if let Some(capital) = overrides.capital {
        config.initial_capital = capital;
    }
    if let Some(v) = overrides.buy_threshold {
        config.params.buy_threshold = v;
    }
    if let Some(v) = overrides.take_profit {
        config.params.take_profit = v;
    }
    if let Some(v) = overrides.stop_loss {
        config.params.stop_loss = v;
    }
    config
}

/// Resolve the date range, fetch the series and run the simulation.
pub fn simulate_ticker(
    data_port: &dyn DataPort,
    config: &SimulationConfig,
) -> Result<(Vec<PriceRecord>, SimulationResult), PredtraderError> {
    let ticker = config
        .ticker
        .as_deref()
        .ok_or_else(|| PredtraderError::ConfigMissing {
            section: "simulation".into(),
            key: "ticker".into(),
        })?;

    let (first, last, count) =
        data_port
            .get_data_range(ticker)?
            .ok_or_else(|| PredtraderError::NoData {
                ticker: ticker.to_string(),
            })?;
    debug!("{ticker}: {count} records from {first} to {last}");

    let start = config.start_date.unwrap_or(first);
    let end = config.end_date.unwrap_or(last);
    if start > end {
        return Err(PredtraderError::ConfigInvalid {
            section: "simulation".into(),
            key: "start_date".into(),
            reason: "start_date must not be after end_date".into(),
        });
    }

    let series = data_port.fetch_series(ticker, start, end)?;
    if series.is_empty() {
        return Err(PredtraderError::NoData {
            ticker: ticker.to_string(),
        });
    }

    info!(
        "Simulating {}: {} records, {} to {}",
        ticker,
        series.len(),
        start,
        end
    );
    let result = simulation::run(&series, config.initial_capital, &config.params)?;
    Ok((series, result))
}

fn resolve_data_path(
    adapter: Option<&FileConfigAdapter>,
    overrides: &Overrides,
) -> Result<PathBuf, PredtraderError> {
    overrides
        .data
        .clone()
        .or_else(|| adapter.and_then(|a| a.get_string("data", "path")).map(PathBuf::from))
        .ok_or_else(|| PredtraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })
}

fn run_simulate(config_path: Option<&PathBuf>, overrides: Overrides) -> ExitCode {
    // Stage 1: Load and validate config
    let adapter = match config_path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            let adapter = match load_config(path) {
                Ok(a) => a,
                Err(e) => return fail(&e),
            };
            if let Err(e) = validate_simulation_config(&adapter) {
                return fail(&e);
            }
            Some(adapter)
        }
        None => None,
    };

    let base = match adapter.as_ref().map(|a| build_simulation_config(a)) {
        Some(Ok(c)) => c,
        Some(Err(e)) => return fail(&e),
        None => SimulationConfig::default(),
    };
    let config = apply_overrides(base, &overrides);

    // Stage 2: Resolve data source and output
    let data_path = match resolve_data_path(adapter.as_ref(), &overrides) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    let output_dir = overrides.output.clone().or_else(|| {
        adapter
            .as_ref()
            .and_then(|a| a.get_string("report", "output_dir"))
            .map(PathBuf::from)
    });

    info!("Loading predictions from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path);

    run_simulation_pipeline(&data_port, &CsvReportAdapter, &config, output_dir.as_deref())
}

pub fn run_simulation_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    config: &SimulationConfig,
    output_dir: Option<&Path>,
) -> ExitCode {
    // Stage 3: Fetch and simulate
    let (series, result) = match simulate_ticker(data_port, config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };
    let ticker = config.ticker.as_deref().unwrap_or_default();

    // Stage 4: Console summary
    let metrics = Metrics::compute(&result, config.initial_capital);
    println!("=== {} ===", ticker);
    println!(
        "Period:                {} to {} ({} days)",
        series[0].date,
        series[series.len() - 1].date,
        series.len()
    );
    println!("Initial Capital:       ${}", format_money(config.initial_capital));
    println!("Final Portfolio Value: ${}", format_money(result.final_value));
    println!("Total Return:          {:.2}%", metrics.total_return * 100.0);
    println!("Max Drawdown:          -{:.1}%", metrics.max_drawdown * 100.0);
    println!("Round Trips:           {}", metrics.total_trades);
    if metrics.total_trades > 0 {
        println!("Win Rate:              {:.1}%", metrics.win_rate * 100.0);
        println!(
            "Best / Worst Trade:    {:.2}% / {:.2}%",
            metrics.best_trade * 100.0,
            metrics.worst_trade * 100.0
        );
        println!("Avg Holding:           {:.1} days", metrics.avg_holding_days);
    }
    println!("Exposure:              {:.1}%", metrics.exposure * 100.0);

    if result.ledger.is_empty() {
        warn!("No trades were triggered for {}", ticker);
    } else {
        println!("\nTrade Log");
        print!("{}", format_trade_log(&result.ledger));
    }

    // Stage 5: Export
    if let Some(dir) = output_dir {
        if let Err(e) = report_port.write(ticker, &result, dir) {
            return fail(&e);
        }
        info!("Report written to {}", dir.display());
    }
    ExitCode::SUCCESS
}

/// Two decimals with thousands separators.
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_trade_log(ledger: &TradeLedger) -> String {
    let mut out = format!(
        "{:<12}{:<13}{:>12}{:>14}{:>14}\n",
        "Date", "Action", "Price", "Shares", "Value"
    );
    for event in ledger {
        out.push_str(&format!(
            "{:<12}{:<13}{:>12.2}{:>14.4}{:>14.2}\n",
            event.date.to_string(),
            event.action.to_string(),
            event.price,
            event.shares,
            event.notional()
        ));
    }
    out
}

fn run_list_tickers(data: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data.to_path_buf());
    let tickers = match adapter.list_tickers() {
        Ok(t) => t,
        Err(e) => return fail(&e),
    };

    if tickers.is_empty() {
        warn!("No tickers found in {}", data.display());
    } else {
        for ticker in &tickers {
            println!("{}", ticker);
        }
        info!("{} tickers found", tickers.len());
    }
    ExitCode::SUCCESS
}

pub fn describe_ticker(
    data_port: &dyn DataPort,
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceSummary, PredtraderError> {
    let (first, last, _) =
        data_port
            .get_data_range(ticker)?
            .ok_or_else(|| PredtraderError::NoData {
                ticker: ticker.to_string(),
            })?;
    let series = data_port.fetch_series(ticker, start.unwrap_or(first), end.unwrap_or(last))?;
    PriceSummary::compute(&series).ok_or_else(|| PredtraderError::NoData {
        ticker: ticker.to_string(),
    })
}

fn run_info(data: &Path, ticker: &str, start: Option<NaiveDate>, end: Option<NaiveDate>) -> ExitCode {
    let adapter = CsvAdapter::new(data.to_path_buf());
    let summary = match describe_ticker(&adapter, ticker, start, end) {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    println!("Ticker:  {}", ticker);
    println!(
        "Range:   {} to {} ({} records)",
        summary.first_date, summary.last_date, summary.count
    );
    println!(
        "Low:     ${:.2} ({:+.2} vs mean)",
        summary.low, summary.delta_low
    );
    println!("Mean:    ${:.2}", summary.mean);
    println!(
        "High:    ${:.2} ({:+.2} vs mean)",
        summary.high, summary.delta_high
    );
    println!(
        "Prediction MAPE: {:.2}%",
        summary.mean_abs_pct_error * 100.0
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    if let Err(e) = validate_simulation_config(&adapter) {
        return fail(&e);
    }
    let config = match build_simulation_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let show_date = |d: Option<NaiveDate>| d.map_or_else(|| "(full range)".to_string(), |d| d.to_string());
    println!("ticker:          {}", config.ticker.as_deref().unwrap_or("(unset)"));
    println!("start_date:      {}", show_date(config.start_date));
    println!("end_date:        {}", show_date(config.end_date));
    println!("initial_capital: {}", config.initial_capital);
    println!("buy_threshold:   {}", config.params.buy_threshold);
    println!("take_profit:     {}", config.params.take_profit);
    println!("stop_loss:       {}", config.params.stop_loss);
    match adapter.get_string("data", "path") {
        Some(path) => println!("data.path:       {}", path),
        None => warn!("[data] path is not set; pass --data when simulating"),
    }
    info!("Configuration is valid");
    ExitCode::SUCCESS
}
