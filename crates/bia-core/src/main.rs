//! bi-analytics CLI.
//!
//! Loads a CSV series, runs one analysis through the engine, and prints the
//! result on stdout. Logs and errors go to stderr; the exit code is the
//! machine-readable outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bia_common::{
    AggregationType, AnomalyMethod, Error, ForecastMethod, Interval, OutputFormat,
    StructuredError, TimeSeries,
};
use bia_config::{load_config, ConfigSnapshot, LoadedConfig, ValidationError};
use bia_core::engine::AnalyticsEngine;
use bia_core::exit_codes::ExitCode;
use bia_core::log_event;
use bia_core::logging::{
    event_names, generate_run_id, init_logging, LogConfig, LogContext, LogFormat, Stage,
};
use bia_core::output::{render, Envelope, Summarize, OUTPUT_SCHEMA_VERSION};
use bia_core::sample::{generate_sample_data, SampleParams};
use bia_core::{export_to_csv, read_csv_file};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

/// bi-analytics - time-series statistics, anomalies, and forecasts
#[derive(Parser)]
#[command(name = "bia")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options applied to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to analytics.json (overrides BIA_CONFIG and BIA_CONFIG_DIR)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity (-q error, -qq off)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Log format on stderr (overrides BIA_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Descriptive statistics
    Summary(InputArgs),

    /// Linear trend with forecast
    Trend {
        #[command(flatten)]
        input: InputArgs,

        /// Forecast horizon in intervals (default from config)
        #[arg(long)]
        periods: Option<usize>,
    },

    /// Flag anomalous points
    Anomalies {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, default_value = "zscore")]
        method: AnomalyMethod,
    },

    /// Pearson correlation between two series
    Correlate {
        #[command(flatten)]
        input: InputArgs,

        /// Second series (CSV)
        #[arg(long = "with", value_name = "PATH")]
        with: PathBuf,
    },

    /// Detect periodic components
    Seasonality(InputArgs),

    /// Resample into coarser buckets
    Aggregate {
        #[command(flatten)]
        input: InputArgs,

        /// Target bucket width
        #[arg(long)]
        interval: Interval,

        #[arg(long, default_value = "sum")]
        op: AggregationType,
    },

    /// Project future values
    Forecast {
        #[command(flatten)]
        input: InputArgs,

        /// Forecast horizon in intervals (default from config)
        #[arg(long)]
        periods: Option<usize>,

        #[arg(long, default_value = "linear")]
        method: ForecastMethod,
    },

    /// Write a synthetic series as CSV to stdout
    Generate(GenerateArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input series (CSV: timestamp,value[,date])
    #[arg(long, short = 'i', value_name = "PATH")]
    input: PathBuf,

    /// Dataset name (default: file stem)
    #[arg(long)]
    name: Option<String>,

    /// Interval of the input series (default: inferred from spacing)
    #[arg(long, value_name = "INTERVAL")]
    source_interval: Option<Interval>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of points
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Timestamp of the first point in epoch milliseconds (default: now)
    #[arg(long)]
    start: Option<i64>,

    #[arg(long, default_value = "day")]
    interval: Interval,

    #[arg(long, default_value_t = 100.0)]
    base: f64,

    /// Added per point
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    trend: f64,

    /// Uniform noise amplitude
    #[arg(long, default_value_t = 0.0)]
    noise: f64,

    /// Seasonal cycle length in points
    #[arg(long, requires = "season_amplitude")]
    season_period: Option<f64>,

    #[arg(long, requires = "season_period")]
    season_amplitude: Option<f64>,

    /// Seed for reproducible noise
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration and where it came from
    Show,

    /// Validate a configuration file
    Validate {
        /// File to validate (default: the resolved config path)
        path: Option<PathBuf>,
    },
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::Ok
                }
                _ => ExitCode::ArgsError,
            };
            let _ = err.print();
            return code.into();
        }
    };

    let log_config = LogConfig::from_env(cli.global.verbose, cli.global.quiet, cli.global.log_format);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());
    let exit_code = match &cli.command {
        None => {
            eprintln!("No command given. Run `bia --help` for usage.");
            ExitCode::ArgsError
        }
        Some(Commands::Version) => print_version(&cli.global),
        Some(Commands::Generate(args)) => run_generate(&cli.global, args),
        Some(Commands::Config(args)) => run_config(&cli.global, &ctx, args),
        Some(command) => run_analysis(&cli.global, &ctx, command),
    };

    log_event!(
        ctx,
        DEBUG,
        event_names::RUN_FINISHED,
        Stage::Output,
        "run finished",
        exit_code = exit_code.as_i32() as i64
    );
    exit_code.into()
}

// ============================================================================
// Analysis commands
// ============================================================================

/// Engine plus the provenance printed with every result.
struct Session {
    engine: AnalyticsEngine,
    config_hash: String,
}

impl Session {
    fn open(global: &GlobalOpts, ctx: &LogContext) -> Result<Session, Error> {
        let loaded = load_configuration(global.config.as_deref(), ctx)?;
        let snapshot = ConfigSnapshot::new(&loaded);
        let engine = AnalyticsEngine::new(loaded.config).with_log_context(ctx.clone());
        Ok(Session {
            engine,
            config_hash: snapshot.config_hash,
        })
    }

    /// Read `input` and register it. Returns the dataset name.
    fn load(&mut self, input: &InputArgs) -> Result<String, Error> {
        let name = input
            .name
            .clone()
            .unwrap_or_else(|| dataset_name(&input.input));
        let series = read_csv_file(&input.input, input.source_interval)?;
        self.engine.add_dataset(name.clone(), series);
        Ok(name)
    }

    /// Register a second file under a name distinct from `taken`, unless it
    /// is the same file.
    fn load_other(&mut self, path: &Path, input: &InputArgs, taken: &str) -> Result<String, Error> {
        if path == input.input.as_path() {
            return Ok(taken.to_string());
        }
        let mut name = dataset_name(path);
        if name == taken {
            name.push_str("#2");
        }
        let series = read_csv_file(path, input.source_interval)?;
        self.engine.add_dataset(name.clone(), series);
        Ok(name)
    }
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "input".to_string())
}

fn no_result(operation: &str, dataset: &str, required: usize) -> Error {
    Error::NoResult {
        operation: operation.to_string(),
        dataset: dataset.to_string(),
        required,
    }
}

fn run_analysis(global: &GlobalOpts, ctx: &LogContext, command: &Commands) -> ExitCode {
    log_event!(
        ctx,
        INFO,
        event_names::RUN_STARTED,
        Stage::Init,
        "starting analysis command"
    );
    match analyze(global, ctx, command) {
        Ok(()) => ExitCode::Ok,
        Err(err) => report_error(global, &err),
    }
}

fn analyze(global: &GlobalOpts, ctx: &LogContext, command: &Commands) -> Result<(), Error> {
    let mut session = Session::open(global, ctx)?;
    let default_periods = session.engine.config().forecast.default_periods;

    match command {
        Commands::Summary(input) => {
            let name = session.load(input)?;
            let result = session
                .engine
                .statistical_summary(&name)
                .ok_or_else(|| no_result("summary", &name, 1))?;
            emit(global, ctx, &session, "summary", &name, result)
        }
        Commands::Trend { input, periods } => {
            let name = session.load(input)?;
            let periods = periods.unwrap_or(default_periods);
            let result = session
                .engine
                .analyze_trend(&name, periods)
                .ok_or_else(|| no_result("trend", &name, 2))?;
            emit(global, ctx, &session, "trend", &name, result)
        }
        Commands::Anomalies { input, method } => {
            let name = session.load(input)?;
            let result = session
                .engine
                .detect_anomalies(&name, *method)
                .ok_or_else(|| no_result("anomalies", &name, 1))?;
            emit(global, ctx, &session, "anomalies", &name, result)
        }
        Commands::Correlate { input, with } => {
            let first = session.load(input)?;
            let second = session.load_other(with, input, &first)?;
            let required = session.engine.config().correlation.min_pairs;
            let result = session
                .engine
                .analyze_correlation(&first, &second)
                .ok_or_else(|| no_result("correlate", &format!("{first}+{second}"), required))?;
            emit(global, ctx, &session, "correlate", &first, result)
        }
        Commands::Seasonality(input) => {
            let name = session.load(input)?;
            let required = session.engine.config().seasonality.min_points;
            let result = session
                .engine
                .analyze_seasonality(&name)
                .ok_or_else(|| no_result("seasonality", &name, required))?;
            emit(global, ctx, &session, "seasonality", &name, result)
        }
        Commands::Aggregate {
            input,
            interval,
            op,
        } => {
            let name = session.load(input)?;
            let result = session
                .engine
                .aggregate_data(&name, *interval, *op)
                .ok_or_else(|| no_result("aggregate", &name, 0))?;
            emit(global, ctx, &session, "aggregate", &name, result)
        }
        Commands::Forecast {
            input,
            periods,
            method,
        } => {
            let name = session.load(input)?;
            let periods = periods.unwrap_or(default_periods);
            let required = session.engine.config().forecast.min_points;
            let result = session
                .engine
                .forecast(&name, periods, *method)
                .ok_or_else(|| no_result("forecast", &name, required))?;
            emit(global, ctx, &session, "forecast", &name, result)
        }
        Commands::Generate(_) | Commands::Config(_) | Commands::Version => Err(
            Error::InvalidInput("not an analysis command".to_string()),
        ),
    }
}

fn emit<T: Serialize + Summarize>(
    global: &GlobalOpts,
    ctx: &LogContext,
    session: &Session,
    command: &str,
    dataset: &str,
    result: Arc<T>,
) -> Result<(), Error> {
    let envelope = Envelope::new(command, &ctx.run_id, &session.config_hash, result.as_ref())
        .with_dataset(dataset);
    println!("{}", render(global.format, &envelope)?);
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

fn config_error(err: ValidationError) -> Error {
    match err {
        ValidationError::InvalidValue { field, message } => Error::InvalidConfig { field, message },
        other => Error::Config(other.to_string()),
    }
}

fn load_configuration(path: Option<&Path>, ctx: &LogContext) -> Result<LoadedConfig, Error> {
    match load_config(path) {
        Ok(loaded) => {
            let source = loaded.source.to_string();
            let path = loaded
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            log_event!(
                ctx,
                DEBUG,
                event_names::CONFIG_LOADED,
                Stage::Init,
                "configuration loaded",
                source = source.as_str(),
                path = path.as_str()
            );
            Ok(loaded)
        }
        Err(err) => {
            let message = err.to_string();
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "configuration rejected",
                error = message.as_str(),
                code = err.code() as u64
            );
            Err(config_error(err))
        }
    }
}

#[derive(Debug, Serialize)]
struct ConfigValidation {
    valid: bool,
    path: Option<String>,
    source: String,
    config_hash: String,
}

impl Summarize for ConfigValidation {
    fn summary_line(&self) -> String {
        format!(
            "valid={} path={}",
            self.valid,
            self.path.as_deref().unwrap_or("-")
        )
    }
}

fn run_config(global: &GlobalOpts, ctx: &LogContext, args: &ConfigArgs) -> ExitCode {
    let result = match &args.command {
        ConfigCommands::Show => config_show(global, ctx),
        ConfigCommands::Validate { path } => {
            config_validate(global, ctx, path.as_deref().or(global.config.as_deref()))
        }
    };
    match result {
        Ok(()) => ExitCode::Ok,
        Err(err) => report_error(global, &err),
    }
}

fn config_show(global: &GlobalOpts, ctx: &LogContext) -> Result<(), Error> {
    let loaded = load_configuration(global.config.as_deref(), ctx)?;
    let snapshot = ConfigSnapshot::new(&loaded);
    let envelope = Envelope::new("config show", &ctx.run_id, &snapshot.config_hash, &snapshot);
    println!("{}", render(global.format, &envelope)?);
    Ok(())
}

fn config_validate(global: &GlobalOpts, ctx: &LogContext, path: Option<&Path>) -> Result<(), Error> {
    let loaded = load_configuration(path, ctx)?;
    let snapshot = ConfigSnapshot::new(&loaded);
    let report = ConfigValidation {
        valid: true,
        path: snapshot.path.clone(),
        source: snapshot.source.clone(),
        config_hash: snapshot.config_hash.clone(),
    };
    let envelope = Envelope::new("config validate", &ctx.run_id, &snapshot.config_hash, &report);
    println!("{}", render(global.format, &envelope)?);
    Ok(())
}

// ============================================================================
// Other commands
// ============================================================================

fn run_generate(global: &GlobalOpts, args: &GenerateArgs) -> ExitCode {
    if !(args.noise.is_finite() && (2.0 * args.noise).is_finite()) {
        let err = Error::InvalidInput(format!(
            "--noise must be a finite amplitude, got {}",
            args.noise
        ));
        return report_error(global, &err);
    }
    let start = args
        .start
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let mut params = SampleParams::new(args.count, start, args.interval)
        .with_base(args.base)
        .with_trend(args.trend)
        .with_noise(args.noise);
    if let (Some(period), Some(amplitude)) = (args.season_period, args.season_amplitude) {
        params = params.with_seasonality(period, amplitude);
    }
    if let Some(seed) = args.seed {
        params = params.with_seed(seed);
    }
    let series: TimeSeries = generate_sample_data(&params);
    print!("{}", export_to_csv(&series));
    ExitCode::Ok
}

fn print_version(global: &GlobalOpts) -> ExitCode {
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let version_info = serde_json::json!({
                "schema_version": OUTPUT_SCHEMA_VERSION,
                "config_schema_version": bia_config::CONFIG_SCHEMA_VERSION,
                "bia_version": env!("CARGO_PKG_VERSION"),
            });
            println!("{version_info}");
        }
        OutputFormat::Summary => {
            println!("bia {}", env!("CARGO_PKG_VERSION"));
        }
    }
    ExitCode::Ok
}

/// Print `err` on stderr in the requested format and map it to an exit code.
fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json | OutputFormat::Jsonl => {
            let structured = StructuredError::from(err);
            match serde_json::to_string(&structured) {
                Ok(line) => eprintln!("{line}"),
                Err(_) => eprintln!("{err}"),
            }
        }
        OutputFormat::Summary => eprintln!("{}", err.to_human()),
    }
    ExitCode::for_error(err)
}
