//! routebench command line.
//!
//! Runs the router benchmark suite and prints the report on stdout. Logs go
//! to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use routebench::alloc::CountingAllocator;
use routebench::{run_suite, AdapterKind, HarnessConfig, Scenario, SuiteReport};
use routebench_telemetry::{LogFormat, TelemetryConfig};

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

#[derive(Parser, Debug)]
#[command(name = "routebench", about = "HTTP router micro-benchmarks", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the correctness gate, then time every selected entry point.
    Run {
        #[command(flatten)]
        suite: SuiteArgs,

        /// Timed iterations per entry point.
        #[arg(long, default_value = "100000")]
        iterations: u64,

        /// Untimed iterations before each timed loop.
        #[arg(long, default_value = "1000")]
        warmup: u64,
    },

    /// Run the correctness gate only.
    Verify {
        #[command(flatten)]
        suite: SuiteArgs,
    },

    /// List adapters and scenarios.
    List,
}

#[derive(clap::Args, Debug)]
struct SuiteArgs {
    /// Router(s) to benchmark (default: all).
    #[arg(long = "adapter", value_enum)]
    adapters: Vec<AdapterKind>,

    /// Scenario(s) to run (default: all).
    #[arg(long = "scenario", value_enum)]
    scenarios: Vec<Scenario>,

    /// Query string appended to every request target.
    #[arg(long)]
    query: Option<String>,

    /// Replace the multi-route table; repeat once per "METHOD /pattern" route.
    #[arg(long = "route")]
    routes: Vec<String>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log filter directive.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty).
    #[arg(long, default_value = "pretty")]
    log_format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl SuiteArgs {
    fn harness_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new()
            .with_adapters(self.adapters.iter().copied())
            .with_scenarios(self.scenarios.iter().copied());
        if let Some(query) = &self.query {
            config = config.with_query(query.clone());
        }
        if !self.routes.is_empty() {
            config = config.with_routes(self.routes.iter().cloned());
        }
        config
    }

    fn init_logging(&self) -> Result<(), String> {
        let format = LogFormat::parse(&self.log_format)
            .ok_or_else(|| format!("unknown log format '{}', expected json or pretty", self.log_format))?;
        let telemetry = TelemetryConfig::new()
            .with_log_level(self.log_level.clone())
            .with_log_format(format);
        routebench_telemetry::init(&telemetry).map_err(|e| e.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            suite,
            iterations,
            warmup,
        } => {
            let config = suite
                .harness_config()
                .with_iterations(iterations)
                .with_warmup_iterations(warmup);
            run(&suite, &config)
        }
        Commands::Verify { suite } => {
            let config = suite.harness_config().with_verify_only(true);
            run(&suite, &config)
        }
        Commands::List => {
            list();
            ExitCode::SUCCESS
        }
    }
}

fn run(args: &SuiteArgs, config: &HarnessConfig) -> ExitCode {
    if let Err(e) = args.init_logging() {
        eprintln!("error: {}", e);
        return ExitCode::from(1);
    }

    let report = run_suite(config);
    if let Err(e) = print_report(&report, args.format) {
        eprintln!("error: failed to render report: {}", e);
        return ExitCode::from(1);
    }

    if report.failures() > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn print_report(report: &SuiteReport, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn list() {
    println!("adapters:");
    for kind in AdapterKind::ALL {
        let syntax = kind.create().syntax();
        println!("  {:<12} {:?} syntax", kind.name(), syntax);
    }
    println!("scenarios:");
    for scenario in Scenario::ALL {
        let value = scenario
            .to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default();
        println!("  {:<12} {}", value, scenario.name());
    }
}
