use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use f5asm::commands::HostCommand;
use f5asm::config::{Config, Overrides};
use f5asm::render::{error_entry, CommandOutput};

/// Version injected at compile time via F5ASM_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("F5ASM_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// Manage F5 ASM policies over iControl REST
#[derive(Parser, Debug)]
#[command(name = "f5asm", version = VERSION, about, long_about = None)]
struct Args {
    /// Server address, bare host or full URL
    #[arg(long, env = "F5_SERVER", global = true)]
    server: Option<String>,

    #[arg(long, env = "F5_USERNAME", global = true)]
    username: Option<String>,

    #[arg(long, env = "F5_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    insecure: bool,

    /// Use the system proxy settings
    #[arg(long, global = true)]
    proxy: bool,

    /// Fail when a policy or member name cannot be resolved
    #[arg(long, global = true)]
    strict: bool,

    /// How results are written to stdout
    #[arg(long, value_enum, default_value = "markdown", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: HostCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable markdown table
    Markdown,
    /// Full entry with context and raw response as JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            insecure: self.insecure,
            proxy: self.proxy,
            strict: self.strict,
        }
    }
}

/// Log to a file so stdout stays reserved for results. `RUST_LOG` wins over
/// `--log-level` when set.
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(level.to_tracing_level()?.as_str()),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("f5asm {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("f5asm").join("f5asm.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".f5asm").join("f5asm.log");
    }
    PathBuf::from("f5asm.log")
}

fn report(output: &CommandOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Markdown => println!("{}", output.readable),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.to_entry())?),
    }
    Ok(())
}

fn report_error(message: &str, format: OutputFormat) {
    match format {
        OutputFormat::Markdown => eprintln!("{}", message),
        OutputFormat::Json => println!("{}", error_entry(message)),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let settings = match Config::load().client_settings(&args.overrides()) {
        Ok(settings) => settings,
        Err(err) => {
            report_error(&format!("Initialization error: {:#}", err), args.output);
            return ExitCode::FAILURE;
        }
    };

    let name = args.command.name();
    match args.command.run(&settings).await {
        Ok(output) => {
            if let Err(err) = report(&output, args.output) {
                eprintln!("Error: {err:?}");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            tracing::error!("{} failed: {:?}", name, failure);
            report_error(&failure.message(name), args.output);
            ExitCode::FAILURE
        }
    }
}
