use clap::{Parser, Subcommand, ValueEnum};
use tfgate::core::gate::TfGate;
use tfgate::formatters::output::{OutputFormat, OutputFormatter};
use tfgate::selector::catalog::ModuleCatalog;
use tfgate::selector::model::SelectionResult;
use tfgate::shared::logging;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "tfgate",
    about = "Decides which Terraform modules a pipeline run deploys, from commit keywords or changed file paths.",
    version = APP_VERSION,
    disable_version_flag(true)
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(
        long,
        short = 'c',
        value_name = "PATH",
        global = true,
        help = "Path to the module catalog configuration file"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        short = 'd',
        value_name = "PATH",
        global = true,
        help = "Repository directory to query for the change signal"
    )]
    pub repo_dir: Option<String>,

    #[arg(
        long,
        short = 'f',
        value_enum,
        global = true,
        default_value = "json",
        help = "Output format for the selection result"
    )]
    pub format: CliFormat,

    #[arg(long, short = 'V', help = "Print version")]
    pub version: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliFormat {
    Json,
    Azdo,
    Plain,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Azdo => OutputFormat::Azdo,
            CliFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "commit",
        about = "Select modules by matching names in the latest commit message"
    )]
    Commit {
        #[arg(
            long,
            short = 'm',
            value_name = "TEXT",
            help = "Use this message instead of querying git"
        )]
        message: Option<String>,

        #[arg(
            long,
            help = "Fail instead of running everything when no module name matches"
        )]
        strict: bool,
    },

    #[command(
        name = "diff",
        about = "Select modules by path prefix from the changed file set"
    )]
    Diff {
        #[arg(
            long,
            short = 'b',
            value_name = "REF",
            help = "Diff against this base ref instead of the PR/push default"
        )]
        base: Option<String>,

        #[arg(
            long,
            value_name = "PATH",
            help = "Use these changed paths instead of querying git (repeatable)"
        )]
        file: Vec<String>,
    },

    #[command(name = "catalog", about = "Print the module catalog")]
    Catalog,
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    if cli.version {
        println!("{}", APP_VERSION);
        std::process::exit(0);
    }

    let format: OutputFormat = cli.format.into();

    match &cli.command {
        Some(Commands::Commit { message, strict }) => {
            let gate = init_gate(&cli);
            match gate.detect_from_commit(message.clone(), *strict).await {
                Ok(result) => emit(format, "commit", gate.catalog(), &result),
                Err(e) => fail(format, &e),
            }
        }
        Some(Commands::Diff { base, file }) => {
            let gate = init_gate(&cli);
            match gate.detect_from_files(file.clone(), base.as_deref()).await {
                Ok(result) => emit(format, "diff", gate.catalog(), &result),
                Err(e) => fail(format, &e),
            }
        }
        Some(Commands::Catalog) => {
            let gate = init_gate(&cli);
            println!("{}", OutputFormatter::format_catalog(gate.catalog()));
        }
        None => {
            println!("No command specified. Use --help for usage information.");
        }
    }
}

fn init_gate(cli: &Cli) -> TfGate {
    match TfGate::new(cli.config.clone(), cli.repo_dir.clone()) {
        Ok(gate) => gate,
        Err(e) => {
            logging::error(&format!("Failed to initialize tfgate: {}", e));
            std::process::exit(1);
        }
    }
}

fn emit(format: OutputFormat, mode: &str, catalog: &ModuleCatalog, result: &SelectionResult) {
    match format {
        OutputFormat::Json => {
            let report = OutputFormatter::format_report(mode, catalog, result);
            println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
        }
        OutputFormat::Azdo => println!("{}", OutputFormatter::format_azdo(result)),
        OutputFormat::Plain => println!("{}", OutputFormatter::format_plain(result)),
    }
}

fn fail(format: OutputFormat, error: &anyhow::Error) {
    if let OutputFormat::Azdo = format {
        println!("{}", OutputFormatter::format_azdo_error(&error.to_string()));
    }
    logging::error(&format!("Module detection failed: {}", error));
    std::process::exit(1);
}

fn init_logging() {
    let log_level = std::env::var("TFGATE_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let filter = match log_level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tfgate={}", filter).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
