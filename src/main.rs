use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueHint};
use sales_dashboard::client::HttpBackend;
use sales_dashboard::models::SemanticField;
use sales_dashboard::report::{self, ReportOptions, ReportSource};
use sales_dashboard::{tui, utils, Config};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal dashboard for CSV sales analytics", long_about = None)]
struct Cli {
    /// Analytics server base URL (overrides DASHBOARD_URL)
    #[arg(long, global = true, value_hint = ValueHint::Url)]
    url: Option<String>,

    /// Log directory (overrides LOG_DIR)
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    log_dir: Option<PathBuf>,

    /// CSV file to upload as soon as the dashboard opens
    #[arg(long, value_hint = ValueHint::FilePath)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload, analyze and print the results without the dashboard
    Report(ReportArgs),
}

#[derive(Parser, Debug)]
struct ReportArgs {
    /// CSV file to analyze
    #[arg(long, value_hint = ValueHint::FilePath, required_unless_present = "sample", conflicts_with = "sample")]
    file: Option<PathBuf>,

    /// Analyze the server's sample data instead of a local file
    #[arg(long)]
    sample: bool,

    /// Override a column choice, e.g. `--map country=Nation` (repeatable)
    #[arg(long = "map", value_name = "FIELD=COLUMN", value_parser = report::parse_override)]
    overrides: Vec<(SemanticField, String)>,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.url {
        config = config.with_base_url(url);
    }
    if let Some(dir) = &cli.log_dir {
        config = config.with_log_dir(dir.clone());
    }
    Ok(config)
}

async fn run_report(config: Config, args: ReportArgs) -> Result<ExitCode> {
    utils::init_stderr_logger(&config.logging)?;

    let source = match args.file {
        Some(path) => ReportSource::File(path),
        None => ReportSource::Sample,
    };
    let options = ReportOptions {
        source,
        overrides: args.overrides,
    };

    let backend = HttpBackend::new(&config.server);
    match report::run_report(&backend, &options).await {
        Ok(report) => {
            print!("{}", report.render_text());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Report failed: {:?}", e);
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Command::Report(args)) => run_report(config, args).await,
        None => {
            let _guard = utils::init_file_logger(&config.logging)?;
            info!("Configuration loaded: {:?}", config.server);

            tui::run(config, cli.file).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
