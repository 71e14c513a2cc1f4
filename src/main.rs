use clap::{Parser, Subcommand, builder::styling};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use sf_report_metadata::{ExtractConfig, ReportPipeline, ReportsApi, SalesforceClient, Settings};
use std::process::ExitCode;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Salesforce Report Metadata: dump the definition of every report in an org to JSON
#[derive(Parser)]
#[command(name = "sfrm", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata for every report into an output directory
    Extract {
        /// Directory to write report files to. Removed and recreated on every run.
        #[arg(short, long, default_value = "report_metadata")]
        output_dir: String,
    },

    /// Test login and logout against the configured org
    Auth,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let dotenv = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::debug!("No {} file found, using process environment", cli.env),
        Err(e) => return Err(e).wrap_err_with(|| format!("Failed to load {}", cli.env)),
    }

    let settings = Settings::from_env()?;
    let client = SalesforceClient::from_settings(&settings)?;

    match cli.command {
        Commands::Extract { output_dir } => {
            let config = ExtractConfig::from_env();
            log::info!(
                "Extracting report metadata to {} (API v{})",
                output_dir.bright_black(),
                client.api_version()
            );

            let mut pipeline =
                ReportPipeline::new(client, settings.credentials, config, &output_dir);
            match pipeline.run().await {
                Ok(summary) => {
                    log::info!(
                        "{} {} processed, {} failed",
                        "✓".green(),
                        summary.processed_count(),
                        summary.failed_count()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                // Already reported by the pipeline before logout
                Err(_) => Ok(ExitCode::FAILURE),
            }
        }
        Commands::Auth => {
            log::info!("Testing login for {}", settings.credentials);
            let session = client
                .login(&settings.credentials)
                .await
                .wrap_err("Login failed")?;
            log::info!(
                "{} Logged in to {}",
                "✓".green(),
                session.instance_url().as_str().bright_black()
            );
            client.logout(&session).await.wrap_err("Logout failed")?;
            log::info!("{} Logged out", "✓".green());
            Ok(ExitCode::SUCCESS)
        }
    }
}
