use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use hwwatch_channels::telegram::TelegramSink;
use hwwatch_core::{
    load_dotenv, ConfigError, CycleOutcome, PollConfig, PollLoop, PracticumClient, Settings,
};

#[derive(Parser, Debug)]
#[command(name = "hwwatch", version, about = "Homework review status notifier for Telegram")]
struct Cli {
    #[arg(long, help = "Dotenv file to load (default: ./.env if present)")]
    env_file: Option<PathBuf>,

    #[arg(long, default_value = "logs", help = "Directory for daily rolling log files")]
    log_dir: PathBuf,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Poll interval in seconds, overrides RETRY_TIME"
    )]
    interval: Option<u64>,

    #[arg(long, help = "Run a single poll cycle and exit")]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv(cli.env_file.as_deref())?;
    let _guard = init_tracing(&cli.log_dir)?;

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(ConfigError::Missing { name, all }) => {
            tracing::error!(critical = true, missing = ?all, "missing required variable {name}, exiting");
            std::process::exit(1);
        }
        Err(err) => return Err(err).context("invalid configuration"),
    };
    if let Some(secs) = cli.interval {
        settings = settings.with_interval(Duration::from_secs(secs));
    }

    let mut poller = build_poller(&settings);

    if cli.once {
        match poller.run_once().await {
            CycleOutcome::Failed { error, .. } => {
                return Err(anyhow::Error::new(error)).context("poll cycle failed")
            }
            outcome => tracing::info!(?outcome, "poll cycle finished"),
        }
        return Ok(());
    }

    poller.run().await;
    Ok(())
}

fn build_poller(settings: &Settings) -> PollLoop<PracticumClient, TelegramSink> {
    let client = PracticumClient::new(&settings.endpoint, &settings.credentials.practicum_token);
    let sink = TelegramSink::new(
        &settings.credentials.telegram_token,
        &settings.credentials.telegram_chat_id,
    );
    PollLoop::new(client, sink, PollConfig::from(settings))
}

fn init_tracing(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log dir {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "hwwatch.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use hwwatch_core::CursorPolicy;

    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["hwwatch"]).unwrap();
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
        assert!(cli.env_file.is_none());
        assert!(cli.interval.is_none());
        assert!(!cli.once);
    }

    #[test]
    fn cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["hwwatch", "--interval", "0"]).is_err());
    }

    #[test]
    fn cli_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "hwwatch",
            "--env-file",
            "/etc/hwwatch.env",
            "--interval",
            "60",
            "--once",
        ])
        .unwrap();
        assert_eq!(cli.env_file, Some(PathBuf::from("/etc/hwwatch.env")));
        assert_eq!(cli.interval, Some(60));
        assert!(cli.once);
    }

    #[test]
    fn poller_is_wired_from_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "PRACTICUM_TOKEN" => Some("p".to_string()),
            "TELEGRAM_TOKEN" => Some("123:abc".to_string()),
            "TELEGRAM_CHAT_ID" => Some("@channel".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.cursor_policy, CursorPolicy::Fixed);

        let poller = build_poller(&settings);
        assert!(poller.last_message().is_empty());
        assert!(poller.sent_errors().is_empty());
    }
}
