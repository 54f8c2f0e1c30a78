use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::env;

use crate::theme::Theme;
use crate::youtube::DEFAULT_API_URL;

/// vidsearch - terminal video search
///
/// Search YouTube from the terminal with a local blocklist and search history.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "vidsearch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal video search", long_about = None)]
pub struct CliArgs {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the YouTube Data API
    #[arg(long, env = "YOUTUBE_API_URL")]
    pub api_url: Option<String>,

    /// Path to the SQLite key-value store (blocklist + history)
    #[arg(long, env = "VIDSEARCH_DB_PATH")]
    pub db_path: Option<String>,

    /// Search request timeout in milliseconds (1000-60000)
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord, dos-blue, amber-crt, green-phosphor
    #[arg(long, env = "VIDSEARCH_THEME")]
    pub theme: Option<String>,

    /// Log file used while the terminal UI is running
    #[arg(long, env = "VIDSEARCH_LOG_FILE")]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive search screen (default)
    Tui,
    /// Run one search and print the result cards
    Search {
        /// Query words (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage blocked search terms
    Block {
        #[command(subcommand)]
        action: BlockAction,
    },
    /// Inspect or clear recent searches
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum BlockAction {
    Add { term: String },
    Remove { term: String },
    List,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum HistoryAction {
    List,
    Clear,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub db_path: String,
    pub request_timeout_ms: u64,
    pub render_fps: u32,
    pub theme: Theme,
    pub log_file: String,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Parse CLI args (and env) into config plus the requested command
pub fn load() -> Result<(Config, Command)> {
    let args = CliArgs::parse();
    let command = args.command.clone().unwrap_or(Command::Tui);
    Ok((Config::from_args(args)?, command))
}

impl Config {
    /// Build and validate config from already-parsed args.
    /// Args that clap did not fill fall back to the environment, then defaults.
    pub fn from_args(args: CliArgs) -> Result<Config> {
        let api_key = args
            .api_key
            .or_else(|| env::var("YOUTUBE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty());

        let api_url = args
            .api_url
            .or_else(|| env::var("YOUTUBE_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_url(&api_url, "YOUTUBE_API_URL")?;

        let db_path = args
            .db_path
            .or_else(|| env::var("VIDSEARCH_DB_PATH").ok())
            .unwrap_or_else(|| "./vidsearch.db".to_string());

        let request_timeout_ms = args
            .request_timeout_ms
            .or_else(|| {
                env::var("REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(8000);
        let request_timeout_ms =
            validate_in_range(request_timeout_ms, 1000, 60000, "REQUEST_TIMEOUT_MS")?;

        let render_fps = args
            .render_fps
            .or_else(|| env::var("RENDER_FPS").ok().and_then(|s| s.parse().ok()))
            .unwrap_or(30);
        let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

        let theme = match args.theme.or_else(|| env::var("VIDSEARCH_THEME").ok()) {
            Some(name) => Theme::from_str(&name).map_err(|e| anyhow!(e))?,
            None => Theme::default(),
        };

        let log_file = args
            .log_file
            .or_else(|| env::var("VIDSEARCH_LOG_FILE").ok())
            .unwrap_or_else(|| "./vidsearch.log".to_string());

        Ok(Config {
            api_key,
            api_url,
            db_path,
            request_timeout_ms,
            render_fps,
            theme,
            log_file,
        })
    }

    /// The API key, or an error naming how to provide it
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!("YOUTUBE_API_KEY is not set (use --api-key, the environment, or a .env file)")
        })
    }

    /// One-line description of the effective configuration. The API key
    /// itself is never included.
    pub fn summary(&self) -> String {
        format!(
            "api_url={} api_key={} store={} timeout={}ms fps={} theme={}",
            self.api_url,
            if self.api_key.is_some() { "configured" } else { "missing" },
            self.db_path,
            self.request_timeout_ms,
            self.render_fps,
            self.theme,
        )
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("vidsearch").chain(argv.iter().copied()))
            .expect("valid args")
    }

    #[test]
    fn summary_never_contains_the_key() {
        let cfg = Config::from_args(parse(&["--api-key", "s3cr3t-key"])).unwrap();
        let summary = cfg.summary();
        assert!(summary.contains("api_key=configured"));
        assert!(!summary.contains("s3cr3t-key"));
    }

    #[test]
    fn explicit_args_are_used() {
        let cfg = Config::from_args(parse(&[
            "--api-key", "k",
            "--api-url", "http://localhost:9000/v3",
            "--db-path", "/tmp/x.db",
            "--request-timeout-ms", "2000",
            "--render-fps", "60",
            "--theme", "amber",
        ]))
        .unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.api_url, "http://localhost:9000/v3");
        assert_eq!(cfg.db_path, "/tmp/x.db");
        assert_eq!(cfg.request_timeout_ms, 2000);
        assert_eq!(cfg.render_fps, 60);
        assert_eq!(cfg.theme, Theme::AmberCrt);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(Config::from_args(parse(&["--request-timeout-ms", "10"])).is_err());
        assert!(Config::from_args(parse(&["--render-fps", "500"])).is_err());
    }

    #[test]
    fn bad_url_and_theme_are_rejected() {
        assert!(Config::from_args(parse(&["--api-url", "ftp://nope"])).is_err());
        assert!(Config::from_args(parse(&["--theme", "neon"])).is_err());
    }

    #[test]
    fn subcommands_parse() {
        let args = parse(&["search", "cute", "cats"]);
        assert_eq!(
            args.command,
            Some(Command::Search { query: vec!["cute".into(), "cats".into()] })
        );

        let args = parse(&["block", "add", "dogs"]);
        assert_eq!(
            args.command,
            Some(Command::Block { action: BlockAction::Add { term: "dogs".into() } })
        );

        let args = parse(&["history", "clear"]);
        assert_eq!(
            args.command,
            Some(Command::History { action: HistoryAction::Clear })
        );
    }
}
