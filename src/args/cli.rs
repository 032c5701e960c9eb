use clap::{Args, Parser, Subcommand};

use super::parsers::parse_bool_env;

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Answer JSON commands on stdin/stdout against a page fixture
    Serve(ServeArgs),
    /// Parse a text file and print it in the canonical copy format
    Parse(ParseArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct ServeArgs {
    /// Page fixture to run against (.toml or .json)
    #[arg(long = "page", short = 'p', env = "TIMESTAMPER_PAGE")]
    pub page: Option<String>,

    /// Path to config file (TOML or JSON). Defaults to ./timestamper.toml or ./timestamper.json
    #[arg(long = "config", short = 'c')]
    pub config: Option<String>,

    /// Comment polls before giving up (overrides [loader] max_attempts)
    #[arg(long = "max-attempts")]
    pub max_attempts: Option<u32>,

    /// Delay between comment polls in milliseconds (overrides [loader] interval_ms)
    #[arg(long = "interval-ms")]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ParseArgs {
    /// Text file holding timestamp lines or a comment body
    pub file: String,

    /// Treat the file as a comment body (several timestamps per line)
    #[arg(long = "comment")]
    pub comment: bool,

    /// Title line for the export header
    #[arg(long = "title", default_value = "Untitled")]
    pub title: String,

    /// Source URL line for the export header
    #[arg(long = "url", default_value = "")]
    pub url: String,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Timestamp engine for YouTube and Twitch videos - parses comment timestamps, keeps a per-video cache, and projects chapter markers onto the progress bar."
)]
pub struct TimestamperArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (sets log level to debug unless overridden by TIMESTAMPER_LOG/RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable color output
    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        value_parser = parse_bool_env,
        global = true
    )]
    pub no_color: bool,
}
