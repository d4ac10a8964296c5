use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use log::debug;

use dictool::{
    config::{DictConfig, OutputFormat},
    ctx::AppContext,
};

/// Generate data dictionaries from JSON Schema documents.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file. Defaults to `.dictool.toml` when present.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and render the data dictionary.
    Table(TableArgs),
    /// Print how often each schema keyword is used.
    Stats {
        /// Schema files or URLs.
        #[arg(required = true)]
        sources: Vec<String>,
    },
    /// Print the JSON Schema of the configuration file.
    ConfigSchema,
}

#[derive(Args)]
struct TableArgs {
    /// Schema files or URLs, in section order.
    #[arg(required = true)]
    sources: Vec<String>,

    /// Output format.
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Comma separated column ids, e.g. `name,type,format`.
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Append the N most used schema keywords as columns.
    #[arg(long, value_name = "N")]
    suggest: Option<usize>,

    /// Per-URL fetch timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl TableArgs {
    fn apply(&self, config: &mut DictConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(columns) = &self.columns {
            config.columns = columns.clone();
        }
        if let Some(n) = self.suggest {
            config.suggested_columns = n;
        }
        if let Some(secs) = self.timeout {
            config.fetch_timeout_secs = secs;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = DictConfig::load(cli.config.as_deref()).await?;
    debug!("config: {config:?}");

    match cli.command {
        Commands::Table(args) => {
            args.apply(&mut config);
            let mut ctx = AppContext::new(config);
            ctx.load(&args.sources).await?;
            let rendered = ctx.render()?;
            ctx.emit(&rendered).await?;
        }
        Commands::Stats { sources } => {
            let mut ctx = AppContext::new(config);
            ctx.load(&sources).await?;
            print!("{}", ctx.render_stats());
        }
        Commands::ConfigSchema => {
            println!("{}", DictConfig::json_schema()?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_args(args: &[&str]) -> TableArgs {
        let argv = ["dictool", "table"].into_iter().chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Table(args) => args,
            _ => panic!("expected the table command"),
        }
    }

    #[tokio::test]
    async fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictool.toml");
        std::fs::write(
            &path,
            "format = \"csv\"\ncolumns = [\"name\"]\nsuggested_columns = 1\n",
        )
        .unwrap();
        let mut config = DictConfig::load(Some(path.as_path())).await.unwrap();

        table_args(&["a.json", "--format", "markdown", "--suggest", "3"]).apply(&mut config);
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.suggested_columns, 3);
        assert_eq!(config.columns, vec!["name".to_string()]);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_column_flag_replaces_config_columns() {
        let mut config = DictConfig {
            columns: vec!["name".to_string(), "format".to_string()],
            ..Default::default()
        };
        table_args(&["a.json", "--columns", "type,default", "--timeout", "5"]).apply(&mut config);
        assert_eq!(config.columns, vec!["type".to_string(), "default".to_string()]);
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.format, OutputFormat::Table);
    }
}
