//! dbdump CLI - dump the table, column and constraint definitions of a
//! MySQL or PostgreSQL database.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser};
use dbdump::drivers::SslMode;
use dbdump::{Config, DumpError, Dumper, FormatterRegistry};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "dbdump")]
#[command(about = "Dump table, column and constraint definitions of a MySQL or PostgreSQL database")]
#[command(version)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Path to YAML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database type: mysql, mariadb, pgsql, postgres
    #[arg(long, alias = "dbType")]
    db_type: Option<String>,

    /// Connect to host
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// Port number to use for connection
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// User for login
    #[arg(short, long)]
    user: Option<String>,

    /// Password to use when connecting to server
    #[arg(short, long)]
    password: Option<String>,

    /// Database to dump
    #[arg(short = 'D', long)]
    database: Option<String>,

    /// Schema to dump
    #[arg(long)]
    schema: Option<String>,

    /// Tables to dump (repeatable, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    tables: Vec<String>,

    /// Write to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, alias = "format_type")]
    format_type: Option<String>,

    /// Formatter configuration; prefix with @ to read it from a file
    #[arg(long, alias = "format_config")]
    format_config: Option<String>,

    /// PostgreSQL TLS mode: disable, require, verify-ca, verify-full
    #[arg(long, value_parser = parse_ssl_mode)]
    ssl_mode: Option<SslMode>,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let registry = FormatterRegistry::with_builtins();
    let cli = parse_cli(&registry);

    match run(cli, &registry).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

/// Parse arguments, listing the registered formatters in the help text.
fn parse_cli(registry: &FormatterRegistry) -> Cli {
    let names = registry
        .list_names()
        .into_iter()
        .collect::<Vec<_>>()
        .join("|");
    let matches = Cli::command()
        .mut_arg("format_type", |arg| {
            arg.help(format!("Output format ({}) [default: json]", names))
        })
        .get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

async fn run(cli: Cli, registry: &FormatterRegistry) -> Result<(), DumpError> {
    setup_logging(&cli.verbosity, &cli.log_format).map_err(DumpError::Config)?;

    let config = build_config(cli)?;
    info!(
        "Dumping {} catalog from {}:{}",
        config.source.r#type,
        config.source.host,
        config.source.resolved_port()
    );

    let payload = Dumper::new(&config, registry).run().await?;

    match &config.dump.output {
        Some(path) => {
            std::fs::write(path, &payload)?;
            info!("Wrote {} bytes to {}", payload.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&payload)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Load the configuration file (if any) and apply flag overrides.
fn build_config(cli: Cli) -> Result<Config, DumpError> {
    let mut config = match &cli.config {
        Some(path) => Config::read(path)?,
        None => Config::default(),
    };

    let source = &mut config.source;
    if let Some(db_type) = cli.db_type {
        source.r#type = db_type;
    }
    if let Some(host) = cli.host {
        source.host = host;
    }
    if let Some(port) = cli.port {
        source.port = Some(port);
    }
    if let Some(user) = cli.user {
        source.user = user;
    }
    if let Some(password) = cli.password {
        source.password = password;
    }
    if let Some(database) = cli.database {
        source.database = Some(database);
    }
    if let Some(ssl_mode) = cli.ssl_mode {
        source.ssl_mode = ssl_mode;
    }

    let dump = &mut config.dump;
    if let Some(schema) = cli.schema {
        dump.schema = Some(schema);
    }
    if !cli.tables.is_empty() {
        dump.tables = cli.tables;
    }
    if let Some(output) = cli.output {
        dump.output = Some(output);
    }
    if let Some(format) = cli.format_type {
        dump.format = format;
    }
    if let Some(format_config) = cli.format_config {
        dump.format_config = Some(format_config);
    }

    config.validate()?;
    Ok(config)
}

fn parse_ssl_mode(s: &str) -> Result<SslMode, String> {
    SslMode::parse(s).map_err(|e| e.to_string())
}

/// Logs go to stderr so stdout carries only the payload.
fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => return Err(format!("unknown verbosity '{}'", other)),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        "json" => subscriber.json().try_init(),
        "text" => subscriber.try_init(),
        other => return Err(format!("unknown log format '{}'", other)),
    };
    installed.map_err(|e| e.to_string())
}
