use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "daogen")]
#[command(about = "Generate layered data-access modules from live MySQL tables")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Generator configuration file
    #[arg(short, long, global = true, default_value = "daogen.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Introspect the configured tables and write their layer files
    Generate {
        /// Connection string, overrides the config file and DAOGEN_DSN
        #[arg(long)]
        dsn: Option<String>,

        /// Project root name, overrides the config file and DAOGEN_PROJECT
        #[arg(long)]
        project: Option<String>,

        /// Only generate these tables (repeatable)
        #[arg(short, long = "table")]
        tables: Vec<String>,
    },

    /// Show how the columns of one table map to generated fields
    Describe {
        /// Table name
        table: String,

        /// Connection string, overrides the config file and DAOGEN_DSN
        #[arg(long)]
        dsn: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = commands::describe::OutputFormat::Table)]
        format: commands::describe::OutputFormat,
    },

    /// Report which generated files are missing, pristine or edited
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    match cli.command {
        Commands::Generate {
            dsn,
            project,
            tables,
        } => commands::generate::run(&cli.config, dsn, project, tables).await,
        Commands::Describe { table, dsn, format } => {
            commands::describe::run(&cli.config, &table, dsn, format).await
        }
        Commands::Status => commands::status::run(&cli.config).await,
    }
}
