use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "shroud", version, about = "Shroud data product masking provisioner")]
struct Cli {
    /// Configuration file. Defaults to ./shroud.yaml when present.
    #[arg(long, short = 'c', global = true, env = "SHROUD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a descriptor into masking plans and submit them.
    Provision {
        /// Path to the descriptor (YAML or JSON).
        file: PathBuf,

        /// The file is a provisioning request envelope with an embedded descriptor.
        #[arg(long, default_value_t = false)]
        request: bool,

        /// Compile only; print the plans without calling the platform.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Inspect the workspace catalog.
    Catalog {
        #[command(subcommand)]
        cmd: CatalogCommand,
    },

    /// Print the replacements currently configured for a table.
    Replacements { schema: String, table: String },

    /// Print the workspace privacy analysis. With --schema and --table, print
    /// only the columns the workspace flags as sensitive for that table.
    Privacy {
        #[arg(long, requires = "table")]
        schema: Option<String>,

        #[arg(long, requires = "schema")]
        table: Option<String>,
    },

    /// Configuration management.
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List workspace tables and their columns.
    Tables,

    /// List available generators.
    Generators,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load the configuration and resolve credentials.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Provision {
            file,
            request,
            dry_run,
        } => commands::provision::run(&config, &file, request, dry_run).await,

        Command::Catalog { cmd } => {
            match cmd {
                CatalogCommand::Tables => commands::catalog::tables(&config).await?,
                CatalogCommand::Generators => commands::catalog::generators(&config).await?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Replacements { schema, table } => {
            commands::catalog::replacements(&config, &schema, &table).await?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Privacy { schema, table } => {
            let target = schema.as_deref().zip(table.as_deref());
            commands::catalog::privacy(&config, target).await?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Config {
            cmd: ConfigCommand::Check,
        } => commands::config::check(&config),
    }
}
