use std::process::ExitCode;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use hotbuild_cli::{commands, OutputFormat};
use hotbuild_core::BuildCommand;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    #[arg(
        short,
        long,
        global = true,
        env = "HOTBUILD_PROJECT",
        default_value = ".",
        help = "Project root directory"
    )]
    project: Utf8PathBuf,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the solution and hot-reload the result
    Build,
    /// Rebuild the solution from scratch and hot-reload the result
    Rebuild,
    /// Clean the solution's build outputs
    Clean,
    /// List build menu entries
    Menu,
    /// Run the build menu entry with the given id
    Select {
        #[arg(allow_negative_numbers = true)]
        id: i32,
    },
    /// Inspect or create project settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    Show,
    Init {
        #[arg(long)]
        force: bool,
    },
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn project_root(path: Utf8PathBuf) -> anyhow::Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let cwd = Utf8PathBuf::from_path_buf(cwd)
        .map_err(|p| anyhow::anyhow!("Current directory {} is not valid UTF-8", p.display()))?;
    let joined = cwd.join(&path);
    // `.` would otherwise leave the root without a file name to derive the solution from.
    Ok(joined.canonicalize_utf8().unwrap_or(joined))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let root = project_root(cli.project)?;
    let format = cli.format;

    let report = match cli.command {
        Commands::Build => commands::cmd_run(root, BuildCommand::Build, format).await?,
        Commands::Rebuild => commands::cmd_run(root, BuildCommand::Rebuild, format).await?,
        Commands::Clean => commands::cmd_run(root, BuildCommand::Clean, format).await?,
        Commands::Select { id } => commands::cmd_select(root, id, format).await?,
        Commands::Menu => {
            commands::cmd_menu();
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Settings { command } => {
            match command {
                SettingsCommands::Show => commands::cmd_settings_show(root)?,
                SettingsCommands::Init { force } => commands::cmd_settings_init(root, force)?,
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
