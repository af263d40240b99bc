use anyhow::Result;
use clap::{Parser, Subcommand};
use mailgen::config::Config;
use mailgen::ports::OutputKind;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "mailgen")]
#[command(about = "mailgen - Canned support emails from templates, with live field substitution")]
#[command(version)]
struct Cli {
    /// Path to the mailgen directory (default: .mailgen in current dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Directory holding the agent profile (default: ~/.config/mailgen)
    #[arg(long, global = true)]
    profile_dir: Option<PathBuf>,

    /// Output as JSON for machine consumption
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize mailgen in the current directory with a starter library
    Init,

    /// List the templates in the library, grouped by category
    Templates,

    /// Select a template (assembles fresh wording, keeps pinned fields)
    Select {
        /// Template ID
        id: String,
    },

    /// Set a field value on the selected template
    Set {
        /// Field key
        key: String,

        /// Value (empty string clears the field)
        value: String,
    },

    /// Pick new wording for the selected template
    Shuffle,

    /// Show the current subject, body and case comment
    Show {
        /// Only print one output
        #[arg(long, value_enum)]
        output: Option<OutputKind>,

        /// Print the body as plain text instead of HTML
        #[arg(long)]
        text: bool,
    },

    /// Copy an output to stdout (body as HTML unless --plain)
    Copy {
        /// Which output to copy
        #[arg(value_enum)]
        output: OutputKind,

        /// Copy plain text even for the body
        #[arg(long)]
        plain: bool,
    },

    /// Show or set the agent display name
    Agent {
        /// New display name
        name: Option<String>,
    },

    /// Show, set or toggle the theme
    Theme {
        /// Theme to use (light, dark)
        name: Option<String>,

        /// Switch between light and dark
        #[arg(long)]
        toggle: bool,
    },

    /// Export the field values as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the field values from an exported JSON file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Forget the selected template and all field values
    Clear,

    /// Check the template library for problems
    Check,

    /// View or modify configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default config file
        #[arg(long)]
        init: bool,

        /// Set the template library directory
        #[arg(long)]
        library: Option<String>,

        /// Carry a field over when switching templates (repeatable)
        #[arg(long)]
        pin: Vec<String>,

        /// Stop carrying a field over (repeatable)
        #[arg(long)]
        unpin: Vec<String>,

        /// Copy the body as HTML when possible
        #[arg(long)]
        rich_copy: Option<bool>,
    },

    /// Compose an email interactively
    Compose,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("MAILGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mailgen_dir = cli.dir.unwrap_or_else(|| PathBuf::from(".mailgen"));
    // Only commands that open a session need the profile directory
    let explicit_profile = cli.profile_dir;
    let profile = || -> Result<PathBuf> {
        match &explicit_profile {
            Some(dir) => Ok(dir.clone()),
            None => Config::default_profile_dir(),
        }
    };

    match cli.command {
        Commands::Init => commands::init::run(&mailgen_dir),
        Commands::Templates => commands::templates::run(&mailgen_dir, &profile()?, cli.json),
        Commands::Select { id } => commands::select::run(&mailgen_dir, &profile()?, &id),
        Commands::Set { key, value } => {
            commands::set::run(&mailgen_dir, &profile()?, &key, &value)
        }
        Commands::Shuffle => commands::shuffle::run(&mailgen_dir, &profile()?),
        Commands::Show { output, text } => {
            commands::show::run(&mailgen_dir, &profile()?, output, text, cli.json)
        }
        Commands::Copy { output, plain } => {
            commands::copy::run(&mailgen_dir, &profile()?, output, plain)
        }
        Commands::Agent { name } => {
            commands::agent::run(&mailgen_dir, &profile()?, name.as_deref(), cli.json)
        }
        Commands::Theme { name, toggle } => {
            commands::theme::run(&mailgen_dir, &profile()?, name.as_deref(), toggle, cli.json)
        }
        Commands::Export { output } => {
            commands::exchange::export(&mailgen_dir, &profile()?, output.as_deref())
        }
        Commands::Import { file } => commands::exchange::import(&mailgen_dir, &profile()?, &file),
        Commands::Clear => commands::clear::run(&mailgen_dir, &profile()?),
        Commands::Check => commands::check::run(&mailgen_dir, cli.json),
        Commands::Config {
            show,
            init,
            library,
            pin,
            unpin,
            rich_copy,
        } => {
            if init {
                commands::config_cmd::init(&mailgen_dir)
            } else if show
                || (library.is_none() && pin.is_empty() && unpin.is_empty() && rich_copy.is_none())
            {
                commands::config_cmd::show(&mailgen_dir, cli.json)
            } else {
                commands::config_cmd::update(
                    &mailgen_dir,
                    library.as_deref(),
                    &pin,
                    &unpin,
                    rich_copy,
                )
            }
        }
        Commands::Compose => commands::compose::run(&mailgen_dir, &profile()?),
    }
}
