use clap::Parser;
use thevault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout stays clean for completions.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("THEVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::AddFile {
            ref path,
            ref output_dir,
            ref name,
        } => thevault::cli::commands::add_file::execute(
            &cli,
            path,
            output_dir.as_deref(),
            name.as_deref(),
        ),
        Commands::Decrypt {
            ref path,
            ref output_dir,
            ref name,
        } => thevault::cli::commands::decrypt::execute(
            &cli,
            path,
            output_dir.as_deref(),
            name.as_deref(),
        ),
        Commands::List => thevault::cli::commands::list::execute(&cli),
        Commands::AddNote {
            ref text,
            ref output_dir,
            ref name,
        } => thevault::cli::commands::add_note::execute(
            &cli,
            text.as_deref(),
            output_dir.as_deref(),
            name.as_deref(),
        ),
        Commands::Notes => thevault::cli::commands::notes::execute(&cli),
        Commands::Stats => thevault::cli::commands::stats::execute(&cli),
        Commands::ChangePassword => thevault::cli::commands::change_password::execute(&cli),
        Commands::Completions { shell } => thevault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        thevault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
