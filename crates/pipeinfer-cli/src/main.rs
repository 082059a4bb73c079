//! CLI entry point - the composition root.
//!
//! Settings are resolved and the session is built via bootstrap; command
//! dispatch routes to handlers.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pipeinfer_cli::{Cli, CliError, Commands, bootstrap, handlers, resolve_settings};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help().map_err(CliError::from)?;
        return Ok(());
    };

    let settings = resolve_settings(&cli.settings)?;
    let ctx = bootstrap(settings);

    match command {
        Commands::Infer { files, json } => handlers::infer::execute(&ctx, &files, json).await,
        Commands::Check => handlers::check::execute(&ctx).await,
        Commands::Settings => handlers::settings::execute(&ctx),
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
