mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parasempre_api::DirectoryClient;
use parasempre_config::FileIdentityStore;
use parasempre_core::{CoreError, GuestDirectory, IdentityContext};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    // Report failures via miette and exit with the mapped code
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Identity commands only touch the local token store
        Command::Identity(args) => {
            let identity = identity_context()?;
            commands::identity::handle(&identity, args, &cli.global)
        }

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "parasempre", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the guest service
        cmd => {
            let directory = build_directory(&cli.global)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &directory, &cli.global).await
        }
    }
}

fn identity_context() -> Result<IdentityContext, CliError> {
    Ok(IdentityContext::new(Box::new(FileIdentityStore::new()))?)
}

/// Build the `GuestDirectory` from the settings file and CLI overrides.
fn build_directory(global: &cli::GlobalOpts) -> Result<GuestDirectory, CliError> {
    let mut settings = parasempre_config::load_settings()?;
    if let Some(ref api_base) = global.api_base {
        settings.api_base = api_base.clone();
    }
    if let Some(timeout) = global.timeout {
        settings.timeout_secs = timeout;
    }
    settings.validate()?;

    let client = DirectoryClient::new(&settings.api_base, &settings.transport_config())
        .map_err(CoreError::from)?;
    let identity = identity_context()?;
    Ok(GuestDirectory::new(client, identity))
}
