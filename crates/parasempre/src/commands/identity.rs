//! Identity command handlers.

use parasempre_core::IdentityContext;

use crate::cli::{GlobalOpts, IdentityArgs, IdentityCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(
    identity: &IdentityContext,
    args: IdentityArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        IdentityCommand::Set { racf } => {
            let racf = identity.set(&racf)?;
            if !global.quiet {
                eprintln!("Identificação registrada: {racf}");
            }
            Ok(())
        }

        IdentityCommand::Show => {
            let Some(racf) = identity.current() else {
                return Err(CliError::IdentityRequired);
            };
            output::print_output(racf.as_str(), global.quiet);
            Ok(())
        }

        IdentityCommand::Clear => {
            identity.clear()?;
            if !global.quiet {
                eprintln!("Identificação removida.");
            }
            Ok(())
        }
    }
}
