//! Command dispatch: bridges CLI args -> directory calls -> output formatting.

pub mod guests;
pub mod identity;
pub mod users;
pub mod util;

use parasempre_core::GuestDirectory;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a directory-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    directory: &GuestDirectory,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Guests(args) => guests::handle(directory, args, global).await,
        Command::Users(args) => users::handle(directory, args, global).await,
        Command::Whoami => users::whoami(directory, global).await,
        // Identity and Completions are handled before dispatch
        Command::Identity(_) | Command::Completions(_) => unreachable!(),
    }
}
