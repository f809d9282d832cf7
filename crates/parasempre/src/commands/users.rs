//! User listing and whoami handlers.

use tabled::Tabled;

use parasempre_core::{GuestDirectory, UserSummary};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "RACF")]
    racf: String,
    #[tabled(rename = "Nome")]
    name: String,
    #[tabled(rename = "Papel")]
    role: &'static str,
}

impl From<&UserSummary> for UserRow {
    fn from(user: &UserSummary) -> Self {
        Self {
            racf: user.racf.to_string(),
            name: user.full_name(),
            role: user.role.label(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(
    directory: &GuestDirectory,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let users = directory.users().await?;
            let out = output::render_list(&global.output, &users, |u| UserRow::from(u), |u| {
                u.racf.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

/// Resolve and print the configured identity with its role.
pub async fn whoami(directory: &GuestDirectory, global: &GlobalOpts) -> Result<(), CliError> {
    let role = directory.role().await?;
    let Some(racf) = directory.identity().current() else {
        return Err(CliError::IdentityRequired);
    };

    let resolved = serde_json::json!({
        "racf": racf.as_str(),
        "role": role,
    });
    let out = output::render_single(
        &global.output,
        &resolved,
        |_| output::detail_block(&[("RACF", racf.to_string()), ("Papel", role.label().to_owned())]),
        |_| format!("{racf} {role}"),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
