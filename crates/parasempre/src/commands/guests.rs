//! Guest command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use parasempre_core::{
    DirectoryFilter, DirectoryStats, DirectoryView, Guest, GuestDirectory, GuestId, GuestPatch,
    ImportReport, ImportSession, NewGuest, Phone, Side, view,
};

use crate::cli::{GlobalOpts, GuestsArgs, GuestsCommand, OutputFormat, SideArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Argument conversions ────────────────────────────────────────────

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Noivo => Self::Groom,
            SideArg::Noiva => Self::Bride,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GuestRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Nome")]
    name: String,
    #[tabled(rename = "Telefone")]
    phone: String,
    #[tabled(rename = "Lado")]
    side: &'static str,
    #[tabled(rename = "Grupo")]
    family_group: i64,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&Guest> for GuestRow {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id.value(),
            name: guest.full_name(),
            phone: guest.phone.as_ref().map_or_else(String::new, Phone::formatted),
            side: guest.side.label(),
            family_group: guest.family_group,
            status: if guest.confirmed { "Confirmado" } else { "Pendente" },
        }
    }
}

fn detail(guest: &Guest) -> String {
    output::detail_block(&[
        ("ID", guest.id.to_string()),
        ("Nome", guest.full_name()),
        ("Telefone", guest.phone.as_ref().map_or_else(|| "-".into(), Phone::formatted)),
        ("Lado", guest.side.label().to_owned()),
        ("Grupo familiar", guest.family_group.to_string()),
        ("Status", if guest.confirmed { "Confirmado" } else { "Pendente" }.to_owned()),
        ("Cadastrado por", guest.created_by.clone()),
        ("Atualizado por", guest.updated_by.clone()),
        ("Cadastrado em", guest.created_at.format("%d/%m/%Y %H:%M").to_string()),
        ("Atualizado em", guest.updated_at.format("%d/%m/%Y %H:%M").to_string()),
    ])
}

fn import_summary(report: &ImportReport) -> String {
    let mut lines = vec![format!(
        "{} importados, {} no arquivo, {} erros",
        report.imported,
        report.total,
        report.errors.len()
    )];
    for error in &report.errors {
        lines.push(format!("  - {error}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &GuestDirectory,
    args: GuestsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GuestsCommand::List { search, side, confirmed, pending } => {
            let filter = DirectoryFilter {
                search: search.unwrap_or_default(),
                side: side.map(Side::from),
                confirmed: match (confirmed, pending) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };
            list(directory, &filter, global).await
        }

        GuestsCommand::Get { id } => {
            let guest = directory.guest(GuestId::from(id)).await?;
            let out = output::render_single(&global.output, guest.as_ref(), detail, |g| {
                g.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Create { first_name, last_name, phone, side, family_group } => {
            let phone = match phone {
                Some(raw) => Phone::parse(&raw)?,
                None => None,
            };
            let input = NewGuest {
                first_name,
                last_name,
                phone,
                side: side.into(),
                family_group,
            };
            let guest = directory.create(&input).await?;
            if !global.quiet {
                eprintln!("Convidado criado: {} (id {})", guest.full_name(), guest.id);
            }
            Ok(())
        }

        GuestsCommand::Update {
            id,
            first_name,
            last_name,
            phone,
            clear_phone,
            side,
            family_group,
            confirmed,
        } => {
            let phone = if clear_phone {
                Some(None)
            } else {
                match phone {
                    Some(raw) => Some(Phone::parse(&raw)?),
                    None => None,
                }
            };
            let patch = GuestPatch {
                first_name,
                last_name,
                phone,
                side: side.map(Side::from),
                confirmed,
                family_group,
            };
            let guest = directory.update(GuestId::from(id), &patch).await?;
            if !global.quiet {
                eprintln!("Convidado atualizado: {}", guest.full_name());
            }
            Ok(())
        }

        GuestsCommand::Confirm { id } => {
            let guest = directory
                .update(GuestId::from(id), &GuestPatch::confirmation(true))
                .await?;
            if !global.quiet {
                eprintln!("Presença confirmada: {}", guest.full_name());
            }
            Ok(())
        }

        GuestsCommand::Unconfirm { id } => {
            let guest = directory
                .update(GuestId::from(id), &GuestPatch::confirmation(false))
                .await?;
            if !global.quiet {
                eprintln!("Confirmação desfeita: {}", guest.full_name());
            }
            Ok(())
        }

        GuestsCommand::Delete { ids } => {
            let count = ids.len();
            let prompt = if count == 1 {
                "Tem certeza que deseja excluir 1 convidado? Esta ação não pode ser desfeita."
                    .to_owned()
            } else {
                format!(
                    "Tem certeza que deseja excluir {count} convidados? Esta ação não pode ser desfeita."
                )
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let ids: Vec<GuestId> = ids.into_iter().map(GuestId::from).collect();
            if let [id] = ids.as_slice() {
                directory.delete(*id).await?;
            } else {
                directory.delete_many(&ids).await?;
            }

            if !global.quiet {
                if count == 1 {
                    eprintln!("Convidado excluído.");
                } else {
                    eprintln!("{count} convidados excluídos.");
                }
            }
            Ok(())
        }

        GuestsCommand::Family { group, exclude } => {
            let guests = directory.guests().await?;
            let members = view::family_members(&guests, group, exclude.map(GuestId::from));
            if members.is_empty() && matches!(global.output, OutputFormat::Table) {
                if !global.quiet {
                    eprintln!("Nenhum convidado no grupo familiar {group}.");
                }
                return Ok(());
            }
            let out = output::render_list(&global.output, &members, |g| GuestRow::from(g), |g| {
                g.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GuestsCommand::Import { file } => {
            let mut session = ImportSession::new();
            session.select_file(file)?;
            let report = session.upload(directory).await?;

            // A report with no parsed rows and an error means the upload
            // itself failed; surface it as an error exit. Row-level
            // rejections still render as a summary.
            if report.total == 0 && !report.errors.is_empty() {
                return Err(CliError::Transport {
                    message: report.errors.join("; "),
                    status: None,
                });
            }

            let out = output::render_single(&global.output, &report, import_summary, |r| {
                format!("{} {}", r.imported, r.total)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

// ── List rendering ───────────────────────────────────────────────────

async fn list(
    directory: &GuestDirectory,
    filter: &DirectoryFilter,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let guests = directory.guests().await?;
    let view = DirectoryView::build(&guests, filter);

    if matches!(global.output, OutputFormat::Table) {
        match view {
            DirectoryView::Empty => {
                if !global.quiet {
                    eprintln!("Nenhum convidado cadastrado.");
                }
            }
            DirectoryView::NoMatches => {
                if !global.quiet {
                    eprintln!("Nenhum convidado encontrado com os filtros aplicados.");
                }
            }
            DirectoryView::Rows(rows) => {
                let out = output::render_list(&global.output, &rows, |g| GuestRow::from(g), |g| {
                    g.id.to_string()
                });
                output::print_output(&out, global.quiet);
                if !global.quiet {
                    eprintln!("{}", stats_line(DirectoryStats::tally(&guests), global));
                }
            }
        }
        return Ok(());
    }

    // Structured formats always emit the (possibly empty) filtered rows.
    let rows = match view {
        DirectoryView::Rows(rows) => rows,
        DirectoryView::Empty | DirectoryView::NoMatches => Vec::new(),
    };
    let out =
        output::render_list(&global.output, &rows, |g| GuestRow::from(g), |g| g.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

fn stats_line(stats: DirectoryStats, global: &GlobalOpts) -> String {
    if output::should_color(&global.color) {
        format!(
            "{} convidados, {} confirmados, {} pendentes",
            stats.total.bold(),
            stats.confirmed.green(),
            stats.pending.yellow(),
        )
    } else {
        format!(
            "{} convidados, {} confirmados, {} pendentes",
            stats.total, stats.confirmed, stats.pending,
        )
    }
}
