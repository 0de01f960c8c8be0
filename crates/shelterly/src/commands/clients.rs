//! Client command handlers.

use tabled::Tabled;

use shelterly_core::{Client, Console, RecordId};

use crate::cli::{ClientsArgs, ClientsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Shelter")]
    shelter: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.display_name(),
            status: c.status.label().into(),
            shelter: c
                .current_shelter_name
                .clone()
                .or_else(|| c.current_shelter_id.as_ref().map(|id| format!("#{id}")))
                .unwrap_or_else(|| "-".into()),
            registered: c
                .registration_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Client) -> String {
    let fmt_date = |d: Option<chrono::NaiveDateTime>| {
        d.map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d %H:%M").to_string())
    };
    let mut lines = vec![
        format!("ID:          {}", c.id),
        format!("Name:        {}", c.display_name()),
        format!("Status:      {}", c.status.label()),
        format!(
            "Shelter:     {}",
            util::or_dash(c.current_shelter_name.as_deref())
        ),
        format!("Registered:  {}", fmt_date(c.registration_date)),
        format!("Last active: {}", fmt_date(c.last_activity_date)),
    ];
    if let Some(ref notes) = c.caseworker_notes {
        if !notes.is_empty() {
            lines.push(format!("Notes:       {notes}"));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ClientsCommand::List => {
            let clients = console.list_clients().await?;
            let out = output::render_list(
                &global.output,
                &clients,
                |c| ClientRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Get { client } => {
            let id = RecordId::from(client.as_str());
            let found = console
                .get_client(&id)
                .await
                .map_err(|e| util::or_not_found(e, "client", &id))?;
            let out = output::render_single(&global.output, &found, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ClientsCommand::Register { name, notes } => {
            let created = console.register_client(&name, &notes).await?;
            let out =
                output::render_single(&global.output, &created, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            if !global.quiet {
                eprintln!("Client registered");
            }
            Ok(())
        }
    }
}
