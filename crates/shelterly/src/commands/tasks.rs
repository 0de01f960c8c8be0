//! Task command handlers.

use tabled::Tabled;

use shelterly_core::{Console, RecordId, Task};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
    #[tabled(rename = "Client")]
    client: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.to_string(),
            title: t.title.clone(),
            status: t.status.to_string(),
            location: t.location.clone().unwrap_or_default(),
            scheduled: t
                .scheduled_at
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            client: t.client_id.clone().unwrap_or_default(),
        }
    }
}

pub(super) fn detail(t: &Task) -> String {
    let mut lines = vec![
        format!("ID:           {}", t.id),
        format!("Title:        {}", t.title),
        format!("Status:       {}", t.status),
        format!("Location:     {}", util::or_dash(t.location.as_deref())),
        format!(
            "Scheduled:    {}",
            t.scheduled_at
                .map_or_else(|| "-".into(), |d| d.format("%Y-%m-%d %H:%M").to_string())
        ),
        format!(
            "Duration:     {}",
            util::or_dash(t.estimated_duration.as_deref())
        ),
        format!(
            "Compensation: {}",
            util::or_dash(t.compensation_details.as_deref())
        ),
        format!("Contact:      {}", util::or_dash(t.contact_name.as_deref())),
        format!("Phone:        {}", util::or_dash(t.contact_phone.as_deref())),
        format!("Client:       {}", util::or_dash(t.client_id.as_deref())),
    ];
    if let Some(ref description) = t.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.join("\n")
}

/// Re-read a task after a mutation and print it.
pub(super) async fn show_task(
    console: &Console,
    id: &RecordId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let task = console
        .get_task(id)
        .await
        .map_err(|e| util::or_not_found(e, "task", id))?;
    let out = output::render_single(&global.output, &task, detail, |t| t.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List => {
            let tasks = console.list_tasks().await?;
            let out = output::render_list(
                &global.output,
                &tasks,
                |t| TaskRow::from(t),
                |t| t.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Get { task } => show_task(console, &RecordId::from(task.as_str()), global).await,

        TasksCommand::Assign { task, client } => {
            let id = RecordId::from(task.as_str());
            console
                .assign_task(&id, &client)
                .await
                .map_err(|e| util::or_not_found(e, "task", &id))?;
            if !global.quiet {
                eprintln!("Task assigned to client {}", client.trim());
            }
            show_task(console, &id, global).await
        }

        TasksCommand::Complete { task } => {
            let id = RecordId::from(task.as_str());
            console
                .complete_task(&id)
                .await
                .map_err(|e| util::or_not_found(e, "task", &id))?;
            if !global.quiet {
                eprintln!("Task completed");
            }
            show_task(console, &id, global).await
        }
    }
}
