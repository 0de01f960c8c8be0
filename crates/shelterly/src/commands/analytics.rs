//! Analytics command handlers (admin role).

use tabled::Tabled;

use shelterly_core::{Console, ShelterSummary, ShelterTypeSummary, TaskSummary};

use crate::cli::{AnalyticsArgs, AnalyticsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    stype: String,
    #[tabled(rename = "Shelters")]
    shelters: i64,
    #[tabled(rename = "Capacity")]
    capacity: i64,
    #[tabled(rename = "Available")]
    available: i64,
    #[tabled(rename = "Occupancy")]
    occupancy: String,
}

impl From<&ShelterTypeSummary> for TypeRow {
    fn from(s: &ShelterTypeSummary) -> Self {
        Self {
            stype: s.shelter_type.map_or("Unspecified", |t| t.label()).into(),
            shelters: s.shelter_count,
            capacity: s.total_capacity,
            available: s.current_availability,
            occupancy: format!("{:.1}%", s.occupancy_rate),
        }
    }
}

fn shelter_detail(s: &ShelterSummary) -> String {
    [
        format!(
            "Shelters:        {} ({} active, {} inactive)",
            s.total_shelters, s.active_shelters, s.inactive_shelters
        ),
        format!("Capacity:        {}", s.total_capacity),
        format!("Available beds:  {}", s.current_availability),
        format!("Occupancy:       {:.1}%", s.overall_occupancy_rate),
        format!("Allow pets:      {}", s.shelters_allowing_pets),
        format!("Allow partners:  {}", s.shelters_allowing_partners),
    ]
    .join("\n")
}

fn task_detail(t: &TaskSummary) -> String {
    let mut lines = vec![
        format!("Tasks:      {}", t.total_tasks),
        format!("Open:       {}", t.open_tasks),
        format!("Assigned:   {}", t.assigned_tasks),
        format!("Completed:  {}", t.completed_tasks),
    ];
    if let Some(hours) = t.average_completion_time {
        lines.push(format!("Avg. time:  {hours:.1}h"));
    }
    lines.join("\n")
}

pub async fn handle(
    console: &Console,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        AnalyticsCommand::Shelters => {
            let summary = console.shelter_summary().await?;
            output::render_single(&global.output, &summary, shelter_detail, |s| {
                s.total_shelters.to_string()
            })
        }
        AnalyticsCommand::Types => {
            let rows = console.shelter_type_summary().await?;
            output::render_list(
                &global.output,
                &rows,
                |r| TypeRow::from(r),
                |r| r.shelter_type.map_or("UNSPECIFIED", |t| t.as_wire()).to_owned(),
            )
        }
        AnalyticsCommand::Tasks => {
            let summary = console.task_summary().await?;
            output::render_single(&global.output, &summary, task_detail, |t| {
                t.total_tasks.to_string()
            })
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
