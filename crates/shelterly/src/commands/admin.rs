//! Admin command handlers: shelter and task maintenance.
//!
//! Input goes through the same field validation as the console forms;
//! nothing is sent while any field is invalid.

use std::sync::Arc;

use shelterly_core::validation::{FieldErrors, ShelterForm, TaskForm};
use shelterly_core::{Command as CoreCommand, CommandResult, Console, RecordId, ShelterView};

use crate::cli::{
    AdminArgs, AdminCommand, AdminSheltersCommand, AdminTasksCommand, GlobalOpts,
    ShelterFormArgs, TaskFormArgs,
};
use crate::error::CliError;
use crate::output;

use super::{tasks, util};

// ── Form assembly ───────────────────────────────────────────────────

fn overlay(target: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Apply the given flags over `form`; omitted flags keep their value.
fn shelter_form(mut form: ShelterForm, args: ShelterFormArgs) -> ShelterForm {
    overlay(&mut form.name, args.name);
    overlay(&mut form.address_line1, args.address);
    overlay(&mut form.address_line2, args.address2);
    overlay(&mut form.city, args.city);
    overlay(&mut form.state, args.state);
    overlay(&mut form.zip, args.zip);
    overlay(&mut form.latitude, args.latitude);
    overlay(&mut form.longitude, args.longitude);
    overlay(&mut form.total_capacity, args.capacity);
    overlay(&mut form.current_availability, args.availability);
    overlay(&mut form.shelter_type, args.shelter_type);
    overlay(&mut form.phone, args.phone);
    overlay(&mut form.email, args.email);
    overlay(&mut form.operating_organization, args.organization);
    overlay(&mut form.description, args.description);
    if let Some(pets) = args.allows_pets {
        form.allows_pets = pets;
    }
    if let Some(partner) = args.allows_partner {
        form.allows_partner = partner;
    }
    if let Some(active) = args.active {
        form.is_active = active;
    }
    form
}

fn task_form(mut form: TaskForm, args: TaskFormArgs) -> TaskForm {
    overlay(&mut form.title, args.title);
    overlay(&mut form.description, args.description);
    overlay(&mut form.location, args.location);
    overlay(&mut form.scheduled_at, args.scheduled_at);
    overlay(&mut form.estimated_duration, args.duration);
    overlay(&mut form.compensation_details, args.compensation);
    overlay(&mut form.contact_name, args.contact_name);
    overlay(&mut form.contact_phone, args.contact_phone);
    form
}

fn invalid(errors: &FieldErrors) -> CliError {
    CliError::InvalidForm {
        details: errors
            .iter()
            .map(|(field, message)| format!("  {field}: {message}"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: AdminArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AdminCommand::Shelters { command } => handle_shelters(console, command, global).await,
        AdminCommand::Tasks { command } => handle_tasks(console, command, global).await,
    }
}

async fn handle_shelters(
    console: &Console,
    command: AdminSheltersCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        AdminSheltersCommand::Create(args) => {
            let blank = ShelterForm {
                is_active: true,
                ..ShelterForm::default()
            };
            let draft = shelter_form(blank, args).to_draft().map_err(|e| invalid(&e))?;
            let result = console.execute(CoreCommand::CreateShelter(draft)).await?;
            print_shelter(console, result, global);
            if !global.quiet {
                eprintln!("Shelter created");
            }
            Ok(())
        }

        AdminSheltersCommand::Update { shelter, form } => {
            let id = RecordId::from(shelter.as_str());
            let current = console
                .get_shelter(&id)
                .await
                .map_err(|e| util::or_not_found(e, "shelter", &id))?;
            let draft = shelter_form(ShelterForm::from(&current), form)
                .to_draft()
                .map_err(|e| invalid(&e))?;
            let result = console
                .execute(CoreCommand::UpdateShelter {
                    id: id.clone(),
                    draft,
                })
                .await
                .map_err(|e| util::or_not_found(e, "shelter", &id))?;
            print_shelter(console, result, global);
            if !global.quiet {
                eprintln!("Shelter updated");
            }
            Ok(())
        }

        AdminSheltersCommand::Delete { shelter } => {
            let id = RecordId::from(shelter.as_str());
            if !util::confirm(
                &format!("Delete shelter {id}? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            console
                .execute(CoreCommand::DeleteShelter { id: id.clone() })
                .await
                .map_err(|e| util::or_not_found(e, "shelter", &id))?;
            if !global.quiet {
                eprintln!("Shelter deleted");
            }
            Ok(())
        }
    }
}

fn print_shelter(console: &Console, result: CommandResult, global: &GlobalOpts) {
    if let CommandResult::Shelter(shelter) = result {
        let view = ShelterView::new(Arc::new(shelter), console.session().as_deref());
        let out = output::render_single(
            &global.output,
            &view.shelter,
            |s| format!("{} ({}): {}", s.name, s.id, view.occupancy_label()),
            |s| s.id.to_string(),
        );
        output::print_output(&out, global.quiet);
    }
}

async fn handle_tasks(
    console: &Console,
    command: AdminTasksCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        AdminTasksCommand::Create(args) => {
            let draft = task_form(TaskForm::default(), args)
                .to_draft()
                .map_err(|e| invalid(&e))?;
            let result = console.execute(CoreCommand::CreateTask(draft)).await?;
            if let CommandResult::Task(task) = result {
                if !global.quiet {
                    eprintln!("Task created");
                }
                tasks::show_task(console, &task.id, global).await?;
            }
            Ok(())
        }

        AdminTasksCommand::Update { task, form } => {
            let id = RecordId::from(task.as_str());
            let current = console
                .get_task(&id)
                .await
                .map_err(|e| util::or_not_found(e, "task", &id))?;
            let draft = task_form(TaskForm::from(&current), form)
                .to_draft()
                .map_err(|e| invalid(&e))?;
            console
                .execute(CoreCommand::UpdateTask {
                    id: id.clone(),
                    draft,
                })
                .await
                .map_err(|e| util::or_not_found(e, "task", &id))?;
            if !global.quiet {
                eprintln!("Task updated");
            }
            tasks::show_task(console, &id, global).await
        }

        AdminTasksCommand::Delete { task } => {
            let id = RecordId::from(task.as_str());
            if !util::confirm(
                &format!("Delete task {id}? This cannot be undone."),
                global.yes,
            )? {
                return Ok(());
            }
            console
                .execute(CoreCommand::DeleteTask { id: id.clone() })
                .await
                .map_err(|e| util::or_not_found(e, "task", &id))?;
            if !global.quiet {
                eprintln!("Task deleted");
            }
            Ok(())
        }
    }
}
