//! Shelter command handlers: directory listing, search, and reservation.

use std::io::IsTerminal;
use std::sync::Arc;

use dialoguer::Input;
use tabled::Tabled;

use shelterly_core::{
    Command as CoreCommand, Console, RecordId, ReservationInitiator, ReservationState, ReserveControl, SearchCriteria,
    Session, Shelter, ShelterView,
};

use crate::cli::{GlobalOpts, LocalFilterArgs, SheltersArgs, SheltersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ShelterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    stype: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Beds")]
    beds: String,
    #[tabled(rename = "Pets")]
    pets: String,
    #[tabled(rename = "Partner")]
    partner: String,
    #[tabled(rename = "Reserve")]
    reserve: String,
}

impl ShelterRow {
    fn new(view: &ShelterView, color: bool) -> Self {
        let s = &view.shelter;
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            stype: s.shelter_type.map_or("-", |t| t.label()).into(),
            city: s.address.city.clone(),
            beds: output::availability_cell(view, color),
            pets: yes_no(s.allows_pets).into(),
            partner: yes_no(s.allows_partner).into(),
            reserve: reserve_label(view.reserve).into(),
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn reserve_label(control: ReserveControl) -> &'static str {
    match control {
        ReserveControl::Enabled => "available",
        ReserveControl::RequiresLogin => "log in",
        ReserveControl::Disabled => "full",
    }
}

fn detail(view: &ShelterView) -> String {
    let s = &view.shelter;
    let mut lines = vec![
        format!("ID:           {}", s.id),
        format!("Name:         {}", s.name),
        format!("Type:         {}", s.shelter_type.map_or("-", |t| t.label())),
        format!("Address:      {}", s.address.one_line()),
        format!("Beds:         {}", view.occupancy_label()),
        format!("Pets:         {}", yes_no(s.allows_pets)),
        format!("Partner:      {}", yes_no(s.allows_partner)),
        format!("Active:       {}", yes_no(s.active)),
        format!("Reserve:      {}", reserve_label(view.reserve)),
        format!("Phone:        {}", util::or_dash(s.phone.as_deref())),
        format!("Email:        {}", util::or_dash(s.email.as_deref())),
        format!(
            "Operator:     {}",
            util::or_dash(s.operating_organization.as_deref())
        ),
        format!("Location:     {:.5}, {:.5}", s.latitude, s.longitude),
    ];
    if let Some(updated) = s.last_updated {
        lines.push(format!("Updated:      {}", updated.format("%Y-%m-%d %H:%M")));
    }
    if view.low_availability && view.reserve != ReserveControl::Disabled {
        lines.push("Note:         low availability".into());
    }
    if let Some(ref description) = s.description {
        lines.push(String::new());
        lines.push(description.clone());
    }
    lines.join("\n")
}

// ── Rendering ───────────────────────────────────────────────────────

fn apply_local_filter(console: &Console, filter: &LocalFilterArgs) -> Result<(), CliError> {
    if let Some(ref raw) = filter.only_type {
        console.set_type_filter(Some(util::parse_shelter_type(raw)?));
    }
    if let Some(ref text) = filter.filter {
        console.apply_local_filter(text);
    }
    Ok(())
}

fn print_directory(console: &Console, global: &GlobalOpts) {
    let snapshot = console.directory_snapshot();
    let session = console.session();
    let color = output::should_color(&global.color);

    let out = output::render_list(
        &global.output,
        &snapshot.visible,
        |s| ShelterRow::new(&ShelterView::new(Arc::clone(s), session.as_deref()), color),
        |s| s.id.to_string(),
    );
    output::print_output(&out, global.quiet);

    if snapshot.inconsistent > 0 && !global.quiet {
        eprintln!(
            "warning: {} shelter record(s) report availability outside 0..=capacity",
            snapshot.inconsistent
        );
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: SheltersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SheltersCommand::List(filter) => {
            let bar = output::spinner("Loading shelters", global.quiet);
            let loaded = console.fetch_all().await;
            bar.finish_and_clear();
            loaded?;

            apply_local_filter(console, &filter)?;
            print_directory(console, global);
            Ok(())
        }

        SheltersCommand::Search {
            shelter_type,
            pets,
            partner,
            active,
            filter,
        } => {
            let criteria = SearchCriteria {
                shelter_type: shelter_type
                    .as_deref()
                    .map(util::parse_shelter_type)
                    .transpose()?,
                allows_pets: pets,
                allows_partner: partner,
                is_active: active,
            };

            let bar = output::spinner("Searching shelters", global.quiet);
            let loaded = console.search(criteria).await;
            bar.finish_and_clear();
            loaded?;

            apply_local_filter(console, &filter)?;
            print_directory(console, global);
            Ok(())
        }

        SheltersCommand::Get { shelter } => {
            let id = RecordId::from(shelter.as_str());
            let found = console
                .get_shelter(&id)
                .await
                .map_err(|e| util::or_not_found(e, "shelter", &id))?;
            let view = ShelterView::new(Arc::new(found), console.session().as_deref());
            let out = output::render_single(
                &global.output,
                &view.shelter,
                |_| detail(&view),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SheltersCommand::Reserve {
            shelter,
            client: Some(client),
            ..
        } => {
            reserve_existing(
                console,
                &RecordId::from(shelter.as_str()),
                &RecordId::from(client.as_str()),
                global,
            )
            .await
        }

        SheltersCommand::Reserve {
            shelter,
            name,
            notes,
            ..
        } => reserve(console, &RecordId::from(shelter.as_str()), name, &notes, global).await,
    }
}

// ── Reservation ─────────────────────────────────────────────────────

async fn reserve(
    console: &Console,
    shelter_id: &RecordId,
    name: Option<String>,
    notes: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let shelter = load_reservable(console, shelter_id).await?;

    let name = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt(format!("Client name for {}", shelter.name))
            .interact_text()
            .map_err(util::prompt_err)?,
    };

    let mut initiator = ReservationInitiator::new(Arc::clone(&shelter));
    let bar = output::spinner("Registering client and reserving bed", global.quiet);
    let submitted = console.submit_reservation(&mut initiator, &name, notes).await;
    bar.finish_and_clear();
    submitted?;

    loop {
        match initiator.state().clone() {
            ReservationState::Success { client } => {
                let out = output::render_single(
                    &global.output,
                    &client,
                    |_| initiator.message().unwrap_or_default(),
                    |c| c.id.to_string(),
                );
                output::print_output(&out, global.quiet);
                print_remaining(console, shelter_id, global.quiet);
                return Ok(());
            }
            ReservationState::Failed(failure) => {
                let Some(client) = failure.orphaned_client().cloned() else {
                    return Err(CliError::ReservationFailed {
                        message: failure.message().into(),
                        recovery: "No client was registered. Try the reservation again.".into(),
                    });
                };

                let retry = std::io::stdin().is_terminal()
                    && util::confirm(
                        &format!(
                            "Client #{} was registered but no bed was reserved. Retry the bed reservation?",
                            client.id
                        ),
                        false,
                    )?;
                if !retry {
                    return Err(CliError::ReservationFailed {
                        message: failure.message().into(),
                        recovery: format!(
                            "Client #{client_id} is registered without a bed. Do not register them again.\n\
                             Run: shelterly shelters reserve {shelter_id} --client {client_id}",
                            client_id = client.id
                        ),
                    });
                }

                let bar = output::spinner("Retrying bed reservation", global.quiet);
                let retried = console.retry_reservation(&mut initiator).await;
                bar.finish_and_clear();
                retried?;
            }
            ReservationState::Idle | ReservationState::Submitting => {
                return Err(CliError::ApiError {
                    status: None,
                    message: "Reservation did not complete".into(),
                });
            }
        }
    }
}

/// Reserve a bed for a client registered earlier (manual recovery after a
/// failed bed step).
async fn reserve_existing(
    console: &Console,
    shelter_id: &RecordId,
    client_id: &RecordId,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let shelter = load_reservable(console, shelter_id).await?;

    console
        .execute(CoreCommand::ReserveBed {
            shelter_id: shelter.id.clone(),
            client_id: client_id.clone(),
        })
        .await?;
    console.refresh().await?;

    if !global.quiet {
        eprintln!("Reserved a bed at {} for client #{client_id}", shelter.name);
    }
    print_remaining(console, shelter_id, global.quiet);
    Ok(())
}

/// Load the directory, find the shelter, and check its reserve control.
/// The directory load also makes the post-booking re-fetch a full fetch.
async fn load_reservable(console: &Console, shelter_id: &RecordId) -> Result<Arc<Shelter>, CliError> {
    console.fetch_all().await?;
    let shelter = console
        .directory()
        .find(shelter_id)
        .ok_or_else(|| CliError::NotFound {
            resource_type: "shelter".into(),
            identifier: shelter_id.to_string(),
            list_command: "shelters list".into(),
        })?;
    check_reservable(&shelter, console.session().as_deref())?;
    Ok(shelter)
}

fn print_remaining(console: &Console, shelter_id: &RecordId, quiet: bool) {
    if quiet {
        return;
    }
    if let Some(updated) = console.directory().find(shelter_id) {
        eprintln!(
            "{} now has {}/{} beds available",
            updated.name, updated.current_availability, updated.total_capacity
        );
    }
}

/// The CLI only books when the reserve control would be enabled.
fn check_reservable(shelter: &Shelter, session: Option<&Session>) -> Result<(), CliError> {
    match ReserveControl::for_shelter(shelter, session) {
        ReserveControl::Enabled => Ok(()),
        ReserveControl::RequiresLogin => Err(CliError::LoginRequired {
            action: "reserve beds".into(),
        }),
        ReserveControl::Disabled => Err(CliError::NoAvailability {
            shelter: shelter.name.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelterly_core::model::Address;

    fn shelter(availability: i64) -> Shelter {
        Shelter {
            id: RecordId::Numeric(1),
            name: "Casa A".into(),
            address: Address {
                line1: "123 San Fernando Rd".into(),
                line2: None,
                city: "San Jose".into(),
                state: "CA".into(),
                zip: "95112".into(),
            },
            latitude: 37.33,
            longitude: -121.89,
            total_capacity: 10,
            current_availability: availability,
            shelter_type: None,
            allows_pets: true,
            allows_partner: false,
            active: true,
            phone: None,
            email: None,
            operating_organization: None,
            description: None,
            last_updated: None,
        }
    }

    #[test]
    fn full_shelter_is_refused_even_when_logged_in() {
        let session = shelterly_core::session::login(&shelterly_core::session::LoginCredentials {
            email: "demo@example.com".into(),
            password: "password".to_owned().into(),
            role: shelterly_core::Role::Caseworker,
        })
        .ok();
        let err = check_reservable(&shelter(0), session.as_ref());
        assert!(matches!(err, Err(CliError::NoAvailability { .. })));
        assert!(check_reservable(&shelter(1), session.as_ref()).is_ok());
    }

    #[test]
    fn anonymous_reserve_asks_for_login() {
        let err = check_reservable(&shelter(3), None);
        assert!(matches!(err, Err(CliError::LoginRequired { .. })));
    }

    #[test]
    fn row_labels_follow_the_control() {
        let view = ShelterView::new(Arc::new(shelter(0)), None);
        let row = ShelterRow::new(&view, false);
        assert_eq!(row.beds, "0/10 beds");
        assert_eq!(row.reserve, "full");
    }
}
