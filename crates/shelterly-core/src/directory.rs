// ── Shelter directory ──
//
// Local, filterable view over the last shelter set the backend returned.
// Every fetch or search takes a sequence token before it is sent; only the
// newest token's response is applied, so a slow earlier request can never
// overwrite a fresher one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use shelterly_api::types::ShelterSearchQuery;

use crate::error::CoreError;
use crate::model::{Shelter, ShelterType};
use crate::stream::DirectoryStream;

/// Message surfaced for any failed directory load.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load shelters";

// ── Criteria and filters ───────────────────────────────────────────

/// Server-side search criteria.
///
/// A `false` boolean means "don't filter on this": it is omitted from the
/// request rather than sent as a negative filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub shelter_type: Option<ShelterType>,
    pub allows_pets: bool,
    pub allows_partner: bool,
    pub is_active: bool,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Wire query with only the truthy keys present.
    pub fn to_query(&self) -> ShelterSearchQuery {
        ShelterSearchQuery {
            shelter_type: self.shelter_type.map(|t| t.as_wire().to_owned()),
            allows_pets: self.allows_pets.then_some(true),
            allows_partner: self.allows_partner.then_some(true),
            is_active: self.is_active.then_some(true),
        }
    }
}

/// Client-side filter applied over the last server result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalFilter {
    /// Case-insensitive substring over name, address line 1, and city.
    /// Matched literally; an empty string matches everything.
    pub text: String,
    pub shelter_type: Option<ShelterType>,
}

impl LocalFilter {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.shelter_type.is_none()
    }

    pub fn matches(&self, shelter: &Shelter) -> bool {
        if let Some(wanted) = self.shelter_type {
            if shelter.shelter_type != Some(wanted) {
                return false;
            }
        }
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        [
            shelter.name.as_str(),
            shelter.address.line1.as_str(),
            shelter.address.city.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Apply `filter` to `shelters`, preserving order.
pub fn filter_shelters(shelters: &[Arc<Shelter>], filter: &LocalFilter) -> Vec<Arc<Shelter>> {
    shelters
        .iter()
        .filter(|s| filter.matches(s))
        .map(Arc::clone)
        .collect()
}

// ── State ──────────────────────────────────────────────────────────

/// Load state of the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DirectoryState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

/// Sequence token handed out before a directory request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Point-in-time view of the directory, published to subscribers.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub state: DirectoryState,
    /// Last set returned by the backend, unfiltered.
    pub results: Arc<Vec<Arc<Shelter>>>,
    /// `results` after the local filter.
    pub visible: Arc<Vec<Arc<Shelter>>>,
    pub filter: LocalFilter,
    /// Criteria of the applied result (`None` for a full fetch).
    pub criteria: Option<SearchCriteria>,
    /// Records breaching `0 <= availability <= capacity` in `results`.
    pub inconsistent: usize,
}

// ── Directory ──────────────────────────────────────────────────────

/// Reactive shelter directory with request ordering.
pub struct ShelterDirectory {
    issued: AtomicU64,
    snapshot: watch::Sender<DirectorySnapshot>,
}

impl Default for ShelterDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelterDirectory {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(DirectorySnapshot::default());
        Self {
            issued: AtomicU64::new(0),
            snapshot,
        }
    }

    /// Issue a fresh token and mark the directory as loading.
    pub fn begin_request(&self) -> RequestToken {
        let token = RequestToken(self.issued.fetch_add(1, Ordering::SeqCst) + 1);
        self.snapshot.send_modify(|snap| snap.state = DirectoryState::Loading);
        debug!(token = token.0, "directory request issued");
        token
    }

    /// Whether `token` is still the newest issued.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.issued.load(Ordering::SeqCst) == token.0
    }

    /// Apply a response. Returns `false` when the token was superseded and
    /// the response was dropped.
    ///
    /// On failure the previous results are kept and the state carries the
    /// generic load-failure message.
    pub fn complete(
        &self,
        token: RequestToken,
        criteria: Option<SearchCriteria>,
        result: Result<Vec<Shelter>, &CoreError>,
    ) -> bool {
        if !self.is_current(token) {
            debug!(token = token.0, "dropping superseded directory response");
            return false;
        }

        match result {
            Ok(shelters) => {
                let inconsistent = count_inconsistent(&shelters);
                let results: Arc<Vec<Arc<Shelter>>> =
                    Arc::new(shelters.into_iter().map(Arc::new).collect());
                self.snapshot.send_modify(|snap| {
                    snap.visible = Arc::new(filter_shelters(&results, &snap.filter));
                    snap.results = results;
                    snap.criteria = criteria;
                    snap.inconsistent = inconsistent;
                    snap.state = DirectoryState::Loaded;
                });
            }
            Err(e) => {
                warn!(error = %e, "shelter directory load failed");
                self.snapshot.send_modify(|snap| {
                    snap.state = DirectoryState::Failed {
                        message: LOAD_FAILED_MESSAGE.to_owned(),
                    };
                });
            }
        }
        true
    }

    /// Set the text filter; an empty string resets it.
    pub fn apply_local_filter(&self, text: &str) {
        self.update_filter(|f| text.clone_into(&mut f.text));
    }

    /// Restrict the visible set to one shelter type, or `None` for all.
    pub fn set_type_filter(&self, shelter_type: Option<ShelterType>) {
        self.update_filter(|f| f.shelter_type = shelter_type);
    }

    pub fn clear_filters(&self) {
        self.update_filter(|f| *f = LocalFilter::default());
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> DirectoryStream {
        DirectoryStream::new(self.snapshot.subscribe())
    }

    /// Look up a shelter in the last server result.
    pub fn find(&self, id: &crate::model::RecordId) -> Option<Arc<Shelter>> {
        self.snapshot
            .borrow()
            .results
            .iter()
            .find(|s| &s.id == id)
            .map(Arc::clone)
    }

    fn update_filter(&self, f: impl FnOnce(&mut LocalFilter)) {
        self.snapshot.send_modify(|snap| {
            f(&mut snap.filter);
            snap.visible = Arc::new(filter_shelters(&snap.results, &snap.filter));
        });
    }
}

fn count_inconsistent(shelters: &[Shelter]) -> usize {
    shelters
        .iter()
        .filter(|s| {
            let ok = s.availability_consistent();
            if !ok {
                warn!(
                    shelter = %s.id,
                    name = %s.name,
                    capacity = s.total_capacity,
                    availability = s.current_availability,
                    "shelter availability outside 0..=capacity"
                );
            }
            !ok
        })
        .count()
}
