//! Loading the selected team into the simulation.

use crate::error::LoadError;
use crate::model::{Team, TeamData};
use crate::store::DataStore;
use log::{debug, info};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// The currently selected team slug, shared between the UI and loads in
/// flight.
#[derive(Debug, Clone)]
pub struct Selection {
    current: Rc<RefCell<String>>,
}

impl Selection {
    pub fn new(initial: &str) -> Self {
        Self {
            current: Rc::new(RefCell::new(initial.to_string())),
        }
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn select(&self, slug: &str) {
        *self.current.borrow_mut() = slug.to_string();
    }

    pub fn is(&self, slug: &str) -> bool {
        *self.current.borrow() == slug
    }
}

/// Everything handed to the physics simulation for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    pub info: Team,
    #[serde(flatten)]
    pub data: TeamData,
    /// Height of the water line, from the idol board.
    pub water_level: Option<f64>,
}

/// The rendering/physics side of the application.
pub trait SimulationSink {
    fn show(&self, input: &SimulationInput);
}

/// Load data for the selected team and hand it to `sink`.
///
/// Returns `Ok(false)` without touching `sink` when the selection changed
/// while loading; that result belongs to a team nobody is looking at any
/// more, and whatever went wrong with it is already in the status log.
pub async fn load_simulation(
    store: &DataStore,
    selection: &Selection,
    sink: &dyn SimulationSink,
    force: bool,
) -> Result<bool, LoadError> {
    store.teams.load(force).await?;

    let slug = selection.current();
    let (data, stadiums, noodle) = futures::join!(
        store.team_data.load(slug.clone(), force),
        store.stadiums.load(force),
        store.noodle.load(force),
    );

    if !selection.is(&slug) {
        debug!(
            "Discarding data for {}; {} is selected now",
            slug,
            selection.current()
        );
        return Ok(false);
    }

    let (data, _, noodle) = (data?, stadiums?, noodle?);
    let data = data.ok_or_else(|| LoadError::Missing(format!("data for team \"{}\"", slug)))?;
    let info = store
        .teams
        .get()?
        .get(&slug)
        .map(|team| Team::clone(team))
        .ok_or_else(|| LoadError::Missing(format!("team \"{}\"", slug)))?;

    info!("Loading {} into the simulation", info.full_name);
    sink.show(&SimulationInput {
        info,
        data: TeamData::clone(&data),
        water_level: noodle.map(|level| *level),
    });
    Ok(true)
}
