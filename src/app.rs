//! The application context: every long-lived piece of state, built once.

use crate::config::{Endpoints, DEFAULT_TEAM};
use crate::error::LoadError;
use crate::fetch::{BrowserTransport, JsonClient, Transport};
use crate::simulation::{load_simulation, Selection, SimulationSink};
use crate::status::{BrowserScheduler, Scheduler, StatusLog};
use crate::store::DataStore;
use std::rc::Rc;

#[derive(Clone)]
pub struct AppContext {
    pub status: StatusLog,
    pub store: DataStore,
    pub selection: Selection,
}

impl AppContext {
    pub fn new(
        transport: Rc<dyn Transport>,
        scheduler: Rc<dyn Scheduler>,
        endpoints: Endpoints,
        default_team: &str,
    ) -> Self {
        let status = StatusLog::new(scheduler);
        let client = JsonClient::new(transport, status.clone());
        Self {
            store: DataStore::new(client, endpoints),
            selection: Selection::new(default_team),
            status,
        }
    }

    /// Context wired to `fetch`, `setTimeout` and the live endpoints.
    pub fn browser() -> Self {
        Self::new(
            Rc::new(BrowserTransport),
            Rc::new(BrowserScheduler),
            Endpoints::default(),
            DEFAULT_TEAM,
        )
    }

    pub async fn load_simulation(
        &self,
        sink: &dyn SimulationSink,
        force: bool,
    ) -> Result<bool, LoadError> {
        load_simulation(&self.store, &self.selection, sink, force).await
    }
}
