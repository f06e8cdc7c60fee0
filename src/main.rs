//! Yew front end: team picker, status messages, and the hand-off to the
//! physics simulation.

use blaseball_float::{bridge::JsSimulation, config::DEFAULT_TEAM, model::Teams, AppContext};
use log::{debug, error};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

mod components;
mod hooks;

use components::{ControlBar, StatusPanel, TeamHeader, TeamSelector};
use hooks::use_status_log;

/// Load the selected team into the simulation in the background.
fn spawn_simulation(ctx: &AppContext, force: bool) {
    let ctx = ctx.clone();
    spawn_local(async move {
        match ctx.load_simulation(&JsSimulation, force).await {
            Ok(true) => {}
            Ok(false) => debug!("Selection changed while loading"),
            // already reported in the status panel
            Err(e) => error!("Couldn't load the simulation: {}", e),
        }
    });
}

/// Primary application component wiring state, effects, and UI elements.
#[function_component]
pub fn App() -> Html {
    let ctx = use_state(AppContext::browser);
    let teams = use_state(|| None::<Rc<Teams>>);
    let selected = use_state(|| ctx.selection.current());
    let entries = use_status_log(&ctx.status);

    // Rebuild the selector on every teams load, then start the first load
    {
        let ctx = (*ctx).clone();
        let teams = teams.clone();
        let selected = selected.clone();
        use_effect_with((), move |_| {
            let selection = ctx.selection.clone();
            ctx.store.teams.on_loaded(move |loaded| {
                if !loaded.contains(&selection.current()) {
                    if let Some(first) = loaded.slugs().next() {
                        debug!("{} is not an active team, showing {}", selection.current(), first);
                        selection.select(first);
                    }
                }
                selected.set(selection.current());
                teams.set(Some(Rc::clone(loaded)));
            });
            spawn_simulation(&ctx, false);
        });
    }

    let on_select = {
        let ctx = (*ctx).clone();
        let selected = selected.clone();
        Callback::from(move |slug: String| {
            if ctx.selection.is(&slug) {
                return;
            }
            ctx.selection.select(&slug);
            selected.set(slug);
            spawn_simulation(&ctx, false);
        })
    };

    let on_reload = {
        let ctx = (*ctx).clone();
        Callback::from(move |_: ()| spawn_simulation(&ctx, true))
    };

    let on_reset = {
        let ctx = (*ctx).clone();
        let selected = selected.clone();
        Callback::from(move |_: ()| {
            ctx.selection.select(DEFAULT_TEAM);
            selected.set(DEFAULT_TEAM.to_string());
            spawn_simulation(&ctx, false);
        })
    };

    let current_team = teams
        .as_ref()
        .and_then(|teams| teams.get(selected.as_str()).cloned());

    html! {
        <div class="container">
            <TeamHeader team={current_team} />
            <TeamSelector
                teams={(*teams).clone()}
                selected={(*selected).clone()}
                {on_select}
            />
            <ControlBar {on_reload} {on_reset} />
            <div id="simulation" class="simulation"></div>
            <StatusPanel {entries} />
        </div>
    }
}

/// Entry point: installs the panic hook and renders the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
