//! JavaScript interop for the physics simulation.
//! Provides Rust bindings to the helpers defined in sim_bridge.js.

use crate::simulation::{SimulationInput, SimulationSink};
use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/sim_bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = loadSimulation)]
    fn load_simulation(data: JsValue);
}

/// Hands simulation input to the JS physics engine as plain objects.
pub struct JsSimulation;

impl SimulationSink for JsSimulation {
    fn show(&self, input: &SimulationInput) {
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        match input.serialize(&serializer) {
            Ok(data) => load_simulation(data),
            Err(e) => warn!("Couldn't pass {} to the simulation: {}", input.data.name, e),
        }
    }
}
