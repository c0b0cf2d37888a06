#![recursion_limit = "256"]
#![warn(clippy::all)]

pub mod agents;
pub mod battalions;
pub mod colony;
pub mod constants;
pub mod creep;
pub mod error;
pub mod features;
pub mod findnearest;
pub mod game_loop;
pub mod logging;
pub mod memorysystem;
pub mod objectives;
pub mod serialize;
pub mod spawnsystem;
pub mod tasks;
pub mod world;

#[cfg(test)]
mod testing;

/// Simulation tick counter as exposed by the host.
pub type Tick = u32;

/// Host entry point: installs logging before the first tick runs.
pub fn setup() {
    logging::setup_logging(logging::Info);
}
