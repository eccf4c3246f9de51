#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Wire Engine
//!
//! Geometry and connectivity for wire blocks in a voxel grid.
//!
//! A wire cell can carry a flat wire on any of its six interior faces. Its shape
//! depends on which faces are attached, which neighbouring wires it runs into and
//! which cube edges need a segment to close a corner. This crate encodes that state
//! in a compact 42-bit index, composes shapes from precomputed primitives, and caches
//! them twice: once per index, shared by every region, and once per position,
//! invalidated whenever the topology around the position changes.
//!
//! ## Key Modules
//!
//! * `application_state` - The demo driver used by the binary
//! * `core` - Shared-resource primitives used throughout the engine
//! * `engine_state` - The engine coordinator, the reference voxel grid and the wire subsystem
//!
//! ## Usage
//!
//! ```no_run
//! // Native application initialization
//! fn main() {
//!     wire_engine::run();
//! }
//! ```
//!
//! Hosts embed the engine through [`engine_state::WireEngine`]: register wire
//! families, load a [`WireRegion`](engine_state::wires::region::WireRegion) per grid
//! partition, report topology changes to it and call its `tick` once per
//! simulation tick.

use log::{error, info};

pub mod application_state;
pub mod core;
pub mod engine_state;

use engine_state::config::WireEngineConfig;

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_PATH_VARIABLE: &str = "WIRE_ENGINE_CONFIG";

/// Initialises logging, loads the configuration and runs the demo.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::var_os(CONFIG_PATH_VARIABLE) {
        Some(path) => match WireEngineConfig::from_path(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{}", err);
                return;
            }
        },
        None => WireEngineConfig::default(),
    };

    if let Err(err) = application_state::run_demo(config) {
        error!("Demo failed: {}", err);
    }
}
