//! # Wire Engine Demo Entry Point
//!
//! This is the main entry point for the demo binary. It simply calls into the
//! library's `run()` function, which builds a small world, lays wires around a
//! corner, drives a few ticks and logs the resulting shapes.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```
//!
//! Set `WIRE_ENGINE_CONFIG` to a JSON file to override the cache and geometry
//! settings.

fn main() {
    wire_engine::run();
}
