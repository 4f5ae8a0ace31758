//! Find the most pressure that can be released from a network of valves
//! within a fixed time, by reducing the tunnel graph to shortest walking
//! times between the valves worth opening and then exhaustively searching
//! the ways one agent (or a pair sharing the clock) can visit them.

pub mod search;
pub mod travel;
pub mod volcano;

pub use search::{max_release, max_release_pair};
pub use travel::{travel_times, Hop};
pub use volcano::{Valve, ValveDef, ValveHandle, Volcano, START_VALVE};
