//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure:
//! - No clock reads; `dt` is always passed in
//! - Seeded RNG only
//! - Stable iteration order (scene order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Contact, first_contact, reflect_bounds, resolve_elastic, swept_contact};
pub use state::{Ball, Scene, SimParams};
pub use tick::{TickInput, launch, step, tick};
