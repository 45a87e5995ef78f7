//! Typed navigation between flows and the detour handoff.

pub mod handoff;
pub mod router;

pub use handoff::MedicationDetour;
pub use router::{Navigator, Route};
