//! Medication setup and daily medication logging.

pub mod log;
pub mod record;
pub mod setup;

pub use log::{LogSession, LogStatus, LogStep, LogSummary};
pub use record::{Frequency, Medication, MedicationLog, TimeSlot};
pub use setup::{MedicationSetup, SetupStage, entry_definition};
