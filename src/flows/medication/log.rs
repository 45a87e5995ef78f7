use super::{Medication, MedicationLog, TimeSlot};
use crate::error::FlowError;
use crate::progress::Progress;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    #[default]
    Pending,
    Taken,
    Skipped,
}

/// Where a log session stands after `next`/`back`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStep {
    Slot(TimeSlot),
    /// Every slot was visited; the summary is on screen.
    Summary,
    /// `back` on the first slot.
    ExitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSummary {
    pub taken: usize,
    pub skipped: usize,
    /// Scheduled doses across all active slots.
    pub total: usize,
}

/// Walks the user through today's scheduled doses, one time slot at a time.
///
/// Only slots with at least one scheduled medication are visited, in
/// canonical order. A session without any is a valid, empty session: it has
/// no current slot and its summary is `0 of 0`.
#[derive(Debug, Clone)]
pub struct LogSession {
    medications: Vec<Medication>,
    slots: Vec<TimeSlot>,
    index: usize,
    statuses: AHashMap<(Uuid, TimeSlot), LogStatus>,
    finished: bool,
}

impl LogSession {
    pub fn new(medications: Vec<Medication>) -> Self {
        let slots: Vec<TimeSlot> = TimeSlot::ALL
            .into_iter()
            .filter(|slot| medications.iter().any(|m| m.is_scheduled_at(*slot)))
            .collect();
        tracing::debug!(medications = medications.len(), slots = slots.len(), "log session opened");
        Self {
            medications,
            slots,
            index: 0,
            statuses: AHashMap::new(),
            finished: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn active_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// The slot on screen. `None` for an empty or finished session.
    pub fn current_slot(&self) -> Option<TimeSlot> {
        if self.finished {
            return None;
        }
        self.slots.get(self.index).copied()
    }

    pub fn medications_for_current(&self) -> Vec<&Medication> {
        match self.current_slot() {
            Some(slot) => self.medications_at(slot).collect(),
            None => Vec::new(),
        }
    }

    pub fn status(&self, medication_id: Uuid, slot: TimeSlot) -> LogStatus {
        self.statuses
            .get(&(medication_id, slot))
            .copied()
            .unwrap_or_default()
    }

    /// Records taken/skipped for a medication of the current slot. Logging
    /// again overwrites the earlier status.
    pub fn log(&mut self, medication_id: Uuid, taken: bool) -> Result<(), FlowError> {
        if self.finished {
            return Err(FlowError::Finished);
        }
        let slot = self.current_slot().ok_or_else(|| FlowError::InvalidState {
            operation: "log",
            state: "without scheduled medications".to_string(),
        })?;
        if !self.medications_at(slot).any(|m| m.id == medication_id) {
            return Err(FlowError::UnknownOption {
                step_id: slot.id().to_string(),
                option_id: medication_id.to_string(),
            });
        }

        let status = if taken { LogStatus::Taken } else { LogStatus::Skipped };
        self.statuses.insert((medication_id, slot), status);
        Ok(())
    }

    /// Whether every medication of the current slot has a status.
    pub fn current_slot_logged(&self) -> bool {
        self.current_slot().is_none_or(|slot| {
            self.medications_at(slot)
                .all(|m| self.status(m.id, slot) != LogStatus::Pending)
        })
    }

    pub fn all_logged(&self) -> bool {
        self.slots.iter().all(|slot| {
            self.medications_at(*slot)
                .all(|m| self.status(m.id, *slot) != LogStatus::Pending)
        })
    }

    pub fn next(&mut self) -> Result<LogStep, FlowError> {
        if self.finished {
            return Err(FlowError::Finished);
        }
        if self.index + 1 < self.slots.len() {
            self.index += 1;
            Ok(LogStep::Slot(self.slots[self.index]))
        } else {
            self.finished = true;
            let summary = self.summary();
            tracing::info!(taken = summary.taken, total = summary.total, "medication log finished");
            Ok(LogStep::Summary)
        }
    }

    pub fn back(&mut self) -> Result<LogStep, FlowError> {
        if self.finished {
            return Err(FlowError::Finished);
        }
        if self.index == 0 {
            return Ok(LogStep::ExitRequested);
        }
        self.index -= 1;
        Ok(LogStep::Slot(self.slots[self.index]))
    }

    pub fn summary(&self) -> LogSummary {
        let count = |wanted: LogStatus| self.statuses.values().filter(|s| **s == wanted).count();
        LogSummary {
            taken: count(LogStatus::Taken),
            skipped: count(LogStatus::Skipped),
            total: self
                .slots
                .iter()
                .map(|slot| self.medications_at(*slot).count())
                .sum(),
        }
    }

    pub fn progress(&self) -> Progress {
        let current = if self.finished || self.slots.is_empty() {
            self.slots.len()
        } else {
            self.index + 1
        };
        Progress::new(current, self.slots.len())
    }

    /// Log records for every dose that was marked, stamped at `now`.
    pub fn into_logs(self, now: DateTime<Utc>) -> Vec<MedicationLog> {
        let mut logs: Vec<MedicationLog> = self
            .statuses
            .into_iter()
            .filter(|(_, status)| *status != LogStatus::Pending)
            .map(|((medication_id, slot), status)| MedicationLog {
                id: Uuid::new_v4(),
                medication_id,
                scheduled_time: slot,
                taken_at: (status == LogStatus::Taken).then_some(now),
                skipped: status == LogStatus::Skipped,
                date: now.date_naive(),
            })
            .collect();
        logs.sort_by_key(|log| (log.scheduled_time, log.medication_id));
        logs
    }

    fn medications_at(&self, slot: TimeSlot) -> impl Iterator<Item = &Medication> {
        self.medications.iter().filter(move |m| m.is_scheduled_at(slot))
    }
}
