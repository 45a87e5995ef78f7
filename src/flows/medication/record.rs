use crate::answers::{AnswerMap, AnswerValue};
use crate::catalog::medication::palette_color;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::setup::{DOSAGE, FREQUENCY, NAME, TIMES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Once,
    Twice,
    Three,
    Four,
    AsNeeded,
}

impl Frequency {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "once" => Some(Frequency::Once),
            "twice" => Some(Frequency::Twice),
            "three" => Some(Frequency::Three),
            "four" => Some(Frequency::Four),
            "as_needed" => Some(Frequency::AsNeeded),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Frequency::Once => "once",
            Frequency::Twice => "twice",
            Frequency::Three => "three",
            Frequency::Four => "four",
            Frequency::AsNeeded => "as_needed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Once => "Once daily",
            Frequency::Twice => "Twice daily",
            Frequency::Three => "Three times",
            Frequency::Four => "Four times",
            Frequency::AsNeeded => "As needed",
        }
    }
}

/// A daily time slot. The declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
        TimeSlot::Night,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Night => "Night",
        }
    }

    /// The reminder time used when the user does not pick one.
    pub fn default_time(&self) -> NaiveTime {
        let hour = match self {
            TimeSlot::Morning => 8,
            TimeSlot::Afternoon => 12,
            TimeSlot::Evening => 18,
            TimeSlot::Night => 22,
        };
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.label(),
            self.default_time().format("%-I:%M %p")
        )
    }
}

/// A medication collected by the setup wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    /// Free-form dosage as entered, e.g. "100mg".
    pub dosage: String,
    pub frequency: Frequency,
    /// Scheduled slots in canonical order.
    pub times: Vec<TimeSlot>,
    pub reminder_enabled: bool,
    pub color: String,
}

impl Medication {
    /// Builds the record for the `index`-th medication from the answers of one
    /// entry wizard. `None` when a required answer is missing.
    pub fn from_answers(answers: &AnswerMap, index: usize) -> Option<Self> {
        let name = answers.text(NAME)?.trim().to_string();
        let dosage = answers.text(DOSAGE)?.trim().to_string();
        let frequency = answers
            .selection(FREQUENCY)
            .and_then(|set| set.iter().next())
            .and_then(|id| Frequency::from_id(id))?;

        let mut times: Vec<TimeSlot> = answers
            .selection(TIMES)?
            .iter()
            .filter_map(|id| TimeSlot::from_id(id))
            .collect();
        times.sort();
        if name.is_empty() || times.is_empty() {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            name,
            dosage,
            frequency,
            times,
            reminder_enabled: true,
            color: palette_color(index).to_string(),
        })
    }

    /// The answers that would produce this record, for re-opening it.
    pub fn to_answers(&self) -> AnswerMap {
        let mut answers = AnswerMap::new();
        answers.set_text(NAME, &self.name);
        answers.set_text(DOSAGE, &self.dosage);
        answers.replace_single(FREQUENCY, self.frequency.id());
        answers.insert(
            TIMES,
            AnswerValue::selection(self.times.iter().map(|t| t.id())),
        );
        answers
    }

    pub fn is_scheduled_at(&self, slot: TimeSlot) -> bool {
        self.times.contains(&slot)
    }
}

/// The outcome of one scheduled dose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationLog {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub scheduled_time: TimeSlot,
    pub taken_at: Option<DateTime<Utc>>,
    pub skipped: bool,
    pub date: NaiveDate,
}
