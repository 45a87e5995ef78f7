//! Built-in content tables.
//!
//! These are plain [`FlowDefinition`](crate::content::FlowDefinition)s and
//! data records. A host may replace any of them with its own content as long
//! as it compiles.

pub mod checkin;
pub mod diary;
pub mod medication;
pub mod onboarding;

pub use checkin::daily_checkin;
pub use diary::{DiaryCategory, DiarySymptom, categories, category};
pub use onboarding::onboarding;

use crate::content::OptionDefinition;

fn choice(id: &str, label: &str, icon: &str) -> OptionDefinition {
    OptionDefinition::new(id, label).with_icon(icon)
}
