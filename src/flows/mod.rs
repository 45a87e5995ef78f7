//! Flow-specific behaviour built on top of the generic controller.

pub mod diary;
pub mod medication;

use crate::catalog;
use crate::content::FlowDefinition;

/// Names accepted by [`builtin`]. Diaries are addressed as `diary:<category>`.
pub fn builtin_names() -> Vec<String> {
    let mut names = vec![
        catalog::onboarding::FLOW_NAME.to_string(),
        catalog::checkin::FLOW_NAME.to_string(),
        medication::setup::ENTRY_FLOW_NAME.to_string(),
    ];
    names.extend(catalog::categories().iter().map(diary::flow_name));
    names
}

/// Looks up a built-in flow definition by name.
pub fn builtin(name: &str) -> Option<FlowDefinition> {
    match name {
        catalog::onboarding::FLOW_NAME => Some(catalog::onboarding()),
        catalog::checkin::FLOW_NAME => Some(catalog::daily_checkin()),
        medication::setup::ENTRY_FLOW_NAME => Some(medication::entry_definition()),
        other => other
            .strip_prefix("diary:")
            .and_then(catalog::category)
            .map(|category| diary::definition_for(&category)),
    }
}
