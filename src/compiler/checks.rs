use crate::condition::Predicate;
use crate::content::{AutoAnswer, FlowDefinition, StepKind};
use crate::error::DefinitionError;
use ahash::{AHashMap, AHashSet};

pub(super) fn check_identifiers<P>(flow: &FlowDefinition<P>) -> Result<(), DefinitionError> {
    let mut seen = AHashSet::new();
    for phase in &flow.phases {
        for step in &phase.steps {
            if step.id.trim().is_empty() {
                return Err(DefinitionError::EmptyIdentifier {
                    flow: flow.name.clone(),
                    context: format!("step in phase '{}'", phase.name),
                });
            }
            if !seen.insert(step.id.as_str()) {
                return Err(DefinitionError::DuplicateStep(step.id.clone()));
            }

            let mut option_ids = AHashSet::new();
            for option in &step.options {
                if option.id.trim().is_empty() {
                    return Err(DefinitionError::EmptyIdentifier {
                        flow: flow.name.clone(),
                        context: format!("option of step '{}'", step.id),
                    });
                }
                if !option_ids.insert(option.id.as_str()) {
                    return Err(DefinitionError::DuplicateOption {
                        step_id: step.id.clone(),
                        option_id: option.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

pub(super) fn check_step_shapes<P>(flow: &FlowDefinition<P>) -> Result<(), DefinitionError> {
    for step in flow.phases.iter().flat_map(|p| p.steps.iter()) {
        match &step.kind {
            StepKind::SingleSelect | StepKind::MultiSelect => {
                if step.options.is_empty() {
                    return Err(DefinitionError::MissingOptions(step.id.clone()));
                }
            }
            StepKind::Slider { min, max, default } => {
                if !(min < max && default >= min && default <= max) {
                    return Err(DefinitionError::InvalidSliderRange {
                        step_id: step.id.clone(),
                        min: *min,
                        max: *max,
                        default: *default,
                    });
                }
            }
            StepKind::Text { .. } | StepKind::Notice => {}
        }

        if let Some(detour) = &step.detour {
            if step.option(&detour.option).is_none() {
                return Err(DefinitionError::UnknownDetourOption {
                    step_id: step.id.clone(),
                    option_id: detour.option.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Every step a condition, auto-answer or option filter reads must exist and,
/// unless allowed otherwise, be declared before the step that reads it.
pub(super) fn check_references<P: Predicate>(
    flow: &FlowDefinition<P>,
    allow_forward: bool,
) -> Result<(), DefinitionError> {
    let order: AHashMap<&str, usize> = flow
        .phases
        .iter()
        .flat_map(|p| p.steps.iter())
        .enumerate()
        .map(|(i, s)| (s.id.as_str(), i))
        .collect();

    for (own_order, step) in flow.phases.iter().flat_map(|p| p.steps.iter()).enumerate() {
        for referenced in step.condition.referenced_steps() {
            match order.get(referenced) {
                None => {
                    return Err(DefinitionError::UnknownConditionStep {
                        step_id: step.id.clone(),
                        referenced: referenced.to_string(),
                    });
                }
                Some(&ref_order) if ref_order >= own_order && !allow_forward => {
                    return Err(DefinitionError::ForwardReference {
                        step_id: step.id.clone(),
                        referenced: referenced.to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        let derived_from = step
            .auto_answer
            .iter()
            .map(|a| match a {
                AutoAnswer::SoleSelection { from, .. } => from.as_str(),
            })
            .chain(step.options_from.as_deref());
        for source in derived_from {
            if !order.contains_key(source) {
                return Err(DefinitionError::UnknownSourceStep {
                    step_id: step.id.clone(),
                    source_id: source.to_string(),
                });
            }
        }
    }
    Ok(())
}
