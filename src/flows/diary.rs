//! Symptom diaries.
//!
//! Each [`DiaryCategory`] turns into a single-phase flow:
//!
//! `symptoms → other_text? → troublesome? → frequency → impact → safety? → worst_time?`
//!
//! * Choosing "none" ends the diary right after the symptom question.
//! * "Other" asks for a free-text description, and can itself be the most
//!   troublesome symptom.
//! * `troublesome` is only asked when more than one symptom was picked; a
//!   single symptom becomes its answer when the cursor passes over it.
//! * The `safety` notice follows `impact` when a picked symptom is one of the
//!   category's safety triggers. Its condition reads the symptom answer, so it
//!   is re-evaluated every time the cursor leaves `impact`.
//! * `worst_time` only exists for categories that declare worst-time options.

use crate::answers::AnswerMap;
use crate::catalog::diary::{
    DiaryCategory, FREQUENCY_SCALE, IMPACT_SCALE, NO_SYMPTOMS, OTHER_SYMPTOM,
};
use crate::condition::Condition;
use crate::content::{
    AutoAnswer, FlowDefinition, Interstitial, OptionDefinition, StepDefinition, StepKind,
};
use crate::sequence;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub const SYMPTOMS: &str = "symptoms";
pub const OTHER_TEXT: &str = "other_text";
pub const TROUBLESOME: &str = "troublesome";
pub const FREQUENCY: &str = "frequency";
pub const IMPACT: &str = "impact";
pub const SAFETY: &str = "safety";
pub const WORST_TIME: &str = "worst_time";

/// Name of the flow built for `category`.
pub fn flow_name(category: &DiaryCategory) -> String {
    format!("diary:{}", category.id)
}

/// Builds the pruned diary flow for one category.
pub fn definition_for(category: &DiaryCategory) -> FlowDefinition {
    let has_symptoms = Condition::count_above(SYMPTOMS, 0, [NO_SYMPTOMS]);

    let symptom_options: Vec<OptionDefinition> = category
        .symptoms
        .iter()
        .map(|s| {
            let option = OptionDefinition::new(&s.id, &s.label);
            if s.id == NO_SYMPTOMS {
                option.exclusive()
            } else {
                option
            }
        })
        .chain(std::iter::once(OptionDefinition::new(OTHER_SYMPTOM, "Other")))
        .collect();
    let troublesome_options: Vec<OptionDefinition> = symptom_options
        .iter()
        .filter(|o| !o.exclusive)
        .cloned()
        .collect();

    let mut steps = vec![
        StepDefinition::new(SYMPTOMS, "What did you experience?", StepKind::MultiSelect)
            .with_helper("Select all that apply")
            .with_options(symptom_options),
        StepDefinition::new(
            OTHER_TEXT,
            "Describe the other symptom",
            StepKind::Text { max_len: 120 },
        )
        .with_helper("Describe your symptom...")
        .with_condition(Condition::contains(SYMPTOMS, OTHER_SYMPTOM)),
        StepDefinition::new(
            TROUBLESOME,
            "Which ONE is most troublesome?",
            StepKind::SingleSelect,
        )
        .with_helper("Pick the one that bothers you most")
        .with_options(troublesome_options)
        .with_options_from(SYMPTOMS)
        .with_condition(Condition::count_above(SYMPTOMS, 1, [NO_SYMPTOMS]))
        .with_auto_answer(AutoAnswer::SoleSelection {
            from: SYMPTOMS.to_string(),
            ignoring: vec![NO_SYMPTOMS.to_string()],
        }),
        StepDefinition::new(FREQUENCY, "How often?", StepKind::SingleSelect)
            .with_helper("Rate the frequency")
            .with_options(scale_options(&FREQUENCY_SCALE))
            .with_condition(has_symptoms.clone()),
        StepDefinition::new(IMPACT, "How much did it affect your day?", StepKind::SingleSelect)
            .with_helper("Rate the impact")
            .with_options(scale_options(&IMPACT_SCALE))
            .with_condition(has_symptoms.clone()),
    ];

    if let Some(message) = category
        .safety_message
        .as_ref()
        .filter(|_| category.has_safety_notice())
    {
        steps.push(
            StepDefinition::new(SAFETY, "Important", StepKind::Notice)
                .with_helper(message.clone())
                .with_condition(Condition::All(vec![
                    has_symptoms.clone(),
                    Condition::contains_any(SYMPTOMS, category.safety_triggers.iter().cloned()),
                ])),
        );
    }

    if category.has_worst_time() {
        steps.push(
            StepDefinition::new(WORST_TIME, "When is it worst?", StepKind::SingleSelect)
                .with_helper("Select the time")
                .with_options(
                    category
                        .worst_time_options
                        .iter()
                        .map(|label| OptionDefinition::new(slug(label), label))
                        .collect(),
                )
                .with_condition(has_symptoms),
        );
    }

    FlowDefinition::single_phase(flow_name(category), steps).with_completion(Interstitial::new(
        "Saved ✅",
        format!("{} diary saved.", category.title),
    ))
}

/// The typed result of a finished diary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub category: String,
    /// Picked symptoms, without "none". Empty for a symptom-free day.
    pub symptoms: Vec<String>,
    pub most_troublesome: Option<String>,
    pub frequency: Option<u8>,
    pub impact: Option<u8>,
    /// Label of the worst time of day, as shown to the user.
    pub worst_time: Option<String>,
    /// The user's description of the "Other" symptom.
    pub other_description: Option<String>,
    pub safety_flagged: bool,
}

impl DiaryEntry {
    /// Extracts the entry from the answers of a finished diary. Answers of
    /// steps that are hidden under the final symptoms are left out, so a path
    /// abandoned by going back leaves no trace.
    pub fn from_answers(category: &DiaryCategory, answers: &AnswerMap) -> Self {
        let definition = definition_for(category);
        let shown = |step_id: &str| {
            definition
                .phases
                .iter()
                .flat_map(|phase| &phase.steps)
                .find(|step| step.id == step_id)
                .is_some_and(|step| sequence::is_visible(step, answers))
        };

        let symptoms: Vec<String> = answers
            .selection(SYMPTOMS)
            .map(|set| set.iter().filter(|id| *id != NO_SYMPTOMS).cloned().collect())
            .unwrap_or_default();

        let single = |step: &str| {
            answers
                .selection(step)
                .filter(|_| shown(step))
                .and_then(|set| set.iter().next().cloned())
        };
        let scale = |step: &str| single(step).and_then(|id| id.parse::<u8>().ok());

        let most_troublesome = if shown(TROUBLESOME) {
            single(TROUBLESOME).filter(|id| symptoms.contains(id))
        } else {
            symptoms.iter().exactly_one().ok().cloned()
        };
        let worst_time = single(WORST_TIME).and_then(|id| {
            category
                .worst_time_options
                .iter()
                .find(|label| slug(label) == id)
                .cloned()
        });
        let other_description = answers
            .text(OTHER_TEXT)
            .filter(|_| shown(OTHER_TEXT))
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let safety_flagged = category.has_safety_notice()
            && symptoms.iter().any(|s| category.safety_triggers.contains(s));

        Self {
            category: category.id.clone(),
            most_troublesome,
            frequency: scale(FREQUENCY),
            impact: scale(IMPACT),
            worst_time,
            other_description,
            safety_flagged,
            symptoms,
        }
    }

    pub fn is_symptom_free(&self) -> bool {
        self.symptoms.is_empty()
    }
}

fn scale_options(scale: &[(u8, &str)]) -> Vec<OptionDefinition> {
    scale
        .iter()
        .map(|(value, label)| OptionDefinition::new(value.to_string(), *label))
        .collect()
}

/// "Early morning" → "early_morning", "Mid-day" → "mid_day".
fn slug(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
