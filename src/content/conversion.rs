use super::definition::FlowDefinition;
use crate::error::ContentConversionError;

/// A trait for custom content formats that can be converted into a `FlowDefinition`.
///
/// Content tables are authored outside the engine (CMS exports, JSON files,
/// hand-written Rust). Implementing this trait on your own structs provides
/// the translation layer into the canonical definition the compiler accepts.
///
/// # Example
///
/// ```rust,no_run
/// use stepwise::prelude::*;
/// use stepwise::error::ContentConversionError;
///
/// struct Question { key: String, text: String, choices: Vec<String> }
/// struct Survey { questions: Vec<Question> }
///
/// impl IntoFlow for Survey {
///     fn into_flow(self) -> Result<FlowDefinition, ContentConversionError> {
///         let steps = self
///             .questions
///             .into_iter()
///             .map(|q| {
///                 let options = q
///                     .choices
///                     .iter()
///                     .map(|c| OptionDefinition::new(c.to_lowercase(), c.clone()))
///                     .collect();
///                 StepDefinition::new(q.key, q.text, StepKind::SingleSelect).with_options(options)
///             })
///             .collect();
///         Ok(FlowDefinition::single_phase("survey", steps))
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into a flow definition.
    fn into_flow(self) -> Result<FlowDefinition, ContentConversionError>;
}
