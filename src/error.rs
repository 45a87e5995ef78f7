use thiserror::Error;

/// Errors that can occur while validating a flow definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Flow '{flow}' contains an element with an empty identifier ({context})")]
    EmptyIdentifier { flow: String, context: String },

    #[error("Step '{0}' is defined more than once")]
    DuplicateStep(String),

    #[error("Step '{step_id}' defines option '{option_id}' more than once")]
    DuplicateOption { step_id: String, option_id: String },

    #[error("Step '{0}' is a selection step but declares no options")]
    MissingOptions(String),

    #[error("Slider step '{step_id}' has an invalid range: min {min}, max {max}, default {default}")]
    InvalidSliderRange {
        step_id: String,
        min: f64,
        max: f64,
        default: f64,
    },

    #[error("The condition on step '{step_id}' references unknown step '{referenced}'")]
    UnknownConditionStep { step_id: String, referenced: String },

    #[error(
        "The condition on step '{step_id}' references step '{referenced}', which only appears later in the flow"
    )]
    ForwardReference { step_id: String, referenced: String },

    #[error("Step '{step_id}' triggers a detour on unknown option '{option_id}'")]
    UnknownDetourOption { step_id: String, option_id: String },

    #[error("Step '{step_id}' derives its answer or options from unknown step '{source_id}'")]
    UnknownSourceStep { step_id: String, source_id: String },
}

/// Errors raised by a running flow controller when an operation is not
/// permitted in its current state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("The flow has already completed and accepts no further operations")]
    Finished,

    #[error("Operation '{operation}' is not valid while the flow is {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    #[error("Step '{step_id}' has no selectable option '{option_id}'")]
    UnknownOption { step_id: String, option_id: String },

    #[error("Step '{step_id}' does not accept {expected} input")]
    KindMismatch {
        step_id: String,
        expected: &'static str,
    },

    #[error("Value {value} is outside the range {min}..={max} of step '{step_id}'")]
    OutOfRange {
        step_id: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Text for step '{step_id}' exceeds {max_len} characters")]
    TextTooLong { step_id: String, max_len: usize },

    #[error("Step '{0}' cannot be continued until it has an answer")]
    CannotContinue(String),

    #[error("Skipping is not allowed at this point of the flow")]
    SkipNotAllowed,
}

/// Errors that can occur while encoding or decoding a resume token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Failed to encode resume token: {0}")]
    Encode(String),

    #[error("Failed to decode resume token: {0}")]
    Decode(String),
}

/// Errors that can occur while loading a configuration or script file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when converting a custom content format into a `FlowDefinition`.
#[derive(Error, Debug, Clone)]
pub enum ContentConversionError {
    #[error("Invalid custom content: {0}")]
    ValidationError(String),
}

/// Errors raised while handing a flow over to an external one and back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HandoffError {
    #[error("Expected a detour transition, got {0}")]
    NotADetour(String),

    #[error("The external flow has not completed yet")]
    NotFinished,

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
