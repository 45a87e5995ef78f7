//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! stepwise crate.
//!
//! # Example
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! # fn run_example() -> Result<(), Box<dyn std::error::Error>> {
//! let flow = compile(stepwise::catalog::onboarding())?;
//! let mut controller = FlowController::start(flow, FlowConfig::default());
//!
//! controller.select("patient")?;
//! controller.advance()?;
//! println!("Progress: {}/{}", controller.progress().current, controller.progress().total);
//! # Ok(())
//! # }
//! # run_example().unwrap();
//! ```

// Definitions and compilation
pub use crate::compiler::{CompiledFlow, FlowCompiler, Position, compile};
pub use crate::content::{
    AutoAnswer, DetourTrigger, FlowDefinition, Interstitial, IntoFlow, OptionDefinition,
    PhaseDefinition, StepDefinition, StepKind,
};

// Answers and conditions
pub use crate::answers::{AnswerMap, AnswerValue};
pub use crate::condition::{Condition, ConditionTrace, Predicate};

// Running flows
pub use crate::config::{BackAtStart, FlowConfig, SkipPolicy};
pub use crate::controller::{AutoAdvance, Completion, FlowController, FlowState, Transition};
pub use crate::progress::Progress;
pub use crate::resume::ResumeToken;

// Error types
pub use crate::error::{
    ConfigError, ContentConversionError, DefinitionError, FlowError, HandoffError, TokenError,
};

// Trace formatting
pub use crate::trace::TraceFormatter;
