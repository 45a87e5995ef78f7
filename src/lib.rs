//! # Stepwise - Conditional Wizard Flow Engine
//!
//! **Stepwise** drives multi-step questionnaires: ordered steps grouped into
//! phases, steps that only appear when earlier answers call for them,
//! celebration screens between phases, progress that follows the visible
//! sequence, and resume tokens that let a flow hand the user to another flow
//! and pick up exactly where it left off.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic. It operates on a canonical model of a
//! "flow definition". The primary workflow is:
//!
//! 1.  **Describe the flow**: Build a `FlowDefinition` in code, load one from JSON, or implement `IntoFlow` for your own content format.
//! 2.  **Compile**: `FlowCompiler::builder(definition).build().compile()` validates identifiers, options, slider ranges and condition references, producing an immutable, cheaply clonable `CompiledFlow`.
//! 3.  **Run**: Create a `FlowController` for each user session and feed it the user's actions (`select`, `set_number`, `advance`, `back`, ...). Every call returns a typed `Result`.
//!
//! ## Quick Start
//!
//! ```rust
//! use stepwise::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let definition = FlowDefinition::single_phase(
//!         "intake",
//!         vec![
//!             StepDefinition::new("meds", "Do you take medication?", StepKind::SingleSelect)
//!                 .with_options(vec![
//!                     OptionDefinition::new("yes", "Yes"),
//!                     OptionDefinition::new("no", "No"),
//!                 ]),
//!             StepDefinition::new("which", "Which ones?", StepKind::Text { max_len: 80 })
//!                 .with_condition(Condition::contains("meds", "yes")),
//!             StepDefinition::new("energy", "How is your energy?", StepKind::Slider {
//!                 min: 0.0,
//!                 max: 10.0,
//!                 default: 5.0,
//!             }),
//!         ],
//!     );
//!
//!     let flow = FlowCompiler::builder(definition).build().compile()?;
//!     let mut controller = FlowController::start(flow, FlowConfig::default());
//!
//!     controller.select("no")?;
//!     // "which" is hidden, so continue lands on "energy".
//!     controller.advance()?;
//!     assert_eq!(controller.current_step().map(|s| s.id.as_str()), Some("energy"));
//!     assert_eq!(controller.progress(), Progress::new(2, 2));
//!
//!     controller.set_number(7.0)?;
//!     assert_eq!(controller.advance()?, Transition::Completed(Completion::Finished));
//!     Ok(())
//! }
//! ```
//!
//! The built-in onboarding, daily check-in, diary and medication content lives
//! in [`catalog`] and [`flows`].

pub mod answers;
pub mod catalog;
pub mod compiler;
pub mod condition;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod flows;
pub mod navigation;
pub mod prelude;
pub mod progress;
pub mod resume;
pub mod script;
pub mod sequence;
pub mod trace;
