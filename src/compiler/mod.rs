use crate::condition::{Condition, Predicate};
use crate::content::FlowDefinition;
use crate::error::DefinitionError;

mod artifact;
mod checks;

pub use artifact::{CompiledFlow, Position};

/// Validates a `FlowDefinition` and turns it into a `CompiledFlow`.
pub struct FlowCompiler<P = Condition> {
    definition: FlowDefinition<P>,
    allow_forward_references: bool,
}

pub struct FlowCompilerBuilder<P = Condition> {
    definition: FlowDefinition<P>,
    allow_forward_references: bool,
}

impl<P: Predicate> FlowCompilerBuilder<P> {
    pub fn new(definition: FlowDefinition<P>) -> Self {
        Self {
            definition,
            allow_forward_references: false,
        }
    }

    /// Permits conditions that read steps declared later in the flow.
    /// Such steps are always unanswered when first evaluated, so this is
    /// off by default.
    pub fn allow_forward_references(mut self, allow: bool) -> Self {
        self.allow_forward_references = allow;
        self
    }

    pub fn build(self) -> FlowCompiler<P> {
        FlowCompiler {
            definition: self.definition,
            allow_forward_references: self.allow_forward_references,
        }
    }
}

impl<P: Predicate> FlowCompiler<P> {
    pub fn builder(definition: FlowDefinition<P>) -> FlowCompilerBuilder<P> {
        FlowCompilerBuilder::new(definition)
    }

    pub fn compile(self) -> Result<CompiledFlow<P>, DefinitionError> {
        checks::check_identifiers(&self.definition)?;
        checks::check_step_shapes(&self.definition)?;
        checks::check_references(&self.definition, self.allow_forward_references)?;

        tracing::debug!(
            flow = %self.definition.name,
            phases = self.definition.phases.len(),
            steps = self.definition.step_count(),
            "compiled flow definition"
        );
        Ok(CompiledFlow::new(self.definition))
    }
}

/// Compiles a definition with default settings.
pub fn compile<P: Predicate>(definition: FlowDefinition<P>) -> Result<CompiledFlow<P>, DefinitionError> {
    FlowCompiler::builder(definition).build().compile()
}
