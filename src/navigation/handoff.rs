use super::{Navigator, Route};
use crate::compiler::CompiledFlow;
use crate::config::FlowConfig;
use crate::controller::{FlowController, Transition};
use crate::error::HandoffError;
use crate::flows::medication::{Medication, MedicationSetup};
use crate::resume::ResumeToken;

/// Carries an onboarding flow through the medication setup detour.
///
/// The onboarding controller is dropped while the detour runs; everything
/// needed to rebuild it lives in the resume token, which also travels as the
/// `resume` parameter of the pushed [`Route::MedicationSetup`].
#[derive(Debug)]
pub struct MedicationDetour {
    token: ResumeToken,
    setup: MedicationSetup,
}

impl MedicationDetour {
    /// Starts the detour for a [`Transition::Detour`] and pushes the setup
    /// route.
    pub fn begin(transition: Transition, navigator: &mut Navigator) -> Result<Self, HandoffError> {
        let Transition::Detour(token) = transition else {
            return Err(HandoffError::NotADetour(format!("{:?}", transition)));
        };
        let setup = MedicationSetup::standard()?;
        navigator.push(Route::MedicationSetup {
            resume: Some(token.clone()),
        });
        tracing::info!(
            phase = token.phase_index,
            question = token.question_index,
            "medication detour started"
        );
        Ok(Self { token, setup })
    }

    pub fn token(&self) -> &ResumeToken {
        &self.token
    }

    pub fn setup(&self) -> &MedicationSetup {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut MedicationSetup {
        &mut self.setup
    }

    /// Returns to onboarding once the setup has completed. The onboarding
    /// route is replaced with one carrying the token, and the rebuilt
    /// controller lands on the step after the one that triggered the detour.
    pub fn finish(
        self,
        navigator: &mut Navigator,
        onboarding: CompiledFlow,
        config: FlowConfig,
    ) -> Result<(FlowController, Vec<Medication>), HandoffError> {
        if !self.setup.is_complete() {
            return Err(HandoffError::NotFinished);
        }
        let medications = self.setup.into_medications();
        tracing::info!(count = medications.len(), "medication detour finished");
        Ok((Self::return_to(navigator, onboarding, config, self.token), medications))
    }

    /// Leaves the setup early. Onboarding resumes exactly as if it had
    /// finished without records.
    pub fn abandon(
        self,
        navigator: &mut Navigator,
        onboarding: CompiledFlow,
        config: FlowConfig,
    ) -> FlowController {
        tracing::info!("medication detour abandoned");
        Self::return_to(navigator, onboarding, config, self.token)
    }

    fn return_to(
        navigator: &mut Navigator,
        onboarding: CompiledFlow,
        config: FlowConfig,
        token: ResumeToken,
    ) -> FlowController {
        if matches!(navigator.current(), Route::MedicationSetup { .. }) {
            navigator.pop();
        }
        navigator.replace(Route::Onboarding {
            resume: Some(token.clone()),
        });
        FlowController::resume(onboarding, config, token)
    }
}
