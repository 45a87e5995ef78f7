use crate::resume::ResumeToken;
use serde::{Deserialize, Serialize};

/// A screen of the host application, with its typed parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Onboarding {
        #[serde(default)]
        resume: Option<ResumeToken>,
    },
    OnboardingComplete,
    MedicationSetup {
        /// The onboarding position to return to, when entered as a detour.
        #[serde(default)]
        resume: Option<ResumeToken>,
    },
    DiaryCheckin {
        category: String,
    },
    DailyCheckin,
    MedicationLog,
    Home,
    Diaries,
    Tools,
    Profile,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Onboarding { .. } => "onboarding",
            Route::OnboardingComplete => "onboarding_complete",
            Route::MedicationSetup { .. } => "medication_setup",
            Route::DiaryCheckin { .. } => "diary_checkin",
            Route::DailyCheckin => "daily_checkin",
            Route::MedicationLog => "medication_log",
            Route::Home => "home",
            Route::Diaries => "diaries",
            Route::Tools => "tools",
            Route::Profile => "profile",
        }
    }

    /// Top-level tabs replace the stack instead of stacking on it.
    pub fn is_tab(&self) -> bool {
        matches!(self, Route::Home | Route::Diaries | Route::Tools | Route::Profile)
    }
}

/// A navigation stack. The root route can be replaced but never popped.
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(root: Route) -> Self {
        Self { stack: vec![root] }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty.
        &self.stack[self.stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn routes(&self) -> &[Route] {
        &self.stack
    }

    pub fn push(&mut self, route: Route) {
        tracing::debug!(from = self.current().name(), to = route.name(), "push route");
        self.stack.push(route);
    }

    /// Pops the current route. `None` on the root.
    pub fn pop(&mut self) -> Option<Route> {
        if self.stack.len() == 1 {
            return None;
        }
        let popped = self.stack.pop();
        tracing::debug!(to = self.current().name(), "pop route");
        popped
    }

    /// Swaps the current route, returning the old one.
    pub fn replace(&mut self, route: Route) -> Route {
        tracing::debug!(from = self.current().name(), to = route.name(), "replace route");
        let last = self.stack.len() - 1;
        std::mem::replace(&mut self.stack[last], route)
    }

    /// Clears the stack down to a new root.
    pub fn reset(&mut self, root: Route) {
        tracing::debug!(to = root.name(), depth = self.stack.len(), "reset navigation");
        self.stack.clear();
        self.stack.push(root);
    }

    /// Opens a tab: tabs reset the stack, everything else is pushed.
    pub fn open(&mut self, route: Route) {
        if route.is_tab() {
            self.reset(route);
        } else {
            self.push(route);
        }
    }
}
