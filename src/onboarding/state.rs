//! Step state machine — tracks which form step the seller is on.

use serde::{Deserialize, Serialize};

/// The steps of the registration form.
///
/// Ordered: Profile → Store → Verification → Summary. Summary is the last
/// data-entry stop; going back from it returns to Verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Profile,
    Store,
    Verification,
    Summary,
}

impl Step {
    /// Every step, in navigation order.
    pub const ALL: [Step; 4] = [Step::Profile, Step::Store, Step::Verification, Step::Summary];

    /// Position in the navigation order (Profile = 0).
    pub fn index(&self) -> usize {
        match self {
            Self::Profile => 0,
            Self::Store => 1,
            Self::Verification => 2,
            Self::Summary => 3,
        }
    }

    /// The step after this one, if any.
    pub fn next(&self) -> Option<Step> {
        match self {
            Self::Profile => Some(Self::Store),
            Self::Store => Some(Self::Verification),
            Self::Verification => Some(Self::Summary),
            Self::Summary => None,
        }
    }

    /// The step before this one, if any.
    pub fn previous(&self) -> Option<Step> {
        match self {
            Self::Profile => None,
            Self::Store => Some(Self::Profile),
            Self::Verification => Some(Self::Store),
            Self::Summary => Some(Self::Verification),
        }
    }

    pub fn is_first(&self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::Profile
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Profile => "profile",
            Self::Store => "store",
            Self::Verification => "verification",
            Self::Summary => "summary",
        };
        write!(f, "{s}")
    }
}

/// Moves the form between steps on explicit user action.
///
/// No transition is gated on field contents: a seller may walk to Summary
/// with every field empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepController {
    current: Step,
}

impl StepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Step {
        self.current
    }

    /// Move forward one step. Stays put on Summary.
    pub fn advance(&mut self) -> Step {
        if let Some(next) = self.current.next() {
            tracing::debug!(from = %self.current, to = %next, "Advancing step");
            self.current = next;
        }
        self.current
    }

    /// Move back one step. Stays put on Profile.
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.current.previous() {
            tracing::debug!(from = %self.current, to = %previous, "Retreating step");
            self.current = previous;
        }
        self.current
    }
}
