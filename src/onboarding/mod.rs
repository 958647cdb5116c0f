//! Seller onboarding — the multi-step registration flow.
//!
//! A seller walks Profile → Store → Verification → Summary, filling in a
//! single in-memory `RegistrationData`. At any step they can ask the
//! assistant for help; on Summary the record is turned into a WhatsApp
//! message for the platform admin. Nothing is persisted.

pub mod assistant;
pub mod dispatch;
pub mod form;
pub mod media;
pub mod model;
pub mod prompts;
pub mod session;
pub mod state;

pub use assistant::{AssistantConfig, AssistantGateway, LlmAssistant, SummaryComposer};
pub use dispatch::{DispatchOutcome, Dispatcher, PrintOpener, SystemOpener, UriOpener};
pub use form::{FieldId, FieldKind, FieldSpec, StepStatus};
pub use media::ImageSelection;
pub use model::{
    KtpPhoto, ProfilePatch, RegistrationData, RegistrationSnapshot, SecurityVerification,
    SellerProfile, StoreDetails, StorePatch, VerificationPatch,
};
pub use session::{AssistTask, OnboardingSession, SubmitTask};
pub use state::{Step, StepController};
