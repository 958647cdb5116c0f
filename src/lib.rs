//! Petanikopiku seller onboarding — multi-step registration with an AI
//! helper and WhatsApp hand-off to the platform admin.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod onboarding;
