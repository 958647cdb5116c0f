//! OnboardingSession — owns the registration record and coordinates step
//! navigation, photo capture, assistant help, and the final dispatch.
//!
//! Remote calls are started with `begin_*`, which sets the matching busy
//! flag and returns a task handle, and applied with `finish_*`. Busy flags
//! are advisory: nothing stops a second call while one is in flight, and a
//! late response is applied even if the seller has moved to another step.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::assistant::{AssistantGateway, SummaryComposer};
use super::dispatch::{DispatchOutcome, Dispatcher};
use super::form::{FieldId, FieldPatch};
use super::media::{self, ImageSelection};
use super::model::{
    KtpPhoto, ProfilePatch, RegistrationData, StorePatch, VerificationPatch,
};
use super::prompts::{ASSISTANT_FALLBACK, ASSISTANT_QUESTION, assistant_context, fallback_summary};
use super::state::{Step, StepController};

/// In-flight assistant request.
pub struct AssistTask {
    step: Step,
    handle: JoinHandle<String>,
}

impl AssistTask {
    /// Step the seller was on when the question was asked.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Wait for the answer. A panicked task resolves to the fallback text.
    pub async fn wait(self) -> String {
        match self.handle.await {
            Ok(text) => text,
            Err(e) => {
                warn!("Assistant task failed: {}", e);
                ASSISTANT_FALLBACK.to_string()
            }
        }
    }
}

/// In-flight summary generation.
///
/// Holds the record as it was when submission started; the local template
/// is filled from that copy if the composer returns nothing.
pub struct SubmitTask {
    data: RegistrationData,
    handle: JoinHandle<Option<String>>,
}

impl SubmitTask {
    /// Wait for the final summary text: the composer's output, or the local
    /// template when it returned nothing.
    pub async fn wait(self) -> String {
        let composed = match self.handle.await {
            Ok(composed) => composed,
            Err(e) => {
                warn!("Summary task failed: {}", e);
                None
            }
        };
        match composed {
            Some(text) => text,
            None => {
                info!("Using local summary template");
                fallback_summary(&self.data)
            }
        }
    }
}

/// One seller's registration session.
#[derive(Debug)]
pub struct OnboardingSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    data: RegistrationData,
    steps: StepController,
    is_ai_loading: bool,
    is_submitting: bool,
    ai_response: Option<String>,
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingSession {
    pub fn new() -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            data: RegistrationData::new(),
            steps: StepController::new(),
            is_ai_loading: false,
            is_submitting: false,
            ai_response: None,
        };
        info!(session_id = %session.id, "Onboarding session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn data(&self) -> &RegistrationData {
        &self.data
    }

    pub fn current_step(&self) -> Step {
        self.steps.current()
    }

    pub fn is_ai_loading(&self) -> bool {
        self.is_ai_loading
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn assistant_response(&self) -> Option<&str> {
        self.ai_response.as_deref()
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn advance(&mut self) -> Step {
        self.steps.advance()
    }

    pub fn retreat(&mut self) -> Step {
        self.steps.retreat()
    }

    // ── Record updates ──────────────────────────────────────────────

    pub fn update_profile(&mut self, patch: ProfilePatch) {
        self.data.update_profile(patch);
    }

    pub fn update_store(&mut self, patch: StorePatch) {
        self.data.update_store(patch);
    }

    pub fn update_verification(&mut self, patch: VerificationPatch) {
        self.data.update_verification(patch);
    }

    /// Set one field from raw input, applying the field's input limit.
    pub fn set_field(&mut self, field: FieldId, raw: &str) {
        let value = field.spec().normalize_input(raw);
        match field.patch(value) {
            FieldPatch::Profile(p) => self.update_profile(p),
            FieldPatch::Store(p) => self.update_store(p),
            FieldPatch::Verification(p) => self.update_verification(p),
        }
    }

    pub fn set_ktp_photo(&mut self, photo: KtpPhoto) {
        self.update_verification(VerificationPatch {
            ktp_photo: Some(Some(photo)),
            ..Default::default()
        });
    }

    pub fn clear_ktp_photo(&mut self) {
        self.update_verification(VerificationPatch {
            ktp_photo: Some(None),
            ..Default::default()
        });
    }

    /// Convert and attach a selected image. On failure the record is left
    /// untouched and `false` is returned.
    pub async fn attach_photo(&mut self, selection: ImageSelection) -> bool {
        match media::capture(selection).await {
            Ok(photo) => {
                info!(session_id = %self.id, file = %photo.image.file_name, "KTP photo attached");
                self.set_ktp_photo(photo);
                true
            }
            Err(e) => {
                warn!(session_id = %self.id, "KTP photo capture failed: {}", e);
                false
            }
        }
    }

    /// Read, convert, and attach an image file. Same failure rules as
    /// [`attach_photo`](Self::attach_photo).
    pub async fn attach_photo_from_path(&mut self, path: &Path) -> bool {
        match ImageSelection::from_path(path).await {
            Ok(selection) => self.attach_photo(selection).await,
            Err(e) => {
                warn!(session_id = %self.id, path = %path.display(), "KTP photo read failed: {}", e);
                false
            }
        }
    }

    // ── Assistant ───────────────────────────────────────────────────

    /// Start a help request for the current step.
    pub fn begin_assist(&mut self, gateway: Arc<dyn AssistantGateway>) -> AssistTask {
        let step = self.current_step();
        let context = assistant_context(step, &self.data);
        self.is_ai_loading = true;
        info!(session_id = %self.id, step = %step, "Asking assistant");

        let handle = tokio::spawn(async move { gateway.ask(ASSISTANT_QUESTION, &context).await });
        AssistTask { step, handle }
    }

    /// Store an assistant answer and clear the loading flag.
    pub fn finish_assist(&mut self, text: String) {
        self.ai_response = Some(text);
        self.is_ai_loading = false;
    }

    /// Ask for help and wait for the answer.
    pub async fn ask_assistant(&mut self, gateway: Arc<dyn AssistantGateway>) -> &str {
        let task = self.begin_assist(gateway);
        let text = task.wait().await;
        self.finish_assist(text);
        self.ai_response.as_deref().unwrap_or_default()
    }

    pub fn dismiss_assistant_response(&mut self) {
        self.ai_response = None;
    }

    // ── Submission ──────────────────────────────────────────────────

    /// Start generating the summary for the whole record.
    pub fn begin_submit(&mut self, composer: Arc<dyn SummaryComposer>) -> SubmitTask {
        let data = self.data.clone();
        let snapshot = data.snapshot();
        self.is_submitting = true;
        info!(session_id = %self.id, step = %self.current_step(), "Submitting registration");

        let handle = tokio::spawn(async move { composer.compose(&snapshot).await });
        SubmitTask { data, handle }
    }

    /// Dispatch the final summary text and clear the submitting flag.
    pub async fn finish_submit(&mut self, text: String, dispatcher: &Dispatcher) -> DispatchOutcome {
        let outcome = dispatcher.dispatch(&text).await;
        self.is_submitting = false;
        info!(
            session_id = %self.id,
            opened = outcome.opened,
            elapsed_secs = (Utc::now() - self.started_at).num_seconds(),
            "Registration dispatched"
        );
        outcome
    }

    /// Compose (or fall back), then dispatch.
    pub async fn submit(
        &mut self,
        composer: Arc<dyn SummaryComposer>,
        dispatcher: &Dispatcher,
    ) -> DispatchOutcome {
        let task = self.begin_submit(composer);
        let text = task.wait().await;
        self.finish_submit(text, dispatcher).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::onboarding::dispatch::{UriOpener, build_dispatch_uri};
    use crate::onboarding::model::RegistrationSnapshot;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct FixedAssistant(String);

    #[async_trait]
    impl AssistantGateway for FixedAssistant {
        async fn ask(&self, _question: &str, context: &str) -> String {
            format!("{} [{}]", self.0, context)
        }
    }

    /// Assistant that waits until released, to observe in-flight state.
    struct GatedAssistant {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl AssistantGateway for GatedAssistant {
        async fn ask(&self, _question: &str, _context: &str) -> String {
            self.gate.notified().await;
            "late answer".to_string()
        }
    }

    struct FixedComposer(Option<String>);

    #[async_trait]
    impl SummaryComposer for FixedComposer {
        async fn compose(&self, _snapshot: &RegistrationSnapshot) -> Option<String> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UriOpener for RecordingOpener {
        async fn open(&self, uri: &str) -> Result<(), DispatchError> {
            self.opened.lock().unwrap().push(uri.to_string());
            Ok(())
        }
    }

    fn dispatcher() -> (Dispatcher, Arc<RecordingOpener>) {
        let opener = Arc::new(RecordingOpener::default());
        (Dispatcher::new("+6287725071919", opener.clone()), opener)
    }

    fn jpeg() -> ImageSelection {
        ImageSelection::new("ktp.jpg", "image/jpeg", vec![0xff, 0xd8])
    }

    #[test]
    fn new_session_is_empty_and_idle() {
        let session = OnboardingSession::new();
        assert_eq!(session.current_step(), Step::Profile);
        assert_eq!(session.data(), &RegistrationData::new());
        assert!(!session.is_ai_loading());
        assert!(!session.is_submitting());
        assert!(session.assistant_response().is_none());
    }

    #[test]
    fn empty_fields_do_not_block_navigation() {
        let mut session = OnboardingSession::new();
        assert_eq!(session.advance(), Step::Store);
        assert_eq!(session.advance(), Step::Verification);
        assert_eq!(session.advance(), Step::Summary);
        assert_eq!(session.advance(), Step::Summary);
        assert_eq!(session.retreat(), Step::Verification);
    }

    #[test]
    fn set_field_routes_to_sub_record() {
        let mut session = OnboardingSession::new();
        session.set_field(FieldId::StoreName, "Kopi Jaya");
        session.set_field(FieldId::KtpNumber, "12345678901234567890");
        assert_eq!(session.data().store.store_name, "Kopi Jaya");
        assert_eq!(session.data().verification.ktp_number, "1234567890123456");
        assert!(session.data().profile.full_name.is_empty());
    }

    #[tokio::test]
    async fn attach_and_clear_photo_keep_pair_in_sync() {
        let mut session = OnboardingSession::new();
        assert!(session.attach_photo(jpeg()).await);
        let verification = &session.data().verification;
        assert!(verification.ktp_photo().is_some());
        assert_eq!(verification.ktp_photo_preview(), Some("data:image/jpeg;base64,/9g="));

        session.clear_ktp_photo();
        let verification = &session.data().verification;
        assert!(verification.ktp_photo().is_none());
        assert!(verification.ktp_photo_preview().is_none());
    }

    #[tokio::test]
    async fn failed_capture_leaves_record_untouched() {
        let mut session = OnboardingSession::new();
        assert!(session.attach_photo(jpeg()).await);
        let before = session.data().clone();

        let not_image = ImageSelection::new("ktp.txt", "text/plain", vec![1]);
        assert!(!session.attach_photo(not_image).await);
        assert!(!session.attach_photo_from_path(Path::new("/nonexistent/ktp.png")).await);
        assert_eq!(session.data(), &before);
    }

    #[tokio::test]
    async fn ask_assistant_uses_current_step_context() {
        let mut session = OnboardingSession::new();
        session.set_field(FieldId::StoreName, "Kopi Jaya");
        session.advance();

        let gateway = Arc::new(FixedAssistant("Halo".to_string()));
        let answer = session.ask_assistant(gateway).await.to_string();
        assert!(answer.starts_with("Halo [Seller is at step store."));
        assert!(answer.contains("Kopi Jaya"));
        assert!(!session.is_ai_loading());
        assert_eq!(session.assistant_response(), Some(answer.as_str()));

        session.dismiss_assistant_response();
        assert!(session.assistant_response().is_none());
    }

    #[tokio::test]
    async fn loading_flag_spans_the_call_and_late_answer_still_applies() {
        let mut session = OnboardingSession::new();
        let gate = Arc::new(Notify::new());
        let task = session.begin_assist(Arc::new(GatedAssistant { gate: gate.clone() }));
        assert_eq!(task.step(), Step::Profile);
        assert!(session.is_ai_loading());

        // Seller keeps going while the request is in flight.
        session.advance();
        session.advance();

        gate.notify_one();
        let text = task.wait().await;
        session.finish_assist(text);
        assert!(!session.is_ai_loading());
        assert_eq!(session.assistant_response(), Some("late answer"));
        assert_eq!(session.current_step(), Step::Verification);
    }

    #[tokio::test]
    async fn submit_uses_composer_text_when_present() {
        let mut session = OnboardingSession::new();
        let (dispatcher, opener) = dispatcher();
        let composer = Arc::new(FixedComposer(Some("A&B".to_string())));

        let outcome = session.submit(composer, &dispatcher).await;
        assert_eq!(outcome.uri, "https://wa.me/6287725071919?text=A%26B");
        assert!(outcome.opened);
        assert!(!session.is_submitting());
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn submit_falls_back_to_template_for_empty_record() {
        let mut session = OnboardingSession::new();
        for _ in 0..3 {
            session.advance();
        }
        let (dispatcher, _opener) = dispatcher();
        let outcome = session
            .submit(Arc::new(FixedComposer(None)), &dispatcher)
            .await;

        assert_eq!(outcome.text, fallback_summary(&RegistrationData::new()));
        assert!(outcome.text.contains("- Nama: \n"));
        assert!(outcome.text.contains("*Verifikasi:*"));
        assert_eq!(
            outcome.uri,
            build_dispatch_uri("+6287725071919", &outcome.text)
        );
    }

    #[tokio::test]
    async fn submitting_flag_spans_composition() {
        let mut session = OnboardingSession::new();
        session.set_field(FieldId::FullName, "Budi");
        let task = session.begin_submit(Arc::new(FixedComposer(None)));
        assert!(session.is_submitting());

        // Edits after submission started do not leak into the template.
        session.set_field(FieldId::FullName, "Andi");
        let text = task.wait().await;
        assert!(text.contains("- Nama: Budi\n"));

        let (dispatcher, _opener) = dispatcher();
        session.finish_submit(text, &dispatcher).await;
        assert!(!session.is_submitting());
    }
}
