//! WhatsApp deep-link dispatch.
//!
//! The summary is embedded in a `wa.me` link and handed to an opener.
//! There is no delivery receipt: a dispatch succeeds once the open was
//! attempted.

use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::DispatchError;

/// Admin number registrations are sent to.
pub const DEFAULT_RECIPIENT: &str = "+6287725071919";

/// Characters left as-is by ECMAScript `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode text for use as a single query parameter value.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Build `https://wa.me/<digits>?text=<encoded>`. Only the first `+` of the
/// recipient is removed.
pub fn build_dispatch_uri(recipient: &str, text: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        recipient.replacen('+', "", 1),
        encode_component(text)
    )
}

/// Something that can open a URI on the seller's behalf.
#[async_trait]
pub trait UriOpener: Send + Sync {
    async fn open(&self, uri: &str) -> Result<(), DispatchError>;
}

/// Opens links with the platform's default handler.
pub struct SystemOpener;

impl SystemOpener {
    fn command(uri: &str) -> (&'static str, Vec<String>) {
        if cfg!(target_os = "macos") {
            ("open", vec![uri.to_string()])
        } else if cfg!(target_os = "windows") {
            (
                "rundll32",
                vec!["url.dll,FileProtocolHandler".to_string(), uri.to_string()],
            )
        } else {
            ("xdg-open", vec![uri.to_string()])
        }
    }
}

#[async_trait]
impl UriOpener for SystemOpener {
    async fn open(&self, uri: &str) -> Result<(), DispatchError> {
        let (program, args) = Self::command(uri);
        let status = tokio::process::Command::new(program)
            .args(&args)
            .status()
            .await
            .map_err(|e| DispatchError::LaunchFailed {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(DispatchError::LaunchFailed {
                program: program.to_string(),
                reason: format!("exited with {}", status),
            });
        }
        Ok(())
    }
}

/// Prints the link so the seller can open it manually.
pub struct PrintOpener;

#[async_trait]
impl UriOpener for PrintOpener {
    async fn open(&self, uri: &str) -> Result<(), DispatchError> {
        println!("\nBuka tautan berikut untuk mengirim ke WhatsApp Admin:\n{}\n", uri);
        Ok(())
    }
}

/// What happened when a summary was dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub uri: String,
    pub text: String,
    /// Whether the opener reported success. Delivery is never confirmed.
    pub opened: bool,
}

/// Sends summaries to a fixed recipient.
pub struct Dispatcher {
    recipient: String,
    opener: Arc<dyn UriOpener>,
}

impl Dispatcher {
    pub fn new(recipient: impl Into<String>, opener: Arc<dyn UriOpener>) -> Self {
        Self {
            recipient: recipient.into(),
            opener,
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// Build the link for `text` and open it. Open failures are logged,
    /// not returned.
    pub async fn dispatch(&self, text: &str) -> DispatchOutcome {
        let uri = build_dispatch_uri(&self.recipient, text);
        let opened = match self.opener.open(&uri).await {
            Ok(()) => {
                tracing::info!(uri_len = uri.len(), "Dispatch link opened");
                true
            }
            Err(e) => {
                tracing::warn!("Failed to open dispatch link: {}", e);
                false
            }
        };

        DispatchOutcome {
            uri,
            text: text.to_string(),
            opened,
        }
    }
}
