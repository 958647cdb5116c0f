//! Terminal front-end — a stdin/stdout REPL that drives one onboarding
//! session.
//!
//! Field input is `<number> <value>` (or `<number>=<value>`) against the
//! fields of the current step; everything else is a slash command.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::config::OnboardingConfig;
use crate::llm::create_provider;
use crate::onboarding::form::{self, StepStatus};
use crate::onboarding::{
    AssistTask, AssistantGateway, Dispatcher, LlmAssistant, OnboardingSession, PrintOpener, Step,
    SummaryComposer, SystemOpener, UriOpener,
};

pub const BANNER: &str = "☕ Petanikopiku — Registrasi Mitra Strategis Penjual Kopi";

const USAGE: &str = "\
Perintah:
  <nomor> <isi>     isi kolom pada langkah ini (contoh: 1 Budi Santoso)
  /lanjut           lanjut ke langkah berikutnya
  /kembali          kembali ke langkah sebelumnya
  /bantuan          tanya AI Asisten tentang langkah ini
  /tutup            tutup jawaban AI Asisten
  /foto <path>      unggah foto KTP
  /hapus-foto       hapus foto KTP
  /kirim            kirim ke WhatsApp Admin (langkah Konfirmasi)
  /lihat            tampilkan langkah ini lagi
  /keluar           keluar tanpa mengirim";

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetField { index: usize, value: String },
    Next,
    Back,
    Assist,
    Dismiss,
    Photo(PathBuf),
    ClearPhoto,
    Submit,
    Show,
    Usage,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix('/') {
            let (name, arg) = match rest.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (rest, ""),
            };
            return match name.to_lowercase().as_str() {
                "lanjut" | "next" => Command::Next,
                "kembali" | "back" => Command::Back,
                "bantuan" | "ai" => Command::Assist,
                "tutup" | "dismiss" => Command::Dismiss,
                "foto" | "photo" if !arg.is_empty() => Command::Photo(PathBuf::from(arg)),
                "hapus-foto" | "clear-photo" => Command::ClearPhoto,
                "kirim" | "submit" => Command::Submit,
                "lihat" | "show" => Command::Show,
                "?" | "perintah" | "help" => Command::Usage,
                "keluar" | "quit" | "exit" => Command::Quit,
                _ => Command::Unknown(line.to_string()),
            };
        }

        let (number, value) = match line.split_once(|c: char| c == '=' || c.is_whitespace()) {
            Some((number, value)) => (number, value.trim()),
            None => (line, ""),
        };
        match number.parse::<usize>() {
            Ok(index) if index > 0 => Command::SetField {
                index,
                value: value.to_string(),
            },
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Result of handling one command.
pub struct Reply {
    pub text: String,
    /// Started assistant request, to be awaited by the caller.
    pub assist: Option<AssistTask>,
    pub exit: bool,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            assist: None,
            exit: false,
        }
    }
}

fn status_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Active => "▶",
        StepStatus::Completed => "✓",
        StepStatus::Pending => "○",
    }
}

/// Render the current step: stepper, heading, and fields or review rows.
pub fn render_step(session: &OnboardingSession) -> String {
    let step = session.current_step();
    let data = session.data();
    let mut out = String::new();

    let stepper: Vec<String> = form::progress(step)
        .iter()
        .map(|p| format!("{} {}", status_marker(p.status), p.label))
        .collect();
    out.push_str(&stepper.join("   "));
    out.push_str(&format!("\n\n== {} ==\n", form::step_heading(step)));

    for (i, field) in form::fields_for(step).enumerate() {
        let value = field.id.value(data);
        if value.is_empty() {
            out.push_str(&format!("{:>2}. {}: ({})\n", i + 1, field.label, field.placeholder));
        } else {
            out.push_str(&format!("{:>2}. {}: {}\n", i + 1, field.label, value));
        }
    }

    match step {
        Step::Verification => {
            match data.verification.ktp_photo() {
                Some(image) => out.push_str(&format!(
                    "    Foto KTP Asli: terunggah ({}), ketik /hapus-foto untuk menghapus\n",
                    image.file_name
                )),
                None => out.push_str("    Foto KTP Asli: belum diunggah, ketik /foto <path>\n"),
            }
            out.push_str("    *Data Anda aman dan hanya digunakan untuk verifikasi mitra internal.\n");
        }
        Step::Summary => {
            for (label, value) in form::review_rows(data) {
                out.push_str(&format!("  {label:<16}{value}\n"));
            }
            out.push_str(
                "\nInformasi Toko Anda akan dikirimkan langsung ke admin melalui WhatsApp \
                 untuk verifikasi instan. Ketik /kirim.\n",
            );
        }
        Step::Profile | Step::Store => {}
    }

    out
}

/// Wait for an assistant answer in the background and hand it to the REPL.
pub fn forward_assist(task: AssistTask, tx: mpsc::UnboundedSender<String>) {
    tokio::spawn(async move {
        let _ = tx.send(task.wait().await);
    });
}

/// One interactive registration.
pub struct CliApp {
    session: OnboardingSession,
    gateway: Arc<dyn AssistantGateway>,
    composer: Arc<dyn SummaryComposer>,
    dispatcher: Dispatcher,
}

impl CliApp {
    pub fn new(
        gateway: Arc<dyn AssistantGateway>,
        composer: Arc<dyn SummaryComposer>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            session: OnboardingSession::new(),
            gateway,
            composer,
            dispatcher,
        }
    }

    /// Wire the LLM-backed assistant and the dispatcher described by `config`.
    pub fn from_config(config: &OnboardingConfig) -> crate::error::Result<Self> {
        let llm = create_provider(&config.llm)?;
        let assistant = Arc::new(LlmAssistant::new(llm, config.assistant.clone()));

        let opener: Arc<dyn UriOpener> = if config.open_links {
            Arc::new(SystemOpener)
        } else {
            Arc::new(PrintOpener)
        };
        let dispatcher = Dispatcher::new(config.recipient.clone(), opener);

        Ok(Self::new(assistant.clone(), assistant, dispatcher))
    }

    pub fn session(&self) -> &OnboardingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut OnboardingSession {
        &mut self.session
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::SetField { index, value } => {
                let step = self.session.current_step();
                let field = index
                    .checked_sub(1)
                    .and_then(|i| form::fields_for(step).nth(i));
                match field {
                    Some(field) => {
                        self.session.set_field(field.id, &value);
                        Reply::text(format!(
                            "{}: {}",
                            field.label,
                            field.id.value(self.session.data())
                        ))
                    }
                    None => Reply::text(format!("Tidak ada kolom nomor {index} di langkah ini.")),
                }
            }
            Command::Next => {
                self.session.advance();
                Reply::text(render_step(&self.session))
            }
            Command::Back => {
                self.session.retreat();
                Reply::text(render_step(&self.session))
            }
            Command::Show => Reply::text(render_step(&self.session)),
            Command::Assist => {
                if self.session.is_ai_loading() {
                    return Reply::text("AI Asisten masih menyiapkan jawaban...");
                }
                let task = self.session.begin_assist(Arc::clone(&self.gateway));
                Reply {
                    text: "⏳ AI Asisten sedang menyiapkan jawaban...".to_string(),
                    assist: Some(task),
                    exit: false,
                }
            }
            Command::Dismiss => {
                self.session.dismiss_assistant_response();
                Reply::text("Jawaban AI Asisten ditutup.")
            }
            Command::Photo(path) => {
                if self.session.attach_photo_from_path(&path).await {
                    Reply::text("Foto KTP terunggah.")
                } else {
                    Reply::text(format!("Foto {} tidak dapat diunggah.", path.display()))
                }
            }
            Command::ClearPhoto => {
                self.session.clear_ktp_photo();
                Reply::text("Foto KTP dihapus.")
            }
            Command::Submit => {
                if self.session.current_step() != Step::Summary {
                    return Reply::text("Selesaikan semua langkah hingga Konfirmasi sebelum mengirim.");
                }
                if self.session.is_submitting() {
                    return Reply::text("Mengirim...");
                }
                let outcome = self
                    .session
                    .submit(Arc::clone(&self.composer), &self.dispatcher)
                    .await;
                let text = if outcome.opened {
                    format!("Pendaftaran dikirim ke WhatsApp Admin.\n\n{}", outcome.text)
                } else {
                    format!(
                        "Tautan WhatsApp tidak dapat dibuka otomatis. Buka secara manual:\n{}",
                        outcome.uri
                    )
                };
                Reply {
                    text,
                    assist: None,
                    exit: true,
                }
            }
            Command::Usage => Reply::text(USAGE),
            Command::Quit => Reply {
                text: "Sampai jumpa!".to_string(),
                assist: None,
                exit: true,
            },
            Command::Unknown(line) => {
                Reply::text(format!("Perintah tidak dikenal: {line}. Ketik /? untuk bantuan."))
            }
        }
    }

    /// Apply an assistant answer that arrived while input continued.
    /// Returns the text to show, if any.
    pub fn on_assist_answer(&mut self, text: String) -> Option<String> {
        self.session.finish_assist(text);
        self.session
            .assistant_response()
            .map(|answer| format!("\n🤖 AI Asisten:\n{answer}\n"))
    }

    /// Run the REPL until the seller submits, quits, or closes stdin.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();
        let (assist_tx, mut assist_rx) = mpsc::unbounded_channel::<String>();

        println!("{BANNER}\n\n{USAGE}\n");
        println!("{}", render_step(&self.session));
        eprint!("> ");

        loop {
            tokio::select! {
                Some(text) = assist_rx.recv() => {
                    if let Some(answer) = self.on_assist_answer(text) {
                        println!("{answer}");
                    }
                    eprint!("> ");
                }
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!("Error reading stdin: {}", e);
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        eprint!("> ");
                        continue;
                    }

                    let reply = self.handle(Command::parse(&line)).await;
                    println!("{}", reply.text);
                    if let Some(task) = reply.assist {
                        forward_assist(task, assist_tx.clone());
                    }
                    if reply.exit {
                        break;
                    }
                    eprint!("> ");
                }
            }
        }

        tracing::info!(session_id = %self.session.id(), "Onboarding session ended");
        Ok(())
    }
}
