use petanikopiku_onboarding::cli::{BANNER, CliApp};
use petanikopiku_onboarding::config::OnboardingConfig;
use petanikopiku_onboarding::error::Error;
use petanikopiku_onboarding::llm::LlmBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match OnboardingConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("  export GEMINI_API_KEY=...   (or PETANIKOPIKU_OFFLINE=1)");
            return Err(Error::from(e).into());
        }
    };

    eprintln!("{} v{}", BANNER, env!("CARGO_PKG_VERSION"));
    match config.llm.backend {
        LlmBackend::Gemini => eprintln!("   Model: {}", config.llm.model),
        LlmBackend::Unavailable => eprintln!("   Model: offline (template summary)"),
    }
    eprintln!("   Admin WhatsApp: {}\n", config.recipient);

    CliApp::from_config(&config)?.run().await
}
