pub mod config;
pub mod health;
pub mod models;
pub mod pipeline;
pub mod records;

use tracing_subscriber::EnvFilter;

use config::AnalyzerConfig;
use pipeline::interaction::{AnalysisError, GroqClient, InteractionAnalyzer};
use records::JsonRecordStore;

/// Install the global tracing subscriber. RUST_LOG overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Wire the JSON record store and the remote inference client into an analyzer.
pub fn build_analyzer(config: &AnalyzerConfig) -> Result<InteractionAnalyzer, AnalysisError> {
    let records = JsonRecordStore::new(config.data_dir.clone());
    let client = GroqClient::from_config(config)?;

    tracing::info!(
        model = %config.llm_model,
        data_dir = %config.data_dir.display(),
        "Interaction analyzer ready"
    );

    Ok(InteractionAnalyzer::new(Box::new(records), Box::new(client)))
}
