use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::tts::{LiveConnector, SynthesisSession};
use crate::core::voices::VoiceCatalog;

/// Application state that can be shared across handlers
///
/// Everything here is read-only after startup; each request builds its own
/// provider session through `synthesizer`.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Voice catalog snapshot loaded at startup
    pub voices: Arc<VoiceCatalog>,
    /// Runs one Gemini Live exchange per request
    pub synthesizer: SynthesisSession,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        voices: VoiceCatalog,
        connector: Arc<dyn LiveConnector>,
    ) -> Arc<Self> {
        let synthesizer = SynthesisSession::new(connector).with_model(config.model());

        Arc::new(Self {
            config,
            voices: Arc::new(voices),
            synthesizer,
        })
    }
}
