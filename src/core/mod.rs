//! Core modules for the Sovereign agent

pub mod psychology;
pub mod response_parser;
pub mod prompt;
pub mod fallback;
pub mod generation;
pub mod gemini;
pub mod composer;
pub mod narrator;
pub mod session;
pub mod api;

pub use psychology::{derive_phase, PsychologyEngine, Preset};
pub use response_parser::{ResponseParser, ParsedResponse, default_suggestions};
pub use prompt::system_instruction;
pub use fallback::{canned_reply, detect_product};
pub use generation::{Generation, GenerationRequest, GenerationService, OfflineService};
pub use gemini::GeminiClient;
pub use composer::{ComposeRequest, ResponseComposer, recover};
pub use narrator::{ScanNarrator, ScanSink};
pub use session::{Session, ShadowReport};
pub use api::{create_router, run_server};
