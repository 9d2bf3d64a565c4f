//! Core types for Sovereign

mod phase;
mod event;
mod psychology;
mod message;
mod log;
mod output;
mod profile;

pub use phase::Phase;
pub use event::EventCode;
pub use psychology::{Psychology, PsychologyPatch};
pub use message::{Message, Sender, Source, ComposedReply, ReplyOrigin};
pub use log::{LogEntry, LogType, DiagnosticLog, LOG_CHANNEL_CAPACITY};
pub use output::{Transition, ExchangeOutput};
pub use profile::{ProductProfile, PhaseResponse};
