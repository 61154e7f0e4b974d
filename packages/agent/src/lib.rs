// ABOUTME: Specloom agent library - external collaborator contracts and Claude client
// ABOUTME: Provides turn-generation and SRS-generation traits plus their Anthropic-backed implementations

pub mod error;
pub mod prompts;
pub mod service;
pub mod traits;

pub use error::{AgentError, AgentResult};
pub use service::AgentService;
pub use traits::{ClaudeAgent, SrsAgent, SrsDocument, SrsSection, TurnAgent, TurnReply, TurnRequest};
