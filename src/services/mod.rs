//! Service layer: prompt assembly, orchestration and session management.

pub mod orchestrator;
pub mod prompt_builder;
pub mod session_registry;

pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use prompt_builder::PromptBuilder;
pub use session_registry::SessionRegistry;
