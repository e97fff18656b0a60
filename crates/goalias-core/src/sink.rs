//! Observability sink for engine events
//!
//! The engine never logs on its own; callers hand it an [`EventSink`] and
//! decide where the events go.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Something the engine did or declined to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Declarations were partitioned by kind
    Classified {
        module: String,
        types: usize,
        constants: usize,
        functions: usize,
    },
    /// A malformed declaration was dropped by the classifier
    DeclarationSkipped { name: String, reason: String },
    /// A type declaration could not be forwarded and was left out
    ShapeRejected { name: String, reason: String },
    /// A function was reduced to a signature-only stub
    FunctionStubbed { name: String },
    /// The alias module is complete
    Assembled {
        module: String,
        types: usize,
        constants: usize,
        functions: usize,
    },
}

/// Receiver of engine events
pub trait EventSink {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::Classified {
                module,
                types,
                constants,
                functions,
            } => debug!(
                %module,
                types, constants, functions, "classified exported declarations"
            ),
            EngineEvent::DeclarationSkipped { name, reason } => {
                debug!(%name, %reason, "skipped malformed declaration")
            }
            EngineEvent::ShapeRejected { name, reason } => {
                warn!(%name, %reason, "declaration left out of alias package")
            }
            EngineEvent::FunctionStubbed { name } => {
                debug!(%name, "function reduced to an incomplete stub")
            }
            EngineEvent::Assembled {
                module,
                types,
                constants,
                functions,
            } => info!(
                %module,
                types, constants, functions, "assembled alias package"
            ),
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Keeps events in memory (for testing)
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: EngineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
