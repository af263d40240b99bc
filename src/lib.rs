pub mod assembly;
pub mod check;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod exchange;
pub mod markup;
pub mod persist;
pub mod ports;
pub mod starter;
pub mod state;
pub mod substitute;
pub mod surface;
pub mod template;
pub mod token;

#[cfg(any(test, feature = "test-support"))]
pub mod test_helpers;

pub use assembly::{Assembly, assemble};
pub use check::{CheckResult, check_all};
pub use clipboard::{Clipboard, ClipboardError, CopyOutcome, WriterClipboard};
pub use config::Config;
pub use controller::{Controller, ControllerError, ControllerOptions, ControllerState, Event};
pub use exchange::{ExportDocument, ImportError, parse_import};
pub use persist::{FileStore, KeyValueStore, MemoryStore, Persistence};
pub use ports::{MemoryPorts, Notice, OutputKind, OutputPorts};
pub use state::{AgentProfile, FieldValues, SessionState, Theme};
pub use substitute::{Resolved, reconcile_rich_surface, resolve_placeholders};
pub use surface::{MarkupSurface, RichSurface};
pub use template::{Field, Template, TemplateLibrary};
