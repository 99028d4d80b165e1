//! lector-rdr: click-to-read page narration
//!
//! Lets a host page hand any clicked text element to a speech engine and
//! get back synchronized word/line highlighting, a floating player
//! view, and play/pause/stop/speed/voice controls. The document and the
//! speech engine are both external collaborators reached through
//! traits; everything in between (selection tracking, the playback
//! state machine, highlight layout, the widget view) lives here.

pub mod adapter;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod page;
pub mod selection;
pub mod session;
pub mod widget;

pub use adapter::{ReaderAdapter, SessionEvent};
pub use bridge::{ShellMessage, StatusReply};
pub use config::ReaderConfig;
pub use engine::{
    BoundaryUnit, EngineErrorCode, EngineEvent, NullEngine, SpeechEngine, Utterance, Voice,
};
pub use error::ReaderError;
pub use page::{AffordanceGlyph, MemoryPage, PageAccess};
pub use selection::{ClickEvent, ClickOutcome, ClickTarget, Selection};
pub use session::{PlaybackState, ReaderSession};
pub use widget::WidgetView;
