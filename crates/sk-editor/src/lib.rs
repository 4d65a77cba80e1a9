//! Interactive editing on top of `sk-core`: the session (document,
//! selection, history), pointer gestures, keyboard shortcuts and the
//! debounced auto-save observer.

#[cfg(feature = "autosave")]
pub mod autosave;
pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use history::{History, HistoryEntry};
pub use input::{InputEvent, Modifiers};
pub use session::{EditorSession, Mutation, SessionConfig};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{GestureController, GestureOutcome, GesturePreview, Interaction, PointerCapture};
