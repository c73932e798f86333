//! State management module.
//!
//! This module contains all editor state types and their logic:
//! - `StoryStore` - the scene collection and its mutation operations
//! - `DragSession` - the drag transfer state machine
//! - `SectionCoordinator` - drag-driven sidebar open/close state
//! - `PreviewState` - playable story walk
//! - `GlobalState` - owner of all of the above, fed by the action bus
//!
//! Everything here runs on the logic thread only.

pub mod drag;
pub mod global;
pub mod preview;
pub mod sections;
pub mod store;

// Re-exports for convenient access
pub use drag::DragSession;
pub use global::GlobalState;
pub use preview::PreviewState;
pub use sections::SectionCoordinator;
pub use store::StoryStore;
