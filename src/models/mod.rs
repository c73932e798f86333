//! Data model module.
//!
//! Everything the editor persists or projects lives here:
//! - `scene` - scenes, layers, items, dialogue and choices
//! - `project` - JSON import/export of a whole story
//! - `assets` - content-addressed image storage
//! - `graph` - choice-to-edge projection for the graph view
//! - `settings` - editor preferences (TOML)
//! - `sample` - the built-in starter story

pub mod assets;
pub mod graph;
pub mod project;
pub mod sample;
pub mod scene;
pub mod settings;
