//! Aggregates the rendering submodules.

pub mod app;
pub mod context;
pub mod renderer;
pub mod textures;
pub mod ui;
