//! Editor action and drag-event vocabulary shared by both threads.

pub mod events;
