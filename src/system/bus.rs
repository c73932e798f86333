//! Shared channel infrastructure between the two threads.
//!
//! The `EditorBus` is the only coupling between the render thread and the
//! logic thread: actions flow one way, render snapshots flow back. Actions
//! are delivered strictly in send order, which is what makes the drag
//! protocol's hover stream well defined.

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

use crate::input::events::EditorAction;
use crate::shared::snapshot::RenderState;

/// Window-level events forwarded to the logic thread.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Window resized to new dimensions.
    Resize { width: u32, height: u32 },
    /// Application shutdown requested.
    Quit,
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct EditorBus {
    /// Render → Logic: user actions, including the normalized drag stream.
    pub action_tx: Sender<EditorAction>,
    pub action_rx: Receiver<EditorAction>,

    /// Logic → Render: editor state snapshots.
    pub render_tx: Sender<RenderState>,
    pub render_rx: Receiver<RenderState>,

    /// Render → Logic: window-level events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,
}

impl EditorBus {
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded();
        // Bounded snapshot channel: at most 2 frames queued to cap latency.
        let (render_tx, render_rx) = bounded(2);
        let (sys_tx, sys_rx) = unbounded();

        Self {
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            sys_tx,
            sys_rx,
        }
    }
}

impl Default for EditorBus {
    fn default() -> Self {
        Self::new()
    }
}
