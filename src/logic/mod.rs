//! Logic thread: owns the editor state and drains the action bus.
//!
//! The loop runs at a fixed tick rate. Each tick it processes every
//! queued action in arrival order (the drag protocol depends on that
//! ordering), advances the section debounce timers, and ships a fresh
//! render snapshot whenever anything changed.

use std::thread;
use std::time::{Duration, Instant};

use crate::models::settings::EditorSettings;
use crate::state::GlobalState;
use crate::system::bus::{EditorBus, SystemEvent};

/// Target ticks per second for the logic thread. An editor does not need
/// gameplay rates; this is only the debounce/timer resolution.
const TPS: u64 = 60;

/// Spawns the logic thread.
pub fn start_thread(bus: EditorBus, settings: EditorSettings) {
    thread::Builder::new()
        .name("Logic Thread".to_string())
        .spawn(move || {
            log::info!("LOGIC: Thread started");

            let mut state = GlobalState::new(settings);
            let tick = Duration::from_secs_f64(1.0 / TPS as f64);
            let mut last_sent_revision = u64::MAX;

            loop {
                // 1. Process user actions strictly in arrival order.
                while let Ok(action) = bus.action_rx.try_recv() {
                    state.handle_action(action);
                }

                // 2. Window-level events.
                while let Ok(event) = bus.sys_rx.try_recv() {
                    match event {
                        SystemEvent::Quit => {
                            log::info!("LOGIC: Quit received");
                            state.shutdown();
                            return;
                        }
                        SystemEvent::Resize { .. } => {}
                    }
                }

                // 3. Debounce timers.
                state.tick(Instant::now());

                // 4. Snapshot only when something changed. A full channel
                // retries next tick rather than losing the newest state.
                if state.revision() != last_sent_revision
                    && bus.render_tx.try_send(state.create_snapshot()).is_ok()
                {
                    last_sent_revision = state.revision();
                }

                thread::sleep(tick);
            }
        })
        .expect("Failed to spawn Logic thread");
}
