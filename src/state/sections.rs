//! Section open/close coordinator.
//!
//! The sidebar's collapsible sections react to drags: hovering a collapsed
//! section forces it open after a short delay, and leaving it lets it snap
//! shut again, unless the user had opened it explicitly, in which case it
//! is never touched. A successful drop makes every force-opened section
//! stick so the destination stays visible after the gesture.
//!
//! Two independent maps back this: `user_open` (sticky, click-driven) and
//! `forced_open` (transient, drag-driven). A section is visibly open when
//! either holds it. Timers are deadline-based and ticked by the logic loop.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::input::events::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ForceOpen,
    ForceClose,
}

pub struct SectionCoordinator {
    user_open: HashSet<SectionId>,
    forced_open: HashSet<SectionId>,
    pending: HashMap<SectionId, (Pending, Instant)>,
    enter_delay: Duration,
    leave_delay: Duration,
}

impl SectionCoordinator {
    pub fn new(enter_delay: Duration, leave_delay: Duration) -> Self {
        Self {
            user_open: HashSet::new(),
            forced_open: HashSet::new(),
            pending: HashMap::new(),
            enter_delay,
            leave_delay,
        }
    }

    pub fn is_open(&self, id: &SectionId) -> bool {
        self.user_open.contains(id) || self.forced_open.contains(id)
    }

    /// Explicit header click. Sticky either way; closing also drops any
    /// forced state so the section actually closes.
    pub fn toggle_user(&mut self, id: SectionId) {
        if self.user_open.contains(&id) {
            self.user_open.remove(&id);
            self.forced_open.remove(&id);
            self.pending.remove(&id);
        } else {
            self.user_open.insert(id);
        }
    }

    /// Drag hover entered a section's drop zone. Debounced so a fast pass
    /// across the sidebar does not flap every section open.
    pub fn drag_enter(&mut self, id: SectionId, now: Instant) {
        if self.user_open.contains(&id) {
            return;
        }
        self.pending
            .insert(id, (Pending::ForceOpen, now + self.enter_delay));
    }

    /// Drag hover left. The close window is shorter than the open window
    /// so a brief re-entry cancels the close instead of flickering.
    pub fn drag_leave(&mut self, id: SectionId, now: Instant) {
        if self.user_open.contains(&id) {
            return;
        }
        self.pending
            .insert(id, (Pending::ForceClose, now + self.leave_delay));
    }

    /// Applies every due pending change. Returns true when visible state
    /// changed so the caller can push a new snapshot.
    pub fn tick(&mut self, now: Instant) -> bool {
        let due: Vec<SectionId> = self
            .pending
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();

        let mut changed = false;
        for id in due {
            let Some((action, _)) = self.pending.remove(&id) else {
                continue;
            };
            if self.user_open.contains(&id) {
                continue;
            }
            changed |= match action {
                Pending::ForceOpen => self.forced_open.insert(id),
                Pending::ForceClose => self.forced_open.remove(&id),
            };
        }
        changed
    }

    /// Successful drop: the destination and everything the drag passed
    /// through stays open.
    pub fn drop_into(&mut self, target: Option<&SectionId>) {
        let promoted = std::mem::take(&mut self.forced_open);
        self.user_open.extend(promoted);
        self.pending.clear();
        if let Some(target) = target {
            self.user_open.insert(target.clone());
        }
    }

    /// Cancelled drag: forced state evaporates, nothing is promoted.
    pub fn drag_ended(&mut self) {
        self.forced_open.clear();
        self.pending.clear();
    }

    /// Union of both maps, cloned into the render snapshot.
    pub fn open_sections(&self) -> HashSet<SectionId> {
        self.user_open.union(&self.forced_open).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTER: Duration = Duration::from_millis(200);
    const LEAVE: Duration = Duration::from_millis(40);

    fn coordinator() -> SectionCoordinator {
        SectionCoordinator::new(ENTER, LEAVE)
    }

    fn dlg() -> SectionId {
        SectionId::dialogue("scene-1")
    }

    #[test]
    fn test_enter_opens_only_after_the_delay() {
        let mut c = coordinator();
        let t0 = Instant::now();

        c.drag_enter(dlg(), t0);
        c.tick(t0 + Duration::from_millis(100));
        assert!(!c.is_open(&dlg()));

        assert!(c.tick(t0 + ENTER));
        assert!(c.is_open(&dlg()));
    }

    #[test]
    fn test_leave_closes_after_the_shorter_delay() {
        let mut c = coordinator();
        let t0 = Instant::now();

        c.drag_enter(dlg(), t0);
        c.tick(t0 + ENTER);
        assert!(c.is_open(&dlg()));

        let t1 = t0 + ENTER + Duration::from_millis(1);
        c.drag_leave(dlg(), t1);
        c.tick(t1 + Duration::from_millis(10));
        assert!(c.is_open(&dlg()), "still open inside the leave window");
        c.tick(t1 + LEAVE);
        assert!(!c.is_open(&dlg()));
    }

    #[test]
    fn test_reentry_cancels_a_pending_close() {
        let mut c = coordinator();
        let t0 = Instant::now();

        c.drag_enter(dlg(), t0);
        c.tick(t0 + ENTER);
        c.drag_leave(dlg(), t0 + ENTER);
        // Re-enter before the close fires; the close must be superseded.
        c.drag_enter(dlg(), t0 + ENTER + Duration::from_millis(10));
        c.tick(t0 + ENTER + LEAVE);
        assert!(c.is_open(&dlg()));
        c.tick(t0 + ENTER + ENTER + Duration::from_millis(10));
        assert!(c.is_open(&dlg()));
    }

    #[test]
    fn test_user_opened_sections_are_never_forced() {
        let mut c = coordinator();
        let t0 = Instant::now();

        c.toggle_user(dlg());
        c.drag_leave(dlg(), t0);
        c.tick(t0 + LEAVE);
        assert!(c.is_open(&dlg()), "user-opened section survives drag leave");

        c.drag_ended();
        assert!(c.is_open(&dlg()));
    }

    #[test]
    fn test_drop_promotes_forced_sections() {
        let mut c = coordinator();
        let t0 = Instant::now();
        let passed_through = SectionId::images("scene-2");

        c.drag_enter(dlg(), t0);
        c.drag_enter(passed_through.clone(), t0);
        c.tick(t0 + ENTER);
        c.drop_into(Some(&dlg()));

        // Both stay open, now as user state: a later drag_ended must not
        // close them.
        c.drag_ended();
        assert!(c.is_open(&dlg()));
        assert!(c.is_open(&passed_through));
    }

    #[test]
    fn test_cancel_clears_forced_state() {
        let mut c = coordinator();
        let t0 = Instant::now();

        c.drag_enter(dlg(), t0);
        c.tick(t0 + ENTER);
        assert!(c.is_open(&dlg()));

        c.drag_ended();
        assert!(!c.is_open(&dlg()));
    }
}
