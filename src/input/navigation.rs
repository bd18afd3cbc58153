//! Shoulder-button tab switching through injected navigation hooks
//!
//! The navigation UI is outside this crate. It hands the keyboard backend a
//! [`NavigationHooks`] implementation; LB/RB then step through its tabs.
//! With focus preservation on, the focus-mode flag read before the switch is
//! written back once the restore delay has passed, since selecting a tab
//! resets it on the UI side.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::TabSwitchConfig;

/// Callbacks into the navigation UI
pub trait NavigationHooks {
    /// Currently selected tab, `None` when the UI has no tab state yet
    fn tab_index(&self) -> Option<usize>;

    fn tab_count(&self) -> usize;

    fn select_tab(&mut self, index: usize);

    /// Focus-mode flag, `None` when the UI does not track one
    fn focus_mode(&self) -> Option<bool> {
        None
    }

    fn set_focus_mode(&mut self, _focused: bool) {}

    fn previous_tab(&mut self) -> bool {
        match (self.tab_index(), self.tab_count()) {
            (Some(current), count) if count > 0 => {
                self.select_tab((current + count - 1) % count);
                true
            },
            _ => false,
        }
    }

    fn next_tab(&mut self) -> bool {
        match (self.tab_index(), self.tab_count()) {
            (Some(current), count) if count > 0 => {
                self.select_tab((current + 1) % count);
                true
            },
            _ => false,
        }
    }
}

/// Which way a shoulder button moves the tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabStep {
    Previous,
    Next,
}

#[derive(Debug, Clone, Copy)]
struct PendingRestore {
    focused: bool,
    due: Instant,
}

/// Drives [`NavigationHooks`] from shoulder-button presses
pub struct TabSwitcher {
    hooks: Box<dyn NavigationHooks>,
    preserve_focus: bool,
    restore_delay: Duration,
    pending: Option<PendingRestore>,
}

impl TabSwitcher {
    pub fn new(hooks: Box<dyn NavigationHooks>, config: &TabSwitchConfig) -> Self {
        Self {
            hooks,
            preserve_focus: config.preserve_focus,
            restore_delay: Duration::from_millis(config.restore_delay_ms),
            pending: None,
        }
    }

    /// Step the tab selection; skipped when the UI reports no tab state
    pub fn step(&mut self, step: TabStep, now: Instant) {
        let focus_before = if self.preserve_focus {
            self.hooks.focus_mode()
        } else {
            None
        };

        let switched = match step {
            TabStep::Previous => self.hooks.previous_tab(),
            TabStep::Next => self.hooks.next_tab(),
        };

        if !switched {
            debug!("Navigation hooks not ready, skipping {:?} tab switch", step);
            return;
        }

        debug!("Tab switch {:?}", step);

        if let Some(focused) = focus_before {
            self.pending = Some(PendingRestore {
                focused,
                due: now + self.restore_delay,
            });
        }
    }

    /// Apply a pending focus restore whose delay has elapsed
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = self.pending {
            if now >= pending.due {
                debug!("Restoring focus mode to {}", pending.focused);
                self.hooks.set_focus_mode(pending.focused);
                self.pending = None;
            }
        }
    }

    pub fn has_pending_restore(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct NavState {
        tab: Option<usize>,
        count: usize,
        focus: Option<bool>,
        selections: Vec<usize>,
    }

    struct SharedNav(Rc<RefCell<NavState>>);

    impl NavigationHooks for SharedNav {
        fn tab_index(&self) -> Option<usize> {
            self.0.borrow().tab
        }
        fn tab_count(&self) -> usize {
            self.0.borrow().count
        }
        fn select_tab(&mut self, index: usize) {
            let mut state = self.0.borrow_mut();
            state.tab = Some(index);
            state.selections.push(index);
            // Selecting a tab drops focus mode on the UI side
            if state.focus.is_some() {
                state.focus = Some(false);
            }
        }
        fn focus_mode(&self) -> Option<bool> {
            self.0.borrow().focus
        }
        fn set_focus_mode(&mut self, focused: bool) {
            self.0.borrow_mut().focus = Some(focused);
        }
    }

    fn switcher(state: &Rc<RefCell<NavState>>, delay_ms: u64) -> TabSwitcher {
        let config = TabSwitchConfig {
            enabled: true,
            preserve_focus: true,
            restore_delay_ms: delay_ms,
        };
        TabSwitcher::new(Box::new(SharedNav(state.clone())), &config)
    }

    #[test]
    fn test_steps_wrap_around() {
        let state = Rc::new(RefCell::new(NavState {
            tab: Some(0),
            count: 3,
            ..Default::default()
        }));
        let mut tabs = switcher(&state, 0);
        let now = Instant::now();

        tabs.step(TabStep::Previous, now);
        tabs.step(TabStep::Next, now);
        tabs.step(TabStep::Next, now);

        assert_eq!(state.borrow().selections, vec![2, 0, 1]);
    }

    #[test]
    fn test_missing_tab_state_is_skipped() {
        let state = Rc::new(RefCell::new(NavState::default()));
        let mut tabs = switcher(&state, 0);

        tabs.step(TabStep::Next, Instant::now());

        assert!(state.borrow().selections.is_empty());
        assert!(!tabs.has_pending_restore());
    }

    #[test]
    fn test_focus_restored_after_delay() {
        let state = Rc::new(RefCell::new(NavState {
            tab: Some(1),
            count: 4,
            focus: Some(true),
            ..Default::default()
        }));
        let mut tabs = switcher(&state, 50);
        let start = Instant::now();

        tabs.step(TabStep::Next, start);
        assert_eq!(state.borrow().focus, Some(false));

        tabs.tick(start + Duration::from_millis(10));
        assert_eq!(state.borrow().focus, Some(false));
        assert!(tabs.has_pending_restore());

        tabs.tick(start + Duration::from_millis(50));
        assert_eq!(state.borrow().focus, Some(true));
        assert!(!tabs.has_pending_restore());
    }

    #[test]
    fn test_no_restore_when_ui_has_no_focus_flag() {
        let state = Rc::new(RefCell::new(NavState {
            tab: Some(0),
            count: 2,
            ..Default::default()
        }));
        let mut tabs = switcher(&state, 0);

        tabs.step(TabStep::Next, Instant::now());
        assert!(!tabs.has_pending_restore());
    }
}
