//! In-memory doubles for the platform seams

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::button::{ButtonName, StickName};
use super::events::{KeyEvent, KeyEventSink};
use super::haptics::{DualRumble, Haptics, HapticsError};
use super::snapshot::{ButtonState, GamepadSource, PadSnapshot};

/// Gamepad source whose pads are edited by the test between polls
#[derive(Clone, Default)]
pub struct ScriptedSource {
    pads: Rc<RefCell<BTreeMap<usize, PadSnapshot>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, index: usize, id: &str) {
        self.pads
            .borrow_mut()
            .insert(index, PadSnapshot::standard(index, id));
    }

    pub fn disconnect(&self, index: usize) {
        self.pads.borrow_mut().remove(&index);
    }

    pub fn set_button(&self, index: usize, button: ButtonName, state: ButtonState) {
        if let Some(pad) = self.pads.borrow_mut().get_mut(&index) {
            pad.set_button(button, state);
        }
    }

    pub fn press(&self, index: usize, button: ButtonName) {
        self.set_button(index, button, ButtonState::digital(true));
    }

    pub fn release(&self, index: usize, button: ButtonName) {
        self.set_button(index, button, ButtonState::digital(false));
    }

    pub fn set_trigger(&self, index: usize, trigger: ButtonName, value: f32) {
        self.set_button(index, trigger, ButtonState::analog(value));
    }

    pub fn set_stick(&self, index: usize, stick: StickName, x: f32, y: f32) {
        if let Some(pad) = self.pads.borrow_mut().get_mut(&index) {
            pad.set_stick(stick, x, y);
        }
    }
}

impl GamepadSource for ScriptedSource {
    fn poll(&mut self) -> Vec<PadSnapshot> {
        self.pads.borrow().values().cloned().collect()
    }
}

/// Key sink that keeps everything it receives
#[derive(Clone, Default)]
pub struct SharedSink {
    events: Rc<RefCell<Vec<KeyEvent>>>,
}

impl SharedSink {
    pub fn events(&self) -> Vec<KeyEvent> {
        self.events.borrow().clone()
    }

    pub fn take(&self) -> Vec<KeyEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl KeyEventSink for SharedSink {
    fn dispatch(&mut self, event: KeyEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Haptics that records effects, optionally rejecting all of them
#[derive(Default)]
pub struct RecordingHaptics {
    played: RefCell<Vec<(usize, DualRumble)>>,
    attempts: Cell<usize>,
    fail: bool,
}

impl RecordingHaptics {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn played(&self) -> Vec<(usize, DualRumble)> {
        self.played.borrow().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

#[async_trait(?Send)]
impl Haptics for RecordingHaptics {
    async fn play_dual_rumble(&self, pad_index: usize, effect: DualRumble) -> Result<(), HapticsError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail {
            return Err(HapticsError::Unsupported(pad_index));
        }
        self.played.borrow_mut().push((pad_index, effect));
        Ok(())
    }
}
