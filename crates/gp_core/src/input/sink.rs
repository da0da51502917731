//! Synthetic input actuator contract
//!
//! Engines emit through `&mut dyn InputSink`; every call is fire-and-forget.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Virtual-key code understood by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const NONE: KeyCode = KeyCode(0x00);
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const ESCAPE: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const NUM1: KeyCode = KeyCode(0x31);
    pub const NUM2: KeyCode = KeyCode(0x32);
    pub const NUM3: KeyCode = KeyCode(0x33);
    pub const NUM4: KeyCode = KeyCode(0x34);
    pub const A: KeyCode = KeyCode(0x41);
    pub const B: KeyCode = KeyCode(0x42);
    pub const C: KeyCode = KeyCode(0x43);
    pub const E: KeyCode = KeyCode(0x45);
    pub const F: KeyCode = KeyCode(0x46);
    pub const M: KeyCode = KeyCode(0x4D);
    pub const N: KeyCode = KeyCode(0x4E);
    pub const Q: KeyCode = KeyCode(0x51);
    pub const R: KeyCode = KeyCode(0x52);
    pub const V: KeyCode = KeyCode(0x56);
    pub const X: KeyCode = KeyCode(0x58);
    pub const Z: KeyCode = KeyCode(0x5A);
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F2: KeyCode = KeyCode(0x71);
    pub const F3: KeyCode = KeyCode(0x72);
    pub const F4: KeyCode = KeyCode(0x73);
    pub const F5: KeyCode = KeyCode(0x74);
    pub const F6: KeyCode = KeyCode(0x75);
    pub const F7: KeyCode = KeyCode(0x76);
    pub const F8: KeyCode = KeyCode(0x77);
    pub const F9: KeyCode = KeyCode(0x78);

    pub fn is_none(self) -> bool {
        self == KeyCode::NONE
    }

    /// Function key F1..F12 by number.
    pub fn function(n: u8) -> Option<KeyCode> {
        (1..=12).contains(&n).then(|| KeyCode(0x70 + n as u16 - 1))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            0x09 => f.write_str("Tab"),
            0x0D => f.write_str("Enter"),
            0x12 => f.write_str("Alt"),
            0x1B => f.write_str("Escape"),
            0x20 => f.write_str("Space"),
            c @ 0x30..=0x39 | c @ 0x41..=0x5A => write!(f, "{}", c as u8 as char),
            c @ 0x70..=0x7B => write!(f, "F{}", c - 0x6F),
            c => write!(f, "VK_{:#04X}", c),
        }
    }
}

/// Primitive synthetic input operations.
pub trait InputSink {
    fn move_mouse_relative(&mut self, dx: i32, dy: i32);
    fn left_click(&mut self);
    fn right_click(&mut self);
    fn left_button_down(&mut self);
    fn left_button_up(&mut self);
    fn tap_key(&mut self, key: KeyCode);
    fn scroll_wheel(&mut self, delta: i32);
}

impl<S: InputSink + ?Sized> InputSink for &mut S {
    fn move_mouse_relative(&mut self, dx: i32, dy: i32) {
        (**self).move_mouse_relative(dx, dy);
    }

    fn left_click(&mut self) {
        (**self).left_click();
    }

    fn right_click(&mut self) {
        (**self).right_click();
    }

    fn left_button_down(&mut self) {
        (**self).left_button_down();
    }

    fn left_button_up(&mut self) {
        (**self).left_button_up();
    }

    fn tap_key(&mut self, key: KeyCode) {
        (**self).tap_key(key);
    }

    fn scroll_wheel(&mut self, delta: i32) {
        (**self).scroll_wheel(delta);
    }
}

/// One emitted actuator call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InputEvent {
    MoveMouse { dx: i32, dy: i32 },
    LeftClick,
    RightClick,
    LeftDown,
    LeftUp,
    TapKey { key: KeyCode },
    Scroll { delta: i32 },
}

impl InputEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::MoveMouse { .. } => "move_mouse",
            InputEvent::LeftClick => "left_click",
            InputEvent::RightClick => "right_click",
            InputEvent::LeftDown => "left_down",
            InputEvent::LeftUp => "left_up",
            InputEvent::TapKey { .. } => "tap_key",
            InputEvent::Scroll { .. } => "scroll",
        }
    }

    /// Replay this event onto another sink.
    pub fn apply(self, sink: &mut dyn InputSink) {
        match self {
            InputEvent::MoveMouse { dx, dy } => sink.move_mouse_relative(dx, dy),
            InputEvent::LeftClick => sink.left_click(),
            InputEvent::RightClick => sink.right_click(),
            InputEvent::LeftDown => sink.left_button_down(),
            InputEvent::LeftUp => sink.left_button_up(),
            InputEvent::TapKey { key } => sink.tap_key(key),
            InputEvent::Scroll { delta } => sink.scroll_wheel(delta),
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputEvent::MoveMouse { dx, dy } => write!(f, "move({}, {})", dx, dy),
            InputEvent::TapKey { key } => write!(f, "tap({})", key),
            InputEvent::Scroll { delta } => write!(f, "scroll({})", delta),
            other => f.write_str(other.kind()),
        }
    }
}

/// Collects every call in order. Zero-delta moves are dropped, matching the
/// real actuator which ignores them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<InputEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Take everything recorded so far.
    pub fn take(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, pred: impl Fn(&InputEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn key_taps(&self, key: KeyCode) -> usize {
        self.count(|e| *e == InputEvent::TapKey { key })
    }

    /// Sum of all relative mouse motion.
    pub fn total_motion(&self) -> (i32, i32) {
        self.events.iter().fold((0, 0), |(x, y), e| match e {
            InputEvent::MoveMouse { dx, dy } => (x + dx, y + dy),
            _ => (x, y),
        })
    }

    fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }
}

impl InputSink for RecordingSink {
    fn move_mouse_relative(&mut self, dx: i32, dy: i32) {
        if dx != 0 || dy != 0 {
            self.push(InputEvent::MoveMouse { dx, dy });
        }
    }

    fn left_click(&mut self) {
        self.push(InputEvent::LeftClick);
    }

    fn right_click(&mut self) {
        self.push(InputEvent::RightClick);
    }

    fn left_button_down(&mut self) {
        self.push(InputEvent::LeftDown);
    }

    fn left_button_up(&mut self) {
        self.push(InputEvent::LeftUp);
    }

    fn tap_key(&mut self, key: KeyCode) {
        self.push(InputEvent::TapKey { key });
    }

    fn scroll_wheel(&mut self, delta: i32) {
        self.push(InputEvent::Scroll { delta });
    }
}

/// Decorator that traces each call before forwarding it.
#[derive(Debug, Default)]
pub struct LoggingSink<S> {
    inner: S,
}

impl<S> LoggingSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: InputSink> InputSink for LoggingSink<S> {
    fn move_mouse_relative(&mut self, dx: i32, dy: i32) {
        log::trace!("input: move({}, {})", dx, dy);
        self.inner.move_mouse_relative(dx, dy);
    }

    fn left_click(&mut self) {
        log::trace!("input: left_click");
        self.inner.left_click();
    }

    fn right_click(&mut self) {
        log::trace!("input: right_click");
        self.inner.right_click();
    }

    fn left_button_down(&mut self) {
        log::trace!("input: left_down");
        self.inner.left_button_down();
    }

    fn left_button_up(&mut self) {
        log::trace!("input: left_up");
        self.inner.left_button_up();
    }

    fn tap_key(&mut self, key: KeyCode) {
        log::trace!("input: tap({})", key);
        self.inner.tap_key(key);
    }

    fn scroll_wheel(&mut self, delta: i32) {
        log::trace!("input: scroll({})", delta);
        self.inner.scroll_wheel(delta);
    }
}
