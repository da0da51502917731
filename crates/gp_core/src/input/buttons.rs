//! Typed Button Identity
//!
//! Physical buttons crossed with the trigger layer form a small product key
//! (`LayeredButton`). Profiles address bindings with the textual form
//! (`"A"`, `"L2+A"`, `"R2+A"`); everything at runtime uses the dense index.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Physical gamepad buttons (XInput layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Button {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl Button {
    pub const COUNT: usize = 14;

    /// Walk order used by the orchestrator for per-tick dispatch.
    pub const ALL: [Button; Button::COUNT] = [
        Button::DPadUp,
        Button::DPadDown,
        Button::DPadLeft,
        Button::DPadRight,
        Button::Start,
        Button::Back,
        Button::LeftThumb,
        Button::RightThumb,
        Button::LeftShoulder,
        Button::RightShoulder,
        Button::A,
        Button::B,
        Button::X,
        Button::Y,
    ];

    /// XInput button flag value.
    pub const fn mask(self) -> u16 {
        match self {
            Button::DPadUp => 0x0001,
            Button::DPadDown => 0x0002,
            Button::DPadLeft => 0x0004,
            Button::DPadRight => 0x0008,
            Button::Start => 0x0010,
            Button::Back => 0x0020,
            Button::LeftThumb => 0x0040,
            Button::RightThumb => 0x0080,
            Button::LeftShoulder => 0x0100,
            Button::RightShoulder => 0x0200,
            Button::A => 0x1000,
            Button::B => 0x2000,
            Button::X => 0x4000,
            Button::Y => 0x8000,
        }
    }

    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::DPadUp => "DPadUp",
            Button::DPadDown => "DPadDown",
            Button::DPadLeft => "DPadLeft",
            Button::DPadRight => "DPadRight",
            Button::Start => "Start",
            Button::Back => "Back",
            Button::LeftThumb => "LeftThumb",
            Button::RightThumb => "RightThumb",
            Button::LeftShoulder => "LeftShoulder",
            Button::RightShoulder => "RightShoulder",
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Button {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Button::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Invalid(format!("unknown button '{}'", s)))
    }
}

/// Bitset of pressed buttons for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonSet(pub u16);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.mask();
    }

    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.mask();
    }

    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |b| self.contains(*b))
    }
}

impl FromIterator<Button> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        let mut set = ButtonSet::EMPTY;
        for button in iter {
            set.insert(button);
        }
        set
    }
}

/// Mapping context selected by holding a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Layer {
    #[default]
    Base,
    L2,
    R2,
}

impl Layer {
    pub const COUNT: usize = 3;

    /// L2 takes precedence when both triggers are held.
    pub fn from_triggers(l2_held: bool, r2_held: bool) -> Self {
        if l2_held {
            Layer::L2
        } else if r2_held {
            Layer::R2
        } else {
            Layer::Base
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layer::Base => "Base Layer",
            Layer::L2 => "L2 Layer",
            Layer::R2 => "R2 Layer",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Layer::Base => "",
            Layer::L2 => "L2+",
            Layer::R2 => "R2+",
        }
    }
}

/// A physical button under a layer; the binding key of a profile mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayeredButton {
    pub layer: Layer,
    pub button: Button,
}

impl LayeredButton {
    pub const SLOTS: usize = Layer::COUNT * Button::COUNT;

    pub const fn new(layer: Layer, button: Button) -> Self {
        Self { layer, button }
    }

    pub const fn base(button: Button) -> Self {
        Self::new(Layer::Base, button)
    }

    pub const fn index(self) -> usize {
        self.layer as usize * Button::COUNT + self.button.ordinal()
    }
}

impl fmt::Display for LayeredButton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.layer.prefix(), self.button)
    }
}

impl FromStr for LayeredButton {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("L2+") {
            Ok(Self::new(Layer::L2, rest.parse()?))
        } else if let Some(rest) = s.strip_prefix("R2+") {
            Ok(Self::new(Layer::R2, rest.parse()?))
        } else {
            Ok(Self::base(s.parse()?))
        }
    }
}

impl TryFrom<String> for LayeredButton {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LayeredButton> for String {
    fn from(value: LayeredButton) -> Self {
        value.to_string()
    }
}

/// Fixed arena with one slot per `LayeredButton`.
#[derive(Debug, Clone)]
pub struct ButtonArena<T> {
    slots: Vec<T>,
}

impl<T: Default> ButtonArena<T> {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(LayeredButton::SLOTS);
        slots.resize_with(LayeredButton::SLOTS, T::default);
        Self { slots }
    }

    /// Reset every slot to its initial value.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = T::default());
    }
}

impl<T: Default> Default for ButtonArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ButtonArena<T> {
    pub fn get(&self, key: LayeredButton) -> &T {
        &self.slots[key.index()]
    }

    pub fn get_mut(&mut self, key: LayeredButton) -> &mut T {
        &mut self.slots[key.index()]
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}
