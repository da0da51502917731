//! Input model: typed buttons, controller snapshots and the actuator contract.

pub mod buttons;
pub mod pad;
pub mod sink;

pub use buttons::{Button, ButtonArena, ButtonSet, Layer, LayeredButton};
pub use pad::{
    normalize_axis, ControllerSource, GamepadSnapshot, RawPadState, ScriptFrame, ScriptedSource,
    Stick, TRIGGER_THRESHOLD,
};
pub use sink::{InputEvent, InputSink, KeyCode, LoggingSink, RecordingSink};
