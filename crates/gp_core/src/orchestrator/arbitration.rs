//! Right-stick ownership
//!
//! One owner per tick, chosen in fixed precedence from the engines that claim
//! the stick (enabled by the profile, or still mid-action). Engines that lose
//! the stick are not updated and keep their phase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four specialized engines, in arbitration precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Support,
    Mage,
    Kite,
    AutoTarget,
}

impl EngineKind {
    pub const PRECEDENCE: [EngineKind; 4] =
        [EngineKind::Support, EngineKind::Mage, EngineKind::Kite, EngineKind::AutoTarget];

    pub fn name(self) -> &'static str {
        match self {
            EngineKind::Support => "Support",
            EngineKind::Mage => "Mage",
            EngineKind::Kite => "Kite",
            EngineKind::AutoTarget => "AutoTarget",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightStickOwner {
    Support,
    Mage,
    Kite,
    AutoTarget,
    #[default]
    FreeLook,
}

impl RightStickOwner {
    pub fn engine(self) -> Option<EngineKind> {
        match self {
            RightStickOwner::Support => Some(EngineKind::Support),
            RightStickOwner::Mage => Some(EngineKind::Mage),
            RightStickOwner::Kite => Some(EngineKind::Kite),
            RightStickOwner::AutoTarget => Some(EngineKind::AutoTarget),
            RightStickOwner::FreeLook => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self.engine() {
            Some(kind) => kind.name(),
            None => "FreeLook",
        }
    }
}

impl From<EngineKind> for RightStickOwner {
    fn from(kind: EngineKind) -> Self {
        match kind {
            EngineKind::Support => RightStickOwner::Support,
            EngineKind::Mage => RightStickOwner::Mage,
            EngineKind::Kite => RightStickOwner::Kite,
            EngineKind::AutoTarget => RightStickOwner::AutoTarget,
        }
    }
}

/// First claiming engine in precedence order, else free-look.
pub fn arbitrate(claims: impl Fn(EngineKind) -> bool) -> RightStickOwner {
    EngineKind::PRECEDENCE
        .into_iter()
        .find(|kind| claims(*kind))
        .map(RightStickOwner::from)
        .unwrap_or(RightStickOwner::FreeLook)
}
