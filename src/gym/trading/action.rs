use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::{
    error::{EnvError, FxError},
    gym::trading::contract::Side,
};

// ================================================================================================
// The Action Enum
// ================================================================================================

/// The discrete action set of the environment.
///
/// `Long` and `Short` are close-or-open actions: each first closes the oldest contract on the
/// opposite side, and only opens a new contract on its own side when there is nothing to close.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    EnumCount,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Action {
    Hold = 0,
    Long = 1,
    Short = 2,
}

impl Action {
    /// Numeric action code as exchanged with the training loop.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The side this action trades, `None` for [`Action::Hold`].
    pub fn side(self) -> Option<Side> {
        match self {
            Action::Hold => None,
            Action::Long => Some(Side::Long),
            Action::Short => Some(Side::Short),
        }
    }
}

impl From<Side> for Action {
    fn from(side: Side) -> Self {
        match side {
            Side::Long => Action::Long,
            Side::Short => Action::Short,
        }
    }
}

impl TryFrom<i64> for Action {
    type Error = FxError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Action::Hold),
            1 => Ok(Action::Long),
            2 => Ok(Action::Short),
            other => Err(EnvError::InvalidAction(other).into()),
        }
    }
}

// ================================================================================================
// Action Space
// ================================================================================================

/// `Discrete(3)`: the valid action codes are `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    pub n: usize,
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self { n: Action::COUNT }
    }
}

impl ActionSpace {
    pub fn contains(&self, code: i64) -> bool {
        usize::try_from(code).is_ok_and(|c| c < self.n)
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> {
        Action::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for action in Action::iter() {
            assert_eq!(Action::try_from(i64::from(action.code())).unwrap(), action);
        }
    }

    #[test]
    fn out_of_range_code_is_invalid_action() {
        for code in [-1, 3, 42] {
            let err = Action::try_from(code).unwrap_err();
            assert!(matches!(err, FxError::Env(EnvError::InvalidAction(c)) if c == code));
        }
    }

    #[test]
    fn action_space_is_discrete_three() {
        let space = ActionSpace::default();
        assert_eq!(space.n, 3);
        assert!(space.contains(0) && space.contains(2));
        assert!(!space.contains(3) && !space.contains(-1));
        assert_eq!(space.actions().count(), 3);
    }

    #[test]
    fn only_hold_has_no_side() {
        assert_eq!(Action::Hold.side(), None);
        assert_eq!(Action::Long.side(), Some(Side::Long));
        assert_eq!(Action::from(Side::Short), Action::Short);
        assert_eq!("short".parse::<Action>().unwrap(), Action::Short);
    }
}
