use serde::{Deserialize, Serialize};

/// Why a site is (or is not) trusted after its latest search.
///
/// The numeric codes are stable: `Valid = 0`, `ContrastRejected = 1`,
/// `ThresholdRejected = 2`, `RobustRejected = 3`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionState {
    #[default]
    Valid,
    /// The best candidate's contrast drifted from the recorded reference.
    ContrastRejected,
    /// No candidate reached the signal threshold, or the site left the frame.
    ThresholdRejected,
    /// Down-weighted by the external robust fit, or its search faulted.
    RobustRejected,
}

impl SuppressionState {
    pub const ALL: [SuppressionState; 4] = [
        SuppressionState::Valid,
        SuppressionState::ContrastRejected,
        SuppressionState::ThresholdRejected,
        SuppressionState::RobustRejected,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        match self {
            SuppressionState::Valid => 0,
            SuppressionState::ContrastRejected => 1,
            SuppressionState::ThresholdRejected => 2,
            SuppressionState::RobustRejected => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self == SuppressionState::Valid
    }

    pub fn label(self) -> &'static str {
        match self {
            SuppressionState::Valid => "valid",
            SuppressionState::ContrastRejected => "contrast",
            SuppressionState::ThresholdRejected => "threshold",
            SuppressionState::RobustRejected => "robust",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for state in SuppressionState::ALL {
            assert_eq!(SuppressionState::from_code(state.code()), Some(state));
        }
        assert_eq!(SuppressionState::from_code(4), None);
        assert_eq!(SuppressionState::ThresholdRejected.code(), 2);
    }
}
