use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InspectErr, Result};

/// Number of precomputed input images whose activations can be browsed.
pub const INPUT_COUNT: usize = 6;

/// Index of the active input image, always in `0..INPUT_COUNT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InputSelector(usize);

impl InputSelector {
    /// # Errors
    /// Returns `InspectErr::OutOfRange` if `index >= INPUT_COUNT`.
    pub fn new(index: usize) -> Result<Self> {
        if index >= INPUT_COUNT {
            return Err(InspectErr::OutOfRange {
                what: "input",
                index,
                len: INPUT_COUNT,
            });
        }

        Ok(Self(index))
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for InputSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Colour-bar range of the feature map detail panels, one maximum per input image.
/// The minimum is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Calibration([f32; INPUT_COUNT]);

impl Calibration {
    pub const MIN_VALUE: f32 = 0.0;

    pub fn new(max_values: [f32; INPUT_COUNT]) -> Self {
        Self(max_values)
    }

    pub fn max_value(&self, input: InputSelector) -> f32 {
        self.0[input.index()]
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self([0.89, 0.92, 0.91, 0.96, 0.91, 1.14])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_accepts_all_six_inputs() {
        for i in 0..INPUT_COUNT {
            assert_eq!(InputSelector::new(i).unwrap().index(), i);
        }
    }

    #[test]
    fn selector_rejects_six_and_above() {
        assert!(matches!(
            InputSelector::new(6),
            Err(InspectErr::OutOfRange {
                what: "input",
                index: 6,
                len: 6
            })
        ));
        assert!(InputSelector::new(usize::MAX).is_err());
    }

    #[test]
    fn default_calibration_table() {
        let cal = Calibration::default();
        let max = |i| cal.max_value(InputSelector::new(i).unwrap());

        assert_eq!(max(0), 0.89);
        assert_eq!(max(2), 0.91);
        assert_eq!(max(5), 1.14);
    }
}
