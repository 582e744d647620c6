use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperParams {
    /// Fixed physics step in seconds
    pub step: f32,
    /// Longest frame the loop will catch up on
    pub max_frame: f32,
}

impl Default for StepperParams {
    fn default() -> Self {
        Self {
            step: 0.001,
            max_frame: 1.0 / 60.0,
        }
    }
}

/// Splits variable frame times into a whole number of fixed physics ticks
#[derive(Debug, Clone, Copy)]
pub struct FixedStepper {
    pub params: StepperParams,
}

impl FixedStepper {
    pub fn new(params: StepperParams) -> Self {
        Self { params }
    }

    /// Ticks to run for a frame of `frame_dt` seconds: ceil(clamped / step).
    /// Non-positive or non-finite frames run nothing.
    pub fn ticks_for(&self, frame_dt: f32) -> usize {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }

        let dt = if frame_dt > self.params.max_frame {
            warn!("frame time {:.4}s clamped to {:.4}s", frame_dt, self.params.max_frame);
            self.params.max_frame
        } else {
            frame_dt
        };

        (dt / self.params.step).ceil() as usize
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::new(StepperParams::default())
    }
}
