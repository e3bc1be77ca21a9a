//! Controller tuning knobs

use super::gate::BusyPolicy;
use super::layout::SlotSpacing;

/// Horizontal padding subtracted from the container width when fitting
pub const DEFAULT_FIT_PADDING: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerConfig {
    pub fit_padding: f32,
    pub spacing: SlotSpacing,
    pub busy_policy: BusyPolicy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fit_padding: DEFAULT_FIT_PADDING,
            spacing: SlotSpacing::default(),
            busy_policy: BusyPolicy::default(),
        }
    }
}

impl ViewerConfig {
    #[must_use]
    pub fn with_busy_policy(mut self, busy_policy: BusyPolicy) -> Self {
        self.busy_policy = busy_policy;
        self
    }
}
