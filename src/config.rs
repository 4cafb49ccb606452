//! Fixed configuration of the measurement setup.

/// Expected physical intensity range of one emitter channel.
///
/// Raw photodetector readings are clamped into this range before they feed
/// the SpO2 estimate or the display normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub min: u16,
    pub max: u16,
}

/// Intensity range of the red (660 nm) channel.
pub const RED_RANGE: ClipRange = ClipRange {
    min: 700,
    max: 14000,
};

/// Intensity range of the infrared (940 nm) channel.
pub const IR_RANGE: ClipRange = ClipRange {
    min: 500,
    max: 1300,
};

/// Width of the target display in pixels.
pub const DISPLAY_WIDTH: usize = 128;
/// Height of the target display in pixels.
pub const DISPLAY_HEIGHT: usize = 64;

/// Pixels reserved at the left edge of each plot for its channel label.
pub const GRAPH_MARGIN: usize = 20;
/// Number of waveform columns per plot.
pub const GRAPH_WIDTH: usize = DISPLAY_WIDTH - GRAPH_MARGIN;
/// Vertical span of one plot in pixels.
pub const GRAPH_HEIGHT: u16 = ((DISPLAY_HEIGHT - 20) / 2) as u16;

/// Raw samples kept per channel for thresholding and peak detection.
pub const RAW_HISTORY: usize = 100;

/// The threshold refreshes when the cycle counter exceeds this value.
/// The comparison is strict, so the refresh happens on every 51st cycle.
pub const THRESHOLD_REFRESH_CYCLES: u32 = 50;

/// Heart-rate candidates are accepted strictly between these bounds (bpm).
pub const BPM_MIN: u32 = 40;
pub const BPM_MAX: u32 = 160;

/// Wait after enabling an emitter before the photodetector reading is valid.
pub const SETTLE_DELAY_MS: u16 = 5;
/// Wait after rendering that paces the overall cycle rate.
pub const TAIL_DELAY_MS: u16 = 50;
