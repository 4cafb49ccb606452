//! Per-cycle orchestration of the measurement pipeline.

use embedded_hal::blocking::delay::DelayMs;

use crate::buffer::RollingBuffer;
use crate::clock::Monotonic;
use crate::config::{GRAPH_HEIGHT, GRAPH_WIDTH, IR_RANGE, RAW_HISTORY, RED_RANGE, TAIL_DELAY_MS};
use crate::peak::{hysteresis_bounds, PeakDetector};
use crate::render::{Frame, FrameSink};
use crate::signal::{clip, normalize};
use crate::source::PpgSource;
use crate::spo2;
use crate::threshold::ThresholdEstimator;

/// All mutable measurement state, advanced exactly once per cycle.
///
/// Holds the four rolling histories (raw and plot-normalized, one each per
/// channel), the sticky threshold with its refresh counter, the beat
/// detector with its sticky heart rate, and the latest SpO2 estimate.
#[derive(Debug, Default)]
pub struct Pipeline {
    raw_red: RollingBuffer<RAW_HISTORY>,
    raw_ir: RollingBuffer<RAW_HISTORY>,
    graph_red: RollingBuffer<GRAPH_WIDTH>,
    graph_ir: RollingBuffer<GRAPH_WIDTH>,
    threshold: ThresholdEstimator,
    detector: PeakDetector,
    spo2: f32,
}

impl Pipeline {
    pub const fn new() -> Self {
        Self {
            raw_red: RollingBuffer::new(),
            raw_ir: RollingBuffer::new(),
            graph_red: RollingBuffer::new(),
            graph_ir: RollingBuffer::new(),
            threshold: ThresholdEstimator::new(),
            detector: PeakDetector::new(),
            spo2: 0.0,
        }
    }

    /// Folds one raw sample pair into the pipeline.
    ///
    /// `now_ms` is the cycle's timestamp, used for beat timing. Peak
    /// detection sees raw intensities; SpO2 and the plots see clipped ones.
    pub fn step(&mut self, red_raw: u16, ir_raw: u16, now_ms: u32) {
        let red_clipped = clip(red_raw, RED_RANGE);
        let ir_clipped = clip(ir_raw, IR_RANGE);

        self.raw_red.push(red_raw);
        self.raw_ir.push(ir_raw);
        self.graph_red
            .push(normalize(red_clipped, RED_RANGE, GRAPH_HEIGHT));
        self.graph_ir
            .push(normalize(ir_clipped, IR_RANGE, GRAPH_HEIGHT));

        self.threshold.tick(&self.raw_red);

        let (upper, lower) = hysteresis_bounds(self.raw_red.max(), self.threshold.threshold());
        self.detector
            .update(self.raw_red.last(), upper, lower, now_ms);

        self.spo2 = spo2::estimate(red_clipped, ir_clipped);
    }

    /// Last accepted heart rate in beats per minute.
    pub fn bpm(&self) -> u32 {
        self.detector.bpm()
    }

    /// SpO2 estimate of the latest cycle, in percent.
    pub fn spo2(&self) -> f32 {
        self.spo2
    }

    /// Current sticky peak-detection threshold.
    pub fn threshold(&self) -> i32 {
        self.threshold.threshold()
    }

    /// Raw sample history of the red channel.
    pub fn raw_red(&self) -> &RollingBuffer<RAW_HISTORY> {
        &self.raw_red
    }

    /// Raw sample history of the infrared channel.
    pub fn raw_ir(&self) -> &RollingBuffer<RAW_HISTORY> {
        &self.raw_ir
    }

    /// Snapshot of everything the display needs.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            bpm: self.bpm(),
            spo2: self.spo2,
            graph_red: &self.graph_red,
            graph_ir: &self.graph_ir,
        }
    }
}

/// Errors of one full measurement cycle.
#[derive(Debug)]
pub enum CycleError<S, R> {
    /// Sampling failed.
    Source(S),
    /// Rendering or flushing the frame failed.
    Sink(R),
}

/// The assembled device: sampling, signal pipeline and display.
///
/// [`cycle`](Oximeter::cycle) runs one measurement cycle; the firmware calls
/// it from an unbounded loop. Nothing else touches the state, so each cycle
/// is one atomic step.
pub struct Oximeter<SRC, CLK, SNK, D> {
    source: SRC,
    clock: CLK,
    sink: SNK,
    delay: D,
    pipeline: Pipeline,
}

impl<SRC, CLK, SNK, D> Oximeter<SRC, CLK, SNK, D>
where
    SRC: PpgSource,
    CLK: Monotonic,
    SNK: FrameSink,
    D: DelayMs<u16>,
{
    pub fn new(source: SRC, clock: CLK, sink: SNK, delay: D) -> Self {
        Self {
            source,
            clock,
            sink,
            delay,
            pipeline: Pipeline::new(),
        }
    }

    /// Runs one measurement cycle: sample both channels (settling before
    /// each read), advance the pipeline, render the frame, then pace the
    /// loop with the tail delay.
    pub fn cycle(&mut self) -> Result<(), CycleError<SRC::Error, SNK::Error>> {
        let (red, ir) = self
            .source
            .sample_cycle(&mut self.delay)
            .map_err(CycleError::Source)?;
        self.pipeline.step(red, ir, self.clock.now_ms());
        self.sink
            .render(&self.pipeline.frame())
            .map_err(CycleError::Sink)?;
        self.delay.delay_ms(TAIL_DELAY_MS);
        Ok(())
    }

    /// Read access to the pipeline state.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
