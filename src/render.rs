//! Frame rendering for the measurement display.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyleBuilder},
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use heapless::String;

use crate::buffer::RollingBuffer;
use crate::config::{DISPLAY_HEIGHT, GRAPH_HEIGHT, GRAPH_MARGIN, GRAPH_WIDTH};

/// One complete display frame: the current estimates plus both waveform
/// windows.
pub struct Frame<'a> {
    pub bpm: u32,
    pub spo2: f32,
    pub graph_red: &'a RollingBuffer<GRAPH_WIDTH>,
    pub graph_ir: &'a RollingBuffer<GRAPH_WIDTH>,
}

/// Capability consuming one rendered frame per cycle.
///
/// Implementations own the clear-draw-flush ordering against the concrete
/// display; every frame is a full redraw.
pub trait FrameSink {
    type Error;

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), Self::Error>;
}

impl Frame<'_> {
    /// Draws both value labels and both waveform plots onto `target`.
    ///
    /// The caller clears the target beforehand and flushes afterwards.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyleBuilder::new()
            .font(&FONT_6X10)
            .text_color(BinaryColor::On)
            .build();
        let graph_height = i32::from(GRAPH_HEIGHT);

        let mut line: String<64> = String::new();
        let _ = write!(line, "Pulse: {} bpm", self.bpm);
        Text::with_baseline(&line, Point::zero(), style, Baseline::Top).draw(target)?;

        line.clear();
        let _ = write!(line, "SpO2: {:.1}%", self.spo2);
        Text::with_baseline(&line, Point::new(0, 10), style, Baseline::Top).draw(target)?;

        Text::with_baseline("RD", Point::new(0, graph_height + 8), style, Baseline::Top)
            .draw(target)?;
        Text::with_baseline(
            "IR",
            Point::new(0, DISPLAY_HEIGHT as i32 - 8),
            style,
            Baseline::Top,
        )
        .draw(target)?;

        // Upper plot, red channel: larger intensity draws higher.
        target.draw_iter(self.graph_red.iter().enumerate().map(|(x, value)| {
            let y = graph_height - i32::from(value) + 16;
            Pixel(Point::new((x + GRAPH_MARGIN) as i32, y), BinaryColor::On)
        }))?;

        // Lower plot, infrared channel, along the bottom edge.
        target.draw_iter(self.graph_ir.iter().enumerate().map(|(x, value)| {
            let y = DISPLAY_HEIGHT as i32 - 1 - i32::from(value);
            Pixel(Point::new((x + GRAPH_MARGIN) as i32, y), BinaryColor::On)
        }))?;

        Ok(())
    }
}
