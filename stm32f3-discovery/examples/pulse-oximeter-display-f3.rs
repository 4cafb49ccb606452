//! Measure reflected red and infrared light by strobing two LEDs over a
//! shared phototransistor, estimate heart rate and blood oxygen saturation
//! from the signal and show both values together with scrolling waveform
//! plots on an SSD1306 OLED display.
//!
//! This example runs on the STM32F3 Discovery board using I2C1 and ADC1.
//!
//! ```
//! F3  <-> Display       F3  <-> Sensor head
//! GND <-> GND           GND <-> GND
//! +5V <-> +5V
//! PB6 <-> SCL           PA1 <-> Red LED (660 nm)
//! PB7 <-> SDA           PA2 <-> IR LED (940 nm)
//!                       PA0 <-> Phototransistor output
//! ```
//!
//! Place a fingertip flat over the LEDs and the phototransistor.
//!
//! Run with:
//! `cargo run --example pulse-oximeter-display-f3 --target thumbv7em-none-eabihf`

#![deny(unsafe_code)]
#![no_std]
#![no_main]

use core::convert::TryInto;
use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use panic_rtt_target as _;
use rtt_target::{rprintln, rtt_init_print};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};
use stm32f3xx_hal::{self as hal, adc, delay::Delay, pac, prelude::*};

use ppg_oximeter::{Frame, FrameSink, Monotonic, Oximeter, StrobedEmitters};

/// Millisecond clock on top of the DWT cycle counter.
///
/// Wraps together with the counter; the pipeline only ever computes wrapped
/// differences of these readings.
struct CycleClock {
    cycles_per_ms: u32,
}

impl Monotonic for CycleClock {
    fn now_ms(&mut self) -> u32 {
        DWT::cycle_count() / self.cycles_per_ms
    }
}

/// Renders each frame into the SSD1306 buffer and flushes it over I2C.
struct OledSink<DI, SIZE>
where
    SIZE: DisplaySize,
{
    display: Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>,
}

impl<DI, SIZE> FrameSink for OledSink<DI, SIZE>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    type Error = DisplayError;

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), DisplayError> {
        self.display.clear();
        frame.draw(&mut self.display)?;
        self.display.flush()
    }
}

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("PPG pulse oximeter example");

    let mut cp = cortex_m::Peripherals::take().unwrap();
    let mut dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);

    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();
    let clock = CycleClock {
        cycles_per_ms: clocks.sysclk().0 / 1000,
    };
    let delay = Delay::new(cp.SYST, clocks);

    // Emitter pins and the phototransistor input.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let red_led = gpioa
        .pa1
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let ir_led = gpioa
        .pa2
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let phototransistor = gpioa.pa0.into_analog(&mut gpioa.moder, &mut gpioa.pupdr);
    let adc = adc::Adc::adc1(
        dp.ADC1,
        &mut dp.ADC1_2,
        &mut rcc.ahb,
        adc::CkMode::default(),
        clocks,
    );

    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let mut scl =
        gpiob
            .pb6
            .into_af4_open_drain(&mut gpiob.moder, &mut gpiob.otyper, &mut gpiob.afrl);
    let mut sda =
        gpiob
            .pb7
            .into_af4_open_drain(&mut gpiob.moder, &mut gpiob.otyper, &mut gpiob.afrl);
    scl.internal_pull_up(&mut gpiob.pupdr, true);
    sda.internal_pull_up(&mut gpiob.pupdr, true);

    let i2c = hal::i2c::I2c::new(
        dp.I2C1,
        (scl, sda),
        100.kHz().try_into().unwrap(),
        clocks,
        &mut rcc.apb1,
    );

    let interface = I2CDisplayInterface::new(i2c);
    let mut disp = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    disp.init().unwrap();
    disp.flush().unwrap();

    let source = StrobedEmitters::new(red_led, ir_led, adc, phototransistor);
    let sink = OledSink { display: disp };
    let mut oximeter = Oximeter::new(source, clock, sink, delay);

    loop {
        oximeter.cycle().unwrap();
    }
}
