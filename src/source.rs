//! Two-wavelength strobe-and-read sampling over a shared photodetector.

use embedded_hal::adc::{Channel as AdcChannel, OneShot};
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::SETTLE_DELAY_MS;

/// Emitter wavelength selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Red, 660 nm.
    Red,
    /// Infrared, 940 nm.
    Ir,
}

/// Errors while driving the emitters or the photodetector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<PinE, AdcE> {
    /// Emitter pin error.
    Pin(PinE),
    /// Photodetector read error.
    Adc(AdcE),
}

/// Capability producing one reflected-intensity reading per strobe.
pub trait PpgSource {
    type Error;

    /// Illuminates with the selected channel, waits for the photodetector to
    /// settle and reads the reflected intensity.
    fn strobe_and_read<D: DelayMs<u16>>(
        &mut self,
        channel: Channel,
        delay: &mut D,
    ) -> Result<u16, Self::Error>;

    /// Reads both channels of one measurement cycle, red first.
    fn sample_cycle<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<(u16, u16), Self::Error> {
        let red = self.strobe_and_read(Channel::Red, delay)?;
        let ir = self.strobe_and_read(Channel::Ir, delay)?;
        Ok((red, ir))
    }
}

/// Two emitter pins sharing one photodetector ADC channel.
///
/// Only one emitter is enabled at a time so the channels cannot cross-talk
/// optically. Each reading happens after the settle delay, while its own
/// emitter is the only light source.
pub struct StrobedEmitters<RED, IR, ADC, PIN> {
    red: RED,
    ir: IR,
    adc: ADC,
    photodetector: PIN,
}

impl<RED, IR, ADC, PIN> StrobedEmitters<RED, IR, ADC, PIN> {
    pub fn new(red: RED, ir: IR, adc: ADC, photodetector: PIN) -> Self {
        Self {
            red,
            ir,
            adc,
            photodetector,
        }
    }

    /// Releases the peripherals.
    pub fn destroy(self) -> (RED, IR, ADC, PIN) {
        (self.red, self.ir, self.adc, self.photodetector)
    }
}

impl<RED, IR, ADC, PIN, PinE, AdcE> PpgSource for StrobedEmitters<RED, IR, ADC, PIN>
where
    RED: OutputPin<Error = PinE>,
    IR: OutputPin<Error = PinE>,
    ADC: OneShot<ADC, u16, PIN, Error = AdcE>,
    PIN: AdcChannel<ADC>,
{
    type Error = Error<PinE, AdcE>;

    fn strobe_and_read<D: DelayMs<u16>>(
        &mut self,
        channel: Channel,
        delay: &mut D,
    ) -> Result<u16, Self::Error> {
        match channel {
            Channel::Red => self.red.set_high().map_err(Error::Pin)?,
            Channel::Ir => self.ir.set_high().map_err(Error::Pin)?,
        }
        delay.delay_ms(SETTLE_DELAY_MS);
        let intensity = nb::block!(self.adc.read(&mut self.photodetector)).map_err(Error::Adc)?;
        match channel {
            Channel::Red => self.red.set_low().map_err(Error::Pin)?,
            Channel::Ir => self.ir.set_low().map_err(Error::Pin)?,
        }
        Ok(intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        On(Channel),
        Off(Channel),
        Settle(u16),
        Read,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct FakePin {
        channel: Channel,
        log: Log,
    }

    impl OutputPin for FakePin {
        type Error = Infallible;

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(Event::On(self.channel));
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.log.borrow_mut().push(Event::Off(self.channel));
            Ok(())
        }
    }

    struct FakeDelay {
        log: Log,
    }

    impl DelayMs<u16> for FakeDelay {
        fn delay_ms(&mut self, ms: u16) {
            self.log.borrow_mut().push(Event::Settle(ms));
        }
    }

    struct FakeInput;

    impl AdcChannel<FakeAdc> for FakeInput {
        type ID = u8;

        fn channel() -> u8 {
            0
        }
    }

    struct FakeAdc {
        readings: Vec<u16>,
        log: Log,
    }

    impl OneShot<FakeAdc, u16, FakeInput> for FakeAdc {
        type Error = Infallible;

        fn read(&mut self, _pin: &mut FakeInput) -> nb::Result<u16, Infallible> {
            self.log.borrow_mut().push(Event::Read);
            Ok(self.readings.remove(0))
        }
    }

    fn fixture(readings: Vec<u16>) -> (StrobedEmitters<FakePin, FakePin, FakeAdc, FakeInput>, FakeDelay, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let source = StrobedEmitters::new(
            FakePin {
                channel: Channel::Red,
                log: Rc::clone(&log),
            },
            FakePin {
                channel: Channel::Ir,
                log: Rc::clone(&log),
            },
            FakeAdc {
                readings,
                log: Rc::clone(&log),
            },
            FakeInput,
        );
        let delay = FakeDelay {
            log: Rc::clone(&log),
        };
        (source, delay, log)
    }

    #[test]
    fn strobe_enables_settles_reads_then_disables() {
        let (mut source, mut delay, log) = fixture(vec![1234]);
        let value = source.strobe_and_read(Channel::Red, &mut delay).unwrap();
        assert_eq!(value, 1234);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::On(Channel::Red),
                Event::Settle(SETTLE_DELAY_MS),
                Event::Read,
                Event::Off(Channel::Red),
            ]
        );
    }

    #[test]
    fn sample_cycle_reads_red_then_ir_without_overlap() {
        let (mut source, mut delay, log) = fixture(vec![9000, 1200]);
        let (red, ir) = source.sample_cycle(&mut delay).unwrap();
        assert_eq!((red, ir), (9000, 1200));
        let events = log.borrow();
        assert_eq!(
            *events,
            vec![
                Event::On(Channel::Red),
                Event::Settle(SETTLE_DELAY_MS),
                Event::Read,
                Event::Off(Channel::Red),
                Event::On(Channel::Ir),
                Event::Settle(SETTLE_DELAY_MS),
                Event::Read,
                Event::Off(Channel::Ir),
            ]
        );
        // An emitter is always switched off before the other goes on.
        let ir_on = events.iter().position(|e| *e == Event::On(Channel::Ir));
        let red_off = events.iter().position(|e| *e == Event::Off(Channel::Red));
        assert!(red_off < ir_on);
    }
}
