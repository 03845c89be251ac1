use bc_core::errno::Errno;
use bc_core::gpio::{Edge, GpioInterrupt, GpioOutput};
use bc_core::{debug, warn};
use embassy_nrf::gpio::{Flex, Level, OutputDrive, Pull};

/// Electrical level that counts as "active" on a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    fn level(self, active: bool) -> Level {
        match (self, active) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => Level::High,
            _ => Level::Low,
        }
    }
}

/// LED on a GPIO pin, left disconnected until configured.
pub struct NrfLed<'d> {
    pin: Flex<'d>,
    number: u8,
    polarity: Polarity,
}

impl<'d> NrfLed<'d> {
    pub fn new(pin: Flex<'d>, number: u8, polarity: Polarity) -> Self {
        Self { pin, number, polarity }
    }
}

impl<'d> GpioOutput for NrfLed<'d> {
    fn configure_output(&mut self, active: bool) -> Result<(), Errno> {
        self.pin.set_level(self.polarity.level(active));
        self.pin.set_as_output(OutputDrive::Standard);
        debug!("Led[{}]> output, active={}", self.number, active);
        Ok(())
    }

    fn toggle(&mut self) {
        self.pin.toggle();
    }
}

/// Push button read through GPIOTE port events.
///
/// Edges are only seen while [`GpioInterrupt::wait_for_interrupt`] is pending, which the
/// dispatcher guarantees between two presses.
pub struct NrfButton<'d> {
    pin: Flex<'d>,
    number: u8,
    pull: Pull,
    polarity: Polarity,
    input: bool,
    armed: Option<Edge>,
}

impl<'d> NrfButton<'d> {
    pub fn new(pin: Flex<'d>, number: u8, pull: Pull, polarity: Polarity) -> Self {
        Self {
            pin,
            number,
            pull,
            polarity,
            input: false,
            armed: None,
        }
    }
}

impl<'d> GpioInterrupt for NrfButton<'d> {
    fn pin(&self) -> u8 {
        self.number
    }

    fn configure_input(&mut self) -> Result<(), Errno> {
        self.pin.set_as_input(self.pull);
        self.input = true;
        Ok(())
    }

    fn configure_interrupt(&mut self, edge: Edge) -> Result<(), Errno> {
        if !self.input {
            warn!("Button[{}]> interrupt on a pin that is not an input", self.number);
            return Err(Errno::EINVAL);
        }
        self.armed = Some(edge);
        debug!("Button[{}]> armed on {:?}", self.number, edge);
        Ok(())
    }

    async fn wait_for_interrupt(&mut self) {
        let Some(Edge::ToActive) = self.armed else {
            return core::future::pending().await;
        };
        match self.polarity {
            Polarity::ActiveLow => self.pin.wait_for_falling_edge().await,
            Polarity::ActiveHigh => self.pin.wait_for_rising_edge().await,
        }
    }
}
