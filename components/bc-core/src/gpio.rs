#![allow(async_fn_in_trait)]

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

use crate::device::{Device, Error};
use crate::errno::Errno;

/// Edge that arms a pin interrupt, relative to the pin's active level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    ToActive,
}

/// Output pin driven through the board's GPIO controller.
pub trait GpioOutput {
    /// Configure as output and drive the initial logical level (`true` = active).
    fn configure_output(&mut self, active: bool) -> Result<(), Errno>;

    fn toggle(&mut self);
}

/// Input pin with edge interrupt support.
pub trait GpioInterrupt {
    fn pin(&self) -> u8;

    fn configure_input(&mut self) -> Result<(), Errno>;

    fn configure_interrupt(&mut self, edge: Edge) -> Result<(), Errno>;

    /// Resolves once per fired edge. Never resolves while no interrupt is armed.
    async fn wait_for_interrupt(&mut self);
}

/// Bit mask for a single pin, as used by callback registration.
pub const fn bit(pin: u8) -> u32 {
    1 << pin
}

/// Output pin shared between the main loop and the interrupt dispatch path.
///
/// Every access runs inside the raw mutex, a toggle can never be lost to a concurrent
/// toggle of the same pin.
pub struct SharedLed<M: RawMutex, P: GpioOutput> {
    label: &'static str,
    inner: Mutex<M, RefCell<Option<P>>>,
}

impl<M: RawMutex, P: GpioOutput> SharedLed<M, P> {
    pub fn new(device: Device<P>) -> Self {
        let label = device.label();
        Self {
            label,
            inner: Mutex::new(RefCell::new(device.into_inner())),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock(|led| led.borrow().is_some())
    }

    pub fn toggle(&self) -> Result<(), Error> {
        self.with(|led| led.toggle())
    }

    fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> Result<R, Error> {
        self.inner.lock(|led| led.borrow_mut().as_mut().map(f).ok_or(Error::Absent))
    }
}
