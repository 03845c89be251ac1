use core::convert::Infallible;

use heapless::Vec;

use crate::config::MAX_BUTTON_CALLBACKS;
use crate::errno::Errno;
use crate::gpio::{GpioInterrupt, bit};

/// Handler bound to a set of pins.
///
/// The handler runs on the dispatch path, not on the main loop, and receives the mask of
/// pins that fired.
pub struct GpioCallback<'a> {
    pin_mask: u32,
    handler: &'a dyn Fn(u32),
}

impl<'a> GpioCallback<'a> {
    pub fn new(pin_mask: u32, handler: &'a dyn Fn(u32)) -> Self {
        Self { pin_mask, handler }
    }

    pub fn pin_mask(&self) -> u32 {
        self.pin_mask
    }
}

/// Waits for edges on one interrupt pin and fans them out to the registered callbacks.
pub struct Dispatcher<'a, P: GpioInterrupt> {
    pin: &'a mut P,
    callbacks: Vec<&'a GpioCallback<'a>, MAX_BUTTON_CALLBACKS>,
}

impl<'a, P: GpioInterrupt> Dispatcher<'a, P> {
    pub fn new(pin: &'a mut P) -> Self {
        Self { pin, callbacks: Vec::new() }
    }

    pub fn add_callback(&mut self, callback: &'a GpioCallback<'a>) -> Result<(), Errno> {
        self.callbacks.push(callback).map_err(|_| {
            error!("Button> No room for another callback");
            Errno::ENOSPC
        })
    }

    pub async fn dispatch_once(&mut self) {
        self.pin.wait_for_interrupt().await;
        let fired = bit(self.pin.pin());
        trace!("Button> Edge on pin {}", self.pin.pin());
        for callback in self.callbacks.iter().filter(|cb| cb.pin_mask & fired != 0) {
            (callback.handler)(fired);
        }
    }

    pub async fn run(&mut self) -> Infallible {
        loop {
            self.dispatch_once().await;
        }
    }
}
