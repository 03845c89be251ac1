//! Startup sequence and poll loop of the sensor demo.
//!
//! Two activities share the board after setup: the poll loop, which owns the console, the
//! sensors and LED0, and the button dispatcher, which only ever toggles LED1.

use core::convert::Infallible;

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use embedded_io_async::Write;

use crate::button::{Dispatcher, GpioCallback};
use crate::console::Console;
use crate::device::Device;
use crate::display::{display_accel, display_light, display_temp_rh};
use crate::flash::FlashDevice;
use crate::gpio::{Edge, GpioInterrupt, GpioOutput, SharedLed, bit};
use crate::registry::{Board, DeviceRegistry};
use crate::sensor::Sensor;

/// Why [`Demo::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Exit {
    FlashMissing,
}

/// Everything the poll loop touches on each iteration.
pub struct Poller<R: DeviceRegistry> {
    pub light: Device<R::Light>,
    pub temp_rh: Device<R::TempRh>,
    pub accel: Device<R::Accel>,
    pub led0: Device<R::Led>,
}

impl<R: DeviceRegistry> Poller<R> {
    /// Toggle LED0, print one line per present sensor, then the separator.
    pub async fn poll_once<W: Write>(&mut self, console: &mut Console<W>) {
        if let Ok(led) = self.led0.get_mut() {
            led.toggle();
        }
        display_light(&mut self.light, console).await;
        display_temp_rh(&mut self.temp_rh, console).await;
        display_accel(&mut self.accel, console).await;
        console.blank().await;
    }
}

pub struct Demo<R: DeviceRegistry, M: RawMutex> {
    poller: Poller<R>,
    led1: SharedLed<M, R::Led>,
    button: Device<R::Button>,
    button_pin: u8,
    flash: Device<R::Flash>,
}

impl<R: DeviceRegistry, M: RawMutex> Demo<R, M> {
    /// Report each device and configure the LEDs and the button.
    ///
    /// Nothing here is fatal, failures are printed and the demo carries on with whatever
    /// came up.
    pub async fn setup<W: Write>(board: Board<R>, console: &mut Console<W>) -> Self {
        let Board {
            light,
            temp_rh,
            accel,
            mut led0,
            mut led1,
            mut button,
            button_pin,
            flash,
        } = board;

        report_ready(&light, console).await;
        report_ready(&temp_rh, console).await;
        report_ready(&accel, console).await;

        configure_led("LED0", &mut led0, console).await;
        configure_led("LED1", &mut led1, console).await;
        configure_button(&mut button, button_pin, console).await;

        Self {
            poller: Poller {
                light,
                temp_rh,
                accel,
                led0,
            },
            led1: SharedLed::new(led1),
            button,
            button_pin,
            flash,
        }
    }

    /// Register the LED1 toggle, probe the flash and poll forever.
    ///
    /// Returns only when the flash device is missing.
    pub async fn run<W: Write, D: DelayNs>(&mut self, console: &mut Console<W>, mut delay: D, interval_ms: u32) -> Exit {
        let Self {
            poller,
            led1,
            button,
            button_pin,
            flash,
        } = self;

        let toggle_led1 = |_pins: u32| {
            if led1.toggle().is_err() {
                trace!("Demo> Button pressed, no {} to toggle", led1.label());
            }
        };
        let callback = GpioCallback::new(bit(*button_pin), &toggle_led1);

        let label = button.label();
        let mut dispatcher = button.get_mut().ok().map(Dispatcher::new);
        if let Some(dispatcher) = dispatcher.as_mut() {
            if let Err(_errno) = dispatcher.add_callback(&callback) {
                warn!("Demo> {} callback not registered: {}", label, _errno);
            }
            console
                .line(format_args!("Set up button at {} pin {}", label, button_pin))
                .await;
        }

        let dispatch = async {
            match dispatcher.as_mut() {
                Some(dispatcher) => dispatcher.run().await,
                None => core::future::pending::<Infallible>().await,
            }
        };

        let main_loop = async {
            if let Err(exit) = probe_flash(flash, console).await {
                return exit;
            }
            let hz = 1000.0 / interval_ms as f32;
            info!("Demo> Polling every {} ms", interval_ms);
            console.line(format_args!("Polling at {} Hz", hz)).await;
            loop {
                poller.poll_once(console).await;
                delay.delay_ms(interval_ms).await;
            }
        };

        match select(dispatch, main_loop).await {
            Either::First(never) => match never {},
            Either::Second(exit) => exit,
        }
    }

    pub fn led1(&self) -> &SharedLed<M, R::Led> {
        &self.led1
    }
}

async fn report_ready<S: Sensor, W: Write>(device: &Device<S>, console: &mut Console<W>) {
    if device.is_ready() {
        console.line(format_args!("{} Ready!", device.label())).await;
    } else {
        console.line(format_args!("Could not get {} device", device.label())).await;
    }
}

async fn configure_led<P: GpioOutput, W: Write>(name: &str, device: &mut Device<P>, console: &mut Console<W>) {
    let configured = match device.get_mut() {
        Ok(led) => led.configure_output(true).map_err(Into::into),
        Err(err) => Err(err),
    };
    if let Err(_err) = configured {
        warn!("Demo> {} not configured: {}", name, _err);
        console.line(format_args!("Could not configure {}", name)).await;
    }
}

async fn configure_button<P: GpioInterrupt, W: Write>(device: &mut Device<P>, pin: u8, console: &mut Console<W>) {
    let label = device.label();
    let Ok(button) = device.get_mut() else {
        console
            .line(format_args!("Error: failed to configure {} pin {}", label, pin))
            .await;
        return;
    };
    if let Err(errno) = button.configure_input() {
        warn!("Demo> Button input failed: {}", errno);
        console
            .line(format_args!("Error: failed to configure {} pin {}", label, pin))
            .await;
    }
    if let Err(errno) = button.configure_interrupt(Edge::ToActive) {
        warn!("Demo> Button interrupt failed: {}", errno);
        console
            .line(format_args!("Error: failed to configure interrupt on {} pin {}", label, pin))
            .await;
    }
}

async fn probe_flash<F: FlashDevice, W: Write>(device: &mut Device<F>, console: &mut Console<W>) -> Result<(), Exit> {
    let label = device.label();
    let Ok(flash) = device.get_mut() else {
        error!("Demo> Flash {} missing, stopping", label);
        console
            .line(format_args!("SPI flash driver {} was not found!", label))
            .await;
        return Err(Exit::FlashMissing);
    };
    match flash.read_jedec_id().await {
        Ok(id) => console.line(format_args!("Flash ID: {}", id)).await,
        Err(errno) => {
            warn!("Demo> JEDEC id read failed: {}", errno);
            console.line(format_args!("Error: Cannot read flash ID")).await
        }
    }
    Ok(())
}
