#![allow(async_fn_in_trait)]

use crate::device::Device;
use crate::flash::FlashDevice;
use crate::gpio::{GpioInterrupt, GpioOutput};
use crate::sensor::Sensor;

/// Fixed names the board's peripherals are looked up by, plus the button's pin number
/// for diagnostics that have to name it even when the lookup failed.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Labels {
    pub light: &'static str,
    pub temp_rh: &'static str,
    pub accel: &'static str,
    pub led0: &'static str,
    pub led1: &'static str,
    pub button: &'static str,
    pub flash: &'static str,
    pub button_pin: u8,
}

/// Source of peripheral handles.
///
/// Every lookup hands out its peripheral at most once. `None` means the device does not
/// exist or its driver failed to come up; callers treat that as permanent.
pub trait DeviceRegistry {
    type Light: Sensor;
    type TempRh: Sensor;
    type Accel: Sensor;
    type Led: GpioOutput;
    type Button: GpioInterrupt;
    type Flash: FlashDevice;

    async fn light_sensor(&mut self) -> Option<Self::Light>;
    async fn temp_rh_sensor(&mut self) -> Option<Self::TempRh>;
    async fn accel_sensor(&mut self) -> Option<Self::Accel>;
    fn led0(&mut self) -> Option<Self::Led>;
    fn led1(&mut self) -> Option<Self::Led>;
    fn button(&mut self) -> Option<Self::Button>;
    async fn flash(&mut self) -> Option<Self::Flash>;
}

/// Handles for everything the demo touches, each bound to its label.
pub struct Board<R: DeviceRegistry> {
    pub light: Device<R::Light>,
    pub temp_rh: Device<R::TempRh>,
    pub accel: Device<R::Accel>,
    pub led0: Device<R::Led>,
    pub led1: Device<R::Led>,
    pub button: Device<R::Button>,
    pub flash: Device<R::Flash>,
    pub button_pin: u8,
}

impl<R: DeviceRegistry> Board<R> {
    /// Look every peripheral up once, in a fixed order.
    pub async fn acquire(registry: &mut R, labels: &Labels) -> Self {
        info!("Board> Acquiring peripherals");
        let board = Self {
            light: Device::bind(labels.light, registry.light_sensor().await),
            temp_rh: Device::bind(labels.temp_rh, registry.temp_rh_sensor().await),
            accel: Device::bind(labels.accel, registry.accel_sensor().await),
            led0: Device::bind(labels.led0, registry.led0()),
            led1: Device::bind(labels.led1, registry.led1()),
            flash: Device::bind(labels.flash, registry.flash().await),
            button: Device::bind(labels.button, registry.button()),
            button_pin: labels.button_pin,
        };
        info!(
            "Board> light={} temp_rh={} accel={} flash={}",
            board.light.is_ready(),
            board.temp_rh.is_ready(),
            board.accel.is_ready(),
            board.flash.is_ready()
        );
        board
    }
}
