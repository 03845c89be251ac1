//! Particle Xenon wiring and the registry that hands its peripherals out.

use bc_core::errno::Errno;
use bc_core::flash::{self, JedecId};
use bc_core::registry::{DeviceRegistry, Labels};
use bc_core::sensor::hdc2010::{self, Hdc2010};
use bc_core::sensor::lis2dh::{self, Lis2dh};
use bc_core::sensor::opt3001::{self, Opt3001};
use bc_core::{info, warn};
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_nrf::twim::{self, Twim};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;

use crate::driver::qspi_flash::QspiFlash;
use crate::gpio::{NrfButton, NrfLed};

pub const BUTTON_PIN: u8 = 11;
pub const LED0_PIN: u8 = 12;
pub const LED1_PIN: u8 = 13;

pub const LABELS: Labels = Labels {
    light: "OPT3001",
    temp_rh: "HDC2010",
    accel: "LIS2DH",
    led0: "GPIO_1",
    led1: "GPIO_0",
    button: "GPIO_0",
    flash: "MX25L3233F",
    button_pin: BUTTON_PIN,
};

/// MX25L3233F: Macronix, serial NOR, 32 Mbit.
pub const EXPECTED_JEDEC_ID: JedecId = JedecId([0xC2, 0x20, 0x16]);

pub const UART_BUFFER_SIZE: usize = 256;

pub const TWIM_BUFFER_SIZE: usize = 16;

pub fn twim_config() -> twim::Config {
    let mut config = twim::Config::default();
    config.frequency = twim::Frequency::K400;
    config
}

pub type I2cBus = Mutex<NoopRawMutex, Twim<'static>>;
pub type SharedI2c = I2cDevice<'static, NoopRawMutex, Twim<'static>>;

pub struct Registry {
    bus: &'static I2cBus,
    light: Option<u8>,
    temp_rh: Option<u8>,
    accel: Option<u8>,
    led0: Option<NrfLed<'static>>,
    led1: Option<NrfLed<'static>>,
    button: Option<NrfButton<'static>>,
    flash: Option<QspiFlash<'static>>,
}

impl Registry {
    pub fn new(
        bus: &'static I2cBus,
        led0: NrfLed<'static>,
        led1: NrfLed<'static>,
        button: NrfButton<'static>,
        flash: QspiFlash<'static>,
    ) -> Self {
        Self {
            bus,
            light: Some(opt3001::DEFAULT_ADDRESS),
            temp_rh: Some(hdc2010::DEFAULT_ADDRESS),
            accel: Some(lis2dh::DEFAULT_ADDRESS),
            led0: Some(led0),
            led1: Some(led1),
            button: Some(button),
            flash: Some(flash),
        }
    }
}

fn probed<T>(part: &str, result: Result<T, Errno>) -> Option<T> {
    match result {
        Ok(device) => {
            info!("Registry> {} up", part);
            Some(device)
        }
        Err(_errno) => {
            warn!("Registry> {} probe failed: {}", part, _errno);
            None
        }
    }
}

impl DeviceRegistry for Registry {
    type Light = Opt3001<SharedI2c>;
    type TempRh = Hdc2010<SharedI2c, Delay>;
    type Accel = Lis2dh<SharedI2c>;
    type Led = NrfLed<'static>;
    type Button = NrfButton<'static>;
    type Flash = QspiFlash<'static>;

    async fn light_sensor(&mut self) -> Option<Self::Light> {
        let address = self.light.take()?;
        probed(LABELS.light, Opt3001::new(I2cDevice::new(self.bus), address).probe().await)
    }

    async fn temp_rh_sensor(&mut self) -> Option<Self::TempRh> {
        let address = self.temp_rh.take()?;
        probed(LABELS.temp_rh, Hdc2010::new(I2cDevice::new(self.bus), Delay, address).probe().await)
    }

    async fn accel_sensor(&mut self) -> Option<Self::Accel> {
        let address = self.accel.take()?;
        probed(LABELS.accel, Lis2dh::new(I2cDevice::new(self.bus), address).probe().await)
    }

    fn led0(&mut self) -> Option<Self::Led> {
        self.led0.take()
    }

    fn led1(&mut self) -> Option<Self::Led> {
        self.led1.take()
    }

    fn button(&mut self) -> Option<Self::Button> {
        self.button.take()
    }

    async fn flash(&mut self) -> Option<Self::Flash> {
        flash::probe(self.flash.take()?, EXPECTED_JEDEC_ID).await
    }
}
