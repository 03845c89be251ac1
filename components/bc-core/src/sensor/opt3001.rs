//! TI OPT3001 ambient light sensor.
//!
//! 16 bit big endian registers. The result register packs a 4 bit exponent and a 12 bit
//! mantissa, one mantissa step is `0.01 lux << exponent`.

use embedded_hal_async::i2c::I2c;

use crate::errno::Errno;
use crate::sensor::{Channel, Sensor, SensorValue, check_len};

pub const DEFAULT_ADDRESS: u8 = 0x44;

const REG_RESULT: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;
const REG_MANUFACTURER_ID: u8 = 0x7E;
const REG_DEVICE_ID: u8 = 0x7F;

const MANUFACTURER_ID: u16 = 0x5449;
const DEVICE_ID: u16 = 0x3001;

const CONVERSION_MODE_MASK: u16 = 0b11 << 9;
const CONVERSION_MODE_CONTINUOUS: u16 = 0b10 << 9;

const MANTISSA_MASK: u16 = 0x0FFF;
const EXPONENT_SHIFT: u16 = 12;

pub struct Opt3001<I: I2c> {
    i2c: I,
    address: u8,
    sample: u16,
}

impl<I: I2c> Opt3001<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address, sample: 0 }
    }

    /// Verify the chip identity and start continuous conversions.
    pub async fn probe(mut self) -> Result<Self, Errno> {
        let manufacturer = self.read_reg(REG_MANUFACTURER_ID).await?;
        if manufacturer != MANUFACTURER_ID {
            warn!("OPT3001> Bad manufacturer id 0x{:x}", manufacturer);
            return Err(Errno::ENODEV);
        }
        let device = self.read_reg(REG_DEVICE_ID).await?;
        if device != DEVICE_ID {
            warn!("OPT3001> Bad device id 0x{:x}", device);
            return Err(Errno::ENODEV);
        }

        let config = self.read_reg(REG_CONFIG).await?;
        let config = (config & !CONVERSION_MODE_MASK) | CONVERSION_MODE_CONTINUOUS;
        self.write_reg(REG_CONFIG, config).await?;
        debug!("OPT3001> Continuous mode, config 0x{:x}", config);
        Ok(self)
    }

    async fn read_reg(&mut self, reg: u8) -> Result<u16, Errno> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(self.address, &[reg], &mut buf).await.map_err(|_| {
            debug!("OPT3001> Read of reg 0x{:x} failed", reg);
            Errno::EIO
        })?;
        Ok(u16::from_be_bytes(buf))
    }

    async fn write_reg(&mut self, reg: u8, value: u16) -> Result<(), Errno> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c.write(self.address, &[reg, hi, lo]).await.map_err(|_| {
            debug!("OPT3001> Write of reg 0x{:x} failed", reg);
            Errno::EIO
        })
    }
}

impl<I: I2c> Sensor for Opt3001<I> {
    async fn sample_fetch(&mut self) -> Result<(), Errno> {
        self.sample = self.read_reg(REG_RESULT).await?;
        trace!("OPT3001> Sample 0x{:x}", self.sample);
        Ok(())
    }

    fn channel_get(&self, channel: Channel, values: &mut [SensorValue]) -> Result<(), Errno> {
        if channel != Channel::Light {
            return Err(Errno::ENOTSUP);
        }
        check_len(channel, values)?;

        let mantissa = (self.sample & MANTISSA_MASK) as u32;
        let exponent = (self.sample >> EXPONENT_SHIFT) as u32;
        let centilux = mantissa << exponent;
        values[0] = SensorValue::new((centilux / 100) as i32, ((centilux % 100) * 10_000) as i32);
        Ok(())
    }
}
