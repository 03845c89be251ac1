//! TI HDC2010 humidity and temperature sensor, on-demand measurement mode.

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use crate::errno::Errno;
use crate::sensor::{Channel, Sensor, SensorValue, check_len};

pub const DEFAULT_ADDRESS: u8 = 0x40;

const REG_TEMP_LOW: u8 = 0x00;
const REG_CONFIG: u8 = 0x0E;
const REG_MEAS_CONFIG: u8 = 0x0F;
const REG_MANUFACTURER_ID: u8 = 0xFC;
const REG_DEVICE_ID: u8 = 0xFE;

const MANUFACTURER_ID: u16 = 0x5449;
const DEVICE_ID: u16 = 0x07D0;

const CONFIG_SOFT_RESET: u8 = 0x80;
const MEAS_TRIG: u8 = 0x01;

const RESET_TIME_MS: u32 = 1;
// 14 bit temperature and humidity back to back take ~1.3 ms
const CONVERSION_TIME_MS: u32 = 2;

pub struct Hdc2010<I: I2c, D: DelayNs> {
    i2c: I,
    delay: D,
    address: u8,
    temp_sample: u16,
    rh_sample: u16,
}

impl<I: I2c, D: DelayNs> Hdc2010<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            temp_sample: 0,
            rh_sample: 0,
        }
    }

    /// Verify the chip identity and soft reset it.
    pub async fn probe(mut self) -> Result<Self, Errno> {
        let manufacturer = self.read_id(REG_MANUFACTURER_ID).await?;
        if manufacturer != MANUFACTURER_ID {
            warn!("HDC2010> Bad manufacturer id 0x{:x}", manufacturer);
            return Err(Errno::ENODEV);
        }
        let device = self.read_id(REG_DEVICE_ID).await?;
        if device != DEVICE_ID {
            warn!("HDC2010> Bad device id 0x{:x}", device);
            return Err(Errno::ENODEV);
        }

        self.write_reg(REG_CONFIG, CONFIG_SOFT_RESET).await?;
        self.delay.delay_ms(RESET_TIME_MS).await;
        debug!("HDC2010> Reset done");
        Ok(self)
    }

    async fn read_id(&mut self, reg: u8) -> Result<u16, Errno> {
        let mut buf = [0u8; 2];
        self.read_regs(reg, &mut buf).await?;
        Ok(u16::from_le_bytes(buf))
    }

    async fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Errno> {
        self.i2c.write_read(self.address, &[reg], buf).await.map_err(|_| {
            debug!("HDC2010> Read of reg 0x{:x} failed", reg);
            Errno::EIO
        })
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Errno> {
        self.i2c.write(self.address, &[reg, value]).await.map_err(|_| {
            debug!("HDC2010> Write of reg 0x{:x} failed", reg);
            Errno::EIO
        })
    }
}

impl<I: I2c, D: DelayNs> Sensor for Hdc2010<I, D> {
    async fn sample_fetch(&mut self) -> Result<(), Errno> {
        self.write_reg(REG_MEAS_CONFIG, MEAS_TRIG).await?;
        self.delay.delay_ms(CONVERSION_TIME_MS).await;

        let mut buf = [0u8; 4];
        self.read_regs(REG_TEMP_LOW, &mut buf).await?;
        self.temp_sample = u16::from_le_bytes([buf[0], buf[1]]);
        self.rh_sample = u16::from_le_bytes([buf[2], buf[3]]);
        trace!("HDC2010> Sample t=0x{:x} rh=0x{:x}", self.temp_sample, self.rh_sample);
        Ok(())
    }

    fn channel_get(&self, channel: Channel, values: &mut [SensorValue]) -> Result<(), Errno> {
        check_len(channel, values)?;
        match channel {
            // -40 + 165 * sample / 2^16; the fraction is not re-signed below zero, which the
            // console format reproduces as is
            Channel::AmbientTemp => {
                let tmp = self.temp_sample as u32 * 165;
                values[0] = SensorValue::new((tmp >> 16) as i32 - 40, fraction_micros(tmp));
            }
            // 100 * sample / 2^16
            Channel::Humidity => {
                let tmp = self.rh_sample as u32 * 100;
                values[0] = SensorValue::new((tmp >> 16) as i32, fraction_micros(tmp));
            }
            _ => return Err(Errno::ENOTSUP),
        }
        Ok(())
    }
}

/// Low 16 bits as millionths: x * 1_000_000 / 65536 == x * 15625 / 1024
fn fraction_micros(tmp: u32) -> i32 {
    (((tmp & 0xFFFF) * 15_625) >> 10) as i32
}
