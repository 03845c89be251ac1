//! ST LIS2DH12 accelerometer in polled mode.
//!
//! The sensor free-runs at 10 Hz, so a poll every couple of seconds normally finds the
//! overrun flag set. The sample is latched anyway and the fetch reports `-EBADMSG`, the
//! caller decides whether that matters.

use embedded_hal_async::i2c::I2c;

use crate::errno::Errno;
use crate::sensor::{Channel, Sensor, SensorValue, check_len};

pub const DEFAULT_ADDRESS: u8 = 0x19;

const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL1: u8 = 0x20;
const REG_CTRL4: u8 = 0x23;
const REG_STATUS: u8 = 0x27;
const AUTO_INCREMENT: u8 = 0x80;

const CHIP_ID: u8 = 0x33;

const CTRL1_ODR_10HZ: u8 = 0x2 << 4;
const CTRL1_XYZ_EN: u8 = 0x07;
const CTRL4_BDU: u8 = 0x80;
const CTRL4_HR: u8 = 0x08;

const STATUS_ZYXDA: u8 = 0x08;
const STATUS_ZYXOR: u8 = 0x80;

// high resolution, +-2 g: 12 bit left justified, 1 mg per digit
const MG_PER_DIGIT: i64 = 1;
const NANO_MS2_PER_MG: i64 = 9_806_650;

pub struct Lis2dh<I: I2c> {
    i2c: I,
    address: u8,
    sample: [i16; 3],
}

impl<I: I2c> Lis2dh<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self {
            i2c,
            address,
            sample: [0; 3],
        }
    }

    /// Verify WHO_AM_I and start 10 Hz high resolution sampling on all axes.
    pub async fn probe(mut self) -> Result<Self, Errno> {
        let mut id = [0u8; 1];
        self.read_regs(REG_WHO_AM_I, &mut id).await?;
        if id[0] != CHIP_ID {
            warn!("LIS2DH> Bad chip id 0x{:x}", id[0]);
            return Err(Errno::ENODEV);
        }

        self.write_reg(REG_CTRL4, CTRL4_BDU | CTRL4_HR).await?;
        self.write_reg(REG_CTRL1, CTRL1_ODR_10HZ | CTRL1_XYZ_EN).await?;
        debug!("LIS2DH> Sampling at 10 Hz");
        Ok(self)
    }

    async fn read_regs(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Errno> {
        let reg = if buf.len() > 1 { reg | AUTO_INCREMENT } else { reg };
        self.i2c.write_read(self.address, &[reg], buf).await.map_err(|_| {
            debug!("LIS2DH> Read of reg 0x{:x} failed", reg);
            Errno::EIO
        })
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Errno> {
        self.i2c.write(self.address, &[reg, value]).await.map_err(|_| {
            debug!("LIS2DH> Write of reg 0x{:x} failed", reg);
            Errno::EIO
        })
    }
}

impl<I: I2c> Sensor for Lis2dh<I> {
    async fn sample_fetch(&mut self) -> Result<(), Errno> {
        let mut raw = [0u8; 7];
        self.read_regs(REG_STATUS, &mut raw).await?;

        let status = raw[0];
        for (axis, bytes) in self.sample.iter_mut().zip(raw[1..].chunks_exact(2)) {
            *axis = i16::from_le_bytes([bytes[0], bytes[1]]);
        }
        trace!("LIS2DH> Status 0x{:x} sample {:?}", status, self.sample);

        if status & STATUS_ZYXOR != 0 {
            Err(Errno::EBADMSG)
        } else if status & STATUS_ZYXDA != 0 {
            Ok(())
        } else {
            Err(Errno::ENODATA)
        }
    }

    fn channel_get(&self, channel: Channel, values: &mut [SensorValue]) -> Result<(), Errno> {
        if channel != Channel::AccelXyz {
            return Err(Errno::ENOTSUP);
        }
        check_len(channel, values)?;

        for (value, raw) in values.iter_mut().zip(self.sample) {
            let counts = (raw >> 4) as i64;
            *value = SensorValue::from_micros(counts * MG_PER_DIGIT * NANO_MS2_PER_MG / 1000);
        }
        Ok(())
    }
}
