#![allow(async_fn_in_trait)]

pub mod hdc2010;
pub mod lis2dh;
pub mod opt3001;

use crate::errno::Errno;

/// Fixed point sensor value: integer part plus millionths.
///
/// Both parts carry the same sign for values produced by the conversions in this crate,
/// except where a driver reproduces a chip-specific formula (see `hdc2010`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorValue {
    pub val1: i32,
    pub val2: i32,
}

impl SensorValue {
    pub const fn new(val1: i32, val2: i32) -> Self {
        Self { val1, val2 }
    }

    /// Split a value expressed in millionths into integer and fractional parts.
    pub const fn from_micros(micros: i64) -> Self {
        Self {
            val1: (micros / 1_000_000) as i32,
            val2: (micros % 1_000_000) as i32,
        }
    }

    pub fn to_f64(self) -> f64 {
        self.val1 as f64 + self.val2 as f64 / 1_000_000.0
    }
}

/// Physical quantity a sensor can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Light,
    AmbientTemp,
    Humidity,
    AccelXyz,
}

impl Channel {
    /// Number of values `channel_get` writes for this channel.
    pub const fn value_count(self) -> usize {
        match self {
            Channel::AccelXyz => 3,
            _ => 1,
        }
    }
}

/// Sample-then-read sensor interface.
///
/// `sample_fetch` latches a fresh sample inside the driver, `channel_get` converts the
/// latched sample without touching the bus.
pub trait Sensor {
    async fn sample_fetch(&mut self) -> Result<(), Errno>;

    fn channel_get(&self, channel: Channel, values: &mut [SensorValue]) -> Result<(), Errno>;
}

pub(crate) fn check_len(channel: Channel, values: &[SensorValue]) -> Result<(), Errno> {
    if values.len() < channel.value_count() {
        Err(Errno::EINVAL)
    } else {
        Ok(())
    }
}
