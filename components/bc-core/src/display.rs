//! One console line per sensor per poll.

use core::fmt;

use embedded_io_async::Write;

use crate::config::{ACCEL_PART, LIGHT_PART, TEMP_RH_PART};
use crate::console::Console;
use crate::device::Device;
use crate::errno::Errno;
use crate::sensor::{Channel, Sensor, SensorValue};

pub struct Light(pub SensorValue);

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Light: {:.6}", self.0.to_f64())
    }
}

/// Printed straight from the fixed point parts, without going through a float.
pub struct TempRh {
    pub temperature: SensorValue,
    pub humidity: SensorValue,
}

impl fmt::Display for TempRh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Temp = {}.{:06} C, RH = {}.{:06} %",
            self.temperature.val1, self.temperature.val2, self.humidity.val1, self.humidity.val2
        )
    }
}

pub struct Accel(pub [SensorValue; 3]);

impl fmt::Display for Accel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.0;
        write!(f, "x {:.6} , y {:.6} , z {:.6}", x.to_f64(), y.to_f64(), z.to_f64())
    }
}

pub struct UpdateFailed {
    pub part: &'static str,
    pub errno: Errno,
}

impl fmt::Display for UpdateFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {} Update failed: {}", self.part, self.errno)
    }
}

pub async fn read_light<S: Sensor>(sensor: &mut S) -> Result<Light, Errno> {
    sensor.sample_fetch().await?;
    let mut lux = [SensorValue::default()];
    sensor.channel_get(Channel::Light, &mut lux)?;
    Ok(Light(lux[0]))
}

pub async fn read_temp_rh<S: Sensor>(sensor: &mut S) -> Result<TempRh, Errno> {
    sensor.sample_fetch().await?;
    let mut temperature = [SensorValue::default()];
    let mut humidity = [SensorValue::default()];
    sensor.channel_get(Channel::AmbientTemp, &mut temperature)?;
    sensor.channel_get(Channel::Humidity, &mut humidity)?;
    Ok(TempRh {
        temperature: temperature[0],
        humidity: humidity[0],
    })
}

/// An overrun still latches the newest sample, so it is read like a fresh one.
pub async fn read_accel<S: Sensor>(sensor: &mut S) -> Result<Accel, Errno> {
    match sensor.sample_fetch().await {
        Ok(()) => {}
        Err(Errno::EBADMSG) => trace!("Accel> Overrun"),
        Err(errno) => return Err(errno),
    }
    let mut xyz = [SensorValue::default(); 3];
    sensor.channel_get(Channel::AccelXyz, &mut xyz)?;
    Ok(Accel(xyz))
}

pub async fn display_light<S: Sensor, W: Write>(device: &mut Device<S>, console: &mut Console<W>) {
    let Ok(sensor) = device.get_mut() else {
        return;
    };
    let reading = read_light(sensor).await;
    report(console, LIGHT_PART, reading).await;
}

pub async fn display_temp_rh<S: Sensor, W: Write>(device: &mut Device<S>, console: &mut Console<W>) {
    let Ok(sensor) = device.get_mut() else {
        return;
    };
    let reading = read_temp_rh(sensor).await;
    report(console, TEMP_RH_PART, reading).await;
}

pub async fn display_accel<S: Sensor, W: Write>(device: &mut Device<S>, console: &mut Console<W>) {
    let Ok(sensor) = device.get_mut() else {
        return;
    };
    let reading = read_accel(sensor).await;
    report(console, ACCEL_PART, reading).await;
}

async fn report<W: Write, R: fmt::Display>(console: &mut Console<W>, part: &'static str, reading: Result<R, Errno>) {
    match reading {
        Ok(reading) => console.line(format_args!("{}", reading)).await,
        Err(errno) => {
            warn!("Display> {} failed with {}", part, errno);
            console.line(format_args!("{}", UpdateFailed { part, errno })).await
        }
    }
}
