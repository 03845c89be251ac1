//! Host side stand-ins for the board peripherals.
//!
//! Every mock is a cheap handle onto shared state: clone it before handing it out and keep
//! the clone to inspect or drive the peripheral from the test.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Instant;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel as EdgeChannel;
use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource, Operation};
use embedded_hal_async::delay::DelayNs;

use crate::errno::Errno;
use crate::flash::{FlashDevice, JedecId};
use crate::gpio::{Edge, GpioInterrupt, GpioOutput};
use crate::registry::{DeviceRegistry, Labels};
use crate::sensor::{Channel, Sensor, SensorValue};

pub const TEST_LABELS: Labels = Labels {
    light: "OPT3001",
    temp_rh: "HDC2010",
    accel: "LIS2DH",
    led0: "LED0",
    led1: "LED1",
    button: "GPIO_0",
    flash: "MX25L3233F",
    button_pin: 11,
};

// ---- I2C

#[derive(Default)]
struct I2cState {
    address: u8,
    regs: HashMap<u8, Vec<u8>>,
    pointer: u8,
    writes: Vec<Vec<u8>>,
    failing: bool,
}

/// Register file behind a single I2C address.
///
/// A write sets the register pointer from its first byte; any further bytes are stored
/// at that register and logged. A read returns the bytes stored at the pointer, zero
/// padded.
#[derive(Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<I2cState>>,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        let i2c = Self::default();
        i2c.state.borrow_mut().address = address;
        i2c
    }

    pub fn set_reg(&self, reg: u8, bytes: &[u8]) {
        self.state.borrow_mut().regs.insert(reg, bytes.to_vec());
    }

    /// Register writes seen so far, register byte first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.state.borrow_mut().failing = failing;
    }
}

impl embedded_hal::i2c::ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for MockI2c {
    async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.failing || address != state.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((reg, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = *reg;
                    if !data.is_empty() {
                        state.regs.insert(*reg, data.to_vec());
                        state.writes.push(bytes.to_vec());
                    }
                }
                Operation::Read(buf) => {
                    let stored = state.regs.get(&state.pointer).cloned().unwrap_or_default();
                    for (i, byte) in buf.iter_mut().enumerate() {
                        *byte = stored.get(i).copied().unwrap_or(0);
                    }
                }
            }
        }
        Ok(())
    }
}

// ---- delays

pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Records every requested delay in milliseconds and yields once instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    requests: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<u32> {
        self.requests.borrow().clone()
    }

    async fn record(&mut self, ms: u32) {
        self.requests.borrow_mut().push(ms);
        yield_now().await;
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns / 1_000_000).await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(us / 1_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms).await;
    }
}

// ---- sensors

struct SensorState {
    values: Vec<(Channel, Vec<SensorValue>)>,
    fetch_result: Result<(), Errno>,
    channel_error: Option<Errno>,
    fetches: usize,
}

#[derive(Clone)]
pub struct MockSensor {
    state: Rc<RefCell<SensorState>>,
}

impl MockSensor {
    fn with_values(values: Vec<(Channel, Vec<SensorValue>)>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SensorState {
                values,
                fetch_result: Ok(()),
                channel_error: None,
                fetches: 0,
            })),
        }
    }

    pub fn light(lux: SensorValue) -> Self {
        Self::with_values(vec![(Channel::Light, vec![lux])])
    }

    pub fn temp_rh(temperature: SensorValue, humidity: SensorValue) -> Self {
        Self::with_values(vec![
            (Channel::AmbientTemp, vec![temperature]),
            (Channel::Humidity, vec![humidity]),
        ])
    }

    pub fn accel(xyz: [SensorValue; 3]) -> Self {
        Self::with_values(vec![(Channel::AccelXyz, xyz.to_vec())])
    }

    pub fn set_fetch_result(&self, result: Result<(), Errno>) {
        self.state.borrow_mut().fetch_result = result;
    }

    pub fn set_channel_error(&self, errno: Option<Errno>) {
        self.state.borrow_mut().channel_error = errno;
    }

    pub fn fetches(&self) -> usize {
        self.state.borrow().fetches
    }
}

impl Sensor for MockSensor {
    async fn sample_fetch(&mut self) -> Result<(), Errno> {
        let mut state = self.state.borrow_mut();
        state.fetches += 1;
        state.fetch_result
    }

    fn channel_get(&self, channel: Channel, values: &mut [SensorValue]) -> Result<(), Errno> {
        let state = self.state.borrow();
        if let Some(errno) = state.channel_error {
            return Err(errno);
        }
        let (_, stored) = state.values.iter().find(|(c, _)| *c == channel).ok_or(Errno::ENOTSUP)?;
        for (value, stored) in values.iter_mut().zip(stored) {
            *value = *stored;
        }
        Ok(())
    }
}

// ---- GPIO

#[derive(Default)]
struct LedState {
    configured: Option<bool>,
    level: bool,
    toggles: usize,
    fail_configure: bool,
}

#[derive(Clone, Default)]
pub struct MockLed {
    state: Rc<RefCell<LedState>>,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggles(&self) -> usize {
        self.state.borrow().toggles
    }

    /// Initial level of the last successful output configuration.
    pub fn configured(&self) -> Option<bool> {
        self.state.borrow().configured
    }

    pub fn level(&self) -> bool {
        self.state.borrow().level
    }

    pub fn fail_configure(&self) {
        self.state.borrow_mut().fail_configure = true;
    }
}

impl GpioOutput for MockLed {
    fn configure_output(&mut self, active: bool) -> Result<(), Errno> {
        let mut state = self.state.borrow_mut();
        if state.fail_configure {
            return Err(Errno::EIO);
        }
        state.configured = Some(active);
        state.level = active;
        Ok(())
    }

    fn toggle(&mut self) {
        let mut state = self.state.borrow_mut();
        state.level = !state.level;
        state.toggles += 1;
    }
}

#[derive(Default)]
struct ButtonState {
    input: bool,
    armed: Option<Edge>,
    waits: usize,
    fail_configure: bool,
    fail_interrupt: bool,
}

/// Button whose edges are injected with [`MockButton::fire`].
///
/// Edges fired while the interrupt is not armed stay queued but are never delivered.
#[derive(Clone)]
pub struct MockButton {
    pin: u8,
    state: Rc<RefCell<ButtonState>>,
    edges: Rc<EdgeChannel<CriticalSectionRawMutex, (), 16>>,
}

impl MockButton {
    pub fn new(pin: u8) -> Self {
        Self {
            pin,
            state: Rc::default(),
            edges: Rc::new(EdgeChannel::new()),
        }
    }

    pub fn fire(&self) {
        let _ = self.edges.try_send(());
    }

    pub fn is_input(&self) -> bool {
        self.state.borrow().input
    }

    pub fn armed(&self) -> Option<Edge> {
        self.state.borrow().armed
    }

    /// How often the dispatcher started waiting for an edge.
    pub fn waits(&self) -> usize {
        self.state.borrow().waits
    }

    pub fn fail_configure(&self) {
        self.state.borrow_mut().fail_configure = true;
    }

    pub fn fail_interrupt(&self) {
        self.state.borrow_mut().fail_interrupt = true;
    }
}

impl GpioInterrupt for MockButton {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn configure_input(&mut self) -> Result<(), Errno> {
        let mut state = self.state.borrow_mut();
        if state.fail_configure {
            return Err(Errno::EIO);
        }
        state.input = true;
        Ok(())
    }

    fn configure_interrupt(&mut self, edge: Edge) -> Result<(), Errno> {
        let mut state = self.state.borrow_mut();
        if state.fail_interrupt {
            return Err(Errno::ENOTSUP);
        }
        state.armed = Some(edge);
        Ok(())
    }

    async fn wait_for_interrupt(&mut self) {
        let armed = {
            let mut state = self.state.borrow_mut();
            state.waits += 1;
            state.armed.is_some()
        };
        if !armed {
            core::future::pending::<()>().await;
        }
        self.edges.receive().await;
    }
}

// ---- flash

#[derive(Clone)]
pub struct MockFlash {
    result: Rc<RefCell<Result<JedecId, Errno>>>,
}

impl MockFlash {
    pub fn new(id: JedecId) -> Self {
        Self {
            result: Rc::new(RefCell::new(Ok(id))),
        }
    }

    pub fn set_result(&self, result: Result<JedecId, Errno>) {
        *self.result.borrow_mut() = result;
    }
}

impl FlashDevice for MockFlash {
    async fn read_jedec_id(&mut self) -> Result<JedecId, Errno> {
        *self.result.borrow()
    }
}

// ---- console

/// Captures everything written, one timestamped chunk per write.
#[derive(Clone, Default)]
pub struct MockWriter {
    chunks: Rc<RefCell<Vec<(Instant, Vec<u8>)>>>,
}

impl MockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> String {
        let bytes: Vec<u8> = self.chunks.borrow().iter().flat_map(|(_, chunk)| chunk.clone()).collect();
        String::from_utf8(bytes).unwrap()
    }

    /// Times at which a blank line was completed.
    pub fn separators(&self) -> Vec<Instant> {
        self.chunks
            .borrow()
            .windows(2)
            .filter(|pair| pair[0].1.ends_with(b"\n") && pair[1].1 == b"\n")
            .map(|pair| pair[1].0)
            .collect()
    }
}

impl embedded_io_async::ErrorType for MockWriter {
    type Error = Infallible;
}

impl embedded_io_async::Write for MockWriter {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.chunks.borrow_mut().push((Instant::now(), buf.to_vec()));
        Ok(buf.len())
    }
}

/// Serial port stand-in: written bytes sit in a transmit buffer and only reach the wire on
/// `flush`. Whatever is still buffered when the port is dropped is lost.
#[derive(Clone, Default)]
pub struct MockUart {
    pending: Rc<RefCell<Vec<u8>>>,
    wire: Rc<RefCell<Vec<u8>>>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wire(&self) -> String {
        String::from_utf8(self.wire.borrow().clone()).unwrap()
    }
}

impl embedded_io_async::ErrorType for MockUart {
    type Error = Infallible;
}

impl embedded_io_async::Write for MockUart {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.pending.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        let pending: Vec<u8> = self.pending.borrow_mut().drain(..).collect();
        self.wire.borrow_mut().extend(pending);
        Ok(())
    }
}

impl Drop for MockUart {
    fn drop(&mut self) {
        self.pending.borrow_mut().clear();
    }
}

// ---- registry

/// A board where every peripheral is present and answers with fixed readings.
///
/// The fields are the test's handles onto the peripherals; each lookup hands out a
/// clone at most once.
pub struct MockRegistry {
    pub light: MockSensor,
    pub temp_rh: MockSensor,
    pub accel: MockSensor,
    pub led0: MockLed,
    pub led1: MockLed,
    pub button: MockButton,
    pub flash: MockFlash,
    available: Available,
}

#[derive(Clone, Copy)]
struct Available {
    light: bool,
    temp_rh: bool,
    accel: bool,
    led0: bool,
    led1: bool,
    button: bool,
    flash: bool,
}

impl MockRegistry {
    pub fn complete() -> Self {
        Self {
            light: MockSensor::light(SensorValue::new(49, 360_000)),
            temp_rh: MockSensor::temp_rh(SensorValue::new(42, 500_000), SensorValue::new(50, 0)),
            accel: MockSensor::accel([
                SensorValue::new(9, 806_650),
                SensorValue::new(-4, -903_325),
                SensorValue::new(0, 0),
            ]),
            led0: MockLed::new(),
            led1: MockLed::new(),
            button: MockButton::new(11),
            flash: MockFlash::new(JedecId([0xC2, 0x20, 0x16])),
            available: Available {
                light: true,
                temp_rh: true,
                accel: true,
                led0: true,
                led1: true,
                button: true,
                flash: true,
            },
        }
    }

    pub fn without_light(mut self) -> Self {
        self.available.light = false;
        self
    }

    pub fn without_accel(mut self) -> Self {
        self.available.accel = false;
        self
    }

    pub fn without_leds(mut self) -> Self {
        self.available.led0 = false;
        self.available.led1 = false;
        self
    }

    pub fn without_button(mut self) -> Self {
        self.available.button = false;
        self
    }

    pub fn without_flash(mut self) -> Self {
        self.available.flash = false;
        self
    }
}

fn take<T: Clone>(available: &mut bool, device: &T) -> Option<T> {
    std::mem::take(available).then(|| device.clone())
}

impl DeviceRegistry for MockRegistry {
    type Light = MockSensor;
    type TempRh = MockSensor;
    type Accel = MockSensor;
    type Led = MockLed;
    type Button = MockButton;
    type Flash = MockFlash;

    async fn light_sensor(&mut self) -> Option<MockSensor> {
        take(&mut self.available.light, &self.light)
    }

    async fn temp_rh_sensor(&mut self) -> Option<MockSensor> {
        take(&mut self.available.temp_rh, &self.temp_rh)
    }

    async fn accel_sensor(&mut self) -> Option<MockSensor> {
        take(&mut self.available.accel, &self.accel)
    }

    fn led0(&mut self) -> Option<MockLed> {
        take(&mut self.available.led0, &self.led0)
    }

    fn led1(&mut self) -> Option<MockLed> {
        take(&mut self.available.led1, &self.led1)
    }

    fn button(&mut self) -> Option<MockButton> {
        take(&mut self.available.button, &self.button)
    }

    async fn flash(&mut self) -> Option<MockFlash> {
        take(&mut self.available.flash, &self.flash)
    }
}
