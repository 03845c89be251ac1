#![no_std]
#![no_main]

use bc_core::config::POLL_INTERVAL_MS;
use bc_core::console::Console;
use bc_core::demo::{Demo, Exit};
use bc_core::registry::Board;
use bc_core::{error, info};
use bc_nrf::board::{self, I2cBus, LABELS, Registry};
use bc_nrf::driver::qspi_flash::{self, QspiFlash};
use bc_nrf::gpio::{NrfButton, NrfLed, Polarity};
#[cfg(feature = "defmt")]
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    buffered_uarte::{self, BufferedUarte},
    gpio::{Flex, Pull},
    peripherals, qspi,
    twim::{self, Twim},
    uarte,
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use panic_probe as _;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    UARTE0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    QSPI => qspi::InterruptHandler<peripherals::QSPI>;
});

static TWIM_BUFFER: StaticCell<[u8; board::TWIM_BUFFER_SIZE]> = StaticCell::new();
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("startup");

    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    let mut uart_tx_buffer = [0u8; board::UART_BUFFER_SIZE];
    let mut uart_rx_buffer = [0u8; board::UART_BUFFER_SIZE];
    let uart = BufferedUarte::new(
        p.UARTE0,
        p.TIMER0,
        p.PPI_CH0,
        p.PPI_CH1,
        p.PPI_GROUP0,
        p.P0_08,
        p.P0_06,
        Irqs,
        uart_config,
        &mut uart_rx_buffer,
        &mut uart_tx_buffer,
    );
    let mut console = Console::new(uart);

    // OPT3001, HDC2010 and LIS2DH12 share the sensor bus
    let twim = Twim::new(
        p.TWISPI0,
        Irqs,
        p.P0_26,
        p.P0_27,
        board::twim_config(),
        TWIM_BUFFER.init([0u8; board::TWIM_BUFFER_SIZE]),
    );
    let bus = I2C_BUS.init(Mutex::new(twim));

    let qspi = qspi::Qspi::new(
        p.QSPI,
        Irqs,
        p.P0_19,
        p.P0_17,
        p.P0_20,
        p.P0_21,
        p.P0_22,
        p.P0_23,
        qspi_flash::config(),
    );

    // Xenon: blue LED active high, red LED and MODE button active low
    let led0 = NrfLed::new(Flex::new(p.P1_12), board::LED0_PIN, Polarity::ActiveHigh);
    let led1 = NrfLed::new(Flex::new(p.P0_13), board::LED1_PIN, Polarity::ActiveLow);
    let button = NrfButton::new(Flex::new(p.P0_11), board::BUTTON_PIN, Pull::Up, Polarity::ActiveLow);

    let mut registry = Registry::new(bus, led0, led1, button, QspiFlash::new(qspi));
    let board = Board::acquire(&mut registry, &LABELS).await;

    let mut demo: Demo<Registry, CriticalSectionRawMutex> = Demo::setup(board, &mut console).await;
    match demo.run(&mut console, Delay, POLL_INTERVAL_MS).await {
        Exit::FlashMissing => error!("Demo stopped, no flash"),
    }
}
