#![no_std]

pub mod board;
pub mod gpio;

pub mod driver {
    pub mod qspi_flash;
}
