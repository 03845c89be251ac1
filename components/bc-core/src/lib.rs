#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod fmt;

pub mod button;
pub mod config;
pub mod console;
pub mod demo;
pub mod device;
pub mod display;
pub mod errno;
pub mod flash;
pub mod gpio;
pub mod registry;
pub mod sensor;

#[cfg(test)]
pub mod mocks;
