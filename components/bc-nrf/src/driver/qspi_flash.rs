//! QSPI flash access for the MX25L3233F (32Mbit/4MB) on the Xenon.
//!
//! Only the identification command is used; the part is never read or programmed.

use bc_core::errno::Errno;
use bc_core::flash::{CMD_READ_JEDEC_ID, FlashDevice, JedecId};
use bc_core::{debug, warn};
use embassy_nrf::qspi;

// MX25L3233F => https://www.macronix.com/Lists/Datasheet/Attachments/8933/MX25L3233F,%203V,%2032Mb,%20v1.7.pdf
pub const FLASH_SIZE: u32 = 4 * 1024 * 1024; // 4 MB

/// Bus settings the MX25L3233F identifies reliably with.
///
/// Dual output read at 8 MHz, higher clocks made the first ID read come back wrong.
pub fn config() -> qspi::Config {
    let mut config = qspi::Config::default();
    config.read_opcode = qspi::ReadOpcode::READ2O;
    config.write_opcode = qspi::WriteOpcode::PP;
    config.write_page_size = qspi::WritePageSize::_256BYTES;
    config.frequency = qspi::Frequency::M8;
    config.capacity = FLASH_SIZE;
    config
}

pub struct QspiFlash<'a> {
    qspi: qspi::Qspi<'a>,
}

impl<'a> QspiFlash<'a> {
    pub fn new(qspi: qspi::Qspi<'a>) -> Self {
        Self { qspi }
    }

    async fn instruction(&mut self, opcode: u8, response: &mut [u8]) -> Result<(), Errno> {
        self.qspi.custom_instruction(opcode, &[], response).await.map_err(|_e| {
            warn!("QspiFlash> Instruction 0x{:x} failed", opcode);
            Errno::EIO
        })
    }
}

impl<'a> FlashDevice for QspiFlash<'a> {
    /// `RDID` is valid in any state, no ready wait. A missing part reads back as all ones.
    async fn read_jedec_id(&mut self) -> Result<JedecId, Errno> {
        let mut id = [0u8; 3];
        self.instruction(CMD_READ_JEDEC_ID, &mut id).await?;
        let id = JedecId(id);
        debug!("QspiFlash> JEDEC id {}", id);
        Ok(id)
    }
}
