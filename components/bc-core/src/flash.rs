#![allow(async_fn_in_trait)]

use core::fmt;

use crate::errno::Errno;

/// JEDEC `RDID` command, answered with manufacturer, memory type and capacity bytes.
pub const CMD_READ_JEDEC_ID: u8 = 0x9F;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JedecId(pub [u8; 3]);

impl JedecId {
    /// An all-zero or all-one answer means nothing drove the data line.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|b| *b == 0x00) || self.0.iter().all(|b| *b == 0xFF)
    }
}

/// `c2 20 16`, lowercase hex without padding.
impl fmt::Display for JedecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x} {:x} {:x}", self.0[0], self.0[1], self.0[2])
    }
}

pub trait FlashDevice {
    async fn read_jedec_id(&mut self) -> Result<JedecId, Errno>;
}

/// Hand the flash out only if it answers with the `expected` ID.
///
/// The controller comes up whether or not a part is fitted, so the ID read is the
/// only presence check there is.
pub async fn probe<F: FlashDevice>(mut flash: F, expected: JedecId) -> Option<F> {
    match flash.read_jedec_id().await {
        Ok(id) if id == expected => Some(flash),
        Ok(id) if id.is_blank() => {
            warn!("Flash> No part answering");
            None
        }
        Ok(_id) => {
            warn!("Flash> Unexpected part {}", _id);
            None
        }
        Err(_errno) => {
            warn!("Flash> ID read failed: {}", _errno);
            None
        }
    }
}
