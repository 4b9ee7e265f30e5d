//! ubik — заголовок реплицированного снапшота (.DB0), физический оффсет 0.
//!
//! Формат (BE, 16 байт):
//! [magic u32 = 0x00354545][pad1 u16][size u16 = 64][epoch u32][counter u32]
//!
//! Пара epoch.counter — версия реплики (состояние ubik, не формата);
//! константами обязаны быть только magic и size.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::consts::{UBIK_HDR_ON_DISK, UBIK_HDR_SIZE, UBIK_MAGIC};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UbikHeader {
    pub magic: u32,
    pub pad1: u16,
    pub size: u16,
    pub epoch: u32,
    pub counter: u32,
}

impl UbikHeader {
    /// Декодировать заголовок из ровно 16 байт (без валидации magic).
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != UBIK_HDR_ON_DISK {
            return Err(anyhow!(
                "malformed ubik header: got {} bytes, want {}",
                buf.len(),
                UBIK_HDR_ON_DISK
            ));
        }
        Ok(Self {
            magic: BigEndian::read_u32(&buf[0..4]),
            pad1: BigEndian::read_u16(&buf[4..6]),
            size: BigEndian::read_u16(&buf[6..8]),
            epoch: BigEndian::read_u32(&buf[8..12]),
            counter: BigEndian::read_u32(&buf[12..16]),
        })
    }

    /// Проверить magic/size. Несовпадение делает файл нечитаемым.
    pub fn validate(&self) -> Result<()> {
        if self.magic != UBIK_MAGIC {
            return Err(anyhow!(
                "invalid ubik header: bad magic (expected {:#010x}, got {:#010x})",
                UBIK_MAGIC,
                self.magic
            ));
        }
        if self.size != UBIK_HDR_SIZE {
            return Err(anyhow!(
                "invalid ubik header: bad size (expected {}, got {})",
                UBIK_HDR_SIZE,
                self.size
            ));
        }
        Ok(())
    }

    pub fn encode(&self) -> [u8; UBIK_HDR_ON_DISK] {
        let mut buf = [0u8; UBIK_HDR_ON_DISK];
        BigEndian::write_u32(&mut buf[0..4], self.magic);
        BigEndian::write_u16(&mut buf[4..6], self.pad1);
        BigEndian::write_u16(&mut buf[6..8], self.size);
        BigEndian::write_u32(&mut buf[8..12], self.epoch);
        BigEndian::write_u32(&mut buf[12..16], self.counter);
        buf
    }
}

impl Default for UbikHeader {
    fn default() -> Self {
        Self {
            magic: UBIK_MAGIC,
            pad1: 0,
            size: UBIK_HDR_SIZE,
            epoch: 0,
            counter: 0,
        }
    }
}

impl fmt::Display for UbikHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ubik version {}.{} (magic {:#x} size {})",
            self.epoch, self.counter, self.magic, self.size
        )
    }
}
