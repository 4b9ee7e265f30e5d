//! mhost — extent-блоки multi-homed серверов.
//!
//! Блок 8192 байта = 64 записи по 128 байт; запись 0 — заголовок блока
//! (flags обязан равняться CONT_FLAG), записи 1..63 — multi-homed entries.
//! Заголовок первого блока (по адресу SIT) несёт таблицу адресов всех
//! блоков (до 4), через которую разрешаются indirect packed-адреса.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::consts::{
    CONT_FLAG, MAX_CONT_BLOCKS, MH_ENTRIES_PER_BLOCK, MH_ENTRY_SIZE, MH_SENTINEL_BYTE, N_MH_ADDRS,
};

/// Заголовок continuation-блока (запись 0 блока, 128 байт).
/// Layout: [count u32][pad 8][flags u32][4 x u32 адреса блоков][pad до 128]
///
/// Поле flags лежит на оффсете 12 — там же, где flags у volume record:
/// последовательный скан различает блок и запись одним и тем же peek'ом.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContHeader {
    /// Логический адрес блока.
    pub address: u32,
    pub count: u32,
    pub flags: u32,
    pub cont_addrs: [u32; MAX_CONT_BLOCKS],
}

impl ContHeader {
    pub fn decode(buf: &[u8], address: u32) -> Result<Self> {
        if buf.len() != MH_ENTRY_SIZE {
            return Err(anyhow!(
                "malformed continuation header at {}: got {} bytes, want {}",
                address,
                buf.len(),
                MH_ENTRY_SIZE
            ));
        }
        let mut cont_addrs = [0u32; MAX_CONT_BLOCKS];
        for (i, a) in cont_addrs.iter_mut().enumerate() {
            *a = BigEndian::read_u32(&buf[16 + i * 4..20 + i * 4]);
        }
        Ok(Self {
            address,
            count: BigEndian::read_u32(&buf[0..4]),
            flags: BigEndian::read_u32(&buf[12..16]),
            cont_addrs,
        })
    }

    /// Несовпадение flags делает extent-таблицу нечитаемой (open падает).
    pub fn validate(&self) -> Result<()> {
        if self.flags != CONT_FLAG {
            return Err(anyhow!(
                "invalid continuation block at {}: bad flags (expected {:#x}, got {:#x})",
                self.address,
                CONT_FLAG,
                self.flags
            ));
        }
        Ok(())
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; MH_ENTRY_SIZE];
        BigEndian::write_u32(&mut buf[0..4], self.count);
        BigEndian::write_u32(&mut buf[12..16], self.flags);
        for (i, &a) in self.cont_addrs.iter().enumerate() {
            BigEndian::write_u32(&mut buf[16 + i * 4..20 + i * 4], a);
        }
        buf
    }
}

/// UUID multi-homed сервера (16 байт, как в afsUUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AfsUuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi: u16,
    pub clock_hi: u8,
    pub clock_lo: u8,
    pub node: [u8; 6],
}

impl fmt::Display for AfsUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.time_low,
            self.time_mid,
            self.time_hi,
            self.clock_hi,
            self.clock_lo,
            self.node[0],
            self.node[1],
            self.node[2],
            self.node[3],
            self.node[4],
            self.node[5]
        )
    }
}

/// Multi-homed entry (записи 1..63 блока, 128 байт).
/// Layout: [uuid 16][uniquifier u32][15 x u32 адреса][flags u32][pad до 128]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MhEntry {
    /// Логический адрес записи.
    pub address: u32,
    pub uuid: AfsUuid,
    pub uniquifier: u32,
    /// Packed-значения как на диске (0 = позиция пуста).
    pub raw_addrs: [u32; N_MH_ADDRS],
    pub flags: u32,
}

impl MhEntry {
    pub fn decode(buf: &[u8], address: u32) -> Result<Self> {
        if buf.len() != MH_ENTRY_SIZE {
            return Err(anyhow!(
                "malformed mh entry at {}: got {} bytes, want {}",
                address,
                buf.len(),
                MH_ENTRY_SIZE
            ));
        }
        let mut node = [0u8; 6];
        node.copy_from_slice(&buf[10..16]);
        let uuid = AfsUuid {
            time_low: BigEndian::read_u32(&buf[0..4]),
            time_mid: BigEndian::read_u16(&buf[4..6]),
            time_hi: BigEndian::read_u16(&buf[6..8]),
            clock_hi: buf[8],
            clock_lo: buf[9],
            node,
        };
        let mut raw_addrs = [0u32; N_MH_ADDRS];
        for (i, a) in raw_addrs.iter_mut().enumerate() {
            *a = BigEndian::read_u32(&buf[20 + i * 4..24 + i * 4]);
        }
        Ok(Self {
            address,
            uuid,
            uniquifier: BigEndian::read_u32(&buf[16..20]),
            raw_addrs,
            flags: BigEndian::read_u32(&buf[80..84]),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; MH_ENTRY_SIZE];
        BigEndian::write_u32(&mut buf[0..4], self.uuid.time_low);
        BigEndian::write_u16(&mut buf[4..6], self.uuid.time_mid);
        BigEndian::write_u16(&mut buf[6..8], self.uuid.time_hi);
        buf[8] = self.uuid.clock_hi;
        buf[9] = self.uuid.clock_lo;
        buf[10..16].copy_from_slice(&self.uuid.node);
        BigEndian::write_u32(&mut buf[16..20], self.uniquifier);
        for (i, &a) in self.raw_addrs.iter().enumerate() {
            BigEndian::write_u32(&mut buf[20 + i * 4..24 + i * 4], a);
        }
        BigEndian::write_u32(&mut buf[80..84], self.flags);
        buf
    }

    /// Ненулевые адреса в dotted-quad виде, в порядке массива.
    pub fn addrs(&self) -> Vec<String> {
        self.raw_addrs
            .iter()
            .filter(|&&a| a != 0)
            .map(|&a| Ipv4Addr::from(a).to_string())
            .collect()
    }
}

/// Интерпретация packed-адреса серверного слота: два случая,
/// выбираемых по старшему байту.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedAddr {
    /// Слот не занят (значение 0).
    Empty,
    /// Обычный IPv4-адрес (BE), UUID отсутствует.
    Direct(Ipv4Addr),
    /// Ссылка в extent-блок: индекс блока + индекс записи (1..=63).
    Indirect { block: u16, index: u8 },
}

impl PackedAddr {
    pub fn parse(raw: u32) -> Self {
        if raw == 0 {
            return PackedAddr::Empty;
        }
        if (raw >> 24) as u8 != MH_SENTINEL_BYTE {
            return PackedAddr::Direct(Ipv4Addr::from(raw));
        }
        PackedAddr::Indirect {
            block: ((raw >> 8) & 0xffff) as u16,
            index: (raw & 0xff) as u8,
        }
    }
}

/// Адрес записи index внутри блока с базой block_base.
/// Индекс 0 — заголовок блока, валидный диапазон записей 1..=63.
pub fn mh_entry_addr(block_base: u32, index: u8) -> Result<u32> {
    if index == 0 || index as u32 >= MH_ENTRIES_PER_BLOCK {
        return Err(anyhow!(
            "mh entry index {} out of range 1..={}",
            index,
            MH_ENTRIES_PER_BLOCK - 1
        ));
    }
    Ok(block_base + index as u32 * MH_ENTRY_SIZE as u32)
}
