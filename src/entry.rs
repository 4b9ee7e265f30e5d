//! entry — volume record (148 байт) и tagged-диспетчеризация записи.
//!
//! Позиция в области данных может содержать либо volume record, либо
//! заголовок continuation-блока (flags == CONT_FLAG, занимает 8192 байта).
//! Различие делается по flags на этапе декодирования (peek первых 16 байт),
//! а не по иерархии типов.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;
use std::fmt;

use crate::consts::{CONT_FLAG, N_SITES, SITE_SLOT_EMPTY, VL_ENTRY_SIZE, VL_NAME_LEN};

/// Один занятый сайт volume record (производное представление,
/// на диске — три параллельных массива).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Site {
    pub server: u8,
    pub partition: u8,
    pub flags: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlEntry {
    /// Логический адрес записи (идентичность; на диске не хранится).
    pub address: u32,

    pub rwid: u32,
    pub roid: u32,
    pub bkid: u32,
    pub flags: u32,
    pub lock_afs_id: u32,
    pub lock_timestamp: u32,
    pub clone_id: u32,
    pub next_id_rw: u32,
    pub next_id_ro: u32,
    pub next_id_bk: u32,
    pub next_name: u32,

    pub name: String,

    pub server_number: [u8; N_SITES],
    pub server_partition: [u8; N_SITES],
    pub server_flags: [u8; N_SITES],
}

/// Результат декодирования позиции при последовательном скане.
#[derive(Debug, Clone)]
pub enum RecordKind {
    Volume(VlEntry),
    /// Continuation-блок: при скане пропускается целиком (8192 байта).
    Continuation { address: u32 },
}

impl VlEntry {
    pub fn decode(buf: &[u8], address: u32) -> Result<Self> {
        if buf.len() != VL_ENTRY_SIZE {
            return Err(anyhow!(
                "malformed vl entry at {}: got {} bytes, want {}",
                address,
                buf.len(),
                VL_ENTRY_SIZE
            ));
        }

        let u32_at = |i: usize| BigEndian::read_u32(&buf[i * 4..i * 4 + 4]);

        let name_raw = &buf[44..44 + VL_NAME_LEN];
        let name_end = name_raw.iter().position(|&b| b == 0).unwrap_or(VL_NAME_LEN);
        let name_bytes = &name_raw[..name_end];
        // Формат ASCII-only; валидный multi-byte UTF-8 тоже отвергается.
        if !name_bytes.is_ascii() {
            return Err(anyhow!(
                "malformed vl entry at {}: non-ascii name",
                address
            ));
        }
        let name = std::str::from_utf8(name_bytes)?.to_string();

        let mut server_number = [0u8; N_SITES];
        let mut server_partition = [0u8; N_SITES];
        let mut server_flags = [0u8; N_SITES];
        let base = 44 + VL_NAME_LEN;
        server_number.copy_from_slice(&buf[base..base + N_SITES]);
        server_partition.copy_from_slice(&buf[base + N_SITES..base + 2 * N_SITES]);
        server_flags.copy_from_slice(&buf[base + 2 * N_SITES..base + 3 * N_SITES]);

        Ok(Self {
            address,
            rwid: u32_at(0),
            roid: u32_at(1),
            bkid: u32_at(2),
            flags: u32_at(3),
            lock_afs_id: u32_at(4),
            lock_timestamp: u32_at(5),
            clone_id: u32_at(6),
            next_id_rw: u32_at(7),
            next_id_ro: u32_at(8),
            next_id_bk: u32_at(9),
            next_name: u32_at(10),
            name,
            server_number,
            server_partition,
            server_flags,
        })
    }

    /// Закодировать в 148 байт. Имя обязано помещаться в 65 байт
    /// вместе с завершающим NUL.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.name.len() >= VL_NAME_LEN {
            return Err(anyhow!(
                "volume name {:?} too long ({} bytes, max {})",
                self.name,
                self.name.len(),
                VL_NAME_LEN - 1
            ));
        }
        if !self.name.is_ascii() {
            return Err(anyhow!("volume name {:?} is not ascii", self.name));
        }

        let mut buf = vec![0u8; VL_ENTRY_SIZE];
        for (i, v) in [
            self.rwid,
            self.roid,
            self.bkid,
            self.flags,
            self.lock_afs_id,
            self.lock_timestamp,
            self.clone_id,
            self.next_id_rw,
            self.next_id_ro,
            self.next_id_bk,
            self.next_name,
        ]
        .into_iter()
        .enumerate()
        {
            BigEndian::write_u32(&mut buf[i * 4..i * 4 + 4], v);
        }
        buf[44..44 + self.name.len()].copy_from_slice(self.name.as_bytes());
        let base = 44 + VL_NAME_LEN;
        buf[base..base + N_SITES].copy_from_slice(&self.server_number);
        buf[base + N_SITES..base + 2 * N_SITES].copy_from_slice(&self.server_partition);
        buf[base + 2 * N_SITES..base + 3 * N_SITES].copy_from_slice(&self.server_flags);
        Ok(buf)
    }

    /// Занятые сайты (server slot != 255) в порядке массива.
    pub fn sites(&self) -> Vec<Site> {
        (0..N_SITES)
            .filter(|&i| self.server_number[i] != SITE_SLOT_EMPTY)
            .map(|i| Site {
                server: self.server_number[i],
                partition: self.server_partition[i],
                flags: self.server_flags[i],
            })
            .collect()
    }

    /// Указатель на следующую запись цепочки заданного вида.
    pub fn next_ptr(&self, kind: crate::chain::ChainKind) -> u32 {
        use crate::chain::ChainKind::*;
        match kind {
            Name => self.next_name,
            IdRw => self.next_id_rw,
            IdRo => self.next_id_ro,
            IdBk => self.next_id_bk,
        }
    }

    pub fn is_continuation(&self) -> bool {
        self.flags == CONT_FLAG
    }
}

impl fmt::Display for VlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vlentry '{}' at {} volid {} {} {}",
            self.name, self.address, self.rwid, self.roid, self.bkid
        )
    }
}

/// Peek flags (4-й u32) позиции и выбрать полный декодер.
/// `buf` — первые VL_ENTRY_SIZE байт позиции.
pub fn decode_record(buf: &[u8], address: u32) -> Result<RecordKind> {
    if buf.len() < 16 {
        return Err(anyhow!(
            "malformed record at {}: got {} bytes, want at least 16",
            address,
            buf.len()
        ));
    }
    let flags = BigEndian::read_u32(&buf[12..16]);
    if flags == CONT_FLAG {
        return Ok(RecordKind::Continuation { address });
    }
    Ok(RecordKind::Volume(VlEntry::decode(buf, address)?))
}

impl Default for VlEntry {
    fn default() -> Self {
        Self {
            address: 0,
            rwid: 0,
            roid: 0,
            bkid: 0,
            flags: 0,
            lock_afs_id: 0,
            lock_timestamp: 0,
            clone_id: 0,
            next_id_rw: 0,
            next_id_ro: 0,
            next_id_bk: 0,
            next_name: 0,
            name: String::new(),
            // 255 = свободный сайт-слот
            server_number: [SITE_SLOT_EMPTY; N_SITES],
            server_partition: [0; N_SITES],
            server_flags: [0; N_SITES],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> VlEntry {
        let mut e = VlEntry::default();
        e.address = 132120;
        e.rwid = 536870912;
        e.roid = 536870913;
        e.flags = 0;
        e.next_name = 140000;
        e.name = "root.cell".to_string();
        e.server_number[0] = 3;
        e.server_partition[0] = 1;
        e.server_flags[0] = 4;
        e.server_number[1] = 7;
        e
    }

    #[test]
    fn vl_entry_roundtrip() {
        let e0 = sample_entry();
        let bytes = e0.encode().unwrap();
        assert_eq!(bytes.len(), VL_ENTRY_SIZE);
        let e1 = VlEntry::decode(&bytes, e0.address).unwrap();
        assert_eq!(e0, e1);
        assert_eq!(e1.encode().unwrap(), bytes);
    }

    #[test]
    fn sites_skip_empty_slots() {
        let e = sample_entry();
        let sites = e.sites();
        assert_eq!(sites.len(), 2);
        assert_eq!(
            sites[0],
            Site {
                server: 3,
                partition: 1,
                flags: 4
            }
        );
        assert_eq!(sites[1].server, 7);
    }

    #[test]
    fn dispatch_on_continuation_flag() {
        let mut e = sample_entry();
        e.flags = CONT_FLAG;
        let bytes = e.encode().unwrap();
        match decode_record(&bytes, e.address).unwrap() {
            RecordKind::Continuation { address } => assert_eq!(address, e.address),
            other => panic!("expected continuation, got {:?}", other),
        }

        let plain = sample_entry().encode().unwrap();
        match decode_record(&plain, 132120).unwrap() {
            RecordKind::Volume(v) => assert_eq!(v.name, "root.cell"),
            other => panic!("expected volume record, got {:?}", other),
        }
    }

    #[test]
    fn non_ascii_name_bytes_are_rejected_on_decode() {
        let mut bytes = sample_entry().encode().unwrap();
        // "é" — валидный UTF-8, но не ASCII: декодер обязан отвергнуть.
        bytes[44] = 0xc3;
        bytes[45] = 0xa9;
        bytes[46] = 0;
        let err = VlEntry::decode(&bytes, 132120).unwrap_err();
        assert!(err.to_string().contains("non-ascii name"), "{err}");
    }

    #[test]
    fn oversized_name_is_rejected_on_encode() {
        let mut e = sample_entry();
        e.name = "x".repeat(VL_NAME_LEN);
        assert!(e.encode().is_err());
    }
}
