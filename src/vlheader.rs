//! vlheader — каталог VLDB (132120 байт по логическому адресу 0).
//!
//! Четыре bucket-массива по 8191 головок цепочек (0 = пустой bucket),
//! 255 packed-адресов серверных слотов и указатель SIT на первый
//! extent-блок. Декодируется один раз при открытии и далее неизменен.

use anyhow::{anyhow, Result};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

use crate::chain::ChainKind;
use crate::consts::{HASH_SIZE, N_SERVER_SLOTS, VL_HDR_SIZE};

#[derive(Debug, Clone)]
pub struct VlHeader {
    pub vldbversion: u32,
    pub headersize: u32,
    pub free_head: u32,
    pub eof: u32,
    pub allocs: u32,
    pub frees: u32,
    pub max_volume_id: u32,
    pub total_rw: u32,
    pub total_ro: u32,
    pub total_bk: u32,

    /// Packed-адрес на каждый серверный слот (0 = слот не занят).
    pub server_addrs: Vec<u32>,

    /// Головы bucket-цепочек, по массиву на каждый вид хеша.
    pub name_hash: Vec<u32>,
    pub id_hash_rw: Vec<u32>,
    pub id_hash_ro: Vec<u32>,
    pub id_hash_bk: Vec<u32>,

    /// Адрес первого continuation-блока (0 = extent-блоков нет).
    pub sit: u32,
}

impl VlHeader {
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() != VL_HDR_SIZE {
            return Err(anyhow!(
                "malformed vl header: got {} bytes, want {}",
                buf.len(),
                VL_HDR_SIZE
            ));
        }

        let mut off = 0usize;

        let vldbversion = take_u32(buf, &mut off);
        let headersize = take_u32(buf, &mut off);
        let free_head = take_u32(buf, &mut off);
        let eof = take_u32(buf, &mut off);
        let allocs = take_u32(buf, &mut off);
        let frees = take_u32(buf, &mut off);
        let max_volume_id = take_u32(buf, &mut off);
        let total_rw = take_u32(buf, &mut off);
        let total_ro = take_u32(buf, &mut off);
        let total_bk = take_u32(buf, &mut off);

        let server_addrs = take_array(buf, &mut off, N_SERVER_SLOTS);
        let name_hash = take_array(buf, &mut off, HASH_SIZE);
        let id_hash_rw = take_array(buf, &mut off, HASH_SIZE);
        let id_hash_ro = take_array(buf, &mut off, HASH_SIZE);
        let id_hash_bk = take_array(buf, &mut off, HASH_SIZE);
        let sit = take_u32(buf, &mut off);

        Ok(Self {
            vldbversion,
            headersize,
            free_head,
            eof,
            allocs,
            frees,
            max_volume_id,
            total_rw,
            total_ro,
            total_bk,
            server_addrs,
            name_hash,
            id_hash_rw,
            id_hash_ro,
            id_hash_bk,
            sit,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = vec![0u8; VL_HDR_SIZE];
        let mut off = 0usize;
        let mut put_u32 = |v: u32| {
            BigEndian::write_u32(&mut buf[off..off + 4], v);
            off += 4;
        };

        for v in [
            self.vldbversion,
            self.headersize,
            self.free_head,
            self.eof,
            self.allocs,
            self.frees,
            self.max_volume_id,
            self.total_rw,
            self.total_ro,
            self.total_bk,
        ] {
            put_u32(v);
        }
        for arr in [
            &self.server_addrs,
            &self.name_hash,
            &self.id_hash_rw,
            &self.id_hash_ro,
            &self.id_hash_bk,
        ] {
            for &v in arr.iter() {
                put_u32(v);
            }
        }
        put_u32(self.sit);
        buf
    }

    /// Голова bucket-цепочки заданного вида.
    pub fn bucket_head(&self, kind: ChainKind, bucket: u32) -> u32 {
        let arr = match kind {
            ChainKind::Name => &self.name_hash,
            ChainKind::IdRw => &self.id_hash_rw,
            ChainKind::IdRo => &self.id_hash_ro,
            ChainKind::IdBk => &self.id_hash_bk,
        };
        arr[bucket as usize]
    }
}

#[inline]
fn take_u32(buf: &[u8], off: &mut usize) -> u32 {
    let v = BigEndian::read_u32(&buf[*off..*off + 4]);
    *off += 4;
    v
}

fn take_array(buf: &[u8], off: &mut usize, len: usize) -> Vec<u32> {
    let mut v = Vec::with_capacity(len);
    for _ in 0..len {
        v.push(take_u32(buf, off));
    }
    v
}

impl Default for VlHeader {
    fn default() -> Self {
        Self {
            vldbversion: crate::consts::VLDB_VERSION,
            headersize: VL_HDR_SIZE as u32,
            free_head: 0,
            eof: VL_HDR_SIZE as u32,
            allocs: 0,
            frees: 0,
            max_volume_id: 0,
            total_rw: 0,
            total_ro: 0,
            total_bk: 0,
            server_addrs: vec![0; N_SERVER_SLOTS],
            name_hash: vec![0; HASH_SIZE],
            id_hash_rw: vec![0; HASH_SIZE],
            id_hash_ro: vec![0; HASH_SIZE],
            id_hash_bk: vec![0; HASH_SIZE],
            sit: 0,
        }
    }
}

impl fmt::Display for VlHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vlheader: version {} headersize {} free {} eof {} allocs {} frees {} \
             max_volume_id {} rw {} ro {} bk {} sit {}",
            self.vldbversion,
            self.headersize,
            self.free_head,
            self.eof,
            self.allocs,
            self.frees,
            self.max_volume_id,
            self.total_rw,
            self.total_ro,
            self.total_bk,
            self.sit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vl_header_roundtrip() {
        let mut h0 = VlHeader::default();
        h0.free_head = 132268;
        h0.eof = 140000;
        h0.allocs = 7;
        h0.max_volume_id = 536870955;
        h0.server_addrs[3] = 0x0a000001;
        h0.name_hash[1234] = 132120;
        h0.id_hash_bk[8190] = 132416;
        h0.sit = 133000;

        let bytes = h0.encode();
        assert_eq!(bytes.len(), VL_HDR_SIZE);
        let h1 = VlHeader::decode(&bytes).unwrap();
        assert_eq!(h1.free_head, 132268);
        assert_eq!(h1.server_addrs[3], 0x0a000001);
        assert_eq!(h1.name_hash[1234], 132120);
        assert_eq!(h1.id_hash_bk[8190], 132416);
        assert_eq!(h1.sit, 133000);
        assert_eq!(h1.encode(), bytes);
    }

    #[test]
    fn wrong_length_is_malformed() {
        let err = VlHeader::decode(&[0u8; 100]).unwrap_err();
        assert!(err.to_string().contains("malformed vl header"), "{err}");
    }
}
