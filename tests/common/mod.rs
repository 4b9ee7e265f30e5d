//! Общий билдер синтетических .DB0 фикстур для интеграционных тестов.
//!
//! Собирает файл в памяти из энкодеров крейта: ubik header, VL header по
//! физическому оффсету 64, записи по их логическим адресам.

#![allow(dead_code)]

use anyhow::Result;
use std::path::PathBuf;

use vldb0::consts::{
    CONT_BLOCK_SIZE, CONT_FLAG, DBASE_OFFSET, MH_ENTRY_SIZE, VL_ENTRY_SIZE, VL_HDR_SIZE,
};
use vldb0::mhost::{ContHeader, MhEntry};
use vldb0::{UbikHeader, VlEntry, VlHeader};

pub fn unique_db(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("vldb0-{}-{}-{}.DB0", prefix, pid, t))
}

pub struct DbFixture {
    pub ubik: UbikHeader,
    pub header: VlHeader,
    records: Vec<(u32, Vec<u8>)>,
}

impl DbFixture {
    pub fn new() -> Self {
        let mut ubik = UbikHeader::default();
        ubik.epoch = 1_600_000_000;
        ubik.counter = 1;
        Self {
            ubik,
            header: VlHeader::default(),
            records: Vec::new(),
        }
    }

    /// Следующий свободный логический адрес под запись размера 148.
    pub fn next_addr(&self) -> u32 {
        self.records
            .iter()
            .map(|(a, b)| a + b.len() as u32)
            .max()
            .unwrap_or(VL_HDR_SIZE as u32)
    }

    /// Положить volume record по её собственному адресу (e.address).
    pub fn put_entry(&mut self, e: &VlEntry) -> Result<()> {
        let bytes = e.encode()?;
        assert_eq!(bytes.len(), VL_ENTRY_SIZE);
        self.records.push((e.address, bytes));
        Ok(())
    }

    pub fn put_raw(&mut self, addr: u32, bytes: Vec<u8>) {
        self.records.push((addr, bytes));
    }

    /// Собрать continuation-блок (8192 байта): заголовок + записи по
    /// индексам 1..=63. Адреса других блоков — через cont_addrs.
    pub fn put_cont_block(
        &mut self,
        addr: u32,
        cont_addrs: [u32; 4],
        entries: &[(u8, MhEntry)],
    ) {
        let mut block = vec![0u8; CONT_BLOCK_SIZE as usize];
        let hdr = ContHeader {
            address: addr,
            count: entries.len() as u32,
            flags: CONT_FLAG,
            cont_addrs,
        };
        block[..MH_ENTRY_SIZE].copy_from_slice(&hdr.encode());
        for (index, entry) in entries {
            let off = *index as usize * MH_ENTRY_SIZE;
            block[off..off + MH_ENTRY_SIZE].copy_from_slice(&entry.encode());
        }
        self.records.push((addr, block));
    }

    /// Записать фикстуру на диск. eof, если не выставлен тестом явно,
    /// вычисляется по концу последней записи.
    pub fn write(&mut self, path: &std::path::Path) -> Result<()> {
        let data_end = self
            .records
            .iter()
            .map(|(a, b)| a + b.len() as u32)
            .max()
            .unwrap_or(VL_HDR_SIZE as u32);
        if self.header.eof == VL_HDR_SIZE as u32 {
            self.header.eof = data_end;
        }

        let total = DBASE_OFFSET as usize + data_end.max(self.header.eof) as usize;
        let mut file = vec![0u8; total];
        file[..16].copy_from_slice(&self.ubik.encode());
        file[DBASE_OFFSET as usize..DBASE_OFFSET as usize + VL_HDR_SIZE]
            .copy_from_slice(&self.header.encode());
        for (addr, bytes) in &self.records {
            let off = DBASE_OFFSET as usize + *addr as usize;
            file[off..off + bytes.len()].copy_from_slice(bytes);
        }
        std::fs::write(path, file)?;
        Ok(())
    }
}

/// Простая запись с именем и rw-id; сайты пустые.
pub fn entry_at(addr: u32, name: &str, rwid: u32) -> VlEntry {
    let mut e = VlEntry::default();
    e.address = addr;
    e.name = name.to_string();
    e.rwid = rwid;
    e
}
