//! db/scan — последовательный скан области данных.
//!
//! От headersize до eof (не включая). На каждой позиции — peek flags:
//! continuation-блок занимает 8192 байта и не отдаётся наружу, обычная
//! запись — 148 байт. Пропускаемый span по умолчанию никак не сверяется
//! (как в оригинале); VL_STRICT_CONT дополнительно требует, чтобы его
//! адрес был известным extent-блоком из таблицы по SIT.

use anyhow::{anyhow, Result};
use log::warn;

use crate::consts::{CONT_BLOCK_SIZE, CONT_FLAG, VL_ENTRY_SIZE};
use crate::entry::{decode_record, RecordKind, VlEntry};

use super::core::Vldb;

/// Ленивый restartable итератор скана: каждый вызов Vldb::scan()
/// начинает заново с headersize.
pub struct ScanIter<'a> {
    db: &'a Vldb,
    addr: u32,
    eof: u32,
    done: bool,
}

impl<'a> ScanIter<'a> {
    fn step(&mut self) -> Result<Option<VlEntry>> {
        while self.addr < self.eof {
            let addr = self.addr;
            let buf = self.db.store.read_at(addr, VL_ENTRY_SIZE)?;
            match decode_record(&buf, addr)? {
                RecordKind::Continuation { address } => {
                    if self.db.cfg.strict_cont && !self.db.cont_addrs.contains(&address) {
                        // Опциональная сверка: пропускаемый span обязан
                        // быть известным extent-блоком из таблицы по SIT.
                        return Err(anyhow!(
                            "scan: continuation record at {} not in extent table {:?}",
                            address,
                            self.db.cont_addrs
                        ));
                    }
                    self.addr = addr.wrapping_add(CONT_BLOCK_SIZE as u32);
                }
                RecordKind::Volume(entry) => {
                    debug_assert_ne!(entry.flags, CONT_FLAG);
                    self.addr = addr.wrapping_add(VL_ENTRY_SIZE as u32);
                    return Ok(Some(entry));
                }
            }
            if self.addr <= addr {
                // Защита от зацикливания при переполнении адреса.
                warn!("scan address wrapped at {}", addr);
                break;
            }
        }
        Ok(None)
    }
}

impl Iterator for ScanIter<'_> {
    type Item = Result<VlEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl Vldb {
    /// Последовательный скан всех volume records области данных.
    pub fn scan(&self) -> ScanIter<'_> {
        ScanIter {
            db: self,
            addr: self.header.headersize,
            eof: self.header.eof,
            done: false,
        }
    }
}
