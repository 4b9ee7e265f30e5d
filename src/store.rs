//! store — random-access чтение .DB0 по логическим адресам.
//!
//! Логический адрес + DBASE_OFFSET = физический оффсет файла. Файл
//! открывается read-only один раз; любой lookup свободно пере-seek'ает.
//! Короткое чтение — ошибка (снапшот локальный, ретраев нет).

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::consts::{DBASE_OFFSET, UBIK_HDR_ON_DISK};
use crate::ubik::UbikHeader;

pub struct VlStore {
    pub path: PathBuf,
    file: RefCell<File>,
}

impl VlStore {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("open vldb {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: RefCell::new(file),
        })
    }

    /// Прочитать len байт по логическому адресу addr.
    pub fn read_at(&self, addr: u32, len: usize) -> Result<Vec<u8>> {
        let off = addr as u64 + DBASE_OFFSET;
        let mut buf = vec![0u8; len];
        let mut f = self.file.borrow_mut();
        f.seek(SeekFrom::Start(off))?;
        f.read_exact(&mut buf).with_context(|| {
            format!(
                "short read: {} bytes at address {} (offset {}) in {}",
                len,
                addr,
                off,
                self.path.display()
            )
        })?;
        Ok(buf)
    }

    /// Ubik-заголовок лежит до начала логического адресного пространства.
    pub fn read_ubik_header(&self) -> Result<UbikHeader> {
        let mut buf = [0u8; UBIK_HDR_ON_DISK];
        let mut f = self.file.borrow_mut();
        f.seek(SeekFrom::Start(0))?;
        f.read_exact(&mut buf).with_context(|| {
            format!("short read: ubik header in {}", self.path.display())
        })?;
        UbikHeader::decode(&buf)
    }
}

impl std::fmt::Debug for VlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlStore").field("path", &self.path).finish()
    }
}
