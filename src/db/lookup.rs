//! db/lookup — точечные запросы: по имени, по id, free-лист.
//!
//! Промах — не ошибка: Ok(None). Ошибкой являются только невалидное имя
//! (до любого I/O) и сбои чтения/декодирования по пути.

use anyhow::Result;

use crate::chain::{ChainIter, ChainKind};
use crate::entry::VlEntry;
use crate::hash::{hash_id, hash_name};

use super::core::Vldb;

/// Вид volume id при lookup_id: какой bucket-массив и какую цепочку
/// использовать.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Rw,
    Ro,
    Bk,
}

impl IdKind {
    fn chain(self) -> ChainKind {
        match self {
            IdKind::Rw => ChainKind::IdRw,
            IdKind::Ro => ChainKind::IdRo,
            IdKind::Bk => ChainKind::IdBk,
        }
    }

    fn id_of(self, e: &VlEntry) -> u32 {
        match self {
            IdKind::Rw => e.rwid,
            IdKind::Ro => e.roid,
            IdKind::Bk => e.bkid,
        }
    }
}

impl Vldb {
    /// Найти запись по точному имени через name-hash цепочку.
    pub fn lookup_name(&self, name: &str) -> Result<Option<VlEntry>> {
        let bucket = hash_name(name)?;
        let head = self.header.name_hash[bucket as usize];
        for entry in self.walk_chain(ChainKind::Name, head) {
            let entry = entry?;
            if entry.name == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Найти запись по volume id заданного вида.
    pub fn lookup_id(&self, kind: IdKind, volid: u32) -> Result<Option<VlEntry>> {
        let bucket = hash_id(volid);
        let head = self.header.bucket_head(kind.chain(), bucket);
        for entry in self.walk_chain(kind.chain(), head) {
            let entry = entry?;
            if kind.id_of(&entry) == volid {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    /// Free-лист: цепочка rw-указателей от отдельной головы каталога.
    /// Конечен (0-терминирован), restartable — каждый вызов идёт с головы.
    pub fn free_list(&self) -> ChainIter<'_> {
        self.walk_chain(ChainKind::IdRw, self.header.free_head)
    }

    /// Линейный поиск по имени без хеш-цепочек (находит записи с битой
    /// линковкой; дороже lookup_name на порядок).
    pub fn search_name(&self, name: &str) -> Result<Option<VlEntry>> {
        for entry in self.scan() {
            let entry = entry?;
            if entry.name == name {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}
