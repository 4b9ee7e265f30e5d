//! chain — обход цепочек записей по next-указателям.
//!
//! Одна и та же примитивная операция для четырёх видов цепочек (по имени,
//! по rw/ro/bk id) и для free-листа (он переиспользует rw-указатель через
//! отдельную голову в каталоге): начать с адреса головы, читать запись,
//! отдавать её, переходить по next-указателю, остановиться на 0.
//!
//! Циклы не детектируются: битая база с зацикленной цепочкой даёт
//! незавершающийся обход. VL_MAX_CHAIN (см. config) ставит жёсткий
//! потолок для тех, кому нужна гарантия завершения.

use anyhow::{anyhow, Result};

use crate::consts::{NO_ADDR, VL_ENTRY_SIZE};
use crate::entry::VlEntry;
use crate::store::VlStore;

/// Вид цепочки: какое поле next-указателя использовать.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Name,
    IdRw,
    IdRo,
    IdBk,
}

/// Ленивый итератор по цепочке. Restartable: каждый новый итератор
/// начинает заново с переданной головы.
pub struct ChainIter<'a> {
    store: &'a VlStore,
    kind: ChainKind,
    next: u32,
    steps: u64,
    max_steps: Option<u64>,
}

impl<'a> ChainIter<'a> {
    pub fn new(store: &'a VlStore, kind: ChainKind, head: u32, max_steps: Option<u64>) -> Self {
        Self {
            store,
            kind,
            next: head,
            steps: 0,
            max_steps,
        }
    }

    fn step(&mut self) -> Result<Option<VlEntry>> {
        if self.next == NO_ADDR {
            return Ok(None);
        }
        if let Some(cap) = self.max_steps {
            if self.steps >= cap {
                return Err(anyhow!(
                    "chain walk exceeded {} steps at address {} (cyclic chain?)",
                    cap,
                    self.next
                ));
            }
        }
        let buf = self.store.read_at(self.next, VL_ENTRY_SIZE)?;
        let entry = VlEntry::decode(&buf, self.next)?;
        self.next = entry.next_ptr(self.kind);
        self.steps += 1;
        Ok(Some(entry))
    }
}

impl Iterator for ChainIter<'_> {
    type Item = Result<VlEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(e)) => Some(Ok(e)),
            Ok(None) => None,
            Err(e) => {
                // После ошибки обход прекращается.
                self.next = NO_ADDR;
                Some(Err(e))
            }
        }
    }
}
