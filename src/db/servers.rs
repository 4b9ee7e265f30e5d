//! db/servers — разрешение серверных слотов и производные отчёты.
//!
//! Packed-адрес слота: старший байт != 0xFF — прямой IPv4, UUID нет;
//! старший байт 0xFF — indirect-ссылка (16 бит индекс блока + 8 бит
//! индекс записи 1..=63) в extent-таблицу, удержанную при открытии.

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::consts::{MH_ENTRY_SIZE, N_SERVER_SLOTS};
use crate::mhost::{mh_entry_addr, AfsUuid, MhEntry, PackedAddr};

use super::core::Vldb;

/// Разрешённый серверный слот (производное представление, на диске
/// не хранится). UUID присутствует только у multi-homed серверов.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    pub slot: u8,
    pub uuid: Option<AfsUuid>,
    pub addrs: Vec<String>,
}

impl Vldb {
    /// Разрешить один слот таблицы адресов каталога.
    /// Нулевое значение слота — Server без UUID и без адресов.
    pub fn resolve_server(&self, slot: u8) -> Result<Server> {
        if slot as usize >= N_SERVER_SLOTS {
            return Err(anyhow!(
                "server slot {} out of range 0..{}",
                slot,
                N_SERVER_SLOTS - 1
            ));
        }
        let raw = self.header.server_addrs[slot as usize];
        match PackedAddr::parse(raw) {
            PackedAddr::Empty => Ok(Server {
                slot,
                uuid: None,
                addrs: Vec::new(),
            }),
            PackedAddr::Direct(ip) => Ok(Server {
                slot,
                uuid: None,
                addrs: vec![ip.to_string()],
            }),
            PackedAddr::Indirect { block, index } => {
                let base = self
                    .cont_addrs
                    .get(block as usize)
                    .copied()
                    .filter(|&a| a != 0)
                    .ok_or_else(|| {
                        anyhow!(
                            "slot {}: continuation block {} not present (raw {:#010x})",
                            slot,
                            block,
                            raw
                        )
                    })?;
                let addr = mh_entry_addr(base, index)?;
                let buf = self.store.read_at(addr, MH_ENTRY_SIZE)?;
                let entry = MhEntry::decode(&buf, addr)?;
                Ok(Server {
                    slot,
                    uuid: Some(entry.uuid),
                    addrs: entry.addrs(),
                })
            }
        }
    }

    /// Все 255 слотов по порядку (лениво).
    pub fn servers(&self) -> impl Iterator<Item = Result<Server>> + '_ {
        (0..N_SERVER_SLOTS as u8).map(move |slot| self.resolve_server(slot))
    }

    /// Производный отчёт: сколько сайтов volume records ссылаются на
    /// каждый слот (полный скан).
    pub fn server_refcounts(&self) -> Result<Vec<u64>> {
        let mut counts = vec![0u64; N_SERVER_SLOTS];
        for entry in self.scan() {
            let entry = entry?;
            for site in entry.sites() {
                if (site.server as usize) < N_SERVER_SLOTS {
                    counts[site.server as usize] += 1;
                }
            }
        }
        Ok(counts)
    }
}
