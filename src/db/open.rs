//! db/open — открытие снапшота и валидация заголовков.
//!
//! Порядок:
//! 1. ubik header (физический оффсет 0): magic/size обязаны совпасть,
//!    иначе файл нечитаем — дальше не читаем ничего.
//! 2. VL header (логический адрес 0): vldbversion обязана быть 4.
//! 3. Extent-таблица: если SIT != 0, заголовок блока по SIT обязан нести
//!    CONT_FLAG; его таблица адресов блоков удерживается в хэндле.

use anyhow::{anyhow, Result};
use log::debug;
use std::path::Path;

use crate::config::VldbConfig;
use crate::consts::{MAX_CONT_BLOCKS, MH_ENTRY_SIZE, VLDB_VERSION, VL_HDR_SIZE};
use crate::mhost::ContHeader;
use crate::store::VlStore;
use crate::vlheader::VlHeader;

use super::core::Vldb;

impl Vldb {
    pub fn open_with_config(path: &Path, cfg: VldbConfig) -> Result<Self> {
        let store = VlStore::open(path)?;

        let ubik = store.read_ubik_header()?;
        ubik.validate()?;

        let buf = store.read_at(0, VL_HDR_SIZE)?;
        let header = VlHeader::decode(&buf)?;
        if header.vldbversion != VLDB_VERSION {
            return Err(anyhow!(
                "invalid vl header: unsupported vldb version {} (expected {})",
                header.vldbversion,
                VLDB_VERSION
            ));
        }

        let mut cont_addrs = [0u32; MAX_CONT_BLOCKS];
        if header.sit != 0 {
            let buf = store.read_at(header.sit, MH_ENTRY_SIZE)?;
            let cont = ContHeader::decode(&buf, header.sit)?;
            cont.validate()?;
            cont_addrs = cont.cont_addrs;
            debug!(
                "extent table at {}: count={} blocks={:?}",
                header.sit, cont.count, cont_addrs
            );
        }

        debug!(
            "opened {} ({}, eof {})",
            path.display(),
            ubik,
            header.eof
        );

        Ok(Self {
            store,
            cfg,
            ubik,
            header,
            cont_addrs,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_config(path, VldbConfig::from_env())
    }
}
