//! db/core — ядро хэндла: структура Vldb и доступ к цепочкам.

use crate::chain::{ChainIter, ChainKind};
use crate::config::VldbConfig;
use crate::consts::MAX_CONT_BLOCKS;
use crate::store::VlStore;
use crate::ubik::UbikHeader;
use crate::vlheader::VlHeader;

/// Открытый снапшот VLDB. Владеет store, каталогом и таблицей адресов
/// extent-блоков на всё время жизни; записи — транзиентные value-объекты,
/// пересоздаваемые на каждое чтение.
pub struct Vldb {
    pub(crate) store: VlStore,
    pub(crate) cfg: VldbConfig,

    pub ubik: UbikHeader,
    pub header: VlHeader,

    /// Адреса continuation-блоков из заголовка блока по SIT
    /// (нулевой элемент — сам SIT-блок). Все нули, если SIT == 0.
    pub cont_addrs: [u32; MAX_CONT_BLOCKS],
}

impl Vldb {
    /// Обход цепочки заданного вида с произвольной головы.
    pub fn walk_chain(&self, kind: ChainKind, head: u32) -> ChainIter<'_> {
        ChainIter::new(&self.store, kind, head, self.cfg.max_chain)
    }
}

impl std::fmt::Debug for Vldb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vldb")
            .field("path", &self.store.path)
            .field("ubik", &self.ubik)
            .finish()
    }
}
