// Базовые модули
pub mod config;
pub mod consts;
pub mod hash;

// Кодеки фиксированных записей (pure, без I/O)
pub mod entry;   // volume record + tagged-диспетчеризация
pub mod mhost;   // extent-блоки и multi-homed entries
pub mod ubik;    // заголовок ubik-снапшота
pub mod vlheader; // каталог VLDB

// Доступ к файлу и обход структур
pub mod chain;   // обход цепочек по next-указателям
pub mod store;   // random-access чтение по логическим адресам

// High-level хэндл
pub mod db;      // src/db/{core,open,lookup,scan,servers}.rs

// Удобные реэкспорты
pub use chain::ChainKind;
pub use config::VldbConfig;
pub use db::lookup::IdKind;
pub use db::{Server, Vldb};
pub use entry::{Site, VlEntry};
pub use hash::{hash_id, hash_name};
pub use mhost::{AfsUuid, MhEntry, PackedAddr};
pub use ubik::UbikHeader;
pub use vlheader::VlHeader;
