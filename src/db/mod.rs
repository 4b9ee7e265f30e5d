//! db — high-level API хэндла базы.
//!
//! Разделение по подмодулям:
//! - core.rs    — структура Vldb, поля, доступ к цепочкам
//! - open.rs    — открытие файла + валидация ubik/vldb/extent-таблицы
//! - lookup.rs  — lookup_name / lookup_id / free_list / search_name
//! - scan.rs    — последовательный скан (continuation-блоки пропускаются)
//! - servers.rs — разрешение серверных слотов и производные отчёты

pub mod core;
pub mod lookup;
pub mod open;
pub mod scan;
pub mod servers;

pub use core::Vldb;
pub use scan::ScanIter;
pub use servers::Server;
