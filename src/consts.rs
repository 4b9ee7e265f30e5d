//! Общие константы формата (ubik header, VL header, записи, extent-блоки).
//!
//! Всё на диске big-endian. Логический адрес + DBASE_OFFSET = физический
//! оффсет в файле.

// -------- Ubik disk header --------
// Layout (16 байт, физический оффсет 0):
// [magic u32][pad1 u16][size u16][epoch u32][counter u32]
pub const UBIK_MAGIC: u32 = 0x0035_4545;
pub const UBIK_HDR_ON_DISK: usize = 16;
// Поле size обязано равняться DBASE_OFFSET (резерв под заголовок ubik).
pub const UBIK_HDR_SIZE: u16 = 64;

// Сдвиг между логическими адресами БД и физическими оффсетами файла.
pub const DBASE_OFFSET: u64 = 64;

// -------- VL header (каталог) --------
// Layout:
// [10 x u32]            -- vldbversion, headersize, free_head, eof,
//                          allocs, frees, max_volume_id, total_rw/ro/bk
// [255 x u32]           -- packed-адреса серверных слотов
// [4 x 8191 x u32]      -- bucket-головы: name, rw-id, ro-id, bk-id
// [u32]                 -- SIT (адрес первого continuation-блока)
//
// Итого 40 + 1020 + 131056 + 4 = 132120 байт.
pub const VLDB_VERSION: u32 = 4;
pub const HASH_SIZE: usize = 8191;
pub const N_SERVER_SLOTS: usize = 255;
pub const VL_HDR_SIZE: usize = 40 + 4 * N_SERVER_SLOTS + 4 * 4 * HASH_SIZE + 4;

// -------- Volume records --------
// Layout (148 байт):
// [11 x u32]  -- rwid, roid, bkid, flags, lock_afs_id, lock_timestamp,
//                clone_id, next_id_rw, next_id_ro, next_id_bk, next_name
// [65 байт]   -- имя, ASCII, NUL-padding справа
// [13 x u8] x 3 -- server slot / partition / flags на каждый сайт
pub const VL_ENTRY_SIZE: usize = 148;
pub const VL_NAME_LEN: usize = 65;
pub const N_SITES: usize = 13;
// Слот 255 в массиве сайтов означает "сайт не занят".
pub const SITE_SLOT_EMPTY: u8 = 0xff;

// Flags=8 помечает continuation-блок; при последовательном скане такая
// запись занимает CONT_BLOCK_SIZE байт и не является volume record.
pub const CONT_FLAG: u32 = 0x8;
pub const CONT_BLOCK_SIZE: u64 = 8192;

// -------- Extent (multi-homed) records --------
// Оба типа записей фиксированные, по 128 байт; на блок 64 записи,
// запись 0 — заголовок блока.
pub const MH_ENTRY_SIZE: usize = 128;
pub const MH_ENTRIES_PER_BLOCK: u32 = 64;
pub const MAX_CONT_BLOCKS: usize = 4;
pub const N_MH_ADDRS: usize = 15;

// Старший байт packed-адреса 0xFF — признак indirect-ссылки в extent-блок.
pub const MH_SENTINEL_BYTE: u8 = 0xff;

// Sentinel конца цепочки / пустого bucket.
pub const NO_ADDR: u32 = 0;
