use anyhow::Result;
use std::fs;

use vldb0::consts::{CONT_BLOCK_SIZE, CONT_FLAG, VL_ENTRY_SIZE};
use vldb0::{Vldb, VldbConfig};

mod common;
use common::{entry_at, unique_db, DbFixture};

#[test]
fn scan_skips_continuation_blocks() -> Result<()> {
    // Область данных: запись, continuation-блок (8192), запись.
    let path = unique_db("scan-cont");
    let mut fx = DbFixture::new();

    let a = fx.next_addr();
    let block = a + VL_ENTRY_SIZE as u32;
    let b = block + CONT_BLOCK_SIZE as u32;

    fx.put_entry(&entry_at(a, "before.block", 1))?;
    fx.put_cont_block(block, [block, 0, 0, 0], &[]);
    fx.put_entry(&entry_at(b, "after.block", 2))?;
    fx.header.sit = block;
    fx.write(&path)?;

    let db = Vldb::open_with_config(&path, VldbConfig::default())?;
    let names: Vec<String> = db
        .scan()
        .map(|r| r.map(|e| e.name))
        .collect::<Result<_>>()?;
    assert_eq!(names, vec!["before.block", "after.block"]);

    // Скан никогда не отдаёт запись с continuation-flags.
    for e in db.scan() {
        assert_ne!(e?.flags, CONT_FLAG);
    }

    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn scan_is_restartable() -> Result<()> {
    let path = unique_db("scan-restart");
    let mut fx = DbFixture::new();
    let a = fx.next_addr();
    let b = a + VL_ENTRY_SIZE as u32;
    fx.put_entry(&entry_at(a, "vol.a", 1))?;
    fx.put_entry(&entry_at(b, "vol.b", 2))?;
    fx.write(&path)?;

    let db = Vldb::open_with_config(&path, VldbConfig::default())?;
    let first: Vec<u32> = db.scan().map(|r| r.map(|e| e.address)).collect::<Result<_>>()?;
    let second: Vec<u32> = db.scan().map(|r| r.map(|e| e.address)).collect::<Result<_>>()?;
    assert_eq!(first, second);
    assert_eq!(first, vec![a, b]);

    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn free_list_walks_rw_chain_from_free_head() -> Result<()> {
    let path = unique_db("freelist");
    let mut fx = DbFixture::new();

    let a = fx.next_addr();
    let b = a + VL_ENTRY_SIZE as u32;
    let c = b + VL_ENTRY_SIZE as u32;
    let mut f1 = entry_at(a, "", 0);
    f1.next_id_rw = b;
    let mut f2 = entry_at(b, "", 0);
    f2.next_id_rw = c;
    let f3 = entry_at(c, "", 0);
    fx.put_entry(&f1)?;
    fx.put_entry(&f2)?;
    fx.put_entry(&f3)?;
    fx.header.free_head = a;
    fx.header.frees = 3;
    fx.write(&path)?;

    let db = Vldb::open_with_config(&path, VldbConfig::default())?;

    let walk = |db: &Vldb| -> Result<Vec<u32>> {
        db.free_list().map(|r| r.map(|e| e.address)).collect()
    };
    let first = walk(&db)?;
    let second = walk(&db)?;
    assert_eq!(first, vec![a, b, c], "A -> B -> C -> 0 in linkage order");
    assert_eq!(first, second, "free_list must be restartable");

    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn empty_free_list_yields_nothing() -> Result<()> {
    let path = unique_db("freelist-empty");
    let mut fx = DbFixture::new();
    fx.write(&path)?;

    let db = Vldb::open_with_config(&path, VldbConfig::default())?;
    assert_eq!(db.free_list().count(), 0);

    fs::remove_file(&path).ok();
    Ok(())
}

#[test]
fn strict_cont_catches_bogus_span() -> Result<()> {
    // Запись с continuation-flags, но span не начинается с валидного
    // заголовка блока: permissive-скан пропускает молча, strict — падает.
    let path = unique_db("scan-strict");
    let mut fx = DbFixture::new();

    let a = fx.next_addr();
    let mut bogus = entry_at(a, "", 0);
    bogus.flags = CONT_FLAG;
    // Одиночная 148-байтовая запись с continuation-flags: в таблице
    // extent-блоков её адреса нет (SIT не выставлен).
    fx.put_entry(&bogus)?;
    let b = a + CONT_BLOCK_SIZE as u32;
    fx.put_entry(&entry_at(b, "tail.vol", 9))?;
    fx.write(&path)?;

    let permissive = Vldb::open_with_config(&path, VldbConfig::default())?;
    let names: Vec<String> = permissive
        .scan()
        .map(|r| r.map(|e| e.name))
        .collect::<Result<_>>()?;
    assert_eq!(names, vec!["tail.vol"]);

    let strict_cfg = VldbConfig {
        strict_cont: true,
        max_chain: None,
    };
    let strict = Vldb::open_with_config(&path, strict_cfg)?;
    let err = strict
        .scan()
        .collect::<Result<Vec<_>>>()
        .unwrap_err();
    assert!(
        err.to_string().contains("not in extent table"),
        "unexpected error: {err}"
    );

    fs::remove_file(&path).ok();
    Ok(())
}
