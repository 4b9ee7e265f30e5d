use anyhow::Result;
use std::path::PathBuf;

use vldb0::{IdKind, VlEntry, Vldb};

use crate::cli::IdKindArg;

pub fn exec_name(path: PathBuf, name: String, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    print_match(db.lookup_name(&name)?, json)
}

pub fn exec_id(path: PathBuf, id: u32, kind: IdKindArg, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    let kind = match kind {
        IdKindArg::Rw => IdKind::Rw,
        IdKindArg::Ro => IdKind::Ro,
        IdKindArg::Bk => IdKind::Bk,
    };
    print_match(db.lookup_id(kind, id)?, json)
}

pub fn exec_search(path: PathBuf, name: String, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    print_match(db.search_name(&name)?, json)
}

fn print_match(entry: Option<VlEntry>, json: bool) -> Result<()> {
    match entry {
        Some(e) => {
            if json {
                println!("{}", serde_json::to_string(&e)?);
            } else {
                println!("{}", e);
                for s in e.sites() {
                    println!("  site: server {} partition {} flags {}", s.server, s.partition, s.flags);
                }
            }
        }
        None => println!("no match"),
    }
    Ok(())
}
