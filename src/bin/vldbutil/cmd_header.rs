use anyhow::Result;
use std::path::PathBuf;

use vldb0::Vldb;

pub fn exec(path: PathBuf) -> Result<()> {
    let db = Vldb::open(&path)?;
    println!("{}", db.ubik);
    println!("{}", db.header);
    Ok(())
}
