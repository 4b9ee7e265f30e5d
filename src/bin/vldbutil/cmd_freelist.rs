use anyhow::Result;
use std::path::PathBuf;

use vldb0::Vldb;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    let mut n = 0u64;
    for entry in db.free_list() {
        let entry = entry?;
        if json {
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("free: {}", entry);
        }
        n += 1;
    }
    if !json {
        println!("{} free entries", n);
    }
    Ok(())
}
