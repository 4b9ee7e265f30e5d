use anyhow::Result;
use std::path::PathBuf;

use vldb0::Vldb;

pub fn exec(path: PathBuf, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    let mut n = 0u64;
    for entry in db.scan() {
        let entry = entry?;
        if json {
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("{}", entry);
        }
        n += 1;
    }
    if !json {
        println!("{} records", n);
    }
    Ok(())
}
