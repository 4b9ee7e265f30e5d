use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use vldb0::{Server, Vldb};

pub fn exec_one(path: PathBuf, slot: u8) -> Result<()> {
    let db = Vldb::open(&path)?;
    let srv = db.resolve_server(slot)?;
    print_server(&srv, None);
    Ok(())
}

#[derive(Serialize)]
struct ServerReport<'a> {
    #[serde(flatten)]
    server: &'a Server,
    #[serde(skip_serializing_if = "Option::is_none")]
    refs: Option<u64>,
}

pub fn exec_all(path: PathBuf, refs: bool, json: bool) -> Result<()> {
    let db = Vldb::open(&path)?;
    let counts = if refs {
        Some(db.server_refcounts()?)
    } else {
        None
    };

    for srv in db.servers() {
        let srv = srv?;
        // Пустые слоты в листинге пропускаем, занятые печатаем всегда.
        let n = counts.as_ref().map(|c| c[srv.slot as usize]);
        if srv.addrs.is_empty() && srv.uuid.is_none() && n.unwrap_or(0) == 0 {
            continue;
        }
        if json {
            println!(
                "{}",
                serde_json::to_string(&ServerReport {
                    server: &srv,
                    refs: n
                })?
            );
        } else {
            print_server(&srv, n);
        }
    }
    Ok(())
}

fn print_server(srv: &Server, refs: Option<u64>) {
    let uuid = srv
        .uuid
        .map(|u| u.to_string())
        .unwrap_or_else(|| "-".to_string());
    let addrs = if srv.addrs.is_empty() {
        "-".to_string()
    } else {
        srv.addrs.join(",")
    };
    match refs {
        Some(n) => println!("server {}: uuid {} addrs {} refs {}", srv.slot, uuid, addrs, n),
        None => println!("server {}: uuid {} addrs {}", srv.slot, uuid, addrs),
    }
}
