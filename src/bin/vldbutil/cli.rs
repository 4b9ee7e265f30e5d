use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI для чтения ubik .DB0 снапшотов с vldb-4
#[derive(Parser, Debug)]
#[command(name = "vldbutil", version, about = "Read-only vldb-4 snapshot inspector")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IdKindArg {
    Rw,
    Ro,
    Bk,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print the ubik and vl headers
    Header {
        #[arg(long)]
        path: PathBuf,
    },
    /// Look up one volume by exact name (hash-chain walk)
    LookupName {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Look up one volume by id
    LookupId {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        id: u32,
        /// Which id chain to search
        #[arg(long, value_enum, default_value_t = IdKindArg::Rw)]
        kind: IdKindArg,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Linear scan lookup by name (ignores hash chains)
    SearchName {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Sequential scan of all volume records. --json prints JSONL.
    Scan {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Walk the free list
    Freelist {
        #[arg(long)]
        path: PathBuf,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Resolve one server slot (direct or multi-homed)
    Server {
        #[arg(long)]
        path: PathBuf,
        #[arg(long)]
        slot: u8,
    },
    /// List all server slots; --refs adds site reference counts
    Servers {
        #[arg(long)]
        path: PathBuf,
        /// Count volume-record sites per slot (full scan)
        #[arg(long, default_value_t = false)]
        refs: bool,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}
