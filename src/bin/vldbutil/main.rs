use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd_freelist;
mod cmd_header;
mod cmd_lookup;
mod cmd_scan;
mod cmd_servers;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Header { path } => cmd_header::exec(path),

        cli::Cmd::LookupName { path, name, json } => cmd_lookup::exec_name(path, name, json),

        cli::Cmd::LookupId {
            path,
            id,
            kind,
            json,
        } => cmd_lookup::exec_id(path, id, kind, json),

        cli::Cmd::SearchName { path, name, json } => cmd_lookup::exec_search(path, name, json),

        cli::Cmd::Scan { path, json } => cmd_scan::exec(path, json),

        cli::Cmd::Freelist { path, json } => cmd_freelist::exec(path, json),

        cli::Cmd::Server { path, slot } => cmd_servers::exec_one(path, slot),

        cli::Cmd::Servers { path, refs, json } => cmd_servers::exec_all(path, refs, json),
    }
}
