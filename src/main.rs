//! `rekvd`: the binary entry point.
//!
//! Parses arguments, recovers state from the dump and journal, starts the
//! background dump writer, then runs a blocking, thread-per-connection TCP
//! acceptor loop. Concurrency is real OS threads throughout — no
//! cooperative-suspension runtime, matching spec.md §5.

use std::io::BufReader;
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;

use rekv::cli::constants::set_display_level;
use rekv::cli::Cli;
use rekv::commands;
use rekv::config;
use rekv::displaylevel;
use rekv::dump::DumpWriter;
use rekv::journal::Journal;
use rekv::keyspace::Keyspace;
use rekv::recovery;
use rekv::wire::{write_frame, Frame};

fn main() -> Result<()> {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    let data_dir = cli.data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let dump_path = data_dir.join(config::DUMP_FILE_NAME);
    let journal_path = data_dir.join(config::JOURNAL_FILE_NAME);

    let keyspace = Arc::new(Keyspace::new());

    displaylevel!(3, "recovering from {} and {}\n", dump_path.display(), journal_path.display());
    recovery::run(&dump_path, &journal_path, &keyspace)
        .with_context(|| "recovery failed; refusing to start")?;

    let journal = Journal::open(&journal_path)
        .with_context(|| format!("opening journal at {}", journal_path.display()))?;
    let journal = Arc::new(Mutex::new(journal));

    let dump_writer = DumpWriter::start(data_dir.clone(), keyspace.clone(), journal.clone(), cli.dump_interval());

    let port = cli.port();
    let listener = TcpListener::bind(("0.0.0.0", port))
        .with_context(|| format!("binding to port {port}"))?;
    displaylevel!(2, "listening on port {}\n", port);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let keyspace = keyspace.clone();
                let journal = journal.clone();
                std::thread::spawn(move || {
                    if let Err(e) = serve_connection(stream, &keyspace, &journal) {
                        displaylevel!(3, "connection closed: {}\n", e);
                    }
                });
            }
            Err(e) => {
                displaylevel!(1, "accept failed: {}\n", e);
            }
        }
    }

    dump_writer.shutdown();
    Ok(())
}

/// Reads and services requests from one connection until it closes or a
/// malformed frame is seen.
fn serve_connection(stream: TcpStream, keyspace: &Keyspace, journal: &Mutex<Journal>) -> Result<()> {
    let mut reader = BufReader::new(stream.try_clone().context("cloning connection handle")?);
    let mut writer = stream;

    loop {
        let frame = match Frame::decode(&mut reader) {
            Ok(frame) => frame,
            Err(rekv::wire::FrameError::Eof) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        let Some((name, args)) = frame.as_command() else {
            write_frame(&mut writer, &Frame::Error("ERR malformed request".into()))?;
            continue;
        };

        if commands::is_mutating(&name) {
            let journal_frame = Frame::command(&name, &args);
            let mut guard = journal.lock().unwrap();
            if let Err(e) = guard.append(&journal_frame) {
                drop(guard);
                write_frame(&mut writer, &Frame::Error(format!("ERR {e}")))?;
                continue;
            }
            drop(guard);
        }

        let reply = commands::dispatch(&name, &args, keyspace);
        write_frame(&mut writer, &reply)?;
    }
}

