use anyhow::{Context, Result};
use book_table::book::{BestMoveTable, Book, read_book};
use book_table::record::TruncationPolicy;
use book_table::table::{parse_key, write_table};
use clap::Parser;
use dotenvy::dotenv;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version, about = "Reduce a Polyglot opening book to a best-move table")]
struct Args {
    /// Input book files (.bin). Only the first one is written to the table.
    #[arg(env = "BOOK_INPUTS", value_delimiter = ',', default_value = "Titans.bin")]
    inputs: Vec<PathBuf>,

    /// Output table path
    #[arg(long, short = 'o', env = "BOOK_OUT", default_value = "out.bin")]
    out: PathBuf,

    /// Position key to print after conversion (hex with 0x, or decimal)
    #[arg(long, env = "BOOK_PROBE", value_parser = parse_key, default_value = "0x830eb9b20758d1de")]
    probe: u64,

    /// Fail on a partial record at the end of a book instead of ignoring it
    #[arg(long, env = "BOOK_STRICT", default_value_t = false)]
    strict: bool,
}

fn load_book(path: &Path, policy: TruncationPolicy) -> Result<Book> {
    let f = File::open(path).with_context(|| format!("open {:?}", path))?;
    let book = read_book(BufReader::new(f), policy).with_context(|| format!("read {:?}", path))?;
    log::info!("{:?}: {} records, {} positions", path, book.record_count(), book.len());
    Ok(book)
}

fn write_out(out: &Path, table: &BestMoveTable) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(out)
        .with_context(|| format!("create {:?}", out))?;
    let mut w = BufWriter::new(file);
    write_table(table, &mut w).with_context(|| format!("write {:?}", out))?;
    w.flush().with_context(|| format!("flush {:?}", out))?;
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let policy = if args.strict { TruncationPolicy::Reject } else { TruncationPolicy::Ignore };

    // Every input is parsed on its own; only the first one feeds the table.
    let mut books = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        books.push(load_book(path, policy)?);
    }
    if books.len() > 1 {
        log::warn!("{} inputs given; only {:?} is written", books.len(), args.inputs[0]);
    }
    let book = books.into_iter().next().unwrap_or_default();

    let table = book.reduce();
    write_out(&args.out, &table)?;
    log::info!("wrote {} entries to {:?}", table.len(), args.out);

    match table.get(args.probe) {
        Some(mv) => println!("{:#018x} -> from={} to={} weight={}", args.probe, mv.from, mv.to, mv.weight),
        None => println!("{:#018x} -> not in book", args.probe),
    }
    println!("{} entries", table.len());
    Ok(())
}
