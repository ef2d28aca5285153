use anyhow::{Context, Result};
use book_table::table::{ENTRY_SIZE, lookup, parse_key, read_table};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(about = "Look up positions in a best-move table written by book_table")]
struct Args {
    /// Table file to read
    #[arg(long, short = 'i', env = "BOOK_OUT", default_value = "out.bin")]
    input: PathBuf,

    /// Position keys to look up (hex with 0x, or decimal)
    #[arg(value_parser = parse_key)]
    keys: Vec<u64>,

    /// Print every entry in file order
    #[arg(long, default_value_t = false)]
    dump: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let mut rdr = BufReader::new(File::open(&args.input).with_context(|| format!("open {:?}", args.input))?);
    let entries = read_table(&mut rdr).with_context(|| format!("read {:?}", args.input))?;
    log::debug!("{:?}: {} bytes", args.input, entries.len() * ENTRY_SIZE);

    if args.dump {
        for e in &entries {
            println!("{:#018x} from={:>2} to={:>2}", e.key, e.from, e.to);
        }
    }
    for key in &args.keys {
        match lookup(&entries, *key) {
            Some(e) => println!("{:#018x} -> from={} to={}", key, e.from, e.to),
            None => println!("{:#018x} -> not in table", key),
        }
    }
    println!("{} entries", entries.len());
    Ok(())
}
