//! Best-move table serialization.
//!
//! The table is a headerless run of 16-byte little-endian entries:
//! `[key:u64][from:u32][to:u32]`. Weights are not stored. Entry count is
//! `file_size / ENTRY_SIZE`.
use anyhow::{Result, bail};
use std::io::{self, Read, Write};

use crate::book::BestMoveTable;
use crate::record::{FieldRead, read_field};

/// Size of one encoded table entry in bytes.
pub const ENTRY_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub key: u64,
    pub from: u32,
    pub to: u32,
}

impl TableEntry {
    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[0..8].copy_from_slice(&self.key.to_le_bytes());
        out[8..12].copy_from_slice(&self.from.to_le_bytes());
        out[12..16].copy_from_slice(&self.to.to_le_bytes());
        out
    }

    pub fn from_bytes(b: &[u8; ENTRY_SIZE]) -> Self {
        let [k0, k1, k2, k3, k4, k5, k6, k7, f0, f1, f2, f3, t0, t1, t2, t3] = *b;
        Self {
            key: u64::from_le_bytes([k0, k1, k2, k3, k4, k5, k6, k7]),
            from: u32::from_le_bytes([f0, f1, f2, f3]),
            to: u32::from_le_bytes([t0, t1, t2, t3]),
        }
    }
}

/// Write every entry of `table` in iteration order. The sink is not flushed.
pub fn write_table<W: Write>(table: &BestMoveTable, w: &mut W) -> io::Result<()> {
    for (key, mv) in table.iter() {
        let e = TableEntry { key, from: mv.from as u32, to: mv.to as u32 };
        w.write_all(&e.to_bytes())?;
    }
    Ok(())
}

/// Read a whole table back. A trailing partial entry is an error.
pub fn read_table<R: Read>(r: &mut R) -> Result<Vec<TableEntry>> {
    let mut out = Vec::new();
    loop {
        match read_field::<R, ENTRY_SIZE>(r)? {
            FieldRead::Full(b) => out.push(TableEntry::from_bytes(&b)),
            FieldRead::Short(0) => break,
            FieldRead::Short(n) => bail!(
                "table truncated: {} trailing bytes after {} entries", n, out.len()
            ),
        }
    }
    Ok(out)
}

/// Parse a position key given as `0x`-prefixed hex or decimal.
pub fn parse_key(s: &str) -> Result<u64> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    match parsed {
        Ok(k) => Ok(k),
        Err(e) => bail!("invalid position key {s:?}: {e}"),
    }
}

/// First entry for `key`, scanning in file order.
pub fn lookup(entries: &[TableEntry], key: u64) -> Option<&TableEntry> {
    entries.iter().find(|e| e.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BookMove;

    fn mv(from: u8, to: u8, weight: u16) -> BookMove {
        BookMove { from, to, weight }
    }

    #[test]
    fn empty_table_writes_nothing() {
        let mut out = Vec::new();
        write_table(&BestMoveTable::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn entry_layout_is_little_endian() {
        let mut t = BestMoveTable::default();
        t.insert(0x830eb9b20758d1de, mv(12, 4, 50));
        let mut out = Vec::new();
        write_table(&t, &mut out).unwrap();

        let mut expect = 0x830eb9b20758d1deu64.to_le_bytes().to_vec();
        expect.extend_from_slice(&[0x0C, 0, 0, 0, 0x04, 0, 0, 0]);
        assert_eq!(out, expect);
    }

    #[test]
    fn size_is_sixteen_per_key_and_reads_back() {
        let mut t = BestMoveTable::default();
        t.insert(9, mv(1, 2, 3));
        t.insert(4, mv(63, 0, 0));
        t.insert(u64::MAX, mv(0, 63, u16::MAX));
        let mut out = Vec::new();
        write_table(&t, &mut out).unwrap();
        assert_eq!(out.len(), ENTRY_SIZE * t.len());

        let entries = read_table(&mut out.as_slice()).unwrap();
        assert_eq!(entries.iter().map(|e| e.key).collect::<Vec<_>>(), vec![9, 4, u64::MAX]);
        assert_eq!(lookup(&entries, 4), Some(&TableEntry { key: 4, from: 63, to: 0 }));
        assert_eq!(lookup(&entries, 5), None);
    }

    #[test]
    fn partial_entry_is_rejected() {
        let mut bytes = TableEntry { key: 1, from: 2, to: 3 }.to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 5]);
        let err = read_table(&mut bytes.as_slice()).unwrap_err();
        assert!(err.to_string().contains("5 trailing bytes"));
    }

    #[test]
    fn keys_parse_as_hex_or_decimal() {
        assert_eq!(parse_key("0x830eb9b20758d1de").unwrap(), 0x830eb9b20758d1de);
        assert_eq!(parse_key("0X00FF").unwrap(), 255);
        assert_eq!(parse_key("1_000").unwrap(), 1000);
        assert!(parse_key("0xZZ").is_err());
        assert!(parse_key("").is_err());
    }

    #[test]
    fn write_errors_propagate() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> { Ok(0) }
            fn flush(&mut self) -> io::Result<()> { Ok(()) }
        }
        let mut t = BestMoveTable::default();
        t.insert(1, mv(1, 1, 1));
        let err = write_table(&t, &mut Full).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
