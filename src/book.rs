//! Per-position grouping and best-move selection.
//!
//! A [`Book`] collects every candidate move of one input stream under its
//! position key, keeping keys in the order they were first seen.
//! [`Book::reduce`] then keeps only the heaviest move per key; when several
//! moves share the top weight the one read first wins.
use std::collections::HashMap;
use std::io::{self, Read};

use crate::record::{BookMove, BookRecord, RecordReader, TruncationPolicy};

/// Insertion-ordered `u64 -> V` map: a key vector plus an index.
#[derive(Debug, Clone, PartialEq)]
struct OrderedMap<V> {
    index: HashMap<u64, usize>,
    entries: Vec<(u64, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { index: HashMap::new(), entries: Vec::new() }
    }
}

impl<V> OrderedMap<V> {
    fn entry_or_insert_with(&mut self, key: u64, make: impl FnOnce() -> V) -> &mut V {
        let idx = *self.index.entry(key).or_insert_with(|| {
            self.entries.push((key, make()));
            self.entries.len() - 1
        });
        &mut self.entries[idx].1
    }

    fn get(&self, key: u64) -> Option<&V> {
        self.index.get(&key).map(|&i| &self.entries[i].1)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn iter(&self) -> impl Iterator<Item = (u64, &V)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// Candidate moves grouped by position key, in read order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Book {
    moves: OrderedMap<Vec<BookMove>>,
    records: usize,
}

impl Book {
    /// Append one record's move under its key.
    pub fn insert(&mut self, rec: BookRecord) {
        self.moves.entry_or_insert_with(rec.key, Vec::new).push(rec.mv);
        self.records += 1;
    }

    pub fn from_records<I: IntoIterator<Item = BookRecord>>(records: I) -> Self {
        let mut book = Self::default();
        for rec in records {
            book.insert(rec);
        }
        book
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.len() == 0
    }

    /// Total number of moves across all keys.
    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn get(&self, key: u64) -> Option<&[BookMove]> {
        self.moves.get(key).map(Vec::as_slice)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.moves.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[BookMove])> {
        self.moves.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Keep the best move of every key. Pure: the book is left untouched.
    pub fn reduce(&self) -> BestMoveTable {
        let mut table = BestMoveTable::default();
        for (key, moves) in self.iter() {
            if let Some(best) = select_best(moves) {
                table.insert(key, best);
            }
        }
        table
    }
}

/// Heaviest move; ties go to the earliest one.
pub fn select_best(moves: &[BookMove]) -> Option<BookMove> {
    let mut best: Option<BookMove> = None;
    for mv in moves {
        // strict `>` keeps the first of equal weights
        if best.is_none_or(|b| mv.weight > b.weight) {
            best = Some(*mv);
        }
    }
    best
}

/// Decode a whole book stream.
pub fn read_book<R: Read>(source: R, policy: TruncationPolicy) -> io::Result<Book> {
    let mut reader = RecordReader::with_policy(source, policy);
    let mut book = Book::default();
    for rec in reader.by_ref() {
        book.insert(rec?);
    }
    log::debug!(
        "book decoded: {} records, {} keys, {} trailing bytes",
        reader.records_read(), book.len(), reader.trailing_bytes()
    );
    Ok(book)
}

/// One selected move per key, in first-seen key order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BestMoveTable {
    best: OrderedMap<BookMove>,
}

impl BestMoveTable {
    /// Set the move for `key`. A key already present keeps its position.
    pub fn insert(&mut self, key: u64, mv: BookMove) {
        *self.best.entry_or_insert_with(key, || mv) = mv;
    }

    pub fn get(&self, key: u64) -> Option<&BookMove> {
        self.best.get(key)
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &BookMove)> {
        self.best.iter()
    }
}
