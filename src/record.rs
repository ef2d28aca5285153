//! Polyglot record decoding.
//!
//! An opening book is a flat sequence of 16-byte big-endian records with no
//! header: `[key:u64][move:u16][weight:u16][learn:u16][padding:u16]`. The
//! learn and padding fields are read and discarded.
//!
//! [`RecordReader`] turns any [`Read`] source into a lazy sequence of
//! [`BookRecord`]s. A stream that ends mid-record stops the sequence without
//! an error unless [`TruncationPolicy::Reject`] is selected.
use std::io::{self, ErrorKind, Read};

/// Size of one encoded record in bytes.
pub const RECORD_SIZE: usize = 16;

/// Split a packed move word into `(from, to)` squares, each in `0..64`.
pub fn unpack_move(word: u16) -> (u8, u8) {
    let from = ((word >> 6) & 0x3F) as u8;
    let to = (word & 0x3F) as u8;
    (from, to)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    /// Origin square, 0..64.
    pub from: u8,
    /// Destination square, 0..64.
    pub to: u8,
    /// Relative preference among moves for the same key.
    pub weight: u16,
}

impl BookMove {
    pub fn from_word(word: u16, weight: u16) -> Self {
        let (from, to) = unpack_move(word);
        Self { from, to, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookRecord {
    pub key: u64,
    pub mv: BookMove,
}

/// Outcome of reading one fixed-width field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRead<T> {
    /// All bytes of the field were available.
    Full(T),
    /// Only this many bytes remained before end of input (0 on a clean boundary).
    Short(usize),
}

/// Read exactly `N` bytes unless the source runs dry first.
///
/// Unlike [`Read::read_exact`], running out of input is not an error here: it
/// is reported as [`FieldRead::Short`] with the number of bytes consumed.
pub fn read_field<R: Read, const N: usize>(r: &mut R) -> io::Result<FieldRead<[u8; N]>> {
    let mut buf = [0u8; N];
    let mut filled = 0;
    while filled < N {
        match r.read(&mut buf[filled..]) {
            Ok(0) => return Ok(FieldRead::Short(filled)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(FieldRead::Full(buf))
}

/// What to do with a partial record at the end of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncationPolicy {
    /// Drop the partial record and end the stream quietly.
    #[default]
    Ignore,
    /// Fail with [`ErrorKind::UnexpectedEof`]. A clean boundary still ends quietly.
    Reject,
}

/// Lazy iterator over the records of one book stream.
///
/// The reader consumes its source; it cannot be restarted.
pub struct RecordReader<R> {
    inner: R,
    policy: TruncationPolicy,
    records: usize,
    trailing: usize,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_policy(inner, TruncationPolicy::default())
    }

    pub fn with_policy(inner: R, policy: TruncationPolicy) -> Self {
        Self { inner, policy, records: 0, trailing: 0, done: false }
    }

    /// Number of complete records decoded so far.
    pub fn records_read(&self) -> usize {
        self.records
    }

    /// Bytes of a partial trailing record that were dropped (0 on clean EOF).
    pub fn trailing_bytes(&self) -> usize {
        self.trailing
    }

    fn next_record(&mut self) -> io::Result<Option<BookRecord>> {
        // Bytes of the current record consumed before a short field.
        let mut consumed = 0usize;

        macro_rules! field {
            ($n:literal) => {
                match read_field::<R, $n>(&mut self.inner)? {
                    FieldRead::Full(b) => {
                        consumed += $n;
                        b
                    }
                    FieldRead::Short(n) => return self.short_tail(consumed + n),
                }
            };
        }

        let key = u64::from_be_bytes(field!(8));
        let word = u16::from_be_bytes(field!(2));
        let weight = u16::from_be_bytes(field!(2));
        let _learn = field!(2);
        let _padding = field!(2);
        debug_assert_eq!(consumed, RECORD_SIZE);

        self.records += 1;
        Ok(Some(BookRecord { key, mv: BookMove::from_word(word, weight) }))
    }

    fn short_tail(&mut self, partial: usize) -> io::Result<Option<BookRecord>> {
        self.trailing = partial;
        if partial > 0 {
            match self.policy {
                TruncationPolicy::Ignore => {
                    log::warn!(
                        "book ends with a partial record ({} of {} bytes); ignored after {} records",
                        partial, RECORD_SIZE, self.records
                    );
                }
                TruncationPolicy::Reject => {
                    return Err(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        format!(
                            "partial record at end of book: {} of {} bytes after {} records",
                            partial, RECORD_SIZE, self.records
                        ),
                    ));
                }
            }
        }
        Ok(None)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = io::Result<BookRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_record() {
            Ok(Some(rec)) => Some(Ok(rec)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
