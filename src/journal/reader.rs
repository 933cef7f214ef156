//! Journal Reader
//!
//! Handles reading entries from the journal file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::Result;
use super::entry::{JournalEntry, HEADER_SIZE};

/// Reads entries from the journal file
///
/// A frame cut short by end-of-file reads as the end of the journal
/// (`Ok(None)`), since that is what a crash mid-append leaves behind.
/// A complete frame that fails its checksum is an error.
pub struct JournalReader {
    reader: BufReader<File>,

    /// Offset just past the last complete, valid entry
    position: u64,
}

impl JournalReader {
    /// Open a journal file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            position: 0,
        })
    }

    /// Read the next entry from the journal
    pub fn next_entry(&mut self) -> Result<Option<JournalEntry>> {
        let mut header = [0u8; HEADER_SIZE];
        if self.read_full(&mut header)? < HEADER_SIZE {
            return Ok(None);
        }

        let (_, _, payload_len) = JournalEntry::parse_header(&header)?;

        let mut payload = vec![0u8; payload_len];
        if self.read_full(&mut payload)? < payload_len {
            return Ok(None);
        }

        let entry = JournalEntry::from_parts(&header, &payload)?;
        self.position += (HEADER_SIZE + payload_len) as u64;

        Ok(Some(entry))
    }

    /// Byte offset just past the last entry returned
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Iterate over all valid entries
    pub fn entries(self) -> JournalIterator {
        JournalIterator {
            reader: self,
            done: false,
        }
    }

    /// Fill `buf` as far as the file allows; returns bytes read
    fn read_full(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

/// Iterator over journal entries
///
/// Stops after the first error.
pub struct JournalIterator {
    reader: JournalReader,
    done: bool,
}

impl Iterator for JournalIterator {
    type Item = Result<JournalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
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
