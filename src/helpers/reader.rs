use crate::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Spreadsheet content is empty: '{0}'")]
    EmptyContentError(String),
}

/// A unified reader over a local file or an in-memory package
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer
    Memory(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a local file
    pub(crate) fn open(file_name: &str) -> Result<UnifiedReader, Error> {
        let file = File::open(file_name)?;
        if file.metadata()?.len() == 0 {
            Err(ReaderError::EmptyContentError(file_name.to_owned()))?;
        }
        Ok(UnifiedReader::Local(BufReader::new(file)))
    }

    /// Wraps bytes that are already in memory
    pub(crate) fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<UnifiedReader, Error> {
        if bytes.is_empty() {
            Err(ReaderError::EmptyContentError(name.to_owned()))?;
        }
        Ok(UnifiedReader::Memory(Cursor::new(bytes)))
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Memory(reader) => reader.seek(pos),
        }
    }
}
