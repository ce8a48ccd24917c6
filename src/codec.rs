//! Record stream encoding.
//!
//! A stream is a sequence of JSON objects, one [`KeyValue`] per line. Every
//! record is a complete JSON value, so a reader can decode one record at a
//! time and tell a clean end-of-stream from a truncated or garbled one
//! without any outer framing.

use crate::KeyValue;
use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::{self, BufWriter, Read, Write};

/// Decodes [`KeyValue`]s from a reader until the stream is exhausted.
///
/// Yields `Err` for the first record that fails to parse. Nothing sensible
/// can be read past a corrupt record, so callers should stop there.
pub struct RecordReader<R: Read> {
    inner: StreamDeserializer<'static, IoRead<R>, KeyValue>,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = serde_json::Result<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Encodes [`KeyValue`]s onto a buffered writer, one per line.
pub struct RecordWriter<W: Write> {
    inner: BufWriter<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
        }
    }

    pub fn write(&mut self, kv: &KeyValue) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, kv)?;
        self.inner.write_all(b"\n")
    }

    /// Flushes buffered records and hands back the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

/// Writes every record in `records` to `writer` and flushes.
pub fn write_records<'a, W, I>(writer: W, records: I) -> io::Result<W>
where
    W: Write,
    I: IntoIterator<Item = &'a KeyValue>,
{
    let mut out = RecordWriter::new(writer);
    for kv in records {
        out.write(kv)?;
    }
    out.finish()
}
