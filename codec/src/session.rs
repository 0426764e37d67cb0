//! Chunked record sessions.
//!
//! A [`ChunkWriter`] groups records into chunks and runs each chunk through
//! delta, varint and Huffman coding. A [`ChunkReader`] reverses the
//! pipeline. Each session owns its Huffman tables and scratch buffers, so
//! independent sessions never share state.

use std::io::Write;

use bitstream::varint;
use wire::{
    decode_chunk, encode_chunk_header, ChunkHeader, Limits, RecordKind, CHUNK_HEADER_SIZE,
    MAX_ITEM_BYTES,
};

use crate::delta::{diff, undiff};
use crate::error::{CodecError, CodecResult};
use crate::huffman::Huffman;
use crate::scratch::ChunkScratch;

const MAX_RECORD_WORDS: usize = MAX_ITEM_BYTES / 4;

/// Most recent record of a session, kept in its raw form for delta coding.
#[derive(Debug, Clone, Copy)]
struct LastRecord {
    kind: Option<RecordKind>,
    words: [i32; MAX_RECORD_WORDS],
}

impl LastRecord {
    const fn new() -> Self {
        Self {
            kind: None,
            words: [0; MAX_RECORD_WORDS],
        }
    }

    fn matches(&self, kind: RecordKind) -> bool {
        self.kind == Some(kind)
    }

    fn remember(&mut self, kind: RecordKind, words: &[i32]) {
        self.kind = Some(kind);
        self.words[..words.len()].copy_from_slice(words);
    }

    fn forget(&mut self) {
        self.kind = None;
    }
}

fn check_size(kind: RecordKind, words: &[i32]) -> CodecResult<()> {
    if words.len() == kind.words() {
        Ok(())
    } else {
        Err(CodecError::RecordSize {
            kind,
            expected: kind.words(),
            found: words.len(),
        })
    }
}

/// Writes records as a stream of compressed chunks.
///
/// A chunk is flushed when the next record has a different kind, when it
/// reaches the item limit, or when its raw buffer is full. Records following
/// a record of the same kind inside one chunk are stored as deltas.
#[derive(Debug)]
pub struct ChunkWriter<W> {
    out: W,
    limits: Limits,
    huffman: Huffman,
    scratch: ChunkScratch,
    items: usize,
    last: LastRecord,
    chunks_written: usize,
}

impl<W: Write> ChunkWriter<W> {
    /// Creates a writer that appends chunks to `out`.
    pub fn new(out: W, limits: &Limits) -> Self {
        Self {
            out,
            limits: limits.clone(),
            huffman: Huffman::new(),
            scratch: ChunkScratch::for_writing(limits),
            items: 0,
            last: LastRecord::new(),
            chunks_written: 0,
        }
    }

    /// Returns the number of chunks flushed so far.
    #[must_use]
    pub const fn chunks_written(&self) -> usize {
        self.chunks_written
    }

    /// Buffers one record.
    ///
    /// `words` must hold exactly `kind.words()` values.
    pub fn write_record(&mut self, kind: RecordKind, words: &[i32]) -> CodecResult<()> {
        check_size(kind, words)?;

        if self.scratch.raw_space() < words.len() {
            self.flush_chunk()?;
        }

        if self.last.matches(kind) {
            let start = self.scratch.words.len();
            self.scratch.words.resize(start + words.len(), 0);
            diff(
                &self.last.words[..words.len()],
                words,
                &mut self.scratch.words[start..],
            );
        } else {
            self.flush_chunk()?;
            self.scratch.words.extend_from_slice(words);
        }

        self.last.remember(kind, words);
        self.items += 1;

        if self.items >= self.limits.max_items_per_chunk {
            self.flush_chunk()?;
        }
        Ok(())
    }

    /// Compresses and writes the buffered records as one chunk.
    ///
    /// Does nothing if no records are buffered. The next record after a
    /// flush is always stored raw.
    pub fn flush_chunk(&mut self) -> CodecResult<()> {
        let kind = match self.last.kind {
            Some(kind) if self.items > 0 => kind,
            _ => {
                self.reset();
                return Ok(());
            }
        };

        let packed_len = varint::pack_all(&self.scratch.words, &mut self.scratch.packed)?;
        let compressed_len = self.huffman.compress(
            &self.scratch.packed[..packed_len],
            &mut self.scratch.compressed,
        )?;

        let header = ChunkHeader::new(kind, self.items, compressed_len, &self.limits)?;
        let mut head = [0u8; CHUNK_HEADER_SIZE];
        encode_chunk_header(&header, &mut head)?;
        self.out.write_all(&head)?;
        self.out.write_all(&self.scratch.compressed[..compressed_len])?;

        tracing::debug!(
            "flushed {:?} chunk: {} items, {} raw words, {} bytes",
            kind,
            self.items,
            self.scratch.words.len(),
            compressed_len
        );

        self.chunks_written += 1;
        self.reset();
        Ok(())
    }

    /// Flushes the last partial chunk and returns the underlying writer.
    pub fn finish(self) -> CodecResult<W> {
        self.finish_counted().map(|(out, _)| out)
    }

    /// Like [`finish`](Self::finish), also returning the total number of
    /// chunks written.
    pub fn finish_counted(mut self) -> CodecResult<(W, usize)> {
        self.flush_chunk()?;
        self.out.flush()?;
        Ok((self.out, self.chunks_written))
    }

    fn reset(&mut self) {
        self.scratch.words.clear();
        self.items = 0;
        self.last.forget();
    }
}

/// Reads records back from a stream of compressed chunks.
///
/// Call [`next_kind`](Self::next_kind) to learn the kind of the next record,
/// then either [`read_record`](Self::read_record) or
/// [`skip_chunk`](Self::skip_chunk). Unread records left in a chunk are
/// dropped when the next chunk is read.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    input: &'a [u8],
    limits: Limits,
    huffman: Huffman,
    scratch: ChunkScratch,
    keep_last_across_chunks: bool,
    kind: Option<RecordKind>,
    num_items: usize,
    cur_item: usize,
    num_words: usize,
    pos: usize,
    last: LastRecord,
    chunks_read: usize,
}

impl<'a> ChunkReader<'a> {
    /// Creates a reader over the chunk stream that follows a file header.
    ///
    /// Version 4 files continue delta chains across chunk boundaries; later
    /// versions start every chunk fresh.
    pub fn new(input: &'a [u8], version: u8, limits: &Limits) -> Self {
        Self {
            input,
            limits: limits.clone(),
            huffman: Huffman::new(),
            scratch: ChunkScratch::for_reading(limits),
            keep_last_across_chunks: version == 4,
            kind: None,
            num_items: 0,
            cur_item: 0,
            num_words: 0,
            pos: 0,
            last: LastRecord::new(),
            chunks_read: 0,
        }
    }

    /// Returns the number of chunks read so far.
    #[must_use]
    pub const fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    /// Returns the kind of the next record, reading and decoding a new chunk
    /// once the current one is exhausted.
    ///
    /// Returns `Ok(None)` at the clean end of the stream.
    pub fn next_kind(&mut self) -> CodecResult<Option<RecordKind>> {
        if self.cur_item < self.num_items {
            return Ok(self.kind);
        }
        self.read_chunk()
    }

    /// Drops the remaining records of the current chunk.
    pub fn skip_chunk(&mut self) {
        self.cur_item = self.num_items;
    }

    /// Reads the next record of the current chunk into `out`.
    ///
    /// `out` must hold exactly as many words as the chunk's record kind.
    pub fn read_record(&mut self, out: &mut [i32]) -> CodecResult<()> {
        let Some(kind) = self.kind.filter(|_| self.cur_item < self.num_items) else {
            return Err(CodecError::NoPendingRecord);
        };
        check_size(kind, out)?;

        let available = self.num_words - self.pos;
        if available < out.len() {
            return Err(CodecError::NotEnoughData {
                kind,
                needed: out.len(),
                available,
            });
        }

        let stored = &self.scratch.words[self.pos..self.pos + out.len()];
        if self.last.matches(kind) {
            undiff(&self.last.words[..out.len()], stored, out);
        } else {
            out.copy_from_slice(stored);
        }

        self.last.remember(kind, out);
        self.pos += out.len();
        self.cur_item += 1;
        Ok(())
    }

    fn read_chunk(&mut self) -> CodecResult<Option<RecordKind>> {
        if !self.keep_last_across_chunks {
            self.last.forget();
        }
        self.kind = None;
        self.num_items = 0;
        self.cur_item = 0;
        self.num_words = 0;
        self.pos = 0;

        let Some(chunk) = decode_chunk(self.input, &self.limits)? else {
            return Ok(None);
        };
        self.input = &self.input[chunk.encoded_len()..];

        let decoded = self
            .huffman
            .decompress(chunk.payload, &mut self.scratch.packed)?;
        self.num_words = varint::unpack_all(&self.scratch.packed[..decoded], &mut self.scratch.words)?;

        let kind = chunk.header.kind;
        self.kind = Some(kind);
        self.num_items = usize::from(chunk.header.item_count);
        self.chunks_read += 1;

        tracing::debug!(
            "read {:?} chunk: {} items, {} words, {} bytes",
            kind,
            self.num_items,
            self.num_words,
            chunk.payload.len()
        );
        Ok(Some(kind))
    }
}
