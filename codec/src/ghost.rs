//! Ghost model and file load/save.
//!
//! A ghost file is a [`FileHeader`](wire::FileHeader) followed by a chunk
//! stream. Saving writes one skin record, one start tick record and one
//! character record per snapshot. Loading accepts any record order, keeps
//! the first skin and requires exactly as many character records as the
//! header declares.

use std::fs;
use std::io::Write;
use std::path::Path;

use wire::{
    decode_file_header, encode_file_header, truncate_str, EncodeError, FileHeader, Limits,
    RecordKind, HEADER_SIZE, MAP_HASH_LEN, MAP_LEN, OWNER_LEN,
};

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;
use crate::path::SnapshotPath;
use crate::session::{ChunkReader, ChunkWriter};
use crate::types::{
    Character, Skin, CHARACTER_NO_TICK_WORDS, CHARACTER_WORDS, NO_START_TICK, SKIN_WORDS,
};

/// A recorded run: metadata, skin and one character snapshot per tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ghost {
    owner: String,
    map: String,
    duration_ms: i32,
    start_tick: Option<i32>,
    skin: Skin,
    map_sha256: Option<[u8; MAP_HASH_LEN]>,
    path: SnapshotPath,
}

impl Ghost {
    /// Creates an empty ghost with the default skin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a ghost file with default limits.
    pub fn load(path: impl AsRef<Path>) -> CodecResult<Self> {
        load_ghost(path, &Limits::default(), &CodecLimits::default())
    }

    /// Saves this ghost with default limits.
    pub fn save(&self, path: impl AsRef<Path>) -> CodecResult<()> {
        save_ghost(self, path, &Limits::default())
    }

    /// Sets owner, map and run duration. Names are cut to fit the header.
    pub fn set_metadata(&mut self, owner: &str, map: &str, duration_ms: i32) {
        self.owner = truncate_str(owner, OWNER_LEN - 1).to_owned();
        self.map = truncate_str(map, MAP_LEN - 1).to_owned();
        self.duration_ms = duration_ms;
    }

    /// Sets the skin. The name is cut to 23 bytes.
    pub fn set_skin(&mut self, name: &str, use_custom_color: bool, color_body: i32, color_feet: i32) {
        self.skin = Skin::new(name, use_custom_color, color_body, color_feet);
    }

    /// Appends a snapshot.
    ///
    /// The first snapshot with a positive tick sets the start tick if none
    /// is set yet.
    pub fn push_snapshot(&mut self, snapshot: Character) -> CodecResult<()> {
        self.path.push(snapshot)?;
        if self.start_tick.is_none() && snapshot.tick > 0 {
            self.start_tick = Some(snapshot.tick);
        }
        Ok(())
    }

    /// Returns the snapshot at `index`, or `None` if out of range.
    #[must_use]
    pub fn snapshot(&self, index: usize) -> Option<&Character> {
        self.path.get(index)
    }

    /// Returns the snapshot at `index` mutably, or `None` if out of range.
    pub fn snapshot_mut(&mut self, index: usize) -> Option<&mut Character> {
        self.path.get_mut(index)
    }

    /// Releases every snapshot, keeping metadata and skin.
    pub fn clear_path(&mut self) {
        self.path.clear();
        self.start_tick = None;
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn map(&self) -> &str {
        &self.map
    }

    #[must_use]
    pub const fn duration_ms(&self) -> i32 {
        self.duration_ms
    }

    #[must_use]
    pub const fn start_tick(&self) -> Option<i32> {
        self.start_tick
    }

    pub fn set_start_tick(&mut self, start_tick: Option<i32>) {
        self.start_tick = start_tick;
    }

    #[must_use]
    pub const fn skin(&self) -> &Skin {
        &self.skin
    }

    #[must_use]
    pub const fn map_sha256(&self) -> Option<&[u8; MAP_HASH_LEN]> {
        self.map_sha256.as_ref()
    }

    /// Sets the map content hash. An all-zero hash counts as absent.
    pub fn set_map_sha256(&mut self, hash: Option<[u8; MAP_HASH_LEN]>) {
        self.map_sha256 = hash.filter(|h| *h != [0; MAP_HASH_LEN]);
    }

    #[must_use]
    pub const fn path(&self) -> &SnapshotPath {
        &self.path
    }

    /// Returns the number of recorded ticks.
    #[must_use]
    pub const fn num_ticks(&self) -> usize {
        self.path.len()
    }

    fn file_header(&self) -> CodecResult<FileHeader> {
        let num_ticks = i32::try_from(self.path.len()).map_err(|_| EncodeError::LengthOverflow {
            length: self.path.len(),
        })?;
        let mut header = FileHeader::new(&self.owner, &self.map, num_ticks, self.duration_ms);
        header.map_sha256 = self.map_sha256;
        Ok(header)
    }
}

/// Decodes a complete ghost file held in memory.
///
/// Fails without returning partial data if any stage fails or if the
/// number of character records differs from the header's tick count.
pub fn decode_ghost(buf: &[u8], limits: &Limits, codec_limits: &CodecLimits) -> CodecResult<Ghost> {
    let (header, offset) = decode_file_header(buf)?;

    // Positive after header validation.
    let num_ticks = header.num_ticks.unsigned_abs() as usize;
    if num_ticks > codec_limits.max_ticks {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::Ticks,
            limit: codec_limits.max_ticks,
            actual: num_ticks,
        });
    }
    let mut path = SnapshotPath::with_len(num_ticks)?;

    let mut reader = ChunkReader::new(&buf[offset..], header.version, limits);
    let mut index = 0;
    let mut skin = None;
    let mut start_tick = None;
    let mut no_tick = false;

    while let Some(kind) = reader.next_kind()? {
        if kind.is_character() && index == num_ticks {
            return Err(CodecError::RecordCountMismatch {
                expected: num_ticks,
                found: index + 1,
            });
        }

        match kind {
            RecordKind::Skin if skin.is_some() => reader.skip_chunk(),
            RecordKind::Skin => {
                let mut words = [0; SKIN_WORDS];
                reader.read_record(&mut words)?;
                skin = Some(Skin::from_words(&words));
            }
            RecordKind::CharacterNoTick => {
                let mut words = [0; CHARACTER_NO_TICK_WORDS];
                reader.read_record(&mut words)?;
                if let Some(slot) = path.get_mut(index) {
                    *slot = Character::from_no_tick_words(&words);
                }
                index += 1;
                no_tick = true;
            }
            RecordKind::Character => {
                let mut words = [0; CHARACTER_WORDS];
                reader.read_record(&mut words)?;
                if let Some(slot) = path.get_mut(index) {
                    *slot = Character::from_words(&words);
                }
                index += 1;
            }
            RecordKind::StartTick => {
                let mut words = [0; 1];
                reader.read_record(&mut words)?;
                start_tick = Some(words[0]).filter(|&tick| tick != NO_START_TICK);
            }
        }
    }

    if index != num_ticks {
        return Err(CodecError::RecordCountMismatch {
            expected: num_ticks,
            found: index,
        });
    }

    if no_tick {
        backfill_ticks(&mut path);
    }

    let start_tick = start_tick.or_else(|| path.get(0).map(|first| first.tick));

    tracing::debug!(
        "decoded ghost v{} by '{}' on '{}': {} ticks in {} chunks",
        header.version,
        header.owner,
        header.map,
        num_ticks,
        reader.chunks_read()
    );

    Ok(Ghost {
        owner: header.owner,
        map: header.map,
        duration_ms: header.time_ms,
        start_tick,
        skin: skin.unwrap_or_default(),
        map_sha256: header.map_sha256,
        path,
    })
}

/// Encodes `ghost` as a current-version file into `out`.
///
/// Ghosts without snapshots or with a non-positive duration cannot be
/// loaded back, so they are rejected before anything is written.
pub fn encode_ghost<W: Write>(ghost: &Ghost, mut out: W, limits: &Limits) -> CodecResult<W> {
    let header = ghost.file_header()?;
    let mut head = [0u8; HEADER_SIZE];
    let len = encode_file_header(&header, &mut head)?;
    out.write_all(&head[..len])?;

    let mut writer = ChunkWriter::new(out, limits);
    writer.write_record(RecordKind::Skin, &ghost.skin.to_words())?;
    writer.write_record(
        RecordKind::StartTick,
        &[ghost.start_tick.unwrap_or(NO_START_TICK)],
    )?;
    for snapshot in ghost.path.iter() {
        writer.write_record(RecordKind::Character, &snapshot.to_words())?;
    }
    let (out, chunks) = writer.finish_counted()?;

    tracing::debug!(
        "encoded ghost by '{}': {} ticks in {} chunks",
        ghost.owner,
        ghost.path.len(),
        chunks
    );
    Ok(out)
}

/// Reads and decodes the ghost file at `path`.
pub fn load_ghost(
    path: impl AsRef<Path>,
    limits: &Limits,
    codec_limits: &CodecLimits,
) -> CodecResult<Ghost> {
    let path = path.as_ref();
    let result = fs::read(path)
        .map_err(CodecError::from)
        .and_then(|bytes| decode_ghost(&bytes, limits, codec_limits));
    if let Err(err) = &result {
        tracing::warn!("failed to read ghost file '{}': {}", path.display(), err);
    }
    result
}

/// Encodes `ghost` and writes it to `path`.
///
/// The file is only created once the whole ghost has been encoded, so an
/// encoding failure leaves no output behind.
pub fn save_ghost(ghost: &Ghost, path: impl AsRef<Path>, limits: &Limits) -> CodecResult<()> {
    let path = path.as_ref();
    let result = encode_ghost(ghost, Vec::new(), limits)
        .and_then(|bytes| fs::write(path, bytes).map_err(CodecError::from));
    if let Err(err) = &result {
        tracing::warn!("failed to write ghost file '{}': {}", path.display(), err);
    }
    result
}

// Old recordings did not store ticks. Estimate the start from the last
// change of the attack tick, then number every snapshot from there.
fn backfill_ticks(path: &mut SnapshotPath) {
    let mut start = 0i32;
    let mut previous = None;
    for (index, character) in path.iter().enumerate() {
        if previous.is_some_and(|attack_tick| attack_tick != character.attack_tick) {
            start = character.attack_tick.wrapping_sub(index as i32);
        }
        previous = Some(character.attack_tick);
    }
    for (index, character) in path.iter_mut().enumerate() {
        character.tick = start.wrapping_add(index as i32);
    }
}
