//! Ghost file header layout and validation.

use crate::error::{DecodeError, EncodeError, NameField, Section, WireResult};

/// Marker identifying ghost files.
///
/// This value is fixed and must never change across versions.
pub const MARKER: [u8; 8] = *b"TWGHOST\0";

/// Version written by this crate.
pub const VERSION: u8 = 6;

/// Oldest version that can still be read.
pub const MIN_VERSION: u8 = 4;

/// First version whose header carries the map hash.
pub const MAP_HASH_VERSION: u8 = 6;

/// Width of the owner name field, terminator included.
pub const OWNER_LEN: usize = 16;

/// Width of the map name field, terminator included.
pub const MAP_LEN: usize = 64;

/// Size of the trailing map content hash.
pub const MAP_HASH_LEN: usize = 32;

/// Header size of files without the map hash (101 bytes).
pub const LEGACY_HEADER_SIZE: usize = 8 + 1 + OWNER_LEN + MAP_LEN + 4 + 4 + 4;

/// Header size of current files (133 bytes).
pub const HEADER_SIZE: usize = LEGACY_HEADER_SIZE + MAP_HASH_LEN;

const VERSION_OFFSET: usize = 8;
const OWNER_OFFSET: usize = VERSION_OFFSET + 1;
const MAP_OFFSET: usize = OWNER_OFFSET + OWNER_LEN;
const RESERVED_OFFSET: usize = MAP_OFFSET + MAP_LEN;
const TICKS_OFFSET: usize = RESERVED_OFFSET + 4;
const TIME_OFFSET: usize = TICKS_OFFSET + 4;

/// Decoded ghost file header.
///
/// The marker is validated during decoding and not stored. The reserved
/// slot (a checksum before version 6) is ignored on read and zeroed on write.
///
/// Names are decoded lossily: bytes that are not valid UTF-8 become U+FFFD,
/// so such a header does not re-encode byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    /// File format version.
    pub version: u8,
    /// Name of the player who recorded the ghost.
    pub owner: String,
    /// Name of the map the ghost was recorded on.
    pub map: String,
    /// Number of character snapshots in the file.
    pub num_ticks: i32,
    /// Duration of the run in milliseconds.
    pub time_ms: i32,
    /// Map content hash. `None` for pre-hash versions or an all-zero field.
    pub map_sha256: Option<[u8; MAP_HASH_LEN]>,
}

impl FileHeader {
    /// Creates a header for the current version.
    #[must_use]
    pub fn new(owner: &str, map: &str, num_ticks: i32, time_ms: i32) -> Self {
        Self {
            version: VERSION,
            owner: owner.to_owned(),
            map: map.to_owned(),
            num_ticks,
            time_ms,
            map_sha256: None,
        }
    }

    /// Returns the on-disk size of this header.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        header_len(self.version)
    }
}

/// Returns the on-disk header size for `version`.
#[must_use]
pub const fn header_len(version: u8) -> usize {
    if version >= MAP_HASH_VERSION {
        HEADER_SIZE
    } else {
        LEGACY_HEADER_SIZE
    }
}

/// Decodes and validates a file header.
///
/// Returns the header and the number of bytes it occupies. Versions before
/// [`MAP_HASH_VERSION`] never wrote the map hash, so chunk data starts right
/// after the duration field for them.
pub fn decode_file_header(buf: &[u8]) -> WireResult<(FileHeader, usize)> {
    if buf.len() < LEGACY_HEADER_SIZE {
        return Err(DecodeError::Truncated {
            section: Section::FileHeader,
            needed: LEGACY_HEADER_SIZE,
            available: buf.len(),
        });
    }

    let marker: [u8; 8] = read_array(buf, 0);
    if marker != MARKER {
        return Err(DecodeError::InvalidMarker { found: marker });
    }

    let version = buf[VERSION_OFFSET];
    if !(MIN_VERSION..=VERSION).contains(&version) {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let owner = read_name(&buf[OWNER_OFFSET..MAP_OFFSET], NameField::Owner)?;
    let map = read_name(&buf[MAP_OFFSET..RESERVED_OFFSET], NameField::Map)?;

    let num_ticks = i32::from_be_bytes(read_array(buf, TICKS_OFFSET));
    if num_ticks <= 0 {
        return Err(DecodeError::InvalidTickCount { found: num_ticks });
    }

    let time_ms = i32::from_be_bytes(read_array(buf, TIME_OFFSET));
    if time_ms <= 0 {
        return Err(DecodeError::InvalidDuration { found: time_ms });
    }

    let consumed = header_len(version);
    let map_sha256 = if version >= MAP_HASH_VERSION {
        if buf.len() < consumed {
            return Err(DecodeError::Truncated {
                section: Section::MapHash,
                needed: consumed,
                available: buf.len(),
            });
        }
        let hash: [u8; MAP_HASH_LEN] = read_array(buf, LEGACY_HEADER_SIZE);
        (hash != [0; MAP_HASH_LEN]).then_some(hash)
    } else {
        None
    };

    let header = FileHeader {
        version,
        owner,
        map,
        num_ticks,
        time_ms,
        map_sha256,
    };
    Ok((header, consumed))
}

/// Encodes a file header into the provided output buffer.
///
/// Names are cut to fit their fields with a terminator. The header is
/// validated with the same rules the decoder applies, so a header that
/// encodes successfully always decodes.
pub fn encode_file_header(header: &FileHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if !(MIN_VERSION..=VERSION).contains(&header.version) {
        return Err(EncodeError::UnsupportedVersion {
            version: header.version,
        });
    }
    if header.num_ticks <= 0 {
        return Err(EncodeError::InvalidTickCount {
            found: header.num_ticks,
        });
    }
    if header.time_ms <= 0 {
        return Err(EncodeError::InvalidDuration {
            found: header.time_ms,
        });
    }

    let len = header.encoded_len();
    if out.len() < len {
        return Err(EncodeError::BufferTooSmall {
            needed: len,
            available: out.len(),
        });
    }

    let out = &mut out[..len];
    out.fill(0);
    out[..VERSION_OFFSET].copy_from_slice(&MARKER);
    out[VERSION_OFFSET] = header.version;
    write_name(&mut out[OWNER_OFFSET..MAP_OFFSET], &header.owner);
    write_name(&mut out[MAP_OFFSET..RESERVED_OFFSET], &header.map);
    out[TICKS_OFFSET..TIME_OFFSET].copy_from_slice(&header.num_ticks.to_be_bytes());
    out[TIME_OFFSET..LEGACY_HEADER_SIZE].copy_from_slice(&header.time_ms.to_be_bytes());
    if let (Some(hash), true) = (header.map_sha256, len == HEADER_SIZE) {
        out[LEGACY_HEADER_SIZE..].copy_from_slice(&hash);
    }

    Ok(len)
}

/// Cuts `s` at the first NUL and then to at most `max_bytes` bytes, never
/// splitting a UTF-8 sequence.
#[must_use]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    let s = s.split('\0').next().unwrap_or_default();
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn read_array<const N: usize>(buf: &[u8], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&buf[offset..offset + N]);
    out
}

fn read_name(field: &[u8], which: NameField) -> WireResult<String> {
    let Some(end) = field.iter().position(|&b| b == 0) else {
        return Err(DecodeError::UnterminatedName { field: which });
    };
    Ok(String::from_utf8_lossy(&field[..end]).into_owned())
}

fn write_name(field: &mut [u8], name: &str) {
    let name = truncate_str(name, field.len() - 1);
    field[..name.len()].copy_from_slice(name.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(header: &FileHeader) -> Vec<u8> {
        let mut buf = vec![0u8; HEADER_SIZE];
        let len = encode_file_header(header, &mut buf).unwrap();
        buf.truncate(len);
        buf
    }

    #[test]
    fn marker_is_twghost() {
        assert_eq!(&MARKER[..7], b"TWGHOST");
        assert_eq!(MARKER[7], 0);
    }

    #[test]
    fn header_sizes() {
        assert_eq!(LEGACY_HEADER_SIZE, 101);
        assert_eq!(HEADER_SIZE, 133);
        assert_eq!(header_len(4), 101);
        assert_eq!(header_len(5), 101);
        assert_eq!(header_len(6), 133);
    }

    #[test]
    fn field_offsets_match_layout() {
        assert_eq!(OWNER_OFFSET, 9);
        assert_eq!(MAP_OFFSET, 25);
        assert_eq!(RESERVED_OFFSET, 89);
        assert_eq!(TICKS_OFFSET, 93);
        assert_eq!(TIME_OFFSET, 97);
    }

    #[test]
    fn roundtrip_current_version() {
        let mut header = FileHeader::new("nameless tee", "Kobra 4", 1500, 30_020);
        header.map_sha256 = Some([7; MAP_HASH_LEN]);
        let buf = encoded(&header);
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(&buf[93..97], &1500i32.to_be_bytes());

        let (decoded, consumed) = decode_file_header(&buf).unwrap();
        assert_eq!(consumed, HEADER_SIZE);
        assert_eq!(decoded, header);
    }

    #[test]
    fn legacy_version_has_no_hash() {
        let mut header = FileHeader::new("old", "ctf1", 10, 200);
        header.version = 5;
        header.map_sha256 = Some([1; MAP_HASH_LEN]);
        let mut buf = encoded(&header);
        assert_eq!(buf.len(), LEGACY_HEADER_SIZE);
        // Chunk data directly follows the duration field.
        buf.extend_from_slice(&[2, 1, 0, 3]);

        let (decoded, consumed) = decode_file_header(&buf).unwrap();
        assert_eq!(consumed, LEGACY_HEADER_SIZE);
        assert_eq!(decoded.version, 5);
        assert_eq!(decoded.map_sha256, None);
        assert_eq!(&buf[consumed..], &[2, 1, 0, 3]);
    }

    #[test]
    fn zero_hash_decodes_as_absent() {
        let header = FileHeader::new("a", "b", 1, 1);
        let (decoded, _) = decode_file_header(&encoded(&header)).unwrap();
        assert_eq!(decoded.map_sha256, None);
    }

    #[test]
    fn names_are_truncated_and_terminated() {
        let header = FileHeader::new(&"o".repeat(40), &"m".repeat(100), 1, 1);
        let buf = encoded(&header);
        assert_eq!(buf[OWNER_OFFSET + OWNER_LEN - 1], 0);
        assert_eq!(buf[MAP_OFFSET + MAP_LEN - 1], 0);

        let (decoded, _) = decode_file_header(&buf).unwrap();
        assert_eq!(decoded.owner, "o".repeat(15));
        assert_eq!(decoded.map, "m".repeat(63));
    }

    #[test]
    fn invalid_utf8_names_decode_lossily() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_file_header(&FileHeader::new("ab", "map", 1, 1), &mut buf).unwrap();
        buf[OWNER_OFFSET] = 0xff;
        let (header, _) = decode_file_header(&buf).unwrap();
        assert_eq!(header.owner, "\u{fffd}b");
        assert_eq!(header.map, "map");
    }

    #[test]
    fn rejects_wrong_marker() {
        let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
        buf[0] = b'X';
        let err = decode_file_header(&buf).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMarker { .. }));
    }

    #[test]
    fn rejects_unsupported_versions() {
        for version in [0u8, 3, 7, 255] {
            let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
            buf[VERSION_OFFSET] = version;
            let err = decode_file_header(&buf).unwrap_err();
            assert_eq!(err, DecodeError::UnsupportedVersion { found: version });
        }
    }

    #[test]
    fn rejects_unterminated_owner() {
        let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
        buf[OWNER_OFFSET..MAP_OFFSET].fill(b'x');
        let err = decode_file_header(&buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnterminatedName {
                field: NameField::Owner
            }
        );
    }

    #[test]
    fn rejects_unterminated_map() {
        let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
        buf[MAP_OFFSET..RESERVED_OFFSET].fill(b'x');
        let err = decode_file_header(&buf).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnterminatedName {
                field: NameField::Map
            }
        );
    }

    #[test]
    fn rejects_non_positive_counts() {
        let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
        buf[TICKS_OFFSET..TIME_OFFSET].copy_from_slice(&0i32.to_be_bytes());
        assert_eq!(
            decode_file_header(&buf).unwrap_err(),
            DecodeError::InvalidTickCount { found: 0 }
        );

        let mut buf = encoded(&FileHeader::new("a", "b", 1, 1));
        buf[TIME_OFFSET..LEGACY_HEADER_SIZE].copy_from_slice(&(-5i32).to_be_bytes());
        assert_eq!(
            decode_file_header(&buf).unwrap_err(),
            DecodeError::InvalidDuration { found: -5 }
        );
    }

    #[test]
    fn rejects_truncated_header() {
        let buf = encoded(&FileHeader::new("a", "b", 1, 1));
        let err = decode_file_header(&buf[..50]).unwrap_err();
        assert!(err.is_truncated());

        let err = decode_file_header(&buf[..LEGACY_HEADER_SIZE + 4]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Truncated {
                section: Section::MapHash,
                ..
            }
        ));
    }

    #[test]
    fn encode_rejects_unloadable_headers() {
        let mut buf = [0u8; HEADER_SIZE];
        let err = encode_file_header(&FileHeader::new("a", "b", 0, 1), &mut buf).unwrap_err();
        assert_eq!(err, EncodeError::InvalidTickCount { found: 0 });
        let err = encode_file_header(&FileHeader::new("a", "b", 1, 0), &mut buf).unwrap_err();
        assert_eq!(err, EncodeError::InvalidDuration { found: 0 });

        let mut header = FileHeader::new("a", "b", 1, 1);
        header.version = 3;
        let err = encode_file_header(&header, &mut buf).unwrap_err();
        assert_eq!(err, EncodeError::UnsupportedVersion { version: 3 });
    }

    #[test]
    fn encode_rejects_small_buffer() {
        let mut buf = [0u8; 100];
        let err = encode_file_header(&FileHeader::new("a", "b", 1, 1), &mut buf).unwrap_err();
        assert!(matches!(err, EncodeError::BufferTooSmall { needed: 133, .. }));
    }

    #[test]
    fn truncate_str_respects_boundaries() {
        assert_eq!(truncate_str("abc", 8), "abc");
        assert_eq!(truncate_str("abcdef", 3), "abc");
        assert_eq!(truncate_str("ab\0cd", 8), "ab");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate_str("aé", 2), "a");
    }
}
