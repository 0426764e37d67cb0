use bitstream::varint::{pack_all, unpack_all, MAX_PACKED_LEN};
use bitstream::{BitReader, BitWriter};

#[test]
fn bounded_writer_roundtrip_bits() {
    let mut buf = [0u8; 8];
    let mut writer = BitWriter::new(&mut buf);
    writer.write_bits(0b1010, 4).unwrap();
    writer.write_bits(0xAB, 8).unwrap();
    let bytes_used = writer.finish().unwrap();

    let mut reader = BitReader::new(&buf[..bytes_used]);
    assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
    assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
}

#[test]
fn varint_stream_roundtrip_record_shaped() {
    // A character-sized record of small deltas followed by absolute values.
    let words = [
        0, 0, 3, -2, 0, 1, 0, 0, 0, 0, 0, 1, 1024, -512, 96, -4, 12000, 1, 5, 2, -1, 7, 300,
        400_000,
    ];
    let mut packed = [0u8; 24 * MAX_PACKED_LEN];
    let used = pack_all(&words, &mut packed).unwrap();
    assert!(used < words.len() * 4, "small deltas should shrink");

    let mut out = [0i32; 24];
    let count = unpack_all(&packed[..used], &mut out).unwrap();
    assert_eq!(&out[..count], &words);
}
