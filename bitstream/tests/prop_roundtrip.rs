use bitstream::varint::{pack_all, pack_i32, unpack_all, unpack_i32, MAX_PACKED_LEN};
use bitstream::{BitReader, BitWriter};
use proptest::prelude::*;

fn field_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=24).prop_flat_map(|bits| {
        let max = if bits == 0 { 0 } else { (1u32 << bits) - 1 };
        (Just(bits), 0..=max)
    })
}

proptest! {
    #[test]
    fn prop_varint_bijection(value in any::<i32>()) {
        let mut buf = [0u8; MAX_PACKED_LEN];
        let used = pack_i32(value, &mut buf).unwrap();
        let (decoded, consumed) = unpack_i32(&buf[..used]).unwrap();
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(consumed, used);
    }

    #[test]
    fn prop_varint_bulk(words in prop::collection::vec(any::<i32>(), 0..128)) {
        let mut packed = vec![0u8; words.len() * MAX_PACKED_LEN];
        let used = pack_all(&words, &mut packed).unwrap();
        let mut out = vec![0i32; words.len()];
        let count = unpack_all(&packed[..used], &mut out).unwrap();
        prop_assert_eq!(count, words.len());
        prop_assert_eq!(out, words);
    }

    #[test]
    fn prop_bit_fields_roundtrip(fields in prop::collection::vec(field_strategy(), 1..64)) {
        let mut buf = vec![0u8; fields.len() * 3 + 1];
        let mut writer = BitWriter::new(&mut buf);
        for &(bits, value) in &fields {
            writer.write_bits(value, bits).unwrap();
        }
        let used = writer.finish().unwrap();

        let mut reader = BitReader::new(&buf[..used]);
        for &(bits, value) in &fields {
            prop_assert_eq!(reader.read_bits(bits).unwrap(), value);
        }
    }
}
