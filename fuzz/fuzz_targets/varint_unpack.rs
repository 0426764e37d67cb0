#![no_main]

use bitstream::{varint, BitReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut words = [0i32; 1600];
    if let Ok(count) = varint::unpack_all(data, &mut words) {
        let mut repacked = vec![0u8; count * varint::MAX_PACKED_LEN];
        let len = varint::pack_all(&words[..count], &mut repacked).unwrap();
        let mut again = [0i32; 1600];
        let count_again = varint::unpack_all(&repacked[..len], &mut again).unwrap();
        assert_eq!(&words[..count], &again[..count_again]);
    }

    // Drive the bit reader with the same input.
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;
    while idx < data.len() && idx < 1024 {
        let bits = u32::from(data[idx] % 25);
        idx += 1;
        reader.refill();
        if reader.read_bits(bits).is_err() {
            break;
        }
    }
});
