#![no_main]

use codec::Huffman;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let huffman = Huffman::new();
    let mut out = vec![0u8; 25_600];
    if let Ok(len) = huffman.decompress(data, &mut out) {
        // Whatever decodes must compress and decode back to itself.
        let mut packed = vec![0u8; len * 2 + 8];
        let packed_len = huffman.compress(&out[..len], &mut packed).unwrap();
        let mut again = vec![0u8; len];
        let again_len = huffman.decompress(&packed[..packed_len], &mut again).unwrap();
        assert_eq!(&out[..len], &again[..again_len]);
    }
});
