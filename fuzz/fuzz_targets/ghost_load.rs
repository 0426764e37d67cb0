#![no_main]

use codec::{decode_ghost, encode_ghost, CodecLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = wire::Limits::default();
    let codec_limits = CodecLimits::for_testing();

    if let Ok(ghost) = decode_ghost(data, &limits, &codec_limits) {
        // Anything that loads must save again.
        let _ = encode_ghost(&ghost, Vec::new(), &limits);
    }
});
