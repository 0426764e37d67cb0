//! Static Huffman coder for chunk payloads.
//!
//! The tree is built from a fixed frequency table tuned for varint-packed
//! replay records, so encoder and decoder agree without transmitting it.
//! Codes are emitted least significant bit first. Symbol 256 marks the end
//! of a stream.

use std::fmt;

use bitstream::{BitError, BitReader, BitWriter};

/// End-of-stream symbol, one past the byte alphabet.
pub const EOF_SYMBOL: usize = 256;

const MAX_SYMBOLS: usize = EOF_SYMBOL + 1;
const MAX_NODES: usize = MAX_SYMBOLS * 2 - 1;
const LUT_BITS: u32 = 10;
const LUT_SIZE: usize = 1 << LUT_BITS;
const NO_CHILD: u16 = u16::MAX;

/// Symbol weights. The last entry is replaced by a weight of one when the
/// tree is built so the end-of-stream code is among the longest.
#[rustfmt::skip]
pub const FREQUENCY_TABLE: [u32; MAX_SYMBOLS] = [
    1 << 30, 4545, 2657, 431, 1950, 919, 444, 482, 2244, 617, 838, 542, 715,
    1814, 304, 240, 754, 212, 647, 186, 283, 131, 146, 166, 543, 164,
    167, 136, 179, 859, 363, 113, 157, 154, 204, 108, 137, 180, 202,
    176, 872, 404, 168, 134, 151, 111, 113, 109, 120, 126, 129, 100,
    41, 20, 16, 22, 18, 18, 17, 19, 16, 37, 13, 21, 362,
    166, 99, 78, 95, 88, 81, 70, 83, 284, 91, 187, 77, 68,
    52, 68, 59, 66, 61, 638, 71, 157, 50, 46, 69, 43, 11,
    24, 13, 19, 10, 12, 12, 20, 14, 9, 20, 20, 10, 10,
    15, 15, 12, 12, 7, 19, 15, 14, 13, 18, 35, 19, 17,
    14, 8, 5, 15, 17, 9, 15, 14, 18, 8, 10, 2173, 134,
    157, 68, 188, 60, 170, 60, 194, 62, 175, 71, 148, 67, 167,
    78, 211, 67, 156, 69, 1674, 90, 174, 53, 147, 89, 181, 51,
    174, 63, 163, 80, 167, 94, 128, 122, 223, 153, 218, 77, 200,
    110, 190, 73, 174, 69, 145, 66, 277, 143, 141, 60, 136, 53,
    180, 57, 142, 57, 158, 61, 166, 112, 152, 92, 26, 22, 21,
    28, 20, 26, 30, 21, 32, 27, 20, 17, 23, 21, 30, 22,
    22, 21, 27, 25, 17, 27, 23, 18, 39, 26, 15, 21, 12,
    18, 18, 27, 20, 18, 15, 19, 11, 17, 33, 12, 18, 15,
    19, 18, 16, 26, 17, 18, 9, 10, 25, 22, 22, 17, 20,
    16, 6, 16, 15, 20, 14, 18, 24, 335, 1517,
];

/// Errors from Huffman compression and decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// Input ran out before the end-of-stream code.
    Truncated { decoded: usize },

    /// Output buffer cannot hold the result.
    OutputFull { capacity: usize },

    /// Unexpected bit-level failure.
    Bitstream(BitError),
}

impl fmt::Display for HuffmanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { decoded } => {
                write!(f, "huffman stream ended after {decoded} bytes without end marker")
            }
            Self::OutputFull { capacity } => {
                write!(f, "huffman output exceeds {capacity} bytes")
            }
            Self::Bitstream(e) => write!(f, "huffman bitstream error: {e}"),
        }
    }
}

impl std::error::Error for HuffmanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    bits: u32,
    num_bits: u32,
    children: [u16; 2],
    symbol: u8,
}

impl Node {
    const fn leaf(symbol: u8) -> Self {
        Self {
            bits: 0,
            num_bits: 0,
            children: [NO_CHILD; 2],
            symbol,
        }
    }

    const fn internal(children: [u16; 2]) -> Self {
        Self {
            bits: 0,
            num_bits: 0,
            children,
            symbol: 0,
        }
    }

    const fn is_leaf(&self) -> bool {
        self.children[0] == NO_CHILD
    }
}

struct PendingNode {
    id: u16,
    frequency: u32,
}

/// Huffman coder over the fixed replay frequency table.
///
/// Construction is cheap (a 257-symbol tree plus a 1024-entry table), so
/// each load or save session builds its own instance.
#[derive(Debug, Clone)]
pub struct Huffman {
    nodes: Vec<Node>,
    decode_lut: Vec<u16>,
    root: u16,
}

impl Default for Huffman {
    fn default() -> Self {
        Self::new()
    }
}

impl Huffman {
    /// Builds the tree and decode table.
    #[must_use]
    pub fn new() -> Self {
        let mut huffman = Self::build_tree(&FREQUENCY_TABLE);
        huffman.assign_codes();
        huffman.build_lut();
        huffman
    }

    fn build_tree(frequencies: &[u32; MAX_SYMBOLS]) -> Self {
        let mut nodes = Vec::with_capacity(MAX_NODES);
        let mut pending = Vec::with_capacity(MAX_SYMBOLS);
        for (symbol, &frequency) in frequencies.iter().enumerate() {
            nodes.push(Node::leaf(symbol as u8));
            pending.push(PendingNode {
                id: symbol as u16,
                frequency: if symbol == EOF_SYMBOL { 1 } else { frequency },
            });
        }

        // Merge the two rarest nodes until one remains. The sort is stable,
        // so ties keep their previous relative order.
        while pending.len() > 1 {
            pending.sort_by(|a, b| b.frequency.cmp(&a.frequency));
            let Some(lowest) = pending.pop() else { break };
            let Some(second) = pending.last_mut() else { break };

            let id = nodes.len() as u16;
            nodes.push(Node::internal([lowest.id, second.id]));
            second.id = id;
            second.frequency = second.frequency.saturating_add(lowest.frequency);
        }

        let root = pending.first().map_or(0, |node| node.id);
        Self {
            nodes,
            decode_lut: vec![root; LUT_SIZE],
            root,
        }
    }

    fn assign_codes(&mut self) {
        let mut stack = vec![(self.root, 0u32, 0u32)];
        while let Some((id, bits, depth)) = stack.pop() {
            let node = &mut self.nodes[usize::from(id)];
            if node.is_leaf() {
                node.bits = bits;
                node.num_bits = depth;
                continue;
            }
            let [zero, one] = node.children;
            stack.push((one, bits | (1 << depth), depth + 1));
            stack.push((zero, bits, depth + 1));
        }
    }

    fn build_lut(&mut self) {
        for (prefix, slot) in self.decode_lut.iter_mut().enumerate() {
            let mut bits = prefix;
            let mut id = self.root;
            for _ in 0..LUT_BITS {
                id = self.nodes[usize::from(id)].children[bits & 1];
                bits >>= 1;
                if self.nodes[usize::from(id)].is_leaf() {
                    break;
                }
            }
            *slot = id;
        }
    }

    /// Compresses `input` into `out`, returning the number of bytes written.
    ///
    /// The output ends with the end-of-stream code followed by one padding
    /// byte, so even empty input produces output.
    pub fn compress(&self, input: &[u8], out: &mut [u8]) -> Result<usize, HuffmanError> {
        let capacity = out.len();
        let map_err = |err| match err {
            BitError::BufferOverflow { .. } => HuffmanError::OutputFull { capacity },
            other => HuffmanError::Bitstream(other),
        };

        let mut writer = BitWriter::new(out);
        for symbol in input.iter().map(|&b| usize::from(b)).chain([EOF_SYMBOL]) {
            let node = &self.nodes[symbol];
            writer.write_bits(node.bits, node.num_bits).map_err(map_err)?;
        }
        writer.finish().map_err(map_err)
    }

    /// Decompresses `input` into `out`, returning the number of bytes written.
    ///
    /// Decoding stops at the end-of-stream code. Any input after it is
    /// ignored.
    pub fn decompress(&self, input: &[u8], out: &mut [u8]) -> Result<usize, HuffmanError> {
        let mut reader = BitReader::new(input);
        let mut len = 0;

        loop {
            reader.refill();
            let truncated = |_| HuffmanError::Truncated { decoded: len };

            let mut id = self.decode_lut[reader.peek(LUT_BITS) as usize];
            let mut node = self.nodes[usize::from(id)];
            if node.is_leaf() {
                reader.consume(node.num_bits).map_err(truncated)?;
            } else {
                // Code is longer than the table; walk the rest bit by bit.
                reader.consume(LUT_BITS).map_err(truncated)?;
                while !node.is_leaf() {
                    let bit = reader.read_bit().map_err(truncated)?;
                    id = node.children[usize::from(bit)];
                    node = self.nodes[usize::from(id)];
                }
            }

            if usize::from(id) == EOF_SYMBOL {
                return Ok(len);
            }
            let Some(slot) = out.get_mut(len) else {
                return Err(HuffmanError::OutputFull {
                    capacity: out.len(),
                });
            };
            *slot = node.symbol;
            len += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(input: &[u8]) -> Vec<u8> {
        let huffman = Huffman::new();
        let mut out = vec![0u8; input.len() * 2 + 8];
        let len = huffman.compress(input, &mut out).unwrap();
        out.truncate(len);
        out
    }

    fn roundtrip(input: &[u8]) -> Vec<u8> {
        let huffman = Huffman::new();
        let packed = compress(input);
        let mut out = vec![0u8; input.len()];
        let len = huffman.decompress(&packed, &mut out).unwrap();
        out.truncate(len);
        out
    }

    #[test]
    fn tree_has_every_node() {
        let huffman = Huffman::new();
        assert_eq!(huffman.nodes.len(), MAX_NODES);
        assert_eq!(usize::from(huffman.root), MAX_NODES - 1);
    }

    #[test]
    fn known_codes() {
        let huffman = Huffman::new();
        let code = |symbol: usize| {
            let node = huffman.nodes[symbol];
            (node.bits, node.num_bits)
        };
        assert_eq!(code(0), (1, 1));
        assert_eq!(code(1), (8, 4));
        assert_eq!(code(255), (146, 8));
        assert_eq!(code(EOF_SYMBOL), (7050, 15));
    }

    #[test]
    fn longest_code_fits_accumulator() {
        let huffman = Huffman::new();
        let longest = huffman.nodes[..MAX_SYMBOLS]
            .iter()
            .map(|node| node.num_bits)
            .max()
            .unwrap();
        assert_eq!(longest, 15);
    }

    #[test]
    fn lut_resolves_short_codes() {
        let huffman = Huffman::new();
        // Every odd prefix starts with the one-bit code of symbol 0.
        for prefix in (1..LUT_SIZE).step_by(2) {
            assert_eq!(huffman.decode_lut[prefix], 0);
        }
    }

    #[test]
    fn golden_vectors() {
        assert_eq!(compress(b""), [0x8a, 0x1b]);
        assert_eq!(compress(b"\x00"), [0x15, 0x37, 0x00]);
        assert_eq!(compress(&[0u8; 16]), [0xff, 0xff, 0x8a, 0x1b]);
        assert_eq!(
            compress(b"ghost"),
            [0x74, 0xce, 0xb5, 0xda, 0x22, 0x3a, 0x85, 0x12, 0xc5, 0x0d]
        );
    }

    #[test]
    fn roundtrip_empty() {
        assert!(roundtrip(b"").is_empty());
    }

    #[test]
    fn roundtrip_repeated_byte() {
        let input = [0xAB; 300];
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn roundtrip_full_alphabet() {
        let input: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        assert_eq!(roundtrip(&input), input);
    }

    #[test]
    fn compress_reports_full_output() {
        let huffman = Huffman::new();
        let mut out = [0u8; 1];
        assert_eq!(
            huffman.compress(b"", &mut out),
            Err(HuffmanError::OutputFull { capacity: 1 })
        );
    }

    #[test]
    fn decompress_reports_full_output() {
        let huffman = Huffman::new();
        let packed = compress(b"abc");
        let mut out = [0u8; 2];
        assert_eq!(
            huffman.decompress(&packed, &mut out),
            Err(HuffmanError::OutputFull { capacity: 2 })
        );
    }

    #[test]
    fn decompress_without_end_marker_fails() {
        let huffman = Huffman::new();
        let mut out = [0u8; 64];
        assert!(matches!(
            huffman.decompress(&[], &mut out),
            Err(HuffmanError::Truncated { decoded: 0 })
        ));

        let packed = compress(b"ghost");
        let result = huffman.decompress(&packed[..3], &mut out);
        assert!(matches!(result, Err(HuffmanError::Truncated { .. })));
    }

    #[test]
    fn trailing_input_is_ignored() {
        let huffman = Huffman::new();
        let mut packed = compress(b"tee");
        packed.extend_from_slice(&[0x55; 8]);
        let mut out = [0u8; 8];
        let len = huffman.decompress(&packed, &mut out).unwrap();
        assert_eq!(&out[..len], b"tee");
    }

    #[test]
    fn error_display() {
        let err = HuffmanError::OutputFull { capacity: 12 };
        assert!(err.to_string().contains("12"));
        let err = HuffmanError::Truncated { decoded: 3 };
        assert!(err.to_string().contains("end marker"));
    }
}
