//! Record types stored in ghost files.

use wire::{truncate_str, RecordKind};

/// Start tick value written when a ghost has none.
pub const NO_START_TICK: i32 = -1;

/// Width of the skin name field, terminator included.
pub const SKIN_NAME_LEN: usize = 24;

const SKIN_NAME_WORDS: usize = SKIN_NAME_LEN / 4;
const DEFAULT_SKIN: &str = "default";

/// Words in a full character record.
pub const CHARACTER_WORDS: usize = RecordKind::Character.words();

/// Words in a character record without the tick.
pub const CHARACTER_NO_TICK_WORDS: usize = RecordKind::CharacterNoTick.words();

/// Words in a skin record.
pub const SKIN_WORDS: usize = RecordKind::Skin.words();

/// One tick of recorded character state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub x: i32,
    pub y: i32,
    pub vel_x: i32,
    pub vel_y: i32,
    pub angle: i32,
    pub direction: i32,
    pub weapon: i32,
    pub hook_state: i32,
    pub hook_x: i32,
    pub hook_y: i32,
    pub attack_tick: i32,
    pub tick: i32,
}

impl Character {
    /// Returns the record words in file order.
    #[must_use]
    pub const fn to_words(&self) -> [i32; CHARACTER_WORDS] {
        [
            self.x,
            self.y,
            self.vel_x,
            self.vel_y,
            self.angle,
            self.direction,
            self.weapon,
            self.hook_state,
            self.hook_x,
            self.hook_y,
            self.attack_tick,
            self.tick,
        ]
    }

    /// Builds a character from record words in file order.
    #[must_use]
    pub const fn from_words(words: &[i32; CHARACTER_WORDS]) -> Self {
        let [x, y, vel_x, vel_y, angle, direction, weapon, hook_state, hook_x, hook_y, attack_tick, tick] =
            *words;
        Self {
            x,
            y,
            vel_x,
            vel_y,
            angle,
            direction,
            weapon,
            hook_state,
            hook_x,
            hook_y,
            attack_tick,
            tick,
        }
    }

    /// Builds a character from a record that did not store the tick.
    ///
    /// The tick is left at zero until the loader reconstructs it.
    #[must_use]
    pub fn from_no_tick_words(words: &[i32; CHARACTER_NO_TICK_WORDS]) -> Self {
        let mut full = [0; CHARACTER_WORDS];
        full[..CHARACTER_NO_TICK_WORDS].copy_from_slice(words);
        Self::from_words(&full)
    }
}

/// Player skin and colors.
///
/// The name is decoded lossily: bytes that are not valid UTF-8 become
/// U+FFFD, so such a skin does not re-encode to the same words.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skin {
    name: String,
    pub use_custom_color: bool,
    pub color_body: i32,
    pub color_feet: i32,
}

impl Default for Skin {
    fn default() -> Self {
        Self::new(DEFAULT_SKIN, false, 0, 0)
    }
}

impl Skin {
    /// Creates a skin. The name is cut to 23 bytes.
    #[must_use]
    pub fn new(name: &str, use_custom_color: bool, color_body: i32, color_feet: i32) -> Self {
        Self {
            name: truncate_str(name, SKIN_NAME_LEN - 1).to_owned(),
            use_custom_color,
            color_body,
            color_feet,
        }
    }

    /// Returns the skin name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the record words in file order.
    #[must_use]
    pub fn to_words(&self) -> [i32; SKIN_WORDS] {
        let mut words = [0; SKIN_WORDS];
        words[..SKIN_NAME_WORDS].copy_from_slice(&pack_name(&self.name));
        words[SKIN_NAME_WORDS] = i32::from(self.use_custom_color);
        words[SKIN_NAME_WORDS + 1] = self.color_body;
        words[SKIN_NAME_WORDS + 2] = self.color_feet;
        words
    }

    /// Builds a skin from record words in file order.
    #[must_use]
    pub fn from_words(words: &[i32; SKIN_WORDS]) -> Self {
        Self {
            name: unpack_name(&words[..SKIN_NAME_WORDS]),
            use_custom_color: words[SKIN_NAME_WORDS] != 0,
            color_body: words[SKIN_NAME_WORDS + 1],
            color_feet: words[SKIN_NAME_WORDS + 2],
        }
    }
}

// Names are stored four bytes per word, big-endian, each byte offset by 128.
// The final byte of the field is always zero.
fn pack_name(name: &str) -> [i32; SKIN_NAME_WORDS] {
    let bytes = truncate_str(name, SKIN_NAME_LEN - 1).as_bytes();
    let mut words = [0; SKIN_NAME_WORDS];
    for (index, word) in words.iter_mut().enumerate() {
        let mut chunk = [0u8; 4];
        for (offset, byte) in chunk.iter_mut().enumerate() {
            *byte = bytes.get(index * 4 + offset).copied().unwrap_or(0) ^ 0x80;
        }
        *word = i32::from_be_bytes(chunk);
    }
    words[SKIN_NAME_WORDS - 1] &= !0xFF;
    words
}

fn unpack_name(words: &[i32]) -> String {
    let mut bytes: Vec<u8> = words
        .iter()
        .flat_map(|word| word.to_be_bytes())
        .map(|byte| byte ^ 0x80)
        .collect();
    if let Some(last) = bytes.last_mut() {
        *last = 0;
    }
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    bytes.truncate(end);
    String::from_utf8_lossy(&bytes).into_owned()
}
