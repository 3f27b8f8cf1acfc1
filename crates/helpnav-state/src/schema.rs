//! Versioned binary layout of the UI state.
//!
//! ```text
//! byte 0   schema version (1)
//! record*  tag:u8, len:varint, payload[len]
//!   1 st   tab index, varint
//!   2 sct  scroll offset, varint
//!   3 mw   navigation pane width, varint
//!   4 q    search query, UTF-8
//!   5 ms   open/closed bitmap: varint bit_len, presence mask with one bit
//!          per packed byte, then the non-zero packed bytes; bits LSB-first
//! ```
//!
//! Records may appear in any order. Unknown tags are skipped by length so
//! that older viewers can read states written by newer ones.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StateError;
use crate::varint::{write_varint, Reader};

/// Current schema version.
pub const STATE_VERSION: u8 = 1;

/// A field of the UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    Tab,
    Scroll,
    MenuWidth,
    Query,
    MenuState,
}

impl StateField {
    pub const ALL: [StateField; 5] = [
        StateField::Tab,
        StateField::Scroll,
        StateField::MenuWidth,
        StateField::Query,
        StateField::MenuState,
    ];

    pub fn tag(self) -> u8 {
        match self {
            Self::Tab => 1,
            Self::Scroll => 2,
            Self::MenuWidth => 3,
            Self::Query => 4,
            Self::MenuState => 5,
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.tag() == tag)
    }

    /// Short key used in logs and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Tab => "st",
            Self::Scroll => "sct",
            Self::MenuWidth => "mw",
            Self::Query => "q",
            Self::MenuState => "ms",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// A value produced for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Number(u64),
    Text(String),
    Bits(Vec<bool>),
}

impl StateValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Bits(_) => "bitmap",
        }
    }
}

/// Viewer state carried from page to page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Selected navigation tab
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<u32>,

    /// Scroll offset of the navigation pane
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll: Option<u64>,

    /// Navigation pane width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_width: Option<u32>,

    /// Last search query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Open/closed flags of the topic tree, as a difference from its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_state: Option<Vec<bool>>,
}

impl UiState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Store a produced value in its field.
    pub fn set(&mut self, field: StateField, value: StateValue) -> Result<(), StateError> {
        let mismatch = |value: &StateValue| StateError::TypeMismatch {
            field: field.key(),
            actual: value.kind(),
        };
        match (field, value) {
            (StateField::Tab, StateValue::Number(n)) => self.tab = Some(narrow(field, n)?),
            (StateField::Scroll, StateValue::Number(n)) => self.scroll = Some(n),
            (StateField::MenuWidth, StateValue::Number(n)) => {
                self.menu_width = Some(narrow(field, n)?)
            }
            (StateField::Query, StateValue::Text(text)) => self.query = Some(text),
            (StateField::MenuState, StateValue::Bits(bits)) => self.menu_state = Some(bits),
            (_, other) => return Err(mismatch(&other)),
        }
        Ok(())
    }

    /// Serialize to the binary layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![STATE_VERSION];
        if let Some(tab) = self.tab {
            write_record(&mut out, StateField::Tab, &varint_bytes(u64::from(tab)));
        }
        if let Some(scroll) = self.scroll {
            write_record(&mut out, StateField::Scroll, &varint_bytes(scroll));
        }
        if let Some(width) = self.menu_width {
            write_record(&mut out, StateField::MenuWidth, &varint_bytes(u64::from(width)));
        }
        if let Some(query) = &self.query {
            write_record(&mut out, StateField::Query, query.as_bytes());
        }
        if let Some(bits) = &self.menu_state {
            write_record(&mut out, StateField::MenuState, &bitmap_bytes(bits));
        }
        out
    }

    /// Parse the binary layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let mut reader = Reader::new(bytes);
        let version = reader.read_u8().map_err(|_| StateError::Empty)?;
        if version != STATE_VERSION {
            return Err(StateError::UnsupportedVersion(version));
        }

        let mut state = UiState::default();
        let mut seen = [false; 256];
        while !reader.is_at_end() {
            let tag = reader.read_u8()?;
            let len = reader.read_varint()?;
            let len = usize::try_from(len).map_err(|_| StateError::Truncated {
                offset: reader.position(),
                needed: usize::MAX,
            })?;
            let payload = reader.read_bytes(len)?;

            let Some(field) = StateField::from_tag(tag) else {
                debug!(tag, len, "Skipping unknown state field");
                continue;
            };
            if std::mem::replace(&mut seen[usize::from(tag)], true) {
                return Err(StateError::DuplicateField(field.key()));
            }

            match field {
                StateField::Tab => state.tab = Some(narrow(field, read_number(field, payload)?)?),
                StateField::Scroll => state.scroll = Some(read_number(field, payload)?),
                StateField::MenuWidth => {
                    state.menu_width = Some(narrow(field, read_number(field, payload)?)?)
                }
                StateField::Query => {
                    let text = std::str::from_utf8(payload)
                        .map_err(|_| StateError::InvalidUtf8(field.key()))?;
                    state.query = Some(text.to_string());
                }
                StateField::MenuState => state.menu_state = Some(read_bitmap(payload)?),
            }
        }
        Ok(state)
    }

    /// Encode as URL-safe base64 without padding.
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.to_bytes())
    }

    /// Decode a value produced by [`UiState::encode`].
    pub fn decode(encoded: &str) -> Result<Self, StateError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(StateError::Empty);
        }
        let bytes = URL_SAFE_NO_PAD.decode(encoded)?;
        Self::from_bytes(&bytes)
    }
}

fn narrow(field: StateField, value: u64) -> Result<u32, StateError> {
    u32::try_from(value).map_err(|_| StateError::OutOfRange {
        field: field.key(),
        value,
    })
}

fn varint_bytes(value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    write_varint(&mut out, value);
    out
}

fn write_record(out: &mut Vec<u8>, field: StateField, payload: &[u8]) {
    out.push(field.tag());
    write_varint(out, payload.len() as u64);
    out.extend_from_slice(payload);
}

fn read_number(field: StateField, payload: &[u8]) -> Result<u64, StateError> {
    let mut reader = Reader::new(payload);
    let value = reader.read_varint()?;
    if !reader.is_at_end() {
        return Err(StateError::TrailingBytes {
            field: field.key(),
            extra: reader.remaining(),
        });
    }
    Ok(value)
}

fn bitmap_bytes(bits: &[bool]) -> Vec<u8> {
    let packed: Vec<u8> = bits
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| byte | (u8::from(bit) << i))
        })
        .collect();

    let mut mask = vec![0u8; packed.len().div_ceil(8)];
    for (i, byte) in packed.iter().enumerate() {
        if *byte != 0 {
            mask[i / 8] |= 1 << (i % 8);
        }
    }

    let mut out = varint_bytes(bits.len() as u64);
    out.extend_from_slice(&mask);
    out.extend(packed.into_iter().filter(|byte| *byte != 0));
    out
}

fn read_bitmap(payload: &[u8]) -> Result<Vec<bool>, StateError> {
    let field = StateField::MenuState;
    let mut reader = Reader::new(payload);
    let bit_len = reader.read_varint()?;
    let byte_len = bit_len.div_ceil(8);
    let mask_len = usize::try_from(byte_len.div_ceil(8)).map_err(|_| StateError::OutOfRange {
        field: field.key(),
        value: bit_len,
    })?;
    let mask = reader.read_bytes(mask_len)?;

    // The mask was read in full, so bit_len is bounded by the payload size.
    let bit_len = bit_len as usize;
    let mut bits = Vec::with_capacity(bit_len);
    for i in 0..bit_len.div_ceil(8) {
        let byte = if mask[i / 8] & (1 << (i % 8)) != 0 {
            reader.read_u8()?
        } else {
            0
        };
        let take = (bit_len - i * 8).min(8);
        bits.extend((0..take).map(|bit| byte & (1 << bit) != 0));
    }

    if !reader.is_at_end() {
        return Err(StateError::TrailingBytes {
            field: field.key(),
            extra: reader.remaining(),
        });
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> UiState {
        UiState {
            tab: Some(2),
            scroll: Some(1_250),
            menu_width: Some(320),
            query: Some("установка linux".to_string()),
            menu_state: Some(vec![false, true, false, false, true]),
        }
    }

    #[test]
    fn test_round_trip() {
        let state = full_state();
        let encoded = state.encode();
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(UiState::decode(&encoded).unwrap(), state);
    }

    #[test]
    fn test_empty_state() {
        let state = UiState::default();
        assert!(state.is_empty());
        assert_eq!(state.to_bytes(), vec![STATE_VERSION]);
        assert_eq!(UiState::decode(&state.encode()).unwrap(), state);
    }

    #[test]
    fn test_sparse_bitmap_layout() {
        // 20 bits, only bit 17 set: three packed bytes, one of them non-zero
        let mut bits = vec![false; 20];
        bits[17] = true;
        assert_eq!(bitmap_bytes(&bits), vec![20, 0b100, 0b10]);
        assert_eq!(read_bitmap(&bitmap_bytes(&bits)).unwrap(), bits);
    }

    #[test]
    fn test_empty_bitmap() {
        assert_eq!(bitmap_bytes(&[]), vec![0]);
        assert!(read_bitmap(&[0]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tag_skipped() {
        let mut bytes = vec![STATE_VERSION];
        bytes.extend([9, 3, 0xaa, 0xbb, 0xcc]);
        write_record(&mut bytes, StateField::Tab, &varint_bytes(1));

        let state = UiState::from_bytes(&bytes).unwrap();
        assert_eq!(state.tab, Some(1));
    }

    #[test]
    fn test_unsupported_version() {
        assert_eq!(
            UiState::from_bytes(&[2, 1, 1, 0]),
            Err(StateError::UnsupportedVersion(2))
        );
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = full_state().to_bytes();
        bytes.pop();
        assert!(matches!(
            UiState::from_bytes(&bytes),
            Err(StateError::Truncated { .. })
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let mut bytes = vec![STATE_VERSION];
        write_record(&mut bytes, StateField::Scroll, &varint_bytes(1));
        write_record(&mut bytes, StateField::Scroll, &varint_bytes(2));
        assert_eq!(
            UiState::from_bytes(&bytes),
            Err(StateError::DuplicateField("sct"))
        );
    }

    #[test]
    fn test_invalid_utf8_query() {
        let mut bytes = vec![STATE_VERSION];
        write_record(&mut bytes, StateField::Query, &[0xff, 0xfe]);
        assert_eq!(
            UiState::from_bytes(&bytes),
            Err(StateError::InvalidUtf8("q"))
        );
    }

    #[test]
    fn test_bad_base64() {
        assert!(matches!(UiState::decode("@@@"), Err(StateError::Base64(_))));
        assert_eq!(UiState::decode(""), Err(StateError::Empty));
    }

    #[test]
    fn test_tab_out_of_range() {
        let mut bytes = vec![STATE_VERSION];
        write_record(&mut bytes, StateField::Tab, &varint_bytes(u64::from(u32::MAX) + 1));
        assert!(matches!(
            UiState::from_bytes(&bytes),
            Err(StateError::OutOfRange { field: "st", .. })
        ));
    }

    #[test]
    fn test_set_checks_value_kind() {
        let mut state = UiState::default();
        state.set(StateField::Tab, StateValue::Number(1)).unwrap();
        state
            .set(StateField::Query, StateValue::Text("cat".into()))
            .unwrap();
        assert_eq!(state.tab, Some(1));
        assert_eq!(state.query.as_deref(), Some("cat"));

        let err = state
            .set(StateField::MenuState, StateValue::Number(3))
            .unwrap_err();
        assert_eq!(
            err,
            StateError::TypeMismatch {
                field: "ms",
                actual: "number"
            }
        );
    }

    #[test]
    fn test_field_keys() {
        for field in StateField::ALL {
            assert_eq!(StateField::from_tag(field.tag()), Some(field));
            assert_eq!(StateField::from_key(field.key()), Some(field));
        }
        assert_eq!(StateField::from_tag(0), None);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_bits() -> impl Strategy<Value = Vec<bool>> {
            prop_oneof![
                (0usize..200).prop_map(|n| vec![false; n]),
                (0usize..200).prop_map(|n| vec![true; n]),
                proptest::collection::vec(any::<bool>(), 0..200),
            ]
        }

        proptest! {
            #[test]
            fn prop_decode_inverts_encode(
                tab in 0u32..3,
                scroll in any::<u64>(),
                menu_width in proptest::option::of(any::<u32>()),
                query in proptest::option::of(".{0,40}"),
                bits in arb_bits(),
            ) {
                let state = UiState {
                    tab: Some(tab),
                    scroll: Some(scroll),
                    menu_width,
                    query,
                    menu_state: Some(bits),
                };
                prop_assert_eq!(UiState::decode(&state.encode()).unwrap(), state);
            }

            #[test]
            fn prop_decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
                let _ = UiState::from_bytes(&bytes);
            }
        }
    }
}
