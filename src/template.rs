//! Work item construction
//!
//! Every candidate input is a copy of a block template with a 4-byte
//! little-endian nonce patched in at a fixed offset.

use crate::error::HarnessError;

/// Default block template (76 bytes)
pub const BLOCK_TEMPLATE: [u8; 76] = [
    0x07, 0x07, 0xf7, 0xa4, 0xf0, 0xd6, 0x05, 0xb3, 0x03, 0x26, 0x08, 0x16, 0xba, 0x3f, 0x10,
    0x90, 0x2e, 0x1a, 0x14, 0x5a, 0xc5, 0xfa, 0xd3, 0xaa, 0x3a, 0xf6, 0xea, 0x44, 0xc1, 0x18,
    0x69, 0xdc, 0x4f, 0x85, 0x3f, 0x00, 0x2b, 0x2e, 0xea, 0x00, 0x00, 0x00, 0x00, 0x77, 0xb2,
    0x06, 0xa0, 0x2c, 0xa5, 0xb1, 0xd4, 0xce, 0x6b, 0xbf, 0xdf, 0x0a, 0xca, 0xc3, 0x8b, 0xde,
    0xd3, 0x4d, 0x2d, 0xcd, 0xee, 0xf9, 0x5c, 0xd2, 0x0c, 0xef, 0xc1, 0x2f, 0x61, 0xd5, 0x61,
    0x09,
];

/// Offset of the nonce field in [`BLOCK_TEMPLATE`]
pub const NONCE_OFFSET: usize = 39;

/// Size of the nonce field
pub const NONCE_SIZE: usize = 4;

/// Immutable template shared by all workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTemplate {
    bytes: Box<[u8]>,
    nonce_offset: usize,
}

impl WorkTemplate {
    /// Template with the nonce field at `nonce_offset`
    pub fn new(bytes: impl Into<Vec<u8>>, nonce_offset: usize) -> Result<Self, HarnessError> {
        let bytes = bytes.into();
        if nonce_offset
            .checked_add(NONCE_SIZE)
            .map_or(true, |end| end > bytes.len())
        {
            return Err(HarnessError::Config(format!(
                "nonce field at offset {} does not fit a {}-byte template",
                nonce_offset,
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.into_boxed_slice(),
            nonce_offset,
        })
    }

    /// Private copy of the template with `nonce` patched in
    pub fn item(&self, nonce: u32) -> WorkItem {
        let mut item = WorkItem {
            bytes: self.bytes.clone(),
            nonce_offset: self.nonce_offset,
        };
        item.set_nonce(nonce);
        item
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn nonce_offset(&self) -> usize {
        self.nonce_offset
    }
}

impl Default for WorkTemplate {
    fn default() -> Self {
        Self {
            bytes: Box::new(BLOCK_TEMPLATE),
            nonce_offset: NONCE_OFFSET,
        }
    }
}

/// One worker's input buffer; rewritten in place for every nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    bytes: Box<[u8]>,
    nonce_offset: usize,
}

impl WorkItem {
    #[inline]
    pub fn set_nonce(&mut self, nonce: u32) {
        self.bytes[self.nonce_offset..self.nonce_offset + NONCE_SIZE]
            .copy_from_slice(&nonce.to_le_bytes());
    }

    pub fn nonce(&self) -> u32 {
        let mut word = [0u8; NONCE_SIZE];
        word.copy_from_slice(&self.bytes[self.nonce_offset..self.nonce_offset + NONCE_SIZE]);
        u32::from_le_bytes(word)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
