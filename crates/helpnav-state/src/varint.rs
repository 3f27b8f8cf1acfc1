//! LEB128 varints and a bounds-checked byte reader.

use crate::error::StateError;

/// Longest LEB128 encoding of a u64.
const MAX_VARINT_LEN: usize = 10;

/// Append `value` as an unsigned LEB128 varint.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Cursor over an encoded state.
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn read_u8(&mut self) -> Result<u8, StateError> {
        let byte = *self.bytes.get(self.pos).ok_or(StateError::Truncated {
            offset: self.pos,
            needed: 1,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], StateError> {
        if len > self.remaining() {
            return Err(StateError::Truncated {
                offset: self.pos,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn read_varint(&mut self) -> Result<u64, StateError> {
        let start = self.pos;
        let mut value = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            let chunk = u64::from(byte & 0x7f);
            if i == MAX_VARINT_LEN - 1 && chunk > 1 {
                return Err(StateError::VarintOverflow(start));
            }
            value |= chunk << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(StateError::VarintOverflow(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(value: u64) -> Vec<u8> {
        let mut out = Vec::new();
        write_varint(&mut out, value);
        out
    }

    #[test]
    fn test_varint_layout() {
        assert_eq!(encoded(0), vec![0x00]);
        assert_eq!(encoded(127), vec![0x7f]);
        assert_eq!(encoded(128), vec![0x80, 0x01]);
        assert_eq!(encoded(300), vec![0xac, 0x02]);
        assert_eq!(encoded(u64::MAX).len(), MAX_VARINT_LEN);
    }

    #[test]
    fn test_read_varints() {
        let mut bytes = encoded(300);
        bytes.extend(encoded(u64::MAX));
        bytes.extend(encoded(5));

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_varint().unwrap(), 300);
        assert_eq!(reader.read_varint().unwrap(), u64::MAX);
        assert_eq!(reader.read_varint().unwrap(), 5);
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_truncated_varint() {
        let mut reader = Reader::new(&[0x80, 0x80]);
        assert_eq!(
            reader.read_varint(),
            Err(StateError::Truncated { offset: 2, needed: 1 })
        );
    }

    #[test]
    fn test_overlong_varint() {
        let bytes = [0xff; 11];
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_varint(), Err(StateError::VarintOverflow(0)));
    }

    #[test]
    fn test_read_bytes_bounds() {
        let mut reader = Reader::new(&[1, 2, 3]);
        assert_eq!(reader.read_bytes(2).unwrap(), &[1, 2]);
        assert_eq!(
            reader.read_bytes(4),
            Err(StateError::Truncated { offset: 2, needed: 3 })
        );
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert!(reader.read_u8().is_err());
    }
}
