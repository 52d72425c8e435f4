use std::io::{Read, Write};

use crate::error::{Result, WireError};

/// Maximum accepted string length: 16 KiB.
///
/// Track names and artists are short; anything larger is a corrupted or
/// hostile length prefix and is rejected before allocation.
pub const MAX_STRING_LEN: usize = 16 * 1024;

/// Write a `u32` as 4 little-endian bytes.
pub fn write_u32<W: Write + ?Sized>(w: &mut W, value: u32) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

/// Read a `u32` from 4 little-endian bytes.
pub fn read_u32<R: Read + ?Sized>(r: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Write a string as a `u32` byte-length prefix followed by UTF-8 bytes.
pub fn write_string<W: Write + ?Sized>(w: &mut W, value: &str) -> Result<()> {
    let len = value.len();
    if len > MAX_STRING_LEN {
        return Err(WireError::StringTooLong {
            len,
            max: MAX_STRING_LEN,
        });
    }
    write_u32(w, len as u32)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

/// Read a length-prefixed UTF-8 string.
///
/// The declared length is checked against [`MAX_STRING_LEN`] before any
/// buffer is allocated.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    let len = read_u32(r)? as usize;
    if len > MAX_STRING_LEN {
        return Err(WireError::StringTooLong {
            len,
            max: MAX_STRING_LEN,
        });
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Write a boolean as a single byte, 0 or 1.
pub fn write_bool<W: Write + ?Sized>(w: &mut W, value: bool) -> Result<()> {
    w.write_all(&[u8::from(value)])?;
    Ok(())
}

/// Read a boolean from a single byte. Any nonzero byte is `true`.
pub fn read_bool<R: Read + ?Sized>(r: &mut R) -> Result<bool> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::{BufMut, BytesMut};

    use super::*;

    #[test]
    fn u32_wire_vector_is_little_endian() {
        // Pins the byte order: least-significant byte first.
        let mut wire = Vec::new();
        write_u32(&mut wire, 0x0A0B_0C0D).unwrap();
        assert_eq!(wire, [0x0D, 0x0C, 0x0B, 0x0A]);

        let decoded = read_u32(&mut Cursor::new([0x0D, 0x0C, 0x0B, 0x0A])).unwrap();
        assert_eq!(decoded, 0x0A0B_0C0D);
    }

    #[test]
    fn u32_roundtrip_boundaries() {
        for value in [0u32, 1, 200_000, u32::MAX - 1, u32::MAX] {
            let mut wire = Vec::new();
            write_u32(&mut wire, value).unwrap();
            assert_eq!(read_u32(&mut Cursor::new(wire)).unwrap(), value);
        }
    }

    #[test]
    fn string_roundtrip() {
        let mut wire = Vec::new();
        write_string(&mut wire, "Weird Fishes/Arpeggi").unwrap();
        let decoded = read_string(&mut Cursor::new(wire)).unwrap();
        assert_eq!(decoded, "Weird Fishes/Arpeggi");
    }

    #[test]
    fn string_length_prefix_counts_bytes_not_chars() {
        let value = "Sigur Rós";
        let mut wire = Vec::new();
        write_string(&mut wire, value).unwrap();

        let declared = u32::from_le_bytes(wire[0..4].try_into().unwrap());
        assert_eq!(declared as usize, value.len());
        assert_eq!(read_string(&mut Cursor::new(wire)).unwrap(), value);
    }

    #[test]
    fn empty_string_roundtrip() {
        let mut wire = Vec::new();
        write_string(&mut wire, "").unwrap();
        assert_eq!(wire, [0, 0, 0, 0]);
        assert_eq!(read_string(&mut Cursor::new(wire)).unwrap(), "");
    }

    #[test]
    fn oversized_length_prefix_rejected_before_allocation() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(u32::MAX);

        let err = read_string(&mut Cursor::new(wire.as_ref())).unwrap_err();
        assert!(matches!(err, WireError::StringTooLong { .. }));
    }

    #[test]
    fn oversized_string_rejected_on_write() {
        let value = "x".repeat(MAX_STRING_LEN + 1);
        let err = write_string(&mut Vec::new(), &value).unwrap_err();
        assert!(matches!(err, WireError::StringTooLong { .. }));
    }

    #[test]
    fn invalid_utf8_rejected() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(2);
        wire.put_slice(&[0xFF, 0xFE]);

        let err = read_string(&mut Cursor::new(wire.as_ref())).unwrap_err();
        assert!(matches!(err, WireError::InvalidUtf8(_)));
    }

    #[test]
    fn bool_roundtrip() {
        let mut wire = Vec::new();
        write_bool(&mut wire, true).unwrap();
        write_bool(&mut wire, false).unwrap();
        assert_eq!(wire, [1, 0]);

        let mut cursor = Cursor::new(wire);
        assert!(read_bool(&mut cursor).unwrap());
        assert!(!read_bool(&mut cursor).unwrap());
    }

    #[test]
    fn bool_accepts_any_nonzero_byte() {
        assert!(read_bool(&mut Cursor::new([0x2A])).unwrap());
    }

    #[test]
    fn truncated_u32_fails() {
        let err = read_u32(&mut Cursor::new([0x01, 0x02])).unwrap_err();
        assert!(matches!(err, WireError::TruncatedRead));
    }

    #[test]
    fn truncated_string_body_fails() {
        let mut wire = BytesMut::new();
        wire.put_u32_le(16);
        wire.put_slice(b"only-part");

        let err = read_string(&mut Cursor::new(wire.as_ref())).unwrap_err();
        assert!(matches!(err, WireError::TruncatedRead));
    }

    #[test]
    fn truncated_bool_fails() {
        let err = read_bool(&mut Cursor::new([] as [u8; 0])).unwrap_err();
        assert!(matches!(err, WireError::TruncatedRead));
    }
}
