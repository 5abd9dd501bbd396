//! Little-endian primitive encode/decode for the binary checkpoint format.
//!
//! Strings are length-prefixed with a `u32`. The format is intentionally
//! simple — no compression, no alignment padding.

use std::io::{Read, Write};

use crate::error::FormatError;

/// Write a single byte.
pub(crate) fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), FormatError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub(crate) fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), FormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub(crate) fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), FormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub(crate) fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), FormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub(crate) fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), FormatError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a length-prefixed UTF-8 string (u32 length + bytes).
pub(crate) fn write_str(w: &mut dyn Write, s: &str) -> Result<(), FormatError> {
    write_u32_le(w, s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Read a single byte.
pub(crate) fn read_u8(r: &mut dyn Read) -> Result<u8, FormatError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub(crate) fn read_u32_le(r: &mut dyn Read) -> Result<u32, FormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub(crate) fn read_i32_le(r: &mut dyn Read) -> Result<i32, FormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub(crate) fn read_f32_le(r: &mut dyn Read) -> Result<f32, FormatError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub(crate) fn read_f64_le(r: &mut dyn Read) -> Result<f64, FormatError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a length-prefixed UTF-8 string.
pub(crate) fn read_str(r: &mut dyn Read) -> Result<String, FormatError> {
    let len = read_u32_le(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| FormatError::Malformed {
        detail: format!("invalid UTF-8 string: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_u8(v in any::<u8>()) {
            let mut buf = Vec::new();
            write_u8(&mut buf, v).unwrap();
            prop_assert_eq!(read_u8(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn roundtrip_u32(v in any::<u32>()) {
            let mut buf = Vec::new();
            write_u32_le(&mut buf, v).unwrap();
            prop_assert_eq!(read_u32_le(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn roundtrip_i32(v in any::<i32>()) {
            let mut buf = Vec::new();
            write_i32_le(&mut buf, v).unwrap();
            prop_assert_eq!(read_i32_le(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn roundtrip_f32(bits in any::<u32>()) {
            let mut buf = Vec::new();
            write_f32_le(&mut buf, f32::from_bits(bits)).unwrap();
            prop_assert_eq!(read_f32_le(&mut buf.as_slice()).unwrap().to_bits(), bits);
        }

        #[test]
        fn roundtrip_f64(bits in any::<u64>()) {
            let mut buf = Vec::new();
            write_f64_le(&mut buf, f64::from_bits(bits)).unwrap();
            prop_assert_eq!(read_f64_le(&mut buf.as_slice()).unwrap().to_bits(), bits);
        }

        #[test]
        fn roundtrip_str(s in "[a-zA-Z0-9_]{0,48}") {
            let mut buf = Vec::new();
            write_str(&mut buf, &s).unwrap();
            prop_assert_eq!(read_str(&mut buf.as_slice()).unwrap(), s);
        }
    }

    #[test]
    fn truncated_string_is_an_io_error() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 10).unwrap();
        buf.extend_from_slice(b"abc");
        assert!(matches!(
            read_str(&mut buf.as_slice()),
            Err(FormatError::Io(_))
        ));
    }
}
