use crate::bytes::ByteCursor;
use crate::errors::Mp4Error;

/// Parse mdhd box to get (timescale, duration in timescale units)
pub fn parse_mdhd(mdhd: &[u8]) -> Result<(u32, u64), Mp4Error> {
    let mut cursor = ByteCursor::new(mdhd);
    let truncated = || Mp4Error::malformed("mdhd box too small");

    let version = cursor.u8().ok_or_else(truncated)?;
    cursor.skip(3).ok_or_else(truncated)?;

    if version == 1 {
        // creation + modification time, 64-bit each
        cursor.skip(16).ok_or_else(truncated)?;
        let timescale = cursor.u32().ok_or_else(truncated)?;
        let duration = cursor.u64().ok_or_else(truncated)?;
        Ok((timescale, duration))
    } else {
        cursor.skip(8).ok_or_else(truncated)?;
        let timescale = cursor.u32().ok_or_else(truncated)?;
        let duration = cursor.u32().ok_or_else(truncated)? as u64;
        Ok((timescale, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::parse_mdhd;

    #[test]
    fn test_parse_mdhd_v0_and_v1() {
        let mut v0 = vec![0u8; 12];
        v0.extend_from_slice(&15360u32.to_be_bytes());
        v0.extend_from_slice(&30720u32.to_be_bytes());
        v0.extend_from_slice(&[0x15, 0xc7, 0, 0]);
        assert_eq!(parse_mdhd(&v0).unwrap(), (15360, 30720));

        let mut v1 = vec![1u8, 0, 0, 0];
        v1.extend_from_slice(&[0; 16]);
        v1.extend_from_slice(&90000u32.to_be_bytes());
        v1.extend_from_slice(&(1u64 << 33).to_be_bytes());
        assert_eq!(parse_mdhd(&v1).unwrap(), (90000, 1u64 << 33));
    }

    #[test]
    fn test_parse_mdhd_too_small() {
        assert!(parse_mdhd(&[0u8; 10]).is_err());
    }
}
