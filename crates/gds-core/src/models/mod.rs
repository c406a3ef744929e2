//! Normalized entity model of an ECU definition

mod actuation;
mod comm;
mod data;
mod dtc;
mod procedure;
mod request;

pub use actuation::*;
pub use comm::*;
pub use data::*;
pub use dtc::*;
pub use procedure::*;
pub use request::*;

/// Read `width` bytes big-endian at `offset`
///
/// `None` when the frame is too short or the width is 0 or wider than 8 bytes.
pub fn read_be(frame: &[u8], offset: usize, width: usize) -> Option<u64> {
    if width == 0 || width > 8 {
        return None;
    }
    let end = offset.checked_add(width)?;
    let bytes = frame.get(offset..end)?;
    Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_be() {
        let frame = [0x61, 0x01, 0x12, 0x34, 0x56];
        assert_eq!(read_be(&frame, 2, 2), Some(0x1234));
        assert_eq!(read_be(&frame, 4, 1), Some(0x56));
        assert_eq!(read_be(&frame, 4, 2), None);
        assert_eq!(read_be(&frame, 0, 0), None);
        assert_eq!(read_be(&[0; 9], 0, 9), None);
        assert_eq!(read_be(&frame, usize::MAX, 2), None);
    }
}
