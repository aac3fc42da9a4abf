//! Open Pixel Control wire format.
//!
//! A message is a four byte header followed by the payload:
//!
//! ```text
//! [channel] [command] [length high] [length low] [payload ...]
//! ```
//!
//! "Set pixel colours" (command 0) carries one `r, g, b` triple per pixel.

use crate::foundation::core::Rgb8;
use crate::foundation::error::{BoatError, BoatResult};

pub const HEADER_LEN: usize = 4;
pub const CMD_SET_PIXELS: u8 = 0;

/// Largest pixel count whose payload fits the 16-bit length field.
pub const MAX_PIXELS: usize = u16::MAX as usize / 3;

/// Encode a "set pixel colours" message into `out`, replacing its contents.
pub fn encode_set_pixels(out: &mut Vec<u8>, channel: u8, pixels: &[Rgb8]) -> BoatResult<()> {
    if pixels.len() > MAX_PIXELS {
        return Err(BoatError::transport(format!(
            "{} pixels exceed the {MAX_PIXELS} pixel message limit",
            pixels.len()
        )));
    }
    let len = (pixels.len() * 3) as u16;

    out.clear();
    out.reserve(HEADER_LEN + usize::from(len));
    out.push(channel);
    out.push(CMD_SET_PIXELS);
    out.extend_from_slice(&len.to_be_bytes());
    for p in pixels {
        out.extend_from_slice(&p.to_bytes());
    }
    Ok(())
}

/// Parsed message header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub channel: u8,
    pub command: u8,
    pub len: u16,
}

impl Header {
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let [channel, command, hi, lo, ..] = *bytes else {
            return None;
        };
        Some(Self {
            channel,
            command,
            len: u16::from_be_bytes([hi, lo]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_carries_channel_command_and_length() {
        let mut buf = Vec::new();
        let pixels = vec![Rgb8::WHITE; 512];
        encode_set_pixels(&mut buf, 3, &pixels).unwrap();
        assert_eq!(buf.len(), 4 + 1536);
        assert_eq!(&buf[..4], &[3, 0, 0x06, 0x00]);
        assert_eq!(
            Header::parse(&buf),
            Some(Header {
                channel: 3,
                command: CMD_SET_PIXELS,
                len: 1536
            })
        );
    }

    #[test]
    fn payload_is_rgb_in_order() {
        let mut buf = vec![9, 9, 9];
        let pixels = [Rgb8 { r: 1, g: 2, b: 3 }, Rgb8 { r: 4, g: 5, b: 6 }];
        encode_set_pixels(&mut buf, 0, &pixels).unwrap();
        assert_eq!(buf, vec![0, 0, 0, 6, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let mut buf = Vec::new();
        let pixels = vec![Rgb8::BLACK; MAX_PIXELS + 1];
        assert!(encode_set_pixels(&mut buf, 0, &pixels).is_err());
    }

    #[test]
    fn short_header_does_not_parse() {
        assert_eq!(Header::parse(&[0, 0, 1]), None);
    }
}
