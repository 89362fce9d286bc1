//! Fixed-size classic protocol frames.

use std::fmt;

/// Opcode byte plus one reserved byte plus the payload.
pub const PACKET_SIZE: usize = 66;
/// Payload bytes in a chat packet.
pub const PAYLOAD_SIZE: usize = 64;
/// Offset of the payload within the frame.
pub const PAYLOAD_START: usize = PACKET_SIZE - PAYLOAD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Message = 0x0D,
}

/// One outgoing frame: `[opcode, reserved, payload...]`.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: [u8; PACKET_SIZE],
}

impl Packet {
    pub const fn from_bytes(bytes: [u8; PACKET_SIZE]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.bytes[PAYLOAD_START..]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.bytes
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("opcode", &format_args!("{:#04x}", self.opcode()))
            .field("payload", &String::from_utf8_lossy(self.payload()))
            .finish()
    }
}
