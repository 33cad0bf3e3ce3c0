//! Big-endian field decoding. Every multi-byte field on an MFS volume is
//! stored most significant byte first.

use byteorder::{BigEndian, ByteOrder};

pub fn be_to_host16(bytes: &[u8; 2]) -> u16 {
    BigEndian::read_u16(bytes)
}

pub fn be_to_host32(bytes: &[u8; 4]) -> u32 {
    BigEndian::read_u32(bytes)
}
