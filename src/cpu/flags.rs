//! Flag bit definitions
//!
//! Bit positions in the F register, shared by the 8080 and Z80. The layout
//! is part of the external ABI: `PUSH AF`/`POP AF` exchange the packed byte
//! with memory, and the exerciser ROMs CRC it.

/// Carry flag (bit 0)
pub const CY: u8 = 0b0000_0001;
/// Add/subtract flag (bit 1) - set by subtraction, drives DAA
pub const N: u8 = 0b0000_0010;
/// Parity/overflow flag (bit 2) - parity on logical ops, overflow on arithmetic
pub const PV: u8 = 0b0000_0100;
/// Undocumented flag (bit 3) - copy of result bit 3
pub const U3: u8 = 0b0000_1000;
/// Half-carry flag (bit 4) - carry out of bit 3
pub const AC: u8 = 0b0001_0000;
/// Undocumented flag (bit 5) - copy of result bit 5
pub const U5: u8 = 0b0010_0000;
/// Zero flag (bit 6)
pub const Z: u8 = 0b0100_0000;
/// Sign flag (bit 7)
pub const S: u8 = 0b1000_0000;
