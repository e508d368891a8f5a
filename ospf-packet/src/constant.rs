#![allow(non_upper_case_globals)]

/// Architectural constants shared by the codec and the protocol engine.
pub const LsaMaxAge: u16 = 3600;
pub const MaxAgeDiff: u16 = 900;
pub const InitialSequenceNumber: u32 = 0x80000001;
pub const MaxSequenceNumber: u32 = 0x7FFFFFFF;
