//! CRC32C (Castagnoli) integrity checks for data crossing the network.
//!
//! Google Cloud APIs carry CRC32C values as signed 64-bit integers. A reported
//! value outside the `u32` range can never match and is treated as a mismatch.

/// Compute the CRC32C checksum of `data`.
pub fn crc32c(data: &[u8]) -> u32 {
    ::crc32c::crc32c(data)
}

/// Returns `true` if `reported` is present and equals the CRC32C of `data`.
pub fn verify(data: &[u8], reported: Option<i64>) -> bool {
    match reported.and_then(|v| u32::try_from(v).ok()) {
        Some(expected) => crc32c(data) == expected,
        None => false,
    }
}
