//! Bit framing shared by all carriers.
//!
//! A frame is the payload expanded MSB-first into bits, followed by a
//! delimiter of [`DELIMITER_LEN`] zero bits. Extraction reads slot LSBs until
//! the first run of that many zero bits, wherever it starts.
//!
//! A payload that itself contains 16 consecutive zero bits (for example two
//! adjacent `0x00` bytes, or `0x80 0x00 0x01`) terminates early on extraction.
//! Printable text and base64 payloads never do; see [`collides`].

use super::StegoError;

/// Number of zero bits terminating a frame.
pub const DELIMITER_LEN: usize = 16;

/// Expands a payload into its frame: payload bits MSB-first, then the delimiter.
pub fn encode(payload: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(frame_len(payload.len()));
    for byte in payload {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits.extend(std::iter::repeat(false).take(DELIMITER_LEN));
    bits
}

/// Packs bits back into bytes, MSB-first.
///
/// A trailing group shorter than 8 bits is dropped.
pub fn decode(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect()
}

/// Returns the index of the first run of [`DELIMITER_LEN`] zero bits.
///
/// The search is bit-granular; the run does not have to be byte aligned.
pub fn find_delimiter(bits: &[bool]) -> Option<usize> {
    let mut run = 0;
    for (i, &bit) in bits.iter().enumerate() {
        if bit {
            run = 0;
            continue;
        }
        run += 1;
        if run == DELIMITER_LEN {
            return Some(i + 1 - DELIMITER_LEN);
        }
    }
    None
}

/// Like [`find_delimiter`], for a buffer that grows between calls.
///
/// `bits[..appended_at]` must already be known to hold no delimiter; only runs
/// reaching into the newly appended bits are searched, so repeated calls stay
/// linear in the total length.
pub fn find_delimiter_in_tail(bits: &[bool], appended_at: usize) -> Option<usize> {
    let start = appended_at.min(bits.len()).saturating_sub(DELIMITER_LEN - 1);
    find_delimiter(&bits[start..]).map(|i| start + i)
}

/// End of the payload, given where the first zero run starts.
///
/// Payloads end on a byte boundary, so when the last byte ends in zero bits
/// the run starts inside it. Rounding up to the next multiple of 8 keeps that
/// byte; the run is at least [`DELIMITER_LEN`] long, so the result never
/// passes its end.
pub fn payload_end(delimiter_at: usize) -> usize {
    delimiter_at.div_ceil(8) * 8
}

/// Recovers the payload from a scanned slot sequence.
pub fn unframe(bits: &[bool]) -> Result<Vec<u8>, StegoError> {
    let end = find_delimiter(bits).ok_or(StegoError::NoDelimiterFound)?;
    Ok(decode(&bits[..payload_end(end)]))
}

/// Whether extraction would return less than `payload`: it holds a run of
/// zero bits that looks like the delimiter, or ends in a `0x00` byte.
pub fn collides(payload: &[u8]) -> bool {
    let bits = encode(payload);
    payload.last() == Some(&0) || find_delimiter(&bits[..bits.len() - DELIMITER_LEN]).is_some()
}

/// Number of bits a frame for `payload_len` bytes occupies.
pub fn frame_len(payload_len: usize) -> usize {
    payload_len * 8 + DELIMITER_LEN
}
