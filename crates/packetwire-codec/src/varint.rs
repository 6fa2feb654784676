//! Variable-length unsigned integers.
//!
//! Each byte holds 7 data bits (bits 1-7) and a terminator flag (bit 0).
//! Groups are emitted most-significant first and only the last byte carries
//! the flag:
//!
//! ```text
//!   data    data    data
//! <------> <------> <------>
//! 0100101 0 0100110 0 0111010 1
//!         ^         ^         ^
//!     unset     unset       set
//! ```
//!
//! Zero encodes to the single byte `0x01`.

use std::io::{ErrorKind, Read};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};

/// Flag bit marking the final byte of a varint.
pub const TERMINATOR: u8 = 0x01;

/// Longest minimal encoding of a `u64`.
pub const MAX_LEN: usize = 10;

/// Number of bytes `encode(n)` produces.
pub fn encoded_len(n: u64) -> usize {
    let bits = (u64::BITS - n.leading_zeros()) as usize;
    bits.div_ceil(7).max(1)
}

/// Encode `n` into a fresh buffer.
pub fn encode(n: u64) -> Bytes {
    let mut dst = BytesMut::with_capacity(encoded_len(n));
    encode_into(n, &mut dst);
    dst.freeze()
}

/// Append the encoding of `n` to `dst`.
pub fn encode_into(n: u64, dst: &mut BytesMut) {
    let len = encoded_len(n);
    dst.reserve(len);
    for group in (0..len).rev() {
        let data = ((n >> (7 * group)) & 0x7F) as u8;
        let flag = if group == 0 { TERMINATOR } else { 0 };
        dst.put_u8((data << 1) | flag);
    }
}

/// Decode one varint from the front of `src`, returning the value and the
/// bytes that follow it.
pub fn decode(src: &[u8]) -> Result<(u64, &[u8])> {
    let mut rest = src;
    let value = decode_from(&mut rest)?;
    Ok((value, rest))
}

/// Decode one varint from a blocking stream, consuming exactly its bytes.
///
/// Returns [`CodecError::Unterminated`] if the stream ends before a byte with
/// the terminator flag is read. Leading zero groups are accepted and do not
/// count toward [`MAX_LEN`]; only a value wider than 64 bits overflows.
pub fn decode_from<R: Read + ?Sized>(src: &mut R) -> Result<u64> {
    let mut result = 0u64;
    let mut consumed = 0usize;

    loop {
        let byte = match read_byte(src)? {
            Some(byte) => byte,
            None => return Err(CodecError::Unterminated { consumed }),
        };
        consumed += 1;

        if result > u64::MAX >> 7 {
            return Err(CodecError::Overflow);
        }
        result = (result << 7) | u64::from(byte >> 1);

        if byte & TERMINATOR != 0 {
            return Ok(result);
        }
    }
}

fn read_byte<R: Read + ?Sized>(src: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match src.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(CodecError::Io(err)),
        }
    }
}
