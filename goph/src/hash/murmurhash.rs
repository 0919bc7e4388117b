// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use byteorder::ByteOrder;
use byteorder::LE;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// MurmurHash3 x86_32 over a byte slice.
///
/// The MurmurHash3 is a fast, non-cryptographic hash function with excellent
/// avalanche and 2-way bit independence properties. This is the 32-bit
/// variant; blocks are consumed in little-endian order.
///
/// # Examples
///
/// ```
/// # use goph::hash::murmur3_32;
/// assert_eq!(murmur3_32(b"", 0), 0);
/// assert_eq!(murmur3_32(b"", 1), 0x514e28b7);
/// ```
pub fn murmur3_32(bytes: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    // Number of full 32-bit blocks of 4 bytes.
    // Possible exclusion of a remainder of up to 3 bytes.
    let blocks = bytes.len() >> 2; // bytes / 4

    // Process the 32-bit blocks (the body) into the hash
    for i in 0..blocks {
        let lo = i << 2;
        let k = LE::read_u32(&bytes[lo..lo + 4]);
        h = mix(h, k);
    }

    // tail
    let rem = bytes.len() & 3;
    if rem > 0 {
        let mut buf = [0u8; 4];
        buf[..rem].copy_from_slice(&bytes[blocks << 2..]);
        let mut k = u32::from_le_bytes(buf);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
    }

    h ^= bytes.len() as u32;
    fmix32(h)
}

/// MurmurHash3 x86_32 specialized for a single 32-bit integer key.
///
/// Equivalent to `murmur3_32(&value.to_le_bytes(), seed)` without going
/// through a byte buffer. This is the base hash of the sketch builder, where
/// the group index doubles as the seed.
#[inline]
pub fn murmur3_32_u32(value: u32, seed: u32) -> u32 {
    let mut h = mix(seed, value);
    h ^= 4; // key length in bytes
    fmix32(h)
}

/// One body round: mix a 32-bit block into the running hash state.
#[inline]
fn mix(h: u32, mut k: u32) -> u32 {
    k = k.wrapping_mul(C1);
    k = k.rotate_left(15);
    k = k.wrapping_mul(C2);

    let mut h = h ^ k;
    h = h.rotate_left(13);
    h.wrapping_mul(5).wrapping_add(0xe6546b64)
}

/// Finalization mix: force all bits of a hash block to avalanche.
#[inline]
pub fn fmix32(mut k: u32) -> u32 {
    k ^= k >> 16;
    k = k.wrapping_mul(0x85ebca6b);
    k ^= k >> 13;
    k = k.wrapping_mul(0xc2b2ae35);
    k ^ (k >> 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e28b7);
        assert_eq!(murmur3_32(b"", 0xffffffff), 0x81f16f39);
    }

    #[test]
    fn test_single_block() {
        assert_eq!(murmur3_32(&[0x21, 0x43, 0x65, 0x87], 0), 0xf55b516b);
        assert_eq!(
            murmur3_32(&[0x21, 0x43, 0x65, 0x87], 0x5082edee),
            0x2362f9de
        );
        assert_eq!(murmur3_32(&[0xff, 0xff, 0xff, 0xff], 0), 0x76293b50);
        assert_eq!(murmur3_32(&[0x00, 0x00, 0x00, 0x00], 0), 0x2362f9de);
    }

    #[test]
    fn test_remainder() {
        // remainder = 3
        assert_eq!(murmur3_32(&[0x21, 0x43, 0x65], 0), 0x7e4a8634);
        // remainder = 2
        assert_eq!(murmur3_32(&[0x21, 0x43], 0), 0xa0f7b07a);
        // remainder = 1
        assert_eq!(murmur3_32(&[0x21], 0), 0x72661cf4);
        // zero bytes are not a no-op
        assert_eq!(murmur3_32(&[0x00], 0), 0x514e28b7);
        assert_eq!(murmur3_32(&[0x00, 0x00], 0), 0x30f4c306);
        assert_eq!(murmur3_32(&[0x00, 0x00, 0x00], 0), 0x85f0b427);
    }

    #[test]
    fn test_longer_keys() {
        let key = "Hello, world!";
        assert_eq!(murmur3_32(key.as_bytes(), 0x9747b28c), 0x24884cba);

        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(murmur3_32(key.as_bytes(), 0x9747b28c), 0x2fa826cd);

        let key = "aaaa";
        assert_eq!(murmur3_32(key.as_bytes(), 0x9747b28c), 0x5a97808a);
    }

    #[test]
    fn test_u32_specialization_matches_bytes() {
        for (value, seed) in [
            (0u32, 0u32),
            (1, 0),
            (0x87654321, 0),
            (0x87654321, 0x5082edee),
            (u32::MAX, 42),
            (0xdeadbeef, 9001),
        ] {
            assert_eq!(
                murmur3_32_u32(value, seed),
                murmur3_32(&value.to_le_bytes(), seed),
                "mismatch for value {value:#x} seed {seed:#x}"
            );
        }
    }

    #[test]
    fn test_fmix32_avalanche() {
        assert_eq!(fmix32(0), 0);
        // single-bit inputs must spread across the word
        for bit in 0..32 {
            let mixed = fmix32(1 << bit);
            assert!(mixed.count_ones() >= 8, "poor avalanche for bit {bit}");
        }
    }
}
