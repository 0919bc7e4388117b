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

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x01000193;

/// FNV-1a 32-bit hash over a byte slice.
///
/// A simple multiplicative hash, useful as a cheap alternative element hash
/// when murmur's mixing quality is not required.
///
/// # Examples
///
/// ```
/// # use goph::hash::fnv1a_32;
/// assert_eq!(fnv1a_32(b""), 0x811c9dc5);
/// assert_eq!(fnv1a_32(b"foobar"), 0xbf9cf968);
/// ```
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for &byte in bytes {
        h ^= u32::from(byte);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}
