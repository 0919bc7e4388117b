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

use goph::BitDepth;
use goph::GophHasher;
use goph::error::ErrorKind;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_union_equals_sketch_of_union() {
    let mut rng = StdRng::seed_from_u64(31);

    for depth in [BitDepth::B2, BitDepth::B8, BitDepth::B32] {
        let hasher = GophHasher::new(128, 4).bit_depth(depth);

        for _ in 0..20 {
            let a: Vec<u32> = (0..150).map(|_| rng.gen()).collect();
            let b: Vec<u32> = (0..150).map(|_| rng.gen()).collect();
            let mut both = a.clone();
            both.extend_from_slice(&b);

            let merged = hasher
                .sketch(a.iter().copied())
                .union(&hasher.sketch(b.iter().copied()))
                .unwrap();
            assert_eq!(
                merged,
                hasher.sketch(both),
                "union diverged at {} bits",
                depth.bits()
            );
        }
    }
}

#[test]
fn test_union_with_empty_sketch_is_identity() {
    let hasher = GophHasher::new(64, 4);
    let sketch = hasher.sketch(0..40u32);
    let empty = hasher.sketch(std::iter::empty());

    assert_eq!(sketch.union(&empty).unwrap(), sketch);
    assert_eq!(empty.union(&sketch).unwrap(), sketch);
}

#[test]
fn test_union_is_commutative_and_idempotent() {
    let hasher = GophHasher::new(64, 2).bit_depth(BitDepth::B16);
    let a = hasher.sketch(0..30u32);
    let b = hasher.sketch(20..50u32);

    assert_eq!(a.union(&b).unwrap(), b.union(&a).unwrap());
    assert_eq!(a.union(&a).unwrap(), a);
}

#[test]
fn test_union_requires_matching_shape() {
    let a = GophHasher::new(64, 4).sketch(0..10u32);
    let shorter = GophHasher::new(32, 4).sketch(0..10u32);
    let narrower = GophHasher::new(64, 4)
        .bit_depth(BitDepth::B8)
        .sketch(0..10u32);

    assert_eq!(
        a.union(&shorter).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        a.union(&narrower).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}
