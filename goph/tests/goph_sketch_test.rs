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

const ALL_DEPTHS: [BitDepth; 5] = [
    BitDepth::B2,
    BitDepth::B4,
    BitDepth::B8,
    BitDepth::B16,
    BitDepth::B32,
];

#[test]
fn test_basic_build() {
    let hasher = GophHasher::new(128, 4);
    let sketch = hasher.sketch([1u32, 2, 3, 4, 5]);

    assert_eq!(sketch.len(), 128);
    assert_eq!(sketch.bit_depth(), BitDepth::B32);
    assert!(!sketch.is_empty());
}

#[test]
fn test_empty_build_is_all_zero() {
    let hasher = GophHasher::new(128, 4).bit_depth(BitDepth::B8);
    let sketch = hasher.sketch(std::iter::empty());

    assert_eq!(sketch.len(), 128);
    assert_eq!(sketch.bit_depth(), BitDepth::B8);
    assert!(sketch.iter().all(|slot| slot == 0));
}

#[test]
fn test_slot_values_fit_declared_depth() {
    let elements: Vec<u32> = (0..1000u32).map(|i| i.wrapping_mul(0x9e3779b9)).collect();

    for depth in ALL_DEPTHS {
        let hasher = GophHasher::new(128, 4).bit_depth(depth);
        let sketch = hasher.sketch(elements.iter().copied());
        let limit = match depth.bits() {
            32 => u32::MAX,
            bits => (1u32 << bits) - 1,
        };
        assert!(
            sketch.iter().all(|slot| slot <= limit),
            "value overflow at {} bits",
            depth.bits()
        );
    }
}

#[test]
fn test_invalid_configurations() {
    assert_eq!(
        GophHasher::try_new(0, 4).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        GophHasher::try_new(128, 0).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        GophHasher::try_new(100, 3).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_downgrade_keeps_length() {
    let hasher = GophHasher::new(128, 4);
    let wide = hasher.sketch(0..50u32);

    for target in [BitDepth::B2, BitDepth::B4, BitDepth::B8, BitDepth::B16] {
        let narrow = wide.downgrade(target).unwrap();
        assert_eq!(narrow.len(), 128);
        assert_eq!(narrow.bit_depth(), target);
    }
}

#[test]
fn test_downgrade_masks_low_bits() {
    let hasher = GophHasher::new(8, 2);
    let wide = hasher.sketch([7u32, 11, 13, 17, 19, 23]);
    let narrow = wide.downgrade(BitDepth::B8).unwrap();

    assert_eq!(narrow.len(), 8);
    assert_eq!(narrow.bit_depth(), BitDepth::B8);
    for i in 0..wide.len() {
        let v32 = wide.slot(i);
        let expected = if v32 == 0 {
            0
        } else if v32 & 0xff == 0 {
            1
        } else {
            v32 & 0xff
        };
        assert_eq!(narrow.slot(i), expected, "slot {i}");
    }
}

#[test]
fn test_downgrade_preserves_empty_slots() {
    // 3 elements cannot fill 128 slots; empties must survive every depth
    let hasher = GophHasher::new(128, 4);
    let wide = hasher.sketch([1u32, 2, 3]);

    for target in [BitDepth::B2, BitDepth::B4, BitDepth::B8, BitDepth::B16] {
        let narrow = wide.downgrade(target).unwrap();
        for i in 0..wide.len() {
            assert_eq!(
                narrow.slot(i) == 0,
                wide.slot(i) == 0,
                "empty marker diverged at slot {i} for {} bits",
                target.bits()
            );
        }
    }
}

#[test]
fn test_chained_downgrade_equals_direct() {
    let hasher = GophHasher::new(256, 8);
    let wide = hasher.sketch((0..400u32).map(|i| i.wrapping_mul(2654435761)));

    let direct = wide.downgrade(BitDepth::B4).unwrap();
    let chained = wide
        .downgrade(BitDepth::B16)
        .unwrap()
        .downgrade(BitDepth::B8)
        .unwrap()
        .downgrade(BitDepth::B4)
        .unwrap();
    assert_eq!(direct, chained);
}

#[test]
fn test_downgrade_to_same_or_wider_is_rejected() {
    let hasher = GophHasher::new(64, 4).bit_depth(BitDepth::B8);
    let sketch = hasher.sketch(0..10u32);

    for target in [BitDepth::B8, BitDepth::B16] {
        let err = sketch.downgrade(target).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
    assert_eq!(
        sketch.downgrade(BitDepth::B32).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
}

#[test]
fn test_native_and_downgraded_builds_share_shape() {
    // Same elements at native 8 bit and downgraded from 32 bit: occupancy
    // is identical even though minima may differ
    let elements: Vec<u32> = (0..60u32).map(|i| i * 7 + 3).collect();
    let hasher = GophHasher::new(128, 4);

    let native = hasher
        .bit_depth(BitDepth::B8)
        .sketch(elements.iter().copied());
    let downgraded = hasher
        .sketch(elements.iter().copied())
        .downgrade(BitDepth::B8)
        .unwrap();

    assert_eq!(native.len(), downgraded.len());
    for i in 0..native.len() {
        assert_eq!(native.slot(i) == 0, downgraded.slot(i) == 0, "slot {i}");
    }
}
