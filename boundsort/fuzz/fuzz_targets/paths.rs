//! Fuzzer for path selection.
//!
//! Any combination of bounds format, path option and run length has to sort
//! exactly like the standard library, or fail cleanly without touching the
//! array.

#![no_main]
use arbitrary::Arbitrary;
use boundsort::{BoundsFormat, Error, PathOption, TimSortBuilder};
use libfuzzer_sys::fuzz_target;

#[derive(Clone, Debug, Arbitrary)]
enum Format {
    Precise,
    Compressed(u8),
    Opaque,
}

#[derive(Clone, Debug, Arbitrary)]
enum Policy {
    ClassicOnly,
    BoundedOnly,
    TryBounded,
}

#[derive(Clone, Debug, Arbitrary)]
struct Input {
    format: Format,
    policy: Policy,
    run_length: u8,
    prefix: u16,
    data: Vec<i32>,
}

fuzz_target!(|input: Input| {
    let bounds = match input.format {
        Format::Precise => BoundsFormat::Precise,
        Format::Compressed(width) => BoundsFormat::Compressed {
            mantissa_width: u32::from(width % 29) + 4,
        },
        Format::Opaque => BoundsFormat::Opaque,
    };
    let path = match input.policy {
        Policy::ClassicOnly => PathOption::ClassicOnly,
        Policy::BoundedOnly => PathOption::BoundedOnly,
        Policy::TryBounded => PathOption::TryBounded,
    };
    let Ok(sorter) = TimSortBuilder::new()
        .run_length(usize::from(input.run_length))
        .bounds(bounds)
        .path(path)
        .build()
    else {
        assert_eq!(input.run_length, 0);
        return;
    };

    let mut array = input.data.clone();
    let length = usize::from(input.prefix).min(array.len());
    match sorter.sort_prefix(&mut array, length) {
        Ok(_) => {
            let mut expected = input.data.clone();
            expected[..length].sort();
            assert_eq!(array, expected);
        }
        Err(Error::Inexact { .. }) => {
            assert_eq!(path, PathOption::BoundedOnly);
            assert_eq!(array, input.data);
        }
        Err(e) => panic!("unexpected error {e}"),
    }
});
