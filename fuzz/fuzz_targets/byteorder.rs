#![no_main]

use libfuzzer_sys::fuzz_target;
use machkit::byteorder::{ByteOrder, DIRECT, SWAPPED};

fuzz_target!(|data: &[u8]| {
    let mut offset = data.first().copied().unwrap_or(0) as usize;
    let start = offset;

    match SWAPPED.read_u64(data, &mut offset) {
        Ok(value) => {
            let mut direct_offset = start;
            let raw = DIRECT.read_u64(data, &mut direct_offset).unwrap();
            assert_eq!(SWAPPED.swap64(raw), value);
            assert_eq!(offset, start + 8);
        }
        Err(_) => {
            assert!(start + 8 > data.len());
            assert_eq!(offset, start);
        }
    }

    let mut copy = data.to_vec();
    SWAPPED.swap_buffer(&mut copy);
    SWAPPED.swap_buffer(&mut copy);
    assert_eq!(copy, data);
});
