#![no_main]

use libfuzzer_sys::fuzz_target;
use seqbound::rank_bound::RankBoundTracker;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing a single record must not panic
        let _ = seqbound::record::item_length(input, 1);

        // Nor may a whole pass over the input as a multi-line dataset
        let _ = RankBoundTracker::scan(Cursor::new(input.as_bytes()));
    }
});
