#![no_main]

use libfuzzer_sys::fuzz_target;
use seqsync_fuzz::{check_pair, FuzzPair};

fuzz_target!(|pair: FuzzPair| {
    if let Err(reason) = check_pair(&pair) {
        panic!("{reason}");
    }
});
