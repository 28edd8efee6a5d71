#![no_main]

use libfuzzer_sys::fuzz_target;
use rln_relay::{RateLimitProof, WireRateLimitProof};

fuzz_target!(|data: &[u8]| {
    // Split the input into seven fields using the first bytes as lengths
    if data.len() < 7 { return; }
    let (lens, mut rest) = data.split_at(7);
    let mut take = |n: u8| {
        let n = usize::from(n).min(rest.len());
        let (field, tail) = rest.split_at(n);
        rest = tail;
        field.to_vec()
    };

    let wire = WireRateLimitProof {
        proof: take(lens[0]),
        merkle_root: take(lens[1]),
        epoch: take(lens[2]),
        share_x: take(lens[3]),
        share_y: take(lens[4]),
        nullifier: take(lens[5]),
        rln_identifier: take(lens[6]),
    };

    // Conversion must never panic, and must reject any proof field that is not exactly 128 bytes
    let converted = RateLimitProof::try_from(&wire);
    if wire.proof.len() != 128 {
        assert!(converted.is_err());
    }
});
