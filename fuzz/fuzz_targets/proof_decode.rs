#![no_main]

use libfuzzer_sys::fuzz_target;
use rln_relay::RateLimitProof;

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode to the same bytes
    if let Ok(proof) = RateLimitProof::from_bytes(data) {
        assert_eq!(&proof.to_bytes()[..], data);
    }
});
