//! Fuzz target: `LinkConfig` decoding
//!
//! Feeds arbitrary bytes to both the postcard and JSON decoders and checks:
//! - No panics under arbitrary input
//! - Anything that decodes also validates
//! - A decoded config survives an encode/decode cycle unchanged
//!
//! cargo fuzz run fuzz_config_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use uniserial::config::LinkConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(cfg) = LinkConfig::from_bytes(data) {
        assert!(cfg.validate().is_ok());
        let bytes = cfg.to_bytes().expect("re-encode");
        assert_eq!(LinkConfig::from_bytes(&bytes).ok(), Some(cfg));
    }

    if let Ok(text) = core::str::from_utf8(data) {
        if let Ok(cfg) = LinkConfig::from_json(text) {
            assert!(cfg.validate().is_ok());
        }
    }
});
