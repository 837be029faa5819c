#![no_main]

use fiskal::core::Environment;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any link that builds must also fit in a QR code or fail cleanly.
        if let Ok(url) = fiskal::verify::build_verification_url(s, Environment::Test) {
            let _ = fiskal::verify::encode_qr_png(&url);
        }
    }
});
