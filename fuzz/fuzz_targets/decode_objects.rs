#![no_main]

use libfuzzer_sys::fuzz_target;
use mobileid_verifier::{Cert, SignedMessage};
use mobileid_verifier::crl::Crl;
use mobileid_verifier::ocsp::OcspResponse;

fuzz_target!(|data: &[u8]| {
    let (which, data) = match data.split_first() {
        Some((first, data)) => (*first, data),
        None => return,
    };

    match which % 5 {
        0 => { let _ = Cert::decode(data); },
        1 => { let _ = Crl::decode(data); },
        2 => { let _ = OcspResponse::decode(data); },
        3 => {
            if let Ok(msg) = SignedMessage::decode(data) {
                if let Ok(signer) = msg.resolve_signer() {
                    let _ = signer.verify_signature(b"");
                    let _ = signer.cert().unique_identifier();
                }
            }
        }
        4 => {
            if let Ok(text) = std::str::from_utf8(data) {
                let _ = SignedMessage::from_base64(text);
            }
        }
        _ => panic!("what?"),
    }
});
