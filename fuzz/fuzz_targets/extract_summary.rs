#![no_main]

use libfuzzer_sys::fuzz_target;
use page_summary::{ExtractOptions, extract_summary};

fuzz_target!(|data: &[u8]| {
    if let Ok(summary) = extract_summary("https://example.com/", data, &ExtractOptions::default()) {
        let _ = summary.to_json();
    }
});
