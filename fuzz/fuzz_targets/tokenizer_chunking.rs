#![no_main]

use libfuzzer_sys::fuzz_target;
use page_summary::TokenizerOptions;
use page_summary::tokenizer::Tokens;

// Token output must not depend on how the input is split into reads
fuzz_target!(|input: (u8, &[u8])| {
    let (chunk, data) = input;
    // malformed-input offsets legitimately vary with chunking
    if std::str::from_utf8(data).is_err() {
        return;
    }
    let whole: Vec<_> = Tokens::from_reader(data).map(|t| format!("{t:?}")).collect();
    let options = TokenizerOptions {
        chunk_size: usize::from(chunk).max(1),
        ..TokenizerOptions::default()
    };
    let chunked: Vec<_> = Tokens::new(data, &options).map(|t| format!("{t:?}")).collect();
    assert_eq!(whole, chunked);
});
