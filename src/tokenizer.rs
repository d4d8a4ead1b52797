//! Pull-based HTML tokenizer over a byte stream
//!
//! This module adapts html5ever's push tokenizer into a lazy, forward-only
//! iterator of [`Token`]s. Bytes are pulled from any [`Read`] one chunk at a
//! time, decoded incrementally as UTF-8, and fed to html5ever; the tokens it
//! emits are queued and handed out one per `next()` call.
//!
//! # Termination
//!
//! The stream always ends with exactly one [`Token::Error`]:
//!
//! - [`Termination::EndOfStream`] when the reader is exhausted
//! - [`Termination::Malformed`] when reading fails, the bytes are not UTF-8,
//!   the byte ceiling is exceeded, or (in strict mode) html5ever reports a
//!   parse error
//!
//! After that token the iterator returns `None`.
//!
//! # Examples
//!
//! ```rust
//! use page_summary::tokenizer::{Termination, Token, Tokens};
//!
//! let html = b"<head><title>Hi</title></head>";
//! let tokens: Vec<Token> = Tokens::from_reader(&html[..]).collect();
//!
//! assert!(matches!(&tokens[0], Token::StartTag(tag) if tag.name == "head"));
//! assert!(matches!(&tokens[2], Token::Text(text) if text == "Hi"));
//! assert!(matches!(
//!     tokens.last(),
//!     Some(Token::Error(Termination::EndOfStream))
//! ));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use encoding_rs::{Decoder, DecoderResult, UTF_8};
use html5ever::TokenizerResult;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use crate::config::TokenizerOptions;
use crate::error::MarkupError;

/// A single `key="value"` pair on a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub key: String,
    pub value: String,
}

/// Tag name plus attributes in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: Vec<Attr>,
}

impl Tag {
    /// Value of the first attribute named `key`
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// Why the token stream stopped
#[derive(Debug)]
pub enum Termination {
    /// The byte stream ended normally
    EndOfStream,
    /// The stream could not be tokenized any further
    Malformed(MarkupError),
}

/// HTML token
#[derive(Debug)]
pub enum Token {
    StartTag(Tag),
    EndTag(Tag),
    SelfClosingTag(Tag),
    Text(String),
    Error(Termination),
}

impl Token {
    /// Tag payload for any of the tag variants
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Token::StartTag(tag) | Token::EndTag(tag) | Token::SelfClosingTag(tag) => Some(tag),
            Token::Text(_) | Token::Error(_) => None,
        }
    }
}

/// Sink that converts html5ever tokens and queues them for the iterator
struct QueueSink {
    queue: RefCell<VecDeque<Token>>,
    strict: bool,
}

impl QueueSink {
    fn new(strict: bool) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            strict,
        }
    }

    fn push_text(&self, text: &str) {
        let mut queue = self.queue.borrow_mut();
        if let Some(Token::Text(pending)) = queue.back_mut() {
            pending.push_str(text);
        } else {
            queue.push_back(Token::Text(text.to_string()));
        }
    }
}

impl TokenSink for QueueSink {
    type Handle = ();

    fn process_token(
        &self,
        token: html5ever::tokenizer::Token,
        _line_number: u64,
    ) -> TokenSinkResult<()> {
        use html5ever::tokenizer::Token as Raw;

        match token {
            Raw::TagToken(tag) => {
                let name = tag.name.to_string();
                let attrs = tag
                    .attrs
                    .iter()
                    .map(|attr| Attr {
                        key: attr.name.local.to_string(),
                        value: attr.value.to_string(),
                    })
                    .collect();
                let converted = Tag { name, attrs };

                let next_state = match tag.kind {
                    TagKind::StartTag => text_mode_for(&converted.name),
                    TagKind::EndTag => TokenSinkResult::Continue,
                };

                let token = match tag.kind {
                    TagKind::EndTag => Token::EndTag(converted),
                    TagKind::StartTag if tag.self_closing => Token::SelfClosingTag(converted),
                    TagKind::StartTag => Token::StartTag(converted),
                };
                self.queue.borrow_mut().push_back(token);
                return next_state;
            }
            Raw::CharacterTokens(text) => self.push_text(&text),
            Raw::ParseError(message) if self.strict => {
                self.queue
                    .borrow_mut()
                    .push_back(Token::Error(Termination::Malformed(MarkupError::Syntax {
                        message: message.into_owned(),
                    })));
            }
            Raw::ParseError(_)
            | Raw::NullCharacterToken
            | Raw::CommentToken(_)
            | Raw::DoctypeToken(_)
            | Raw::EOFToken => {}
        }

        TokenSinkResult::Continue
    }
}

/// Tokenizer state to enter after a start tag, so element bodies that are
/// not markup come out as a single text token
fn text_mode_for(name: &str) -> TokenSinkResult<()> {
    match name {
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "style" | "iframe" | "noembed" | "noframes" | "noscript" | "xmp" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

/// Lazy token iterator over a byte stream
pub struct Tokens<R: Read> {
    reader: R,
    tokenizer: Tokenizer<QueueSink>,
    input: BufferQueue,
    decoder: Decoder,
    buf: Vec<u8>,
    consumed: usize,
    max_bytes: Option<usize>,
    drained: bool,
    finished: bool,
}

impl<R: Read> Tokens<R> {
    /// Create a tokenizer with default options
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader, &TokenizerOptions::default())
    }

    /// Create a tokenizer over `reader`
    pub fn new(reader: R, options: &TokenizerOptions) -> Self {
        Self {
            reader,
            tokenizer: Tokenizer::new(QueueSink::new(options.strict), TokenizerOpts::default()),
            input: BufferQueue::default(),
            decoder: UTF_8.new_decoder_with_bom_removal(),
            buf: vec![0; options.chunk_size.max(1)],
            consumed: 0,
            max_bytes: options.max_bytes,
            drained: false,
            finished: false,
        }
    }

    /// Total bytes pulled from the reader so far
    pub fn bytes_consumed(&self) -> usize {
        self.consumed
    }

    /// A queued token can be released once something follows it. A trailing
    /// text token is held back because the next chunk may extend it.
    fn has_complete_token(&self) -> bool {
        let queue = self.tokenizer.sink.queue.borrow();
        match queue.front() {
            None => false,
            Some(Token::Text(_)) => queue.len() > 1,
            Some(_) => true,
        }
    }

    fn is_queue_empty(&self) -> bool {
        self.tokenizer.sink.queue.borrow().is_empty()
    }

    fn pop(&mut self) -> Option<Token> {
        self.tokenizer.sink.queue.borrow_mut().pop_front()
    }

    /// Pull one chunk from the reader into the tokenizer
    fn refill(&mut self) -> Result<(), MarkupError> {
        let read = loop {
            match self.reader.read(&mut self.buf) {
                Ok(read) => break read,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(MarkupError::Io(err)),
            }
        };

        if read == 0 {
            let tail = decode_chunk(&mut self.decoder, &[], true, self.consumed)?;
            self.feed(tail);
            self.tokenizer.end();
            self.drained = true;
            return Ok(());
        }

        let chunk_start = self.consumed;
        self.consumed += read;
        if let Some(limit) = self.max_bytes
            && self.consumed > limit
        {
            return Err(MarkupError::TooLarge { limit });
        }

        let text = decode_chunk(&mut self.decoder, &self.buf[..read], false, chunk_start)?;
        self.feed(text);
        Ok(())
    }

    fn feed(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        self.input.push_back(StrTendril::from_slice(&text));
        while let TokenizerResult::Script(_) = self.tokenizer.feed(&self.input) {}
    }
}

impl<R: Read> Iterator for Tokens<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if self.finished {
                return None;
            }

            if self.has_complete_token() || (self.drained && !self.is_queue_empty()) {
                let token = self.pop()?;
                if matches!(token, Token::Error(_)) {
                    self.finished = true;
                }
                return Some(token);
            }

            if self.drained {
                self.finished = true;
                return Some(Token::Error(Termination::EndOfStream));
            }

            if let Err(err) = self.refill() {
                self.finished = true;
                return Some(Token::Error(Termination::Malformed(err)));
            }
        }
    }
}

/// Decode one chunk, keeping split multi-byte sequences inside the decoder
fn decode_chunk(
    decoder: &mut Decoder,
    bytes: &[u8],
    last: bool,
    chunk_start: usize,
) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(
        decoder
            .max_utf8_buffer_length_without_replacement(bytes.len())
            .unwrap_or(bytes.len() * 3 + 4),
    );
    let mut offset = 0;

    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&bytes[offset..], &mut out, last);
        offset += read;
        match result {
            DecoderResult::InputEmpty => return Ok(out),
            DecoderResult::OutputFull => {
                let remaining = bytes.len() - offset;
                out.reserve(
                    decoder
                        .max_utf8_buffer_length_without_replacement(remaining)
                        .unwrap_or(remaining * 3 + 4),
                );
            }
            DecoderResult::Malformed(_, _) => {
                return Err(MarkupError::InvalidUtf8 {
                    offset: chunk_start + offset,
                });
            }
        }
    }
}
