//! Splits a chat message into 64-character chat packets.
//!
//! The wrapper works on bytes, left to right, with one character of
//! lookahead state. Words are kept whole where possible: when a character
//! does not fit, output rolls back to the last wrap point (a space, or just
//! after a hyphen) and the rest of the word moves to the next packet. A word
//! too long for any line is broken where the line fills up instead.
//!
//! `&` followed by a hex digit selects a color. Color codes are not copied
//! through verbatim; the wrapper tracks the active color and writes a code
//! only in front of the first character that needs it, re-asserting the
//! color at the start of each continuation line. `&&` is dropped.
//!
//! Continuation packets start with a prefix (`"> "` by default).

use super::packet::{OpCode, PACKET_SIZE, PAYLOAD_SIZE, PAYLOAD_START, Packet};

pub const DEFAULT_PREFIX: &[u8] = b"> ";
/// Longest accepted continuation prefix.
pub const MAX_PREFIX_LEN: usize = 32;

/// Color in effect before any color code. White in the classic palette.
const NO_COLOR: u8 = b'f';
/// Shortest word fragment that may be left in front of a hyphen wrap point.
const MIN_HYPHEN_FRAGMENT: usize = 3;

/// Pull-based packet producer for one message.
///
/// One instance per outgoing message; it is not meant to be shared between
/// threads. [`reset`](LineWrapper::reset) rewinds to the first packet.
pub struct LineWrapper {
    input: Vec<u8>,
    prefix: Vec<u8>,

    input_index: usize,
    /// Input index at which the current packet's content began.
    line_start: usize,

    output: [u8; PACKET_SIZE],
    output_index: usize,

    color: u8,
    last_color: u8,
    had_color: bool,
    expecting_color: bool,

    space_count: usize,
    word_length: usize,

    wrap_index: usize,
    wrap_output_index: usize,
    wrap_color: u8,

    /// The previous packet ended at a `\n` rather than a wrap.
    forced_break: bool,
}

impl LineWrapper {
    /// Wrap `message` with the default continuation prefix.
    pub fn new(message: &str) -> Self {
        Self::with_prefix(message, DEFAULT_PREFIX)
    }

    /// Wrap `message` with a custom continuation prefix.
    ///
    /// # Panics
    ///
    /// If `prefix` is longer than [`MAX_PREFIX_LEN`] or contains a newline.
    pub fn with_prefix(message: &str, prefix: &[u8]) -> Self {
        let bytes = message
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        Self::from_bytes(bytes, prefix)
    }

    /// Wrap a raw byte message. Bytes outside printable ASCII become `?`.
    ///
    /// # Panics
    ///
    /// If `prefix` is longer than [`MAX_PREFIX_LEN`] or contains a newline.
    pub fn from_bytes(input: Vec<u8>, prefix: &[u8]) -> Self {
        assert!(is_valid_prefix(prefix), "line prefix must fit on a single line");
        let mut wrapper = Self {
            input,
            prefix: prefix.to_vec(),
            input_index: 0,
            line_start: 0,
            output: [0; PACKET_SIZE],
            output_index: PAYLOAD_START,
            color: NO_COLOR,
            last_color: NO_COLOR,
            had_color: false,
            expecting_color: false,
            space_count: 0,
            word_length: 0,
            wrap_index: 0,
            wrap_output_index: PAYLOAD_START,
            wrap_color: NO_COLOR,
            forced_break: false,
        };
        wrapper.reset();
        wrapper
    }

    /// All packets for `message`, with the default prefix.
    pub fn wrap(message: &str) -> Vec<Packet> {
        Self::new(message).collect()
    }

    /// Rewind to the start of the message. The next call to `next` yields
    /// the first packet again.
    pub fn reset(&mut self) {
        self.input_index = 0;
        self.line_start = 0;
        self.color = NO_COLOR;
        self.word_length = 0;
        self.forced_break = false;
        self.begin_packet();
    }

    fn begin_packet(&mut self) {
        self.output = [0; PACKET_SIZE];
        self.output[0] = OpCode::Message as u8;
        self.output_index = PAYLOAD_START;
        self.last_color = NO_COLOR;
        self.had_color = false;
        self.expecting_color = false;
        self.space_count = 0;
        self.word_length = 0;
        self.mark_wrap_point(self.input_index);
    }

    /// Run the prefix through the normal character handling so it primes
    /// the output position and color state exactly as content would. The
    /// prefix starts uncolored; the content's color resumes after it.
    fn write_prefix(&mut self) {
        let resume_at = self.input_index;
        let content_color = self.color;
        self.color = NO_COLOR;

        for i in 0..self.prefix.len() {
            self.input_index = i;
            let wrapped = self.process_byte(self.prefix[i]);
            assert!(!wrapped, "line prefix must fit on a single line");
        }

        self.input_index = resume_at;
        self.color = content_color;
    }

    /// Feed one byte. Returns `true` when the current packet is complete;
    /// `input_index` then points at the first byte of the next packet.
    fn process_byte(&mut self, ch: u8) -> bool {
        match ch {
            b' ' => {
                self.expecting_color = false;
                if self.space_count == 0 {
                    self.mark_wrap_point(self.input_index);
                }
                self.space_count += 1;
            }

            b'&' => {
                // A second `&` cancels the pending escape and both are dropped.
                self.expecting_color = !self.expecting_color;
            }

            b'-' => {
                self.expecting_color = false;
                self.word_starts_here();
                if !self.append(ch) {
                    return self.overflow();
                }
                if self.word_length >= MIN_HYPHEN_FRAGMENT {
                    self.mark_wrap_point(self.input_index + 1);
                    self.word_length = 0;
                }
            }

            b'\n' => {
                self.input_index += 1;
                self.forced_break = true;
                return true;
            }

            _ if self.expecting_color => {
                self.expecting_color = false;
                if let Some(code) = color_code(ch) {
                    self.color = code;
                    self.had_color = true;
                }
            }

            _ => {
                self.word_starts_here();
                let ch = if is_printable(ch) { ch } else { b'?' };
                if !self.append(ch) {
                    return self.overflow();
                }
            }
        }
        false
    }

    /// A word following a run of spaces may be wrapped to the next line
    /// whole. The output side of the wrap point stays where the spaces began.
    fn word_starts_here(&mut self) {
        if self.space_count > 0 {
            self.wrap_index = self.input_index;
            self.wrap_color = self.color;
        }
    }

    fn mark_wrap_point(&mut self, input_index: usize) {
        self.wrap_index = input_index;
        self.wrap_output_index = self.output_index;
        self.wrap_color = self.color;
    }

    /// The current character did not fit: end the packet, moving the
    /// unfinished word to the next one if it could fit on a fresh line.
    ///
    /// A wrap point at the packet's first byte would produce the same packet
    /// again, so in that case the word is broken where it stands.
    fn overflow(&mut self) -> bool {
        self.forced_break = false;
        let fits_fresh_line = self.word_length < PAYLOAD_SIZE - self.prefix.len();
        if fits_fresh_line && self.wrap_index > self.line_start {
            self.input_index = self.wrap_index;
            self.output_index = self.wrap_output_index;
            self.color = self.wrap_color;
        }
        true
    }

    /// Write one visible character, preceded by any pending spaces and then,
    /// if needed, a color code. Writes nothing and returns `false` if it all
    /// does not fit. Spaces at the very start of a line are dropped.
    fn append(&mut self, ch: u8) -> bool {
        let at_line_start = self.output_index == PAYLOAD_START;
        let reassert_color = self.last_color != self.color || (self.had_color && at_line_start);

        let mut needed = 1;
        if ch == b'&' {
            needed += 1;
        }
        if reassert_color {
            needed += 2;
        }
        let spaces = if at_line_start { 0 } else { self.space_count };
        if self.output_index + needed + spaces > PACKET_SIZE {
            return false;
        }

        if self.space_count > 0 {
            for _ in 0..spaces {
                self.push(b' ');
            }
            self.space_count = 0;
            self.word_length = 0;
        }

        if reassert_color {
            self.push(b'&');
            self.push(self.color);
            self.last_color = self.color;
        }
        self.word_length += needed;

        if ch == b'&' {
            self.push(b'&');
        }
        self.push(ch);
        true
    }

    #[inline]
    fn push(&mut self, byte: u8) {
        self.output[self.output_index] = byte;
        self.output_index += 1;
    }

    /// Space-pad the payload and blank out a dangling `&` at the end of the
    /// written text.
    fn finish_packet(&mut self) -> Packet {
        self.output[self.output_index..].fill(b' ');
        while self.output_index > PAYLOAD_START {
            match self.output[self.output_index - 1] {
                b'&' => self.output[self.output_index - 1] = b' ',
                b' ' => {}
                _ => break,
            }
            self.output_index -= 1;
        }
        Packet::from_bytes(self.output)
    }
}

impl Iterator for LineWrapper {
    type Item = Packet;

    fn next(&mut self) -> Option<Packet> {
        if self.input_index >= self.input.len() {
            return None;
        }
        self.begin_packet();

        if self.input_index > 0 {
            if !self.prefix.is_empty() {
                self.write_prefix();
            }
            // Spaces at a wrap point belong to the previous line. After an
            // explicit newline they are indentation and are kept.
            if !self.forced_break {
                while self.input.get(self.input_index) == Some(&b' ') {
                    self.input_index += 1;
                }
            }
        }
        self.line_start = self.input_index;
        self.wrap_index = self.input_index;
        self.wrap_color = self.color;

        while self.input_index < self.input.len() {
            let ch = self.input[self.input_index];
            if self.process_byte(ch) {
                break;
            }
            self.input_index += 1;
        }
        Some(self.finish_packet())
    }
}

/// Whether `prefix` can be used as a continuation prefix: at most
/// [`MAX_PREFIX_LEN`] bytes and no newline.
pub fn is_valid_prefix(prefix: &[u8]) -> bool {
    prefix.len() <= MAX_PREFIX_LEN && !prefix.contains(&b'\n')
}

fn is_printable(ch: u8) -> bool {
    (b'!'..=b'~').contains(&ch)
}

/// Normalize a color code character, or `None` if it is not one.
fn color_code(ch: u8) -> Option<u8> {
    let ch = ch.to_ascii_lowercase();
    matches!(ch, b'0'..=b'9' | b'a'..=b'f').then_some(ch)
}
