//! Terminal escape sequence decoder.
//!
//! Terminals report cursor keys and similar as multi-byte ANSI sequences
//! (`ESC [ D` for the left arrow, `ESC [ 3 ~` for delete, ...). The
//! [`EscapeDecoder`] consumes input one byte at a time and folds those
//! sequences into a single [`Key`], while every other byte passes through
//! untouched for the line editor to interpret.
//!
//! ```text
//!            ESC            [               final 0x40..=0x7E
//!   Idle ─────────▶ Esc ─────────▶ Csi ──────────────────────▶ Idle + Key
//!                    │  ] P ^ _        BEL / ESC \
//!                    ├────────▶ Osc/Dcs/Pm/Apc ─────────────▶ Idle
//!                    │  O             final byte
//!                    └────────▶ Ss3 ────────────────────────▶ Idle
//! ```
//!
//! Malformed continuations either vanish silently or surface as
//! [`Key::Reset`], which aborts the current line or redirect context.

/// Ctrl-C, interrupt request.
pub const CTRL_C: u8 = 0x03;
/// Bell, terminates string sequences.
pub const BEL: u8 = 0x07;
/// Backspace as sent by most serial terminals.
pub const BACKSPACE: u8 = 0x08;
/// Horizontal tab, triggers completion.
pub const TAB: u8 = 0x09;
/// Line feed.
pub const LF: u8 = 0x0A;
/// Ctrl-L, clear screen.
pub const CTRL_L: u8 = 0x0C;
/// Carriage return.
pub const CR: u8 = 0x0D;
/// Ctrl-N, kept as a line-kill alias.
pub const CTRL_N: u8 = 0x0E;
/// Ctrl-U, line kill.
pub const CTRL_U: u8 = 0x15;
/// Ctrl-Z.
pub const CTRL_Z: u8 = 0x1A;
/// Escape, starts a control sequence.
pub const ESC: u8 = 0x1B;
/// Delete as sent by most VT-style terminals for the backspace key.
pub const DEL: u8 = 0x7F;

/// Longest sequence body the decoder tracks before giving up.
const MAX_SEQUENCE_LEN: u8 = 64;

/// Parameter bytes of a CSI sequence that are retained for decoding.
const PARAM_CAPACITY: usize = 2;

/// Logical key produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// A raw byte outside any escape sequence.
    Byte(u8),
    /// Cursor to start of line.
    Home,
    /// Cursor to end of line.
    End,
    /// Cursor one column left.
    Left,
    /// Cursor one column right.
    Right,
    /// History up. Not implemented by the editor.
    Up,
    /// History down. Not implemented by the editor.
    Down,
    /// Delete the character under the cursor.
    Delete,
    /// A well-formed sequence the shell has no binding for.
    Unmapped,
    /// A malformed sequence; abort the current interactive context.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Esc,
    Csi,
    Osc,
    Dcs,
    Pm,
    Apc,
    Ss3,
    StringWaitSt,
}

/// Byte-at-a-time ANSI escape sequence decoder.
///
/// # Examples
///
/// ```rust
/// use evshell::shell::escape::{EscapeDecoder, Key};
///
/// let mut decoder = EscapeDecoder::new();
/// let keys: Vec<_> = b"a\x1b[3~".iter().filter_map(|&b| decoder.feed(b)).collect();
/// assert_eq!(keys, [Key::Byte(b'a'), Key::Delete]);
/// ```
#[derive(Debug, Clone)]
pub struct EscapeDecoder {
    state: State,
    params: [u8; PARAM_CAPACITY],
    len: u8,
}

impl EscapeDecoder {
    /// Creates an idle decoder.
    pub const fn new() -> Self {
        Self {
            state: State::Idle,
            params: [0; PARAM_CAPACITY],
            len: 0,
        }
    }

    /// Drops any partially decoded sequence.
    pub fn reset(&mut self) {
        self.state = State::Idle;
        self.len = 0;
    }

    /// Returns `true` if no sequence is in progress.
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle
    }

    /// Feeds one byte and returns the key it completes, if any.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            State::Idle => {
                if byte == ESC {
                    self.state = State::Esc;
                    self.len = 0;
                    return None;
                }
                Some(Key::Byte(byte))
            }
            State::Esc => {
                self.state = match byte {
                    b'[' => State::Csi,
                    b']' => State::Osc,
                    b'P' => State::Dcs,
                    b'^' => State::Pm,
                    b'_' => State::Apc,
                    b'O' => State::Ss3,
                    _ => State::Idle,
                };
                None
            }
            State::Osc | State::Dcs | State::Pm | State::Apc => {
                match byte {
                    BEL => self.state = State::Idle,
                    ESC => self.state = State::StringWaitSt,
                    _ => {
                        self.len += 1;
                        if self.len >= MAX_SEQUENCE_LEN {
                            trace!("string sequence too long, dropped");
                            self.reset();
                        }
                    }
                }
                None
            }
            State::StringWaitSt => {
                if byte == b'\\' {
                    self.state = State::Idle;
                    return None;
                }
                self.abort()
            }
            State::Ss3 => {
                if is_final(byte) {
                    self.state = State::Idle;
                    return None;
                }
                self.abort()
            }
            State::Csi => self.feed_csi(byte),
        }
    }

    fn feed_csi(&mut self, byte: u8) -> Option<Key> {
        if is_final(byte) {
            self.state = State::Idle;
            return Some(self.decode_csi(byte));
        }
        if !is_param(byte) && !is_intermediate(byte) {
            return self.abort();
        }
        if usize::from(self.len) < PARAM_CAPACITY {
            self.params[usize::from(self.len)] = byte;
        }
        self.len += 1;
        if self.len >= MAX_SEQUENCE_LEN {
            trace!("control sequence too long, dropped");
            self.reset();
        }
        None
    }

    fn decode_csi(&self, last: u8) -> Key {
        match (self.len, last) {
            (0, b'A') => Key::Up,
            (0, b'B') => Key::Down,
            (0, b'C') => Key::Right,
            (0, b'D') => Key::Left,
            (0, b'F') => Key::End,
            (0, b'H') => Key::Home,
            (1, b'~') => match self.params[0] {
                b'1' => Key::Home,
                b'3' => Key::Delete,
                b'4' => Key::End,
                _ => Key::Unmapped,
            },
            _ => Key::Unmapped,
        }
    }

    fn abort(&mut self) -> Option<Key> {
        trace!("malformed escape sequence");
        self.reset();
        Some(Key::Reset)
    }
}

impl Default for EscapeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_final(byte: u8) -> bool {
    (0x40..=0x7E).contains(&byte)
}

fn is_intermediate(byte: u8) -> bool {
    (0x20..=0x2F).contains(&byte)
}

fn is_param(byte: u8) -> bool {
    byte.is_ascii_digit() || matches!(byte, b';' | b'?' | b'>' | b'<')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &[u8]) -> std::vec::Vec<Key> {
        let mut decoder = EscapeDecoder::new();
        input.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    #[test]
    fn plain_bytes_pass_through() {
        assert_eq!(
            decode(b"ls\r"),
            [Key::Byte(b'l'), Key::Byte(b's'), Key::Byte(CR)]
        );
    }

    #[test]
    fn arrows_and_tilde_keys() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[C\x1b[D\x1b[H\x1b[F"),
            [Key::Up, Key::Down, Key::Right, Key::Left, Key::Home, Key::End]
        );
        assert_eq!(
            decode(b"\x1b[1~\x1b[3~\x1b[4~\x1b[5~"),
            [Key::Home, Key::Delete, Key::End, Key::Unmapped]
        );
    }

    #[test]
    fn parameterised_sequences_are_unmapped() {
        assert_eq!(decode(b"\x1b[1;5C"), [Key::Unmapped]);
        assert_eq!(decode(b"\x1b[Z"), [Key::Unmapped]);
    }

    #[test]
    fn two_byte_escape_is_discarded() {
        assert_eq!(decode(b"\x1bcx"), [Key::Byte(b'x')]);
    }

    #[test]
    fn string_sequences_vanish() {
        assert_eq!(decode(b"\x1b]0;title\x07a"), [Key::Byte(b'a')]);
        assert_eq!(decode(b"\x1bPdata\x1b\\b"), [Key::Byte(b'b')]);
    }

    #[test]
    fn bad_string_terminator_resets() {
        assert_eq!(decode(b"\x1b_x\x1bq"), [Key::Reset]);
    }

    #[test]
    fn ss3_consumes_one_final_byte() {
        assert_eq!(decode(b"\x1bOPz"), [Key::Byte(b'z')]);
        assert_eq!(decode(b"\x1bO\x01"), [Key::Reset]);
    }

    #[test]
    fn invalid_csi_byte_resets() {
        assert_eq!(decode(b"\x1b[\x01a"), [Key::Reset, Key::Byte(b'a')]);
    }

    #[test]
    fn overlong_sequences_abort_silently() {
        let mut input = std::vec::Vec::from(&b"\x1b["[..]);
        input.extend(core::iter::repeat(b'1').take(64));
        input.push(b'q');
        assert_eq!(decode(&input), [Key::Byte(b'q')]);

        let mut input = std::vec::Vec::from(&b"\x1b]"[..]);
        input.extend(core::iter::repeat(b'x').take(64));
        input.push(b'q');
        assert_eq!(decode(&input), [Key::Byte(b'q')]);
    }
}
