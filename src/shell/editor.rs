//! Single-line editor and prompt renderer.
//!
//! [`LineEditor`] owns the edit buffer of a session. Every operation updates
//! the buffer first and then writes the bytes that bring a VT100-compatible
//! terminal in sync with it, so the rendered line and cursor always match
//! the logical ones.
//!
//! The buffer holds at most `N - 1` bytes and only printable ASCII is ever
//! stored. `0 <= cursor <= len <= N - 1` holds after every call.

use core::fmt::{self, Write};

use super::tokenize::is_space;

/// Bounded edit buffer with cursor.
///
/// # Examples
///
/// ```rust
/// use evshell::shell::editor::LineEditor;
///
/// let mut editor: LineEditor<16> = LineEditor::new();
/// let mut screen = String::new();
/// for &b in b"lx" {
///     editor.insert(b, &mut screen).unwrap();
/// }
/// editor.left(&mut screen).unwrap();
/// editor.insert(b's', &mut screen).unwrap();
/// assert_eq!(editor.as_str(), "lsx");
/// assert_eq!(editor.cursor(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct LineEditor<const N: usize> {
    buf: [u8; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> LineEditor<N> {
    /// Creates an empty editor.
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            cursor: 0,
        }
    }

    /// Maximum number of bytes the line can hold.
    pub const fn capacity(&self) -> usize {
        N.saturating_sub(1)
    }

    /// Current line length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the line is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cursor offset into the line.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current line content.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Current line content as text.
    pub fn as_str(&self) -> &str {
        self.text(0, self.len)
    }

    /// Empties the line without rendering anything.
    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }

    fn text(&self, from: usize, to: usize) -> &str {
        core::str::from_utf8(&self.buf[from..to]).unwrap_or_default()
    }

    /// Inserts a printable byte at the cursor.
    ///
    /// Non-printable bytes and input beyond capacity are dropped silently.
    pub fn insert<W: Write>(&mut self, byte: u8, out: &mut W) -> fmt::Result {
        if !is_printable(byte) || self.len + 1 >= N {
            return Ok(());
        }
        self.buf.copy_within(self.cursor..self.len, self.cursor + 1);
        self.buf[self.cursor] = byte;
        self.cursor += 1;
        self.len += 1;

        out.write_char(char::from(byte))?;
        let tail = self.len - self.cursor;
        if tail > 0 {
            write!(out, "{}\x1b[{}D", self.text(self.cursor, self.len), tail)?;
        }
        Ok(())
    }

    /// Removes the byte left of the cursor.
    pub fn backspace<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        if self.cursor == 0 {
            return Ok(());
        }
        if self.cursor == self.len {
            self.cursor -= 1;
            self.len -= 1;
            return out.write_str("\x08 \x08");
        }
        self.buf.copy_within(self.cursor..self.len, self.cursor - 1);
        self.cursor -= 1;
        self.len -= 1;
        let tail = self.len - self.cursor;
        write!(
            out,
            "\x08{} \x1b[{}D",
            self.text(self.cursor, self.len),
            tail + 1
        )
    }

    /// Removes the byte under the cursor.
    pub fn delete<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        if self.cursor >= self.len {
            return Ok(());
        }
        self.buf.copy_within(self.cursor + 1..self.len, self.cursor);
        self.len -= 1;
        let tail = self.len - self.cursor;
        write!(
            out,
            "{} \x1b[{}D",
            self.text(self.cursor, self.len),
            tail + 1
        )
    }

    /// Moves the cursor one column left.
    pub fn left<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        if self.cursor == 0 {
            return Ok(());
        }
        self.cursor -= 1;
        out.write_str("\x1b[D")
    }

    /// Moves the cursor one column right.
    pub fn right<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        if self.cursor >= self.len {
            return Ok(());
        }
        self.cursor += 1;
        out.write_str("\x1b[C")
    }

    /// Moves the cursor to the start of the line.
    pub fn home<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        if self.cursor == 0 {
            return Ok(());
        }
        let columns = self.cursor;
        self.cursor = 0;
        write!(out, "\x1b[{}D", columns)
    }

    /// Moves the cursor to the end of the line.
    pub fn end<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        let columns = self.len - self.cursor;
        if columns == 0 {
            return Ok(());
        }
        self.cursor = self.len;
        write!(out, "\x1b[{}C", columns)
    }

    /// Writes `root@<host> $ ` followed by the line, leaving the terminal
    /// cursor where the logical cursor is.
    pub fn render_prompt<W: Write>(&self, host: &str, out: &mut W) -> fmt::Result {
        write!(out, "root@{} $ {}", host, self.as_str())?;
        if self.cursor != self.len {
            write!(out, "\x1b[{}D", self.len - self.cursor)?;
        }
        Ok(())
    }

    /// Completes the first word against `names`.
    ///
    /// Only a cursor inside the first word triggers completion. The longest
    /// prefix shared by all candidates is spliced in at the cursor. With
    /// several candidates they are listed on a fresh line, separated by two
    /// tabs, and the prompt is drawn again.
    pub fn complete<'a, I, W>(&mut self, names: I, host: &str, out: &mut W) -> fmt::Result
    where
        I: IntoIterator<Item = &'a str>,
        W: Write,
    {
        if self.cursor == 0 || self.buf[..self.cursor].iter().any(|&b| is_space(b)) {
            return Ok(());
        }

        let typed = self.cursor;
        let mut first: Option<&'a str> = None;
        let mut common = 0;
        let mut listing = false;
        for name in names {
            if !name.as_bytes().starts_with(&self.buf[..typed]) {
                continue;
            }
            let Some(lead) = first else {
                first = Some(name);
                common = name.len();
                continue;
            };
            common = common_prefix_len(&lead.as_bytes()[..common], name.as_bytes());
            if !listing {
                listing = true;
                write!(out, "\r\n{}\t\t", lead)?;
            }
            write!(out, "{}\t\t", name)?;
        }
        let Some(lead) = first else {
            return Ok(());
        };

        let extension = &lead.as_bytes()[typed..common];
        let extended = !extension.is_empty()
            && self.len + extension.len() < N
            && extension.iter().all(|&b| is_printable(b));
        if extended {
            let grow = extension.len();
            self.buf.copy_within(typed..self.len, typed + grow);
            self.buf[typed..typed + grow].copy_from_slice(extension);
            self.cursor += grow;
            self.len += grow;
        }

        if listing {
            out.write_str("\r\n")?;
            return self.render_prompt(host, out);
        }
        if extended {
            out.write_str(self.text(typed, self.cursor))?;
            let tail = self.len - self.cursor;
            if tail > 0 {
                write!(out, "{}\x1b[{}D", self.text(self.cursor, self.len), tail)?;
            }
        }
        Ok(())
    }
}

impl<const N: usize> Default for LineEditor<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Printable ASCII, the only bytes the editor stores.
pub fn is_printable(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
