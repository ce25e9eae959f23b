//! Command line splitting.
//!
//! Arguments are separated by whitespace outside quotes. Single and double
//! quotes group text; the first quote character opens a quoted run that only
//! the same character closes. A backslash takes the next byte literally.
//! Quotes and backslashes are removed in place, so the returned arguments
//! borrow from the line itself.

use heapless::Vec;

use crate::{Error, MAX_ARGS};

/// Splits `line` into at most [`MAX_ARGS`] arguments.
///
/// # Errors
///
/// - [`Error::TooManyArguments`] if a further argument starts after
///   [`MAX_ARGS`] were collected.
/// - [`Error::UnterminatedQuote`] if a quote is still open at the end.
/// - [`Error::InvalidEncoding`] if an argument is not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use evshell::shell::tokenize::tokenize;
///
/// let mut line = *br#"echo "a b" c\ d"#;
/// let args = tokenize(&mut line).unwrap();
/// assert_eq!(args.as_slice(), ["echo", "a b", "c d"]);
/// ```
pub fn tokenize(line: &mut [u8]) -> Result<Vec<&str, MAX_ARGS>, Error> {
    let mut spans: Vec<(usize, usize), MAX_ARGS> = Vec::new();
    let len = line.len();
    let mut read = 0;
    let mut quote: Option<u8> = None;

    loop {
        while read < len && is_space(line[read]) {
            read += 1;
        }
        if read >= len {
            break;
        }
        if spans.is_full() {
            return Err(Error::TooManyArguments);
        }

        let start = read;
        let mut write = read;
        while read < len {
            let byte = line[read];
            read += 1;
            if byte == b'\\' {
                if read >= len {
                    break;
                }
                line[write] = line[read];
                write += 1;
                read += 1;
                continue;
            }
            match quote {
                None if byte == b'"' || byte == b'\'' => {
                    quote = Some(byte);
                    continue;
                }
                Some(open) if byte == open => {
                    quote = None;
                    continue;
                }
                None if is_space(byte) => break,
                _ => {}
            }
            line[write] = byte;
            write += 1;
        }
        // capacity was checked above
        let _ = spans.push((start, write));
    }

    if quote.is_some() {
        return Err(Error::UnterminatedQuote);
    }

    let line: &[u8] = line;
    let mut args = Vec::new();
    for (start, end) in spans {
        let arg = core::str::from_utf8(&line[start..end]).map_err(|_| Error::InvalidEncoding)?;
        let _ = args.push(arg);
    }
    Ok(args)
}

/// ASCII whitespace as understood by the shell.
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Result<std::vec::Vec<std::string::String>, Error> {
        let mut line = std::vec::Vec::from(text.as_bytes());
        tokenize(&mut line).map(|args| args.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(split("  ls \t -l\r").unwrap(), ["ls", "-l"]);
        assert!(split("   ").unwrap().is_empty());
    }

    #[test]
    fn quotes_group_and_nest_the_other_kind() {
        assert_eq!(
            split(r#"say "it's fine" 'a "b"'"#).unwrap(),
            ["say", "it's fine", "a \"b\""]
        );
        assert_eq!(split(r#"x"y z"w"#).unwrap(), ["xy zw"]);
        assert_eq!(split(r#"empty """#).unwrap(), ["empty", ""]);
    }

    #[test]
    fn backslash_escapes() {
        assert_eq!(split(r#"a\ b \"c\\"#).unwrap(), ["a b", "\"c\\"]);
        assert_eq!(split(r"trailing\").unwrap(), ["trailing"]);
    }

    #[test]
    fn limits_and_errors() {
        assert_eq!(split("1 2 3 4 5 6 7 8").unwrap().len(), MAX_ARGS);
        assert_eq!(split("1 2 3 4 5 6 7 8 9"), Err(Error::TooManyArguments));
        assert_eq!(split("echo 'open"), Err(Error::UnterminatedQuote));
    }
}
