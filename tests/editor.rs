use evshell::shell::editor::LineEditor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NAMES: [&str; 3] = ["help", "reboot", "status"];

/// Minimal VT100 model: one row of cells and a cursor column.
#[derive(Default)]
struct Screen {
    cells: Vec<u8>,
    column: usize,
}

impl Screen {
    fn apply(&mut self, output: &str) {
        let bytes = output.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                0x08 => {
                    self.column -= 1;
                    i += 1;
                }
                0x1b => {
                    assert_eq!(bytes[i + 1], b'[', "unexpected escape in {:?}", output);
                    let mut j = i + 2;
                    while bytes[j].is_ascii_digit() {
                        j += 1;
                    }
                    let count = match &output[i + 2..j] {
                        "" => 1,
                        digits => digits.parse::<usize>().unwrap(),
                    };
                    match bytes[j] {
                        b'D' => self.column -= count,
                        b'C' => self.column += count,
                        other => panic!("unexpected final byte {:?}", other as char),
                    }
                    i = j + 1;
                }
                b if (0x20..=0x7e).contains(&b) => {
                    if self.column == self.cells.len() {
                        self.cells.push(b);
                    } else {
                        self.cells[self.column] = b;
                    }
                    self.column += 1;
                    i += 1;
                }
                other => panic!("unexpected byte {:#04x} in {:?}", other, output),
            }
        }
    }

    fn check(&self, editor: &LineEditor<16>) {
        let len = editor.len();
        assert_eq!(&self.cells[..len], editor.as_bytes());
        assert!(self.cells[len..].iter().all(|&b| b == b' '));
        assert_eq!(self.column, editor.cursor());
    }
}

#[test]
fn test_random_edits_keep_screen_in_sync() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let mut editor: LineEditor<16> = LineEditor::new();
        let mut screen = Screen::default();

        for _ in 0..200 {
            let mut out = String::new();
            match rng.gen_range(0..10) {
                0..=2 => {
                    let byte = if rng.gen_bool(0.9) {
                        rng.gen_range(0x20..=0x7e)
                    } else {
                        rng.gen_range(0x00..0x20)
                    };
                    editor.insert(byte, &mut out).unwrap();
                }
                3 => editor.backspace(&mut out).unwrap(),
                4 => editor.delete(&mut out).unwrap(),
                5 => editor.left(&mut out).unwrap(),
                6 => editor.right(&mut out).unwrap(),
                7 => editor.home(&mut out).unwrap(),
                8 => editor.end(&mut out).unwrap(),
                _ => editor.complete(NAMES, "dev", &mut out).unwrap(),
            }
            screen.apply(&out);

            assert!(editor.cursor() <= editor.len());
            assert!(editor.len() <= editor.capacity());
            assert_eq!(editor.capacity(), 15);
            screen.check(&editor);
        }
    }
}

#[test]
fn test_completion_of_typed_prefix() {
    let mut editor: LineEditor<16> = LineEditor::new();
    let mut screen = Screen::default();
    let mut out = String::new();
    for &b in b"st" {
        editor.insert(b, &mut out).unwrap();
    }
    editor.complete(NAMES, "dev", &mut out).unwrap();
    screen.apply(&out);

    assert_eq!(editor.as_str(), "status");
    screen.check(&editor);
}

#[test]
fn test_completion_lists_candidates() {
    let mut editor: LineEditor<16> = LineEditor::new();
    let mut out = String::new();
    editor.insert(b'r', &mut out).unwrap();
    out.clear();

    editor
        .complete(["read", "reboot", "reset"], "dev", &mut out)
        .unwrap();
    assert_eq!(editor.as_str(), "re");
    assert_eq!(out, "\r\nread\t\treboot\t\treset\t\t\r\nroot@dev $ re");
}

#[test]
fn test_completion_without_match_is_silent() {
    let mut editor: LineEditor<16> = LineEditor::new();
    let mut out = String::new();
    editor.insert(b'x', &mut out).unwrap();
    out.clear();

    editor.complete(NAMES, "dev", &mut out).unwrap();
    assert_eq!(editor.as_str(), "x");
    assert!(out.is_empty());
}

#[test]
fn test_completion_respects_capacity() {
    let mut editor: LineEditor<8> = LineEditor::new();
    let mut out = String::new();
    for &b in b"st 1234" {
        editor.insert(b, &mut out).unwrap();
    }
    editor.home(&mut out).unwrap();
    editor.right(&mut out).unwrap();
    editor.right(&mut out).unwrap();
    out.clear();

    editor.complete(NAMES, "dev", &mut out).unwrap();
    assert_eq!(editor.as_str(), "st 1234");
    assert!(out.is_empty());
}
