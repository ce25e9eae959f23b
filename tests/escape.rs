use evshell::Key;
use evshell::shell::escape::EscapeDecoder;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEQUENCES: [&[u8]; 10] = [
    b"\x1b[A",
    b"\x1b[3~",
    b"\x1b[1;5C",
    b"\x1b[?25h",
    b"\x1bOP",
    b"\x1b]0;title\x07",
    b"\x1b]2;name\x1b\\",
    b"\x1bPq#0;2;0;0;0\x1b\\",
    b"\x1b_payload\x07",
    b"\x1b^private\x1b\\",
];

fn decode(decoder: &mut EscapeDecoder, input: &[u8]) -> Vec<Key> {
    input.iter().filter_map(|&b| decoder.feed(b)).collect()
}

fn plain(keys: &[Key]) -> Vec<u8> {
    keys.iter()
        .filter_map(|key| match key {
            Key::Byte(b) => Some(*b),
            _ => None,
        })
        .collect()
}

#[test]
fn test_sequences_never_leak_into_text() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut decoder = EscapeDecoder::new();

    for _ in 0..200 {
        let mut input = Vec::new();
        let mut text = Vec::new();
        for _ in 0..rng.gen_range(1..20) {
            if rng.gen_bool(0.3) {
                input.extend_from_slice(SEQUENCES[rng.gen_range(0..SEQUENCES.len())]);
            } else {
                let b = rng.gen_range(0x20..=0x7e);
                input.push(b);
                text.push(b);
            }
        }

        let keys = decode(&mut decoder, &input);
        assert_eq!(plain(&keys), text, "input {:?}", input);
        assert!(!keys.contains(&Key::Reset));
        assert!(decoder.is_idle());
    }
}

#[test]
fn test_random_bytes_are_survivable() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut decoder = EscapeDecoder::new();

    for _ in 0..100 {
        let input: Vec<u8> = (0..rng.gen_range(0..300)).map(|_| rng.r#gen()).collect();
        let keys = decode(&mut decoder, &input);
        assert!(keys.len() <= input.len());

        decoder.reset();
        assert!(decoder.is_idle());
        assert_eq!(decode(&mut decoder, b"a"), [Key::Byte(b'a')]);
    }
}

#[test]
fn test_split_sequence_across_feeds() {
    let mut decoder = EscapeDecoder::new();
    assert!(decode(&mut decoder, b"\x1b").is_empty());
    assert!(!decoder.is_idle());
    assert!(decode(&mut decoder, b"[").is_empty());
    assert_eq!(decode(&mut decoder, b"Dx"), [Key::Left, Key::Byte(b'x')]);
}

#[test]
fn test_overlong_string_sequence_is_dropped() {
    let mut decoder = EscapeDecoder::new();
    let mut input = b"\x1b]".to_vec();
    input.extend(std::iter::repeat_n(b'x', 100));

    let keys = decode(&mut decoder, &input);
    assert!(!keys.contains(&Key::Reset));
    assert_eq!(plain(&keys).len(), 100 - 64);
}

#[test]
fn test_malformed_sequences_reset() {
    let mut decoder = EscapeDecoder::new();
    assert_eq!(decode(&mut decoder, b"\x1b[\x01"), [Key::Reset]);
    assert_eq!(decode(&mut decoder, b"\x1bO1"), [Key::Reset]);
    assert_eq!(decode(&mut decoder, b"\x1b]x\x1bq"), [Key::Reset]);
    assert!(decoder.is_idle());
}

#[test]
fn test_navigation_keys() {
    let mut decoder = EscapeDecoder::new();
    assert_eq!(
        decode(&mut decoder, b"\x1b[H\x1b[F\x1b[1~\x1b[4~\x1b[B\x1b[5~"),
        [
            Key::Home,
            Key::End,
            Key::Home,
            Key::End,
            Key::Down,
            Key::Unmapped
        ]
    );
}
