use std::io::{self, Read};

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Ctrl(char),
    MouseClick { row: u16, col: u16 },
    ScrollUp,
    ScrollDown,
}

/// Read a single keypress from stdin.
/// Returns None if no key is available (timeout expired).
pub fn read_key() -> Option<Key> {
    decode_key(&mut io::stdin())
}

fn next_byte<R: Read>(input: &mut R) -> Option<u8> {
    let mut buf = [0u8; 1];
    match input.read(&mut buf) {
        Ok(1) => Some(buf[0]),
        _ => None,
    }
}

pub fn decode_key<R: Read>(input: &mut R) -> Option<Key> {
    let b = next_byte(input)?;
    Some(match b {
        13 | 10 => Key::Enter,
        27 => decode_escape(input),
        127 | 8 => Key::Backspace,
        9 => Key::Tab,
        b @ 1..=26 => Key::Ctrl((b'a' + b - 1) as char),
        b if (32..127).contains(&b) => Key::Char(b as char),
        b if b >= 0xC0 => decode_utf8(b, input),
        _ => Key::Char('?'),
    })
}

/// Typed non-ASCII text arrives as a multi-byte UTF-8 sequence.
fn decode_utf8<R: Read>(lead: u8, input: &mut R) -> Key {
    let len = match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    let mut bytes = vec![lead];
    for _ in 1..len {
        match next_byte(input) {
            Some(b) => bytes.push(b),
            None => return Key::Char('?'),
        }
    }
    std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .map(Key::Char)
        .unwrap_or(Key::Char('?'))
}

fn decode_escape<R: Read>(input: &mut R) -> Key {
    match next_byte(input) {
        Some(b'[') => {}
        // bare escape, or Alt-<key> which we do not bind
        _ => return Key::Escape,
    }

    match next_byte(input) {
        Some(b'A') => Key::Up,
        Some(b'B') => Key::Down,
        Some(b'H') => Key::Home,
        Some(b'F') => Key::End,
        Some(b'Z') => Key::BackTab,
        Some(d @ b'0'..=b'9') => decode_tilde(d, input),
        Some(b'<') => decode_sgr_mouse(input),
        _ => Key::Escape,
    }
}

/// `ESC [ n ~` editing keys.
fn decode_tilde<R: Read>(first_digit: u8, input: &mut R) -> Key {
    let mut num: u16 = (first_digit - b'0') as u16;
    loop {
        match next_byte(input) {
            Some(d @ b'0'..=b'9') => {
                num = num.saturating_mul(10).saturating_add((d - b'0') as u16);
            }
            Some(b'~') => {
                return match num {
                    1 | 7 => Key::Home,
                    3 => Key::Delete,
                    4 | 8 => Key::End,
                    5 => Key::PageUp,
                    6 => Key::PageDown,
                    _ => Key::Escape,
                };
            }
            _ => return Key::Escape,
        }
    }
}

/// SGR mouse report: `ESC [ < btn ; col ; row M` (press) or `m` (release).
fn decode_sgr_mouse<R: Read>(input: &mut R) -> Key {
    let mut params = [0u16; 3];
    let mut idx = 0;
    loop {
        match next_byte(input) {
            Some(d @ b'0'..=b'9') => {
                if idx < 3 {
                    params[idx] = params[idx]
                        .saturating_mul(10)
                        .saturating_add((d - b'0') as u16);
                }
            }
            Some(b';') => idx += 1,
            Some(b'M') if idx == 2 => {
                return match params[0] {
                    0 => Key::MouseClick {
                        row: params[2],
                        col: params[1],
                    },
                    64 => Key::ScrollUp,
                    65 => Key::ScrollDown,
                    _ => Key::Escape,
                };
            }
            _ => return Key::Escape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Option<Key> {
        let mut input = bytes;
        decode_key(&mut input)
    }

    #[test]
    fn test_plain_and_control_keys() {
        assert_eq!(decode(b"a"), Some(Key::Char('a')));
        assert_eq!(decode(b"\r"), Some(Key::Enter));
        assert_eq!(decode(b"\x7f"), Some(Key::Backspace));
        assert_eq!(decode(b"\t"), Some(Key::Tab));
        assert_eq!(decode(b"\x13"), Some(Key::Ctrl('s')));
        assert_eq!(decode(b""), None);
    }

    #[test]
    fn test_escape_sequences() {
        assert_eq!(decode(b"\x1b"), Some(Key::Escape));
        assert_eq!(decode(b"\x1b[A"), Some(Key::Up));
        assert_eq!(decode(b"\x1b[B"), Some(Key::Down));
        assert_eq!(decode(b"\x1b[Z"), Some(Key::BackTab));
        assert_eq!(decode(b"\x1b[5~"), Some(Key::PageUp));
        assert_eq!(decode(b"\x1b[6~"), Some(Key::PageDown));
        assert_eq!(decode(b"\x1b[3~"), Some(Key::Delete));
    }

    #[test]
    fn test_sgr_mouse() {
        assert_eq!(
            decode(b"\x1b[<0;12;5M"),
            Some(Key::MouseClick { row: 5, col: 12 })
        );
        assert_eq!(decode(b"\x1b[<64;1;1M"), Some(Key::ScrollUp));
        assert_eq!(decode(b"\x1b[<65;1;1M"), Some(Key::ScrollDown));
        assert_eq!(decode(b"\x1b[<0;12;5m"), Some(Key::Escape));
    }

    #[test]
    fn test_utf8_input() {
        assert_eq!(decode("é".as_bytes()), Some(Key::Char('é')));
        assert_eq!(decode("✅".as_bytes()), Some(Key::Char('✅')));
        assert_eq!(decode(&[0xE2, 0x9C]), Some(Key::Char('?')));
    }
}
