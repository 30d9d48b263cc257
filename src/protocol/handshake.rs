//! Identity handshake
//!
//! Immediately after connecting, a client sends a single fixed-size frame
//! carrying its display name, NUL/blank padded, conventionally terminated
//! with a newline inside the frame.

use crate::error::HandshakeError;

/// Size of the identity frame a client sends after connecting.
pub const NAME_FRAME_LEN: usize = 32;

/// Minimum display name length after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum display name length after trimming.
pub const MAX_NAME_LEN: usize = 30;

/// Parses and validates the display name out of an identity frame.
///
/// Trailing NUL/blank padding and a single trailing newline (with optional
/// carriage return) are stripped. The remainder must be valid UTF-8 of
/// [`MIN_NAME_LEN`]..=[`MAX_NAME_LEN`] bytes with no control characters.
pub fn parse_name(frame: &[u8]) -> Result<String, HandshakeError> {
    let mut bytes = frame;
    while let [rest @ .., b'\0' | b' '] = bytes {
        bytes = rest;
    }
    if let Some(stripped) = bytes.strip_suffix(b"\n") {
        bytes = stripped;
    }
    if let Some(stripped) = bytes.strip_suffix(b"\r") {
        bytes = stripped;
    }
    while let [rest @ .., b' '] = bytes {
        bytes = rest;
    }

    if bytes.len() < MIN_NAME_LEN {
        return Err(HandshakeError::NameTooShort(bytes.len()));
    }
    if bytes.len() > MAX_NAME_LEN {
        return Err(HandshakeError::NameTooLong(bytes.len()));
    }

    let name = std::str::from_utf8(bytes).map_err(|_| HandshakeError::InvalidName)?;
    if name.bytes().any(|b| b.is_ascii_control()) {
        return Err(HandshakeError::InvalidName);
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str) -> [u8; NAME_FRAME_LEN] {
        let mut frame = [0u8; NAME_FRAME_LEN];
        frame[..name.len()].copy_from_slice(name.as_bytes());
        frame[name.len()] = b'\n';
        frame
    }

    #[test]
    fn accepts_padded_name() {
        assert_eq!(parse_name(&frame("Alice")).unwrap(), "Alice");
    }

    #[test]
    fn accepts_blank_padded_name() {
        let padded = format!("{:<31}\n", "Bob");
        assert_eq!(parse_name(padded.as_bytes()).unwrap(), "Bob");
    }

    #[test]
    fn strips_crlf() {
        assert_eq!(parse_name(b"Carol\r\n").unwrap(), "Carol");
    }

    #[test]
    fn rejects_empty_name() {
        assert!(matches!(
            parse_name(&frame("")),
            Err(HandshakeError::NameTooShort(0))
        ));
    }

    #[test]
    fn rejects_one_byte_name() {
        assert!(matches!(
            parse_name(&frame("A")),
            Err(HandshakeError::NameTooShort(1))
        ));
    }

    #[test]
    fn rejects_name_over_thirty_bytes() {
        let long = "x".repeat(31);
        assert!(matches!(
            parse_name(&frame(&long)),
            Err(HandshakeError::NameTooLong(31))
        ));
    }

    #[test]
    fn accepts_name_of_exactly_thirty_bytes() {
        let name = "x".repeat(30);
        assert_eq!(parse_name(&frame(&name)).unwrap(), name);
    }

    #[test]
    fn rejects_embedded_control_characters() {
        assert!(matches!(
            parse_name(&frame("Al\x07ce")),
            Err(HandshakeError::InvalidName)
        ));
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert!(matches!(
            parse_name(&[0xff, 0xfe, 0xfd, b'\n']),
            Err(HandshakeError::InvalidName)
        ));
    }
}
