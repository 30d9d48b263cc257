//! Chat frame formatting
//!
//! Server-generated frames are newline-terminated text lines; inbound
//! payloads are treated as opaque bytes.

/// Maximum number of bytes treated as one inbound message.
pub const MAX_FRAME_LEN: usize = 2048;

const EXIT_COMMAND: &[u8] = b"exit";

/// Strips trailing newline, carriage return, and NUL padding from a payload.
pub fn trim_payload(mut payload: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r' | b'\0'] = payload {
        payload = rest;
    }
    payload
}

/// Whether the payload is the literal `exit` command.
pub fn is_exit(payload: &[u8]) -> bool {
    trim_payload(payload) == EXIT_COMMAND
}

/// Formats a relayed chat message: `"<name>: <text>\n"`.
pub fn chat_frame(name: &str, payload: &[u8]) -> Vec<u8> {
    let body = trim_payload(payload);
    let mut frame = Vec::with_capacity(name.len() + body.len() + 3);
    frame.extend_from_slice(name.as_bytes());
    frame.extend_from_slice(b": ");
    frame.extend_from_slice(body);
    frame.push(b'\n');
    frame
}

/// Formats the notice broadcast when a client joins the room.
pub fn joined_notice(name: &str) -> Vec<u8> {
    format!("{} has joined\n", name).into_bytes()
}

/// Formats the notice broadcast when a client leaves the room.
pub fn left_notice(name: &str) -> Vec<u8> {
    format!("{} has left\n", name).into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_frame_prefixes_sender_name() {
        assert_eq!(chat_frame("Alice", b"hello\n"), b"Alice: hello\n");
    }

    #[test]
    fn chat_frame_keeps_opaque_bytes() {
        assert_eq!(chat_frame("Bob", &[0xf0, 0x9f, 0x91, 0x8b]), b"Bob: \xf0\x9f\x91\x8b\n");
    }

    #[test]
    fn exit_matches_with_and_without_newline() {
        assert!(is_exit(b"exit"));
        assert!(is_exit(b"exit\n"));
        assert!(is_exit(b"exit\r\n"));
        assert!(!is_exit(b"exit now\n"));
        assert!(!is_exit(b"hello\n"));
    }

    #[test]
    fn notices_are_newline_terminated() {
        assert_eq!(joined_notice("Alice"), b"Alice has joined\n");
        assert_eq!(left_notice("Alice"), b"Alice has left\n");
    }

    #[test]
    fn trim_strips_padding_only_from_the_tail() {
        assert_eq!(trim_payload(b"a b\r\n\0\0"), b"a b");
        assert_eq!(trim_payload(b"\na b"), b"\na b");
        assert_eq!(trim_payload(b""), b"");
    }
}
