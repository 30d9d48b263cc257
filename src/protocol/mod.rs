//! Wire protocol
//!
//! The chatroom protocol is byte-oriented TCP with two frame kinds: a
//! fixed-size name frame sent once at connect time, and free-form chat
//! payloads of up to [`MAX_FRAME_LEN`] bytes per read.

pub mod frames;
pub mod handshake;

pub use frames::{MAX_FRAME_LEN, chat_frame, is_exit, joined_notice, left_notice, trim_payload};
pub use handshake::{MAX_NAME_LEN, MIN_NAME_LEN, NAME_FRAME_LEN, parse_name};
