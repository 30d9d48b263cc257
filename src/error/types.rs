//! Error types
//!
//! Defines domain-specific error types for each module of the chat server.

use std::fmt;
use std::io;

/// Handshake (identity frame) errors
///
/// Any of these rejects the connection before it is ever registered, so a
/// failed handshake produces no join broadcast and no registry entry.
#[derive(Debug)]
pub enum HandshakeError {
    ClosedBeforeName,
    TruncatedFrame(usize),
    NameTooShort(usize),
    NameTooLong(usize),
    InvalidName,
    Io(io::Error),
}

impl fmt::Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::ClosedBeforeName => {
                write!(f, "Connection closed before a name was sent")
            }
            HandshakeError::TruncatedFrame(len) => {
                write!(f, "Connection closed after {} bytes of the name frame", len)
            }
            HandshakeError::NameTooShort(len) => {
                write!(f, "Name too short: {} bytes", len)
            }
            HandshakeError::NameTooLong(len) => {
                write!(f, "Name too long: {} bytes", len)
            }
            HandshakeError::InvalidName => {
                write!(f, "Name contains control or non-UTF-8 characters")
            }
            HandshakeError::Io(e) => write!(f, "I/O error during handshake: {}", e),
        }
    }
}

impl std::error::Error for HandshakeError {}

impl From<io::Error> for HandshakeError {
    fn from(error: io::Error) -> Self {
        HandshakeError::Io(error)
    }
}

/// Registry errors
#[derive(Debug)]
pub enum RegistryError {
    CapacityExceeded { capacity: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::CapacityExceeded { capacity } => {
                write!(f, "Room is full ({} clients)", capacity)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// General chat server error that encompasses all error types
#[derive(Debug)]
pub enum ChatServerError {
    Handshake(HandshakeError),
    Registry(RegistryError),
    Io(io::Error),
}

impl fmt::Display for ChatServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatServerError::Handshake(e) => write!(f, "Handshake error: {}", e),
            ChatServerError::Registry(e) => write!(f, "Registry error: {}", e),
            ChatServerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ChatServerError {}

impl From<HandshakeError> for ChatServerError {
    fn from(error: HandshakeError) -> Self {
        ChatServerError::Handshake(error)
    }
}

impl From<RegistryError> for ChatServerError {
    fn from(error: RegistryError) -> Self {
        ChatServerError::Registry(error)
    }
}

impl From<io::Error> for ChatServerError {
    fn from(error: io::Error) -> Self {
        ChatServerError::Io(error)
    }
}
