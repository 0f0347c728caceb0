//! Room codes: the host's public transport address.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters a code may contain. Excludes 0/O and 1/I.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every room code.
pub const ROOM_CODE_LEN: usize = 6;

/// Why typed input is not a room code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoomCodeError {
    #[error("enter a room code")]
    Empty,

    #[error("room codes are {expected} characters, got {got}")]
    WrongLength { expected: usize, got: usize },

    #[error("'{0}' is not a valid room code character")]
    InvalidChar(char),
}

/// A validated, upper-case room code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Fresh random code.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let code = (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Validate user input. Surrounding whitespace and case are ignored.
    pub fn parse(input: &str) -> Result<Self, RoomCodeError> {
        let code = input.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(RoomCodeError::Empty);
        }
        let got = code.chars().count();
        if got != ROOM_CODE_LEN {
            return Err(RoomCodeError::WrongLength {
                expected: ROOM_CODE_LEN,
                got,
            });
        }
        if let Some(bad) = code
            .chars()
            .find(|c| !c.is_ascii() || !ROOM_CODE_ALPHABET.contains(&(*c as u8)))
        {
            return Err(RoomCodeError::InvalidChar(bad));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = RoomCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = RoomCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}
