//! Result and errors.
use std::fmt::{self, Display, Formatter};

use crate::constants::Address;

pub type Chip8Result<T> = std::result::Result<T, Chip8Error>;

#[derive(Debug)]
pub enum Chip8Error {
    /// Attempt to load a bytecode program that can't fit in memory.
    Load { size: usize, capacity: usize },
    /// Subroutine call while all stack levels are in use.
    StackOverflow { pc: Address },
    /// Return from subroutine with an empty call stack.
    StackUnderflow { pc: Address },
    Io(std::io::Error),
    Fmt(fmt::Error),
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { size, capacity } => write!(
                f,
                "program of {size} bytes does not fit in the {capacity} bytes of VM memory"
            ),
            Self::StackOverflow { pc } => write!(f, "call stack overflow at {pc:#05X}"),
            Self::StackUnderflow { pc } => write!(f, "call stack underflow at {pc:#05X}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Fmt(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Chip8Error {
    fn from(err: std::io::Error) -> Self {
        Chip8Error::Io(err)
    }
}

impl From<fmt::Error> for Chip8Error {
    fn from(err: fmt::Error) -> Self {
        Chip8Error::Fmt(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Chip8Error::Load {
            size: 3585,
            capacity: 3584,
        };
        assert_eq!(
            err.to_string(),
            "program of 3585 bytes does not fit in the 3584 bytes of VM memory"
        );

        let err = Chip8Error::StackOverflow { pc: 0x2FE };
        assert_eq!(err.to_string(), "call stack overflow at 0x2FE");
    }
}
