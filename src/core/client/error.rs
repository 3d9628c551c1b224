use derive_more::Display;
use std::error::Error;
use std::io;

/// Failure to get an answer to a request
#[derive(Debug, Display)]
pub enum AskError {
    /// The agent ran the request and reported an error
    #[display(fmt = "Failed: {}", msg)]
    Failure { msg: String },

    #[display(fmt = "Invalid Response: {}", reason)]
    InvalidResponse { reason: String },

    Timeout,
    EncodingFailed,

    #[display(fmt = "IO Error: {}", "_0")]
    IoError(io::Error),

    ConnectionClosed,
}

impl Error for AskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoError(x) => Some(x),
            _ => None,
        }
    }
}

impl From<io::Error> for AskError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_should_surface_remote_message() {
        let err = AskError::Failure {
            msg: String::from("Invalid request: cmd required"),
        };
        assert_eq!(err.to_string(), "Failed: Invalid request: cmd required");
        assert_eq!(AskError::Timeout.to_string(), "Timeout");
    }
}
