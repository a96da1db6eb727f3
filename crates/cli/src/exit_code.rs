//! Exit code definitions for the blobup CLI
//!
//! Scripts may depend on these values; treat changes as breaking.

/// Exit codes for the blobup CLI application.
///
/// Any failure during the upload phase maps to a single non-zero code;
/// there is no separate code for "some files were uploaded".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General/unspecified error, including local file and traversal errors
    GeneralError = 1,

    /// Invalid arguments or missing configuration
    UsageError = 2,

    /// Storage service request failed
    NetworkError = 3,

    /// Authentication or permission failure
    AuthError = 4,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            _ => None,
        }
    }

    /// Exit code for a core error
    pub fn from_error(err: &blobup_core::Error) -> Self {
        Self::from_i32(err.exit_code()).unwrap_or(Self::GeneralError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobup_core::Error;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::UsageError.as_i32(), 2);
        assert_eq!(ExitCode::NetworkError.as_i32(), 3);
        assert_eq!(ExitCode::AuthError.as_i32(), 4);
    }

    #[test]
    fn test_exit_code_from_i32() {
        assert_eq!(ExitCode::from_i32(0), Some(ExitCode::Success));
        assert_eq!(ExitCode::from_i32(2), Some(ExitCode::UsageError));
        assert_eq!(ExitCode::from_i32(4), Some(ExitCode::AuthError));
        assert_eq!(ExitCode::from_i32(99), None);
    }

    #[test]
    fn test_exit_code_from_error() {
        assert_eq!(
            ExitCode::from_error(&Error::Config("missing".into())),
            ExitCode::UsageError
        );
        assert_eq!(
            ExitCode::from_error(&Error::upload("a.txt", Error::Network("reset".into()))),
            ExitCode::NetworkError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Auth("no credential".into())),
            ExitCode::AuthError
        );
        assert_eq!(
            ExitCode::from_error(&Error::Io(std::io::Error::other("disk"))),
            ExitCode::GeneralError
        );
    }
}
