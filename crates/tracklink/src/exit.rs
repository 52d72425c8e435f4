use std::fmt;

use tracklink_bridge::LastError;

// Exit code constants. The sysexits-style usage and timeout codes match
// what shell callers conventionally expect.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const LAUNCH_FAILED: i32 = 3;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn bridge_error(context: &str, err: &LastError) -> CliError {
    let code = match err {
        LastError::Provisioning(_) | LastError::Launch(_) => LAUNCH_FAILED,
        LastError::Executable(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use tracklink_proto::ErrorCode;

    use super::*;

    #[test]
    fn launch_failures_get_their_own_code() {
        let err = bridge_error("connect", &LastError::Launch("no such file".to_string()));
        assert_eq!(err.code, LAUNCH_FAILED);
        assert!(err.message.contains("no such file"));
    }

    #[test]
    fn executable_errors_are_plain_failures() {
        let err = bridge_error("watch", &LastError::Executable(ErrorCode::PlayerNotOpen));
        assert_eq!(err.code, FAILURE);
    }
}
