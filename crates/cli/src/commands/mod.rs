pub mod config;
pub mod doctor;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(output: impl Into<String>, exit_code: u8) -> Self {
        Self { exit_code, output: output.into() }
    }
}

/// Exit code used when configuration fails to load or validate.
pub const CONFIG_FAILURE_EXIT_CODE: u8 = 2;
/// Exit code used when doctor finds at least one failing check.
pub const CHECK_FAILURE_EXIT_CODE: u8 = 1;
