use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing page fixture (set --page).")]
    MissingPage,
    #[error("Invalid boolean '{value}'. Use true/false, yes/no, on/off or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Seek target must be a finite, non-negative number of seconds (got {value}).")]
    InvalidSeekTime { value: f64 },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
