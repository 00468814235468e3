use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeriodError {
    #[error("Period error: value is an empty string")]
    Empty,
    #[error("Period error: unrecognised date format [{0}]")]
    UnknownFormat(String)
}

#[derive(Debug, Error)]
pub enum AmountError {
    #[error("Amount error: {0}")]
    InvalidFormat(String)
}
