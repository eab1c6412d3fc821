
/// Custom error type for the watbal crate.
#[derive(Debug)]
pub enum WbError {
    /// Error type from csv crate.
    CsvError,
    /// Error type from rand crate.
    ExpError,
    /// Error type from std::io.
    IoError,
    /// Cell field and mask/weight vectors differ in length.
    LengthMismatch,
    /// No active cells in the basin mask.
    EmptyBasin,
    /// Cell weights must be finite, non-negative, and sum above zero.
    BadWeight,
}

impl std::error::Error for WbError {}

impl std::fmt::Display for WbError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WbError::CsvError => write!(f, "Could not serialize/deserialize csv file."),
            WbError::ExpError => write!(
                f,
                "Could not create exponential distribution from rate provided."
            ),
            WbError::IoError => write!(f, "Could not read file from path provided."),
            WbError::LengthMismatch => {
                write!(f, "Cell fields and mask/weights differ in length.")
            }
            WbError::EmptyBasin => write!(f, "Basin mask selects no active cells."),
            WbError::BadWeight => write!(
                f,
                "Cell weights must be finite, non-negative, and sum above zero."
            ),
        }
    }
}

impl From<csv::Error> for WbError {
    fn from(_: csv::Error) -> Self {
        WbError::CsvError
    }
}

impl From<rand_distr::ExpError> for WbError {
    fn from(_: rand_distr::ExpError) -> Self {
        WbError::ExpError
    }
}

impl From<std::io::Error> for WbError {
    fn from(_: std::io::Error) -> Self {
        WbError::IoError
    }
}
