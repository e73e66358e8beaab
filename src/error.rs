// Error types for plot building

/// Errors raised while building a plot or resolving its marks.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// A layer required a property that has no binding.
    #[error("missing binding for required property '{0}'")]
    MissingBinding(String),

    /// A binding or plot operation named a column the data does not have.
    #[error("column '{0}' not found")]
    UnknownColumn(String),

    /// `restore` was called with no saved state on the stack.
    #[error("restore without a matching save")]
    UnbalancedRestore,

    /// A scale could not map a value into its range.
    #[error("scale cannot map value: {0}")]
    ScaleDomain(String),

    /// Input data could not be loaded.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;
