use thiserror::Error;

pub type VcfResult<T> = std::result::Result<T, VcfError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum VcfError {
    #[error("{0}")]
    Message(String),
    #[error("Invalid allele set: {reason}")]
    InvalidAlleleSet { reason: String },
    #[error("Index {index} is out of range for {what} of length {len}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("{kind} field {id} expects {expected} value(s), got {got}")]
    ArityMismatch {
        kind: &'static str,
        id: String,
        expected: String,
        got: usize,
    },
    #[error("{kind} field {id} is declared as Type={expected}, got a {got} value")]
    TypeMismatch {
        kind: &'static str,
        id: String,
        expected: String,
        got: &'static str,
    },
    #[error("Invalid value for {kind} field {id}: {reason}")]
    InvalidValue {
        kind: &'static str,
        id: String,
        reason: String,
    },
    #[error("One or more of the supplied sample alleles are not defined")]
    UndefinedAllele,
    #[error("Use .allele_indices to set integer allele indices")]
    IntegerAllele,
    #[error("Sample {name} is not defined in the header")]
    UnknownSample { name: String },
    #[error("{kind} field {id} is not defined in the header")]
    UnknownField { kind: &'static str, id: String },
    #[error("Position {pos} on {contig} is beyond {limit}")]
    InvalidPosition { contig: String, pos: u64, limit: u64 },
    #[error("Contig {name} is not defined in the header")]
    UnknownContig { name: String },
    #[error("FILTER {name} is not defined in the header")]
    UnknownFilter { name: String },
    #[error("{kind} field {id} is already defined as {existing}; refusing to redefine it as {requested}")]
    SchemaConflict {
        kind: &'static str,
        id: String,
        existing: String,
        requested: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl VcfError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Errors raised by genotype assignment that reject the supplied values
    /// themselves rather than an index or a schema lookup.
    pub fn is_value_error(&self) -> bool {
        matches!(self, Self::UndefinedAllele | Self::IntegerAllele)
    }
}

#[macro_export]
macro_rules! vcf_error {
    ($($arg:tt)*) => {
        $crate::error::VcfError::message(format!($($arg)*))
    };
}
