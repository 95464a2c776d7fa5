//! Typed failures raised by the trajectory model.
//!
//! Variants that concern a single trajectory carry the molecule uid.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrajectoryError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    /// A scalar condition differs between metadata records of one archive.
    #[error("inconsistent '{condition}' across metadata records: {values:?}")]
    Consistency {
        condition: String,
        values: Vec<String>,
    },

    /// Column-derived protein count disagrees with the declared parameter.
    #[error(
        "conflict in molecule {uid}: {structural} {protein} found in table columns, Number_{protein} parameter is {declared}"
    )]
    Validation {
        uid: String,
        protein: String,
        structural: usize,
        declared: f64,
    },

    #[error("molecule {uid}: parameter '{name}' not set")]
    MissingParameter { uid: String, name: String },

    /// A region or segment table could not be bound to exactly one prefix.
    #[error("molecule {uid}: cannot assign {subject} to a prefix ({reason})")]
    Assignment {
        uid: String,
        subject: String,
        reason: String,
    },

    /// Idle removal requested before pauses were detected.
    #[error(
        "molecule {uid}: no pause_{column} flags on segments {x_column}/{y_column} ({region}); detect pauses first"
    )]
    Sequencing {
        uid: String,
        column: String,
        x_column: String,
        y_column: String,
        region: String,
    },

    #[error("molecule {uid}: segment y-column '{y_column}' is neither rate nor bleaching data")]
    TypeClassification { uid: String, y_column: String },

    /// A segment table or region names a column the raw table lacks.
    #[error("molecule {uid}: raw table has no column '{column}'")]
    MissingColumn { uid: String, column: String },

    #[error("molecule {0} not found")]
    UnknownMolecule(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("invalid column pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("archive source error: {0}")]
    Source(String),
}

impl TrajectoryError {
    /// Short class name used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Consistency { .. } => "consistency",
            Self::Validation { .. } | Self::MissingParameter { .. } => "validation",
            Self::Assignment { .. } => "assignment",
            Self::Sequencing { .. } => "sequencing",
            Self::TypeClassification { .. } => "type_classification",
            Self::UnknownMolecule(_) => "unknown_molecule",
            Self::MissingColumn { .. } | Self::Table(_) => "table",
            Self::Pattern(_) => "pattern",
            Self::Configuration(_) => "configuration",
            Self::Source(_) => "source",
        }
    }

    /// Uid of the molecule the failure concerns, if any.
    pub fn uid(&self) -> Option<&str> {
        match self {
            Self::Validation { uid, .. }
            | Self::MissingParameter { uid, .. }
            | Self::Assignment { uid, .. }
            | Self::Sequencing { uid, .. }
            | Self::TypeClassification { uid, .. }
            | Self::MissingColumn { uid, .. } => Some(uid),
            Self::UnknownMolecule(uid) => Some(uid),
            _ => None,
        }
    }
}
