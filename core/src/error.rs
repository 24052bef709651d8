use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formula '{key}' reads '{dependency}' before it is declared")]
    RegistryOrder { key: String, dependency: String },

    #[error("Formula '{key}' is declared more than once")]
    DuplicateFormula { key: String },

    #[error("Unknown field '{field}'")]
    UnknownField { field: String },

    #[error("Hub '{hub}' has no base records")]
    HubNotFound { hub: String },

    #[error("No base record for hub '{hub}', shift '{shift}'")]
    RecordNotFound { hub: String, shift: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
