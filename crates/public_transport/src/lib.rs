use std::{error::Error, fmt};

use serde::Serialize;
use utility::geo::DomainError;

pub mod aggregator;
pub mod connection;
pub mod database;
pub mod memory;
pub mod points;
pub mod provider;
pub mod ranker;

/// Failure of an external feed.
#[derive(Debug)]
pub enum ProviderError {
    Unreachable(Box<dyn Error + Send + Sync>),
    Status { status_code: u16, url: String },
    Malformed(String),
    Timeout,
}

impl ProviderError {
    pub fn unreachable<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Unreachable(Box::new(why))
    }
}

impl Error for ProviderError {}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unreachable(why) => write!(f, "provider unreachable: {}", why),
            Self::Status { status_code, url } => {
                write!(f, "unexpected status {} from {}", status_code, url)
            }
            Self::Malformed(why) => write!(f, "malformed payload: {}", why),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// The steps of a nearby query that talk to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Stops,
    Rides,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Stops => write!(f, "stops"),
            Self::Rides => write!(f, "rides"),
        }
    }
}

#[derive(Debug)]
pub enum FailureCause {
    Provider(ProviderError),
    Domain(DomainError),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Provider(why) => write!(f, "{}", why),
            Self::Domain(why) => write!(f, "{}", why),
        }
    }
}

#[derive(Debug)]
pub struct StageFailure {
    pub stage: Stage,
    pub cause: FailureCause,
}

impl StageFailure {
    pub fn provider(stage: Stage, why: ProviderError) -> Self {
        Self {
            stage,
            cause: FailureCause::Provider(why),
        }
    }

    pub fn domain(stage: Stage, why: DomainError) -> Self {
        Self {
            stage,
            cause: FailureCause::Domain(why),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, FailureCause::Provider(ProviderError::Timeout))
    }
}

impl Error for StageFailure {}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.cause)
    }
}

#[derive(Debug)]
pub enum RequestError {
    InvalidInput(String),
    PersistenceUnavailable,
    Stage(StageFailure),
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl Error for RequestError {}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidInput(why) => write!(f, "invalid input: {}", why),
            Self::PersistenceUnavailable => write!(f, "persistence unavailable"),
            Self::Stage(why) => write!(f, "{}", why),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

impl From<StageFailure> for RequestError {
    fn from(value: StageFailure) -> Self {
        Self::Stage(value)
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::Unavailable(_) => Self::PersistenceUnavailable,
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
