use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Authentication required. Run `maskedemail auth <token>` or pass --token.")]
    NotAuthenticated,

    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    #[error("No account specified and no default account for masked email")]
    NoAccount,

    #[error("Malformed JMAP response: {0}")]
    MalformedResponse(String),

    #[error("Could not decode `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("No items returned")]
    NoItemsReturned,

    #[error("Masked email {0} not found")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JMAP error: {method} failed - {error_type}: {description}")]
    Jmap {
        method: String,
        error_type: String,
        description: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Request rejected ({status}) - {problem_type}: {detail}")]
    Rejected {
        status: u16,
        problem_type: String,
        detail: String,
    },
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Error::Decode {
            path,
            message: err.into_inner().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
