use actix_web::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Runtime(String),

    #[error("{0}")]
    IllegalArgument(String),

    #[error("{0}")]
    User(String),

    /// Always answered with 400 and the `error.bad` reason code.
    #[error("Bad request")]
    BadRequest,

    #[error("{reason}")]
    ResponseStatus {
        status: StatusCode,
        reason: String,
        #[source]
        cause: Option<Box<AppError>>,
    },

    #[error("Failed to convert '{value}' for parameter '{name}' to {target}")]
    TypeMismatch {
        name: String,
        value: String,
        target: &'static str,
    },

    #[error("Required parameter '{0}' is not present")]
    MissingParameter(String),

    #[error("Malformed request body: {0}")]
    MessageNotReadable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing a response body failed. Malformed request bodies are
    /// `MessageNotReadable` instead.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Internal server error")]
    Internal(String),
}

/// Closed hierarchy of failure kinds used by exception handlers and error
/// pages to match a failure against its nearest registered ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Exception,
    Runtime,
    IllegalArgument,
    User,
    BadRequest,
    ResponseStatus,
    TypeMismatch,
    MessageNotReadable,
    MissingParameter,
    Io,
    Config,
    Internal,
}

impl FailureKind {
    pub const ALL: [FailureKind; 12] = [
        FailureKind::Exception,
        FailureKind::Runtime,
        FailureKind::IllegalArgument,
        FailureKind::User,
        FailureKind::BadRequest,
        FailureKind::ResponseStatus,
        FailureKind::TypeMismatch,
        FailureKind::MessageNotReadable,
        FailureKind::MissingParameter,
        FailureKind::Io,
        FailureKind::Config,
        FailureKind::Internal,
    ];

    /// Case-insensitive lookup by [`FailureKind::name`].
    pub fn from_name(name: &str) -> Option<FailureKind> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn parent(self) -> Option<FailureKind> {
        use FailureKind::*;

        match self {
            Exception => None,
            Runtime | MissingParameter | Io | Config | Internal => Some(Exception),
            IllegalArgument | User | BadRequest | ResponseStatus | TypeMismatch
            | MessageNotReadable => Some(Runtime),
        }
    }

    /// `self` followed by every ancestor, most specific first.
    pub fn lineage(self) -> impl Iterator<Item = FailureKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Distance from `self` up to `ancestor`, if `ancestor` is in the lineage.
    pub fn depth_to(self, ancestor: FailureKind) -> Option<usize> {
        self.lineage().position(|kind| kind == ancestor)
    }

    pub fn name(self) -> &'static str {
        use FailureKind::*;

        match self {
            Exception => "Exception",
            Runtime => "RuntimeException",
            IllegalArgument => "IllegalArgumentException",
            User => "UserException",
            BadRequest => "BadRequestException",
            ResponseStatus => "ResponseStatusException",
            TypeMismatch => "TypeMismatchException",
            MessageNotReadable => "MessageNotReadableException",
            MissingParameter => "MissingParameterException",
            Io => "IoException",
            Config => "ConfigException",
            Internal => "InternalException",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input, answered with a 4xx by the default resolver.
    ClientInput,
    /// Raised with an explicit target status.
    Application,
    /// Anything else. Ends as a 500 with a generic message.
    Unclassified,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::Runtime(_) => FailureKind::Runtime,
            AppError::IllegalArgument(_) => FailureKind::IllegalArgument,
            AppError::User(_) => FailureKind::User,
            AppError::BadRequest => FailureKind::BadRequest,
            AppError::ResponseStatus { .. } => FailureKind::ResponseStatus,
            AppError::TypeMismatch { .. } => FailureKind::TypeMismatch,
            AppError::MissingParameter(_) => FailureKind::MissingParameter,
            AppError::MessageNotReadable(_) => FailureKind::MessageNotReadable,
            AppError::Io(_) => FailureKind::Io,
            AppError::Config(_) => FailureKind::Config,
            AppError::Serialization(_) | AppError::PasswordHash(_) | AppError::Internal(_) => {
                FailureKind::Internal
            }
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::TypeMismatch { .. }
            | AppError::MissingParameter(_)
            | AppError::MessageNotReadable(_) => ErrorCategory::ClientInput,
            AppError::BadRequest | AppError::ResponseStatus { .. } => ErrorCategory::Application,
            _ => ErrorCategory::Unclassified,
        }
    }

    /// Explicit status and reason code carried by application errors.
    pub fn response_status(&self) -> Option<(StatusCode, &str)> {
        match self {
            AppError::BadRequest => Some((StatusCode::BAD_REQUEST, "error.bad")),
            AppError::ResponseStatus { status, reason, .. } => Some((*status, reason.as_str())),
            _ => None,
        }
    }

    pub fn response_status_with(
        status: StatusCode,
        reason: impl Into<String>,
        cause: Option<AppError>,
    ) -> Self {
        AppError::ResponseStatus {
            status,
            reason: reason.into(),
            cause: cause.map(Box::new),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
