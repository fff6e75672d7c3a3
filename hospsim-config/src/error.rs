use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

/// Errors surfaced by configuration operations and the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A form-level rule was broken. The message is shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    #[error("预设模板不能删除")]
    PresetTemplate { id: String },

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Excel文件格式不正确: {0}")]
    Spreadsheet(#[from] csv::Error),

    #[error("Excel文件格式不正确: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("failed to write workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("storage error for `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("application state lock poisoned")]
    Poisoned,
}

impl ConfigError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { what, id: id.into() }
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

impl ResponseError for ConfigError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::PresetTemplate { .. } => StatusCode::CONFLICT,
            Self::Spreadsheet(_) | Self::Workbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage { .. }
            | Self::Encode { .. }
            | Self::WorkbookWrite(_)
            | Self::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}
