use axum::{http::StatusCode, response::IntoResponse};

pub type TsResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Alias, site or page absent
	NotFound,
	/// Caller lacks the required permission, or cross-tenant access attempt
	PermissionDenied,
	/// Malformed input (unparsable id, invalid field)
	Invalid(Box<str>),
	/// Concurrent structural change detected during aggregation
	Conflict,
	DbError,

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::Invalid(msg) => write!(f, "invalid: {}", msg),
			Error::Conflict => write!(f, "conflict"),
			Error::DbError => write!(f, "database error"),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "not found").into_response(),
			Error::PermissionDenied => (StatusCode::FORBIDDEN, "forbidden").into_response(),
			Error::Invalid(msg) => (StatusCode::BAD_REQUEST, msg.into_string()).into_response(),
			Error::Conflict => (StatusCode::CONFLICT, "conflict").into_response(),
			_ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
		}
	}
}


// vim: ts=4
