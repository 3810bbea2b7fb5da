pub use crate::core::app::App;
pub use crate::error::{Error, TsResult};
pub use crate::types::{
	AliasId, Audit, Deletable, LanguageId, ModuleId, PageId, PageModuleId, SiteId, Timestamp,
	TnId, UserId,
};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
