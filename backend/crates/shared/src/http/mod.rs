//! HTTP glue shared by every bounded context
//!
//! - [`error`] - the error middleware, sole translator of [`AppError`] into the
//!   `{message, details}` envelope
//! - [`guard`] - the admin guard and the [`guard::CurrentUser`] extractor
//! - [`extract`] - JSON/query/path extractors whose rejections are `NotValid`
//!
//! [`AppError`]: crate::error::app_error::AppError

pub mod error;
pub mod extract;
pub mod guard;

pub use error::{ErrorBody, ErrorDetails, render_errors};
pub use extract::{AppJson, AppPath, AppQuery};
pub use guard::{CurrentUser, require_admin};
