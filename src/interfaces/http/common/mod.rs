//! Shared HTTP building blocks: response envelope, error mapping,
//! validated JSON extractor and caller session context.

mod error;
mod response;
mod session;
mod validated_json;

pub use error::ApiError;
pub use response::ApiResponse;
pub use session::{SessionContext, USER_ID_HEADER};
pub use validated_json::{ValidatedJson, ValidatedJsonRejection};
