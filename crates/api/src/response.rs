//! The `{ "data": ... }` response envelope.
//!
//! Every JSON success body is wrapped in [`DataResponse`] so clients can
//! tell payloads apart from `{ "error": ..., "code": ... }` failures.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
