//! Shared response envelope types for API handlers.
//!
//! Admin API responses use a `{ "data": ... }` envelope. The public
//! submission surface keeps its own flat shapes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
