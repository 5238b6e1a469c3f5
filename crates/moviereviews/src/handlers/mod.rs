pub mod cast;
pub mod error;
pub mod health;
pub mod movies;
pub mod reviews;

use serde::Serialize;

pub use error::AppError;

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
