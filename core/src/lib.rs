pub mod controller;
pub mod error;
pub mod models;
pub mod presenter;
pub mod remote;
pub mod validation;

pub use error::{Error, RequestError, Result, ValidationError};
