//! Extractores de la aplicación
//!
//! Envuelven `Json`, `Query` y `Path` de axum para que un cuerpo, una query o
//! un parámetro de ruta mal formado responda 400 con el JSON de `AppError`
//! en lugar del 422 en texto plano de axum.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts},
};
use serde::de::DeserializeOwned;

use crate::utils::errors::{body_validation_error, AppError, AppResult};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Cuerpo JSON opcional: vacío equivale a `T::default()`, mal formado es un error
pub fn optional_json_body<T>(body: &Bytes) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| body_validation_error("body", e.to_string()))
}
