//! Builds a [`ConversionRequest`] from an incoming HTTP request

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form,
};
use std::collections::HashMap;

use super::routes::AppError;
use crate::convert::{ContentKind, ConversionRequest, ConvertError};

impl<S> FromRequest<S> for ConversionRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_kind = ContentKind::classify(
            req.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        match content_kind {
            ContentKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| unreadable(e.status(), e.body_text()))?;
                read_multipart(multipart).await
            }
            ContentKind::UrlEncoded => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| unreadable(e.status(), e.body_text()))?;
                Ok(ConversionRequest::with_form(
                    content_kind,
                    HashMap::new(),
                    fields,
                ))
            }
            _ => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| unreadable(e.status(), e.body_text()))?;
                Ok(ConversionRequest::with_body(content_kind, body.to_vec()))
            }
        }
    }
}

/// Split multipart parts into uploads (parts with a filename) and text fields
async fn read_multipart(mut multipart: Multipart) -> Result<ConversionRequest, AppError> {
    let mut files = HashMap::new();
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| unreadable(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if field.file_name().is_some() {
            let data = field
                .bytes()
                .await
                .map_err(|e| unreadable(e.status(), e.body_text()))?;
            files.entry(name).or_insert_with(|| data.to_vec());
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| unreadable(e.status(), e.body_text()))?;
            fields.entry(name).or_insert(text);
        }
    }

    Ok(ConversionRequest::with_form(
        ContentKind::Multipart,
        files,
        fields,
    ))
}

fn unreadable(status: StatusCode, message: String) -> AppError {
    AppError::from_rejection(status, message, |message| {
        ConvertError::BodyUnreadable(message).into()
    })
}
