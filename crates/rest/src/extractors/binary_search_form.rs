//! Binary search form extractor.
//!
//! Rules arrive either as an uploaded `file` in a `multipart/form-data`
//! body or as the `textarea` field of a form-encoded or multipart body.

use axum::{
    Form,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::RestError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UrlEncodedForm {
    textarea: String,
    firmware_uid: String,
}

/// Body of a binary search submission.
#[derive(Debug, Clone, Default)]
pub struct BinarySearchForm {
    /// YARA rules typed into the text area.
    pub textarea: String,
    /// Contents of the uploaded rules file, when one was selected.
    pub file: Option<Vec<u8>>,
    /// Restricts the search to one firmware image.
    pub firmware_uid: String,
}

impl BinarySearchForm {
    /// Returns the rules to search with.
    ///
    /// An uploaded file takes precedence over the text area; `None` when
    /// neither carries anything.
    pub fn rules(self) -> Option<Vec<u8>> {
        self.file
            .filter(|file| !file.is_empty())
            .or_else(|| Some(self.textarea.into_bytes()).filter(|text| !text.is_empty()))
    }

    /// Returns the firmware restriction, if one was given.
    pub fn firmware_uid(&self) -> Option<String> {
        Some(self.firmware_uid.clone()).filter(|uid| !uid.is_empty())
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, RestError> {
        let invalid = |e: axum::extract::multipart::MultipartError| RestError::BadRequest {
            message: format!("Invalid multipart body: {}", e.body_text()),
        };

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(invalid)? {
            match field.name() {
                Some("file") => {
                    // Browsers send an empty, unnamed part when no file was picked.
                    if field.file_name().is_some_and(|name| !name.is_empty()) {
                        form.file = Some(field.bytes().await.map_err(invalid)?.to_vec());
                    }
                }
                Some("textarea") => form.textarea = field.text().await.map_err(invalid)?,
                Some("firmware_uid") => form.firmware_uid = field.text().await.map_err(invalid)?,
                _ => {}
            }
        }
        Ok(form)
    }
}

impl<S> FromRequest<S> for BinarySearchForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Self::from_multipart(multipart)
                .await
                .map_err(IntoResponse::into_response);
        }

        let Form(form) = Form::<UrlEncodedForm>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self {
            textarea: form.textarea,
            file: None,
            firmware_uid: form.firmware_uid,
        })
    }
}
