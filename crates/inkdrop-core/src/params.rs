use crate::error::{FieldViolation, ValidationError};
use crate::paste::{NewPaste, PasteId};
use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;

/// Upper bound on `ttl_seconds`, roughly one hundred years.
pub const MAX_TTL_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Raw parameters for creating a paste, as received from a client.
///
/// Numbers are kept signed so that zero and negative values reach
/// [`CreatePasteParams::validate`] and are reported as field violations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePasteParams {
    pub content: String,
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
    #[serde(default)]
    pub max_views: Option<i64>,
}

/// Parameters that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    pub content: String,
    pub ttl: Option<SignedDuration>,
    pub max_views: Option<u32>,
}

impl CreatePasteParams {
    /// Checks every field and collects all violations.
    ///
    /// Content must contain something other than whitespace and fit in
    /// `max_content_bytes`. `ttl_seconds` and `max_views`, when present, must
    /// be positive integers.
    pub fn validate(self, max_content_bytes: usize) -> Result<ValidatedParams, ValidationError> {
        let mut violations = Vec::new();

        if self.content.trim().is_empty() {
            violations.push(FieldViolation::new("content", "must not be empty"));
        } else if self.content.len() > max_content_bytes {
            violations.push(FieldViolation::new(
                "content",
                format!(
                    "must be at most {} bytes, got {}",
                    max_content_bytes,
                    self.content.len()
                ),
            ));
        }

        let ttl = match self.ttl_seconds {
            None => None,
            Some(secs) if secs <= 0 => {
                violations.push(FieldViolation::new(
                    "ttl_seconds",
                    "must be a positive integer",
                ));
                None
            }
            Some(secs) if secs > MAX_TTL_SECONDS => {
                violations.push(FieldViolation::new(
                    "ttl_seconds",
                    format!("must be at most {}", MAX_TTL_SECONDS),
                ));
                None
            }
            Some(secs) => Some(SignedDuration::from_secs(secs)),
        };

        let max_views = match self.max_views {
            None => None,
            Some(views) if views <= 0 => {
                violations.push(FieldViolation::new(
                    "max_views",
                    "must be a positive integer",
                ));
                None
            }
            Some(views) => match u32::try_from(views) {
                Ok(views) => Some(views),
                Err(_) => {
                    violations.push(FieldViolation::new(
                        "max_views",
                        format!("must be at most {}", u32::MAX),
                    ));
                    None
                }
            },
        };

        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        Ok(ValidatedParams {
            content: self.content,
            ttl,
            max_views,
        })
    }
}

impl ValidatedParams {
    /// Stamps the paste with its id and creation time. The expiration instant
    /// is `now + ttl`.
    pub fn into_new_paste(self, id: PasteId, now: Timestamp) -> Result<NewPaste, ValidationError> {
        let expires_at = self
            .ttl
            .map(|ttl| {
                now.checked_add(ttl).map_err(|e| {
                    ValidationError::single("ttl_seconds", format!("out of range: {e}"))
                })
            })
            .transpose()?;

        Ok(NewPaste {
            id,
            content: self.content,
            created_at: now,
            expires_at,
            max_views: self.max_views,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        content: &str,
        ttl_seconds: Option<i64>,
        max_views: Option<i64>,
    ) -> CreatePasteParams {
        CreatePasteParams {
            content: content.to_string(),
            ttl_seconds,
            max_views,
        }
    }

    #[test]
    fn accepts_minimal_input() {
        let validated = params("hello", None, None).validate(1024).unwrap();
        assert_eq!(validated.content, "hello");
        assert_eq!(validated.ttl, None);
        assert_eq!(validated.max_views, None);
    }

    #[test]
    fn accepts_ttl_and_views() {
        let validated = params("hello", Some(10), Some(2)).validate(1024).unwrap();
        assert_eq!(validated.ttl, Some(SignedDuration::from_secs(10)));
        assert_eq!(validated.max_views, Some(2));
    }

    #[test]
    fn rejects_blank_content() {
        let err = params("   \n", None, None).validate(1024).unwrap_err();
        assert_eq!(err.violations()[0].field, "content");
    }

    #[test]
    fn rejects_oversized_content() {
        let err = params("abcdef", None, None).validate(3).unwrap_err();
        assert_eq!(err.violations()[0].field, "content");
    }

    #[test]
    fn collects_all_violations() {
        let err = params("", Some(0), Some(-1)).validate(1024).unwrap_err();
        let fields: Vec<_> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["content", "ttl_seconds", "max_views"]);
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let err = params("x", Some(MAX_TTL_SECONDS + 1), Some(i64::from(u32::MAX) + 1))
            .validate(1024)
            .unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn expiration_is_creation_plus_ttl() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let paste = params("hello", Some(10), None)
            .validate(1024)
            .unwrap()
            .into_new_paste(PasteId::new_unchecked("abc"), now)
            .unwrap();

        assert_eq!(paste.created_at, now);
        assert_eq!(paste.expires_at, Some(now + SignedDuration::from_secs(10)));
    }

    #[test]
    fn deserializes_null_as_absent() {
        let raw: CreatePasteParams =
            serde_json::from_str(r#"{"content":"hi","ttl_seconds":null}"#).unwrap();
        assert_eq!(raw.ttl_seconds, None);
        assert_eq!(raw.max_views, None);
    }
}
