//! Availability policy for stored pastes.
//!
//! The policy is a pure function of the paste and the current instant. The
//! service checks it before counting a view, so a paste that already reached
//! its limit is never served or incremented again.

use crate::paste::Paste;
use jiff::Timestamp;
use std::fmt::Display;

/// Why a paste can no longer be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailability {
    /// `now` reached the paste's expiration instant.
    Expired,
    /// The view counter reached the paste's view limit.
    ViewsExhausted,
}

impl Display for Unavailability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unavailability::Expired => f.write_str("expired"),
            Unavailability::ViewsExhausted => f.write_str("views exhausted"),
        }
    }
}

/// Returns the reason `paste` is unavailable at `now`, if any.
///
/// Time-based expiry is reported ahead of the view limit when both apply.
pub fn check(paste: &Paste, now: Timestamp) -> Option<Unavailability> {
    if paste.expires_at.is_some_and(|expires_at| now >= expires_at) {
        return Some(Unavailability::Expired);
    }

    if paste
        .max_views
        .is_some_and(|max_views| paste.view_count >= max_views)
    {
        return Some(Unavailability::ViewsExhausted);
    }

    None
}

/// Whether `paste` may still be served at `now`.
pub fn is_available(paste: &Paste, now: Timestamp) -> bool {
    check(paste, now).is_none()
}

/// Views left before the limit is reached, or `None` when unbounded.
pub fn remaining_views(paste: &Paste) -> Option<u32> {
    paste
        .max_views
        .map(|max_views| max_views.saturating_sub(paste.view_count))
}
