// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{GeoPoint, NewComplaint};

/// Longest accepted complaint title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Validates the citizen-supplied fields of a complaint before filing.
///
/// This does NOT check that the citizen or department exist; that requires
/// the stores.
///
/// # Errors
///
/// Returns an error if:
/// - The title is blank or longer than [`MAX_TITLE_LENGTH`]
/// - The description is blank
/// - The image URL is present but not an `http(s)` URL
/// - The location is outside valid longitude/latitude ranges
pub fn validate_new_complaint(complaint: &NewComplaint) -> Result<(), DomainError> {
    let title: &str = complaint.title.trim();
    if title.is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(DomainError::InvalidTitle(format!(
            "Title cannot exceed {MAX_TITLE_LENGTH} characters"
        )));
    }

    if complaint.description.trim().is_empty() {
        return Err(DomainError::InvalidDescription(String::from(
            "Description cannot be empty",
        )));
    }

    if let Some(url) = &complaint.image_url
        && !(url.starts_with("https://") || url.starts_with("http://"))
    {
        return Err(DomainError::InvalidImageUrl(url.clone()));
    }

    if let Some(location) = complaint.location {
        validate_location(location)?;
    }

    Ok(())
}

/// Validates that a point lies within geographic bounds.
///
/// # Errors
///
/// Returns `DomainError::InvalidLocation` if either coordinate is out of
/// range or not finite.
pub fn validate_location(location: GeoPoint) -> Result<(), DomainError> {
    let GeoPoint {
        longitude,
        latitude,
    } = location;

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DomainError::InvalidLocation(format!(
            "longitude {longitude} must be between -180 and 180"
        )));
    }
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DomainError::InvalidLocation(format!(
            "latitude {latitude} must be between -90 and 90"
        )));
    }
    Ok(())
}
