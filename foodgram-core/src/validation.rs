//! Field rules shared by signup, recipe and tag payloads.
//!
//! Every check appends to a [`FieldErrors`] so a handler can report all
//! problems of a request at once.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::FieldErrors;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_PERSON_NAME_LEN: usize = 150;
pub const MAX_RECIPE_NAME_LEN: usize = 256;
pub const MAX_TAG_LEN: usize = 32;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MIN_AMOUNT: i32 = 1;

/// Usernames that would shadow fixed routes such as `/api/users/me/`.
const RESERVED_USERNAMES: &[&str] = &["me"];

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid slug regex"));

/// Non-blank text no longer than `max` characters.
pub fn required_text(errors: &mut FieldErrors, field: &str, value: &str, max: Option<usize>) {
    if value.trim().is_empty() {
        errors.add(field, "This field may not be blank.");
        return;
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", max),
            );
        }
    }
}

pub fn username(errors: &mut FieldErrors, value: &str) {
    required_text(errors, "username", value, Some(MAX_USERNAME_LEN));
    if errors.contains("username") {
        return;
    }
    if RESERVED_USERNAMES.contains(&value.to_lowercase().as_str()) {
        errors.add("username", format!("Username '{}' is not allowed.", value));
    }
    if !USERNAME_RE.is_match(value) {
        errors.add(
            "username",
            "Username may contain only letters, digits and @/./+/-/_ characters.",
        );
    }
}

pub fn email(errors: &mut FieldErrors, value: &str) {
    required_text(errors, "email", value, Some(MAX_EMAIL_LEN));
    if !errors.contains("email") && !EMAIL_RE.is_match(value) {
        errors.add("email", "Enter a valid email address.");
    }
}

pub fn slug(errors: &mut FieldErrors, value: &str) {
    required_text(errors, "slug", value, Some(MAX_TAG_LEN));
    if !errors.contains("slug") && !SLUG_RE.is_match(value) {
        errors.add(
            "slug",
            "Slug may contain only latin letters, digits, hyphens and underscores.",
        );
    }
}

pub fn password(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.add(field, "This field may not be blank.");
    }
}

pub fn min_value(errors: &mut FieldErrors, field: &str, value: i32, min: i32) {
    if value < min {
        errors.add(
            field,
            format!("Ensure this value is greater than or equal to {}.", min),
        );
    }
}

/// Non-empty list without repeated entries.
pub fn unique_non_empty<T: Eq + Hash>(errors: &mut FieldErrors, field: &str, values: &[T]) {
    if values.is_empty() {
        errors.add(field, "At least one entry is required.");
        return;
    }
    let mut seen = HashSet::with_capacity(values.len());
    if !values.iter().all(|v| seen.insert(v)) {
        errors.add(field, "Entries must not repeat.");
    }
}

/// Lowercase the domain part of an email address.
pub fn normalize_email(value: &str) -> String {
    let value = value.trim();
    match value.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => value.to_string(),
    }
}
