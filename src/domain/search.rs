use super::contact::Contact;
use super::*;
use chrono::Duration;
use std::cmp::Ordering;

/// Window used by the reminder poller: anything due within it, past or future.
pub const DEFAULT_REMINDER_WINDOW_SECS: i64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Newest `created_at` first.
    Recent,
}

impl SortMode {
    pub fn from(str: &str) -> Result<Self, AppError> {
        match str.to_lowercase().as_str() {
            "name" | "alpha" => Ok(SortMode::Name),
            "recent" | "created" => Ok(SortMode::Recent),
            _ => Err(AppError::Validation(format!(
                "Not a recognized sort mode: '{}'",
                str
            ))),
        }
    }
}

/// Case-insensitive substring match over name, email, company and tags;
/// plain substring match over phone. An empty term keeps everything.
pub fn filter_contacts<'a>(contacts: &'a [Contact], term: &str) -> Vec<&'a Contact> {
    let term = term.trim();
    if term.is_empty() {
        return contacts.iter().collect();
    }
    let needle = term.to_lowercase();

    contacts
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || c.email
                    .as_deref()
                    .is_some_and(|e| e.to_lowercase().contains(&needle))
                || c.phone.as_deref().is_some_and(|p| p.contains(term))
                || c.company
                    .as_deref()
                    .is_some_and(|co| co.to_lowercase().contains(&needle))
                || c.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn sort_contacts(contacts: &mut [&Contact], mode: SortMode) {
    match mode {
        SortMode::Name => contacts.sort_by(|a, b| compare_names(&a.name, &b.name)),
        // stable sort keeps stored order among equal timestamps
        SortMode::Recent => contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Locale-insensitive stand-in for collation: compare Unicode lowercase
/// forms, falling back to the raw strings so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Contacts whose reminder lies strictly within `window` of `now`.
pub fn due_reminders<'a>(
    contacts: &'a [Contact],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|c| {
            c.reminder
                .is_some_and(|at| (at - now).abs() < window)
        })
        .collect()
}
