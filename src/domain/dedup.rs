//! Duplicate-key detection over a user's contact set.
//!
//! Two contacts collide when they share a non-empty email (compared
//! case-insensitively) or when both carry a name and a phone and the names
//! match case-insensitively while the phones match exactly.

use super::contact::{Contact, normalize_email};

/// The fields that take part in duplicate detection.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateKey<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateReason {
    Email,
    NamePhone,
}

impl<'a> DuplicateKey<'a> {
    pub fn of(contact: &'a Contact) -> Self {
        Self {
            name: &contact.name,
            email: contact.email.as_deref(),
            phone: contact.phone.as_deref(),
        }
    }

    /// Why `self` collides with `other`, if it does.
    pub fn conflicts_with(&self, other: &Contact) -> Option<DuplicateReason> {
        if let (Some(mine), Some(theirs)) = (non_empty(self.email), non_empty(other.email.as_deref()))
            && normalize_email(mine) == normalize_email(theirs)
        {
            return Some(DuplicateReason::Email);
        }

        let name = self.name.trim();
        if let (Some(mine), Some(theirs)) = (non_empty(self.phone), non_empty(other.phone.as_deref()))
            && !name.is_empty()
            && mine == theirs
            && name.to_lowercase() == other.name.trim().to_lowercase()
        {
            return Some(DuplicateReason::NamePhone);
        }

        None
    }
}

impl DuplicateReason {
    pub fn message(&self) -> &'static str {
        match self {
            DuplicateReason::Email => "A contact with the same email already exists",
            DuplicateReason::NamePhone => "A contact with the same name and phone already exists",
        }
    }
}

/// First contact in `existing` that collides with `key`, skipping the contact
/// whose id is `exclude` (the one being updated).
pub fn find_duplicate<'c>(
    key: &DuplicateKey<'_>,
    existing: &'c [Contact],
    exclude: Option<&str>,
) -> Option<(&'c Contact, DuplicateReason)> {
    existing
        .iter()
        .filter(|c| exclude != Some(c.id.as_str()))
        .find_map(|c| key.conflicts_with(c).map(|reason| (c, reason)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::NewContact;
    use chrono::Utc;

    fn contact(id: &str, payload: NewContact) -> Contact {
        payload.normalized().unwrap().into_contact(id.to_string(), Utc::now())
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let existing = vec![contact("1", NewContact::new("Bob").with_email("bob@x.com"))];
        let key = DuplicateKey {
            name: "Bob2",
            email: Some("Bob@X.com"),
            phone: None,
        };

        let (found, reason) = find_duplicate(&key, &existing, None).unwrap();
        assert_eq!(found.id, "1");
        assert_eq!(reason, DuplicateReason::Email);
    }

    #[test]
    fn name_and_phone_must_both_match() {
        let existing = vec![contact("1", NewContact::new("Alice").with_phone("08031234567"))];

        let same = DuplicateKey {
            name: "ALICE",
            email: None,
            phone: Some("08031234567"),
        };
        assert_eq!(
            find_duplicate(&same, &existing, None).map(|(_, r)| r),
            Some(DuplicateReason::NamePhone)
        );

        let other_phone = DuplicateKey {
            phone: Some("+2348031234567"),
            ..same
        };
        assert!(find_duplicate(&other_phone, &existing, None).is_none());

        let no_phone = DuplicateKey { phone: None, ..same };
        assert!(find_duplicate(&no_phone, &existing, None).is_none());
    }

    #[test]
    fn empty_emails_never_collide() {
        let existing = vec![contact("1", NewContact::new("A"))];
        let key = DuplicateKey {
            name: "B",
            email: Some(""),
            phone: None,
        };
        assert!(find_duplicate(&key, &existing, None).is_none());
    }

    #[test]
    fn excluded_contact_is_skipped() {
        let existing = vec![contact("1", NewContact::new("Bob").with_email("bob@x.com"))];
        let key = DuplicateKey::of(&existing[0]);

        assert!(find_duplicate(&key, &existing, Some("1")).is_none());
        assert!(find_duplicate(&key, &existing, Some("2")).is_some());
    }
}
