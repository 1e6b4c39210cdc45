use super::*;
use crate::domain::contact::{Contact, format_timestamp};
use crate::errors::StorageError;
use csv::{Terminator, WriterBuilder};

pub const EXPORT_HEADER: [&str; 11] = [
    "name",
    "email",
    "phone",
    "address",
    "company",
    "notes",
    "tags",
    "reminder",
    "avatar",
    "createdAt",
    "updatedAt",
];

/// Renders `contacts` as CSV text with the fixed `EXPORT_HEADER` columns.
/// Rows are `\n`-separated with no trailing newline.
pub fn export_contacts(contacts: &[Contact], dialect: CsvDialect) -> Result<String, AppError> {
    match dialect {
        CsvDialect::Legacy => Ok(export_legacy(contacts)),
        CsvDialect::Rfc4180 => export_quoted(contacts),
    }
}

fn export_legacy(contacts: &[Contact]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(EXPORT_HEADER.join(","));

    for contact in contacts {
        let cells: Vec<String> = field_values(contact)
            .iter()
            .map(|v| v.replace(',', "\\,"))
            .collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn export_quoted(contacts: &[Contact]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for contact in contacts {
        writer.write_record(field_values(contact))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Storage(StorageError::Io(e.into_error())))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| AppError::Validation(format!("Exported CSV is not UTF-8: {}", e)))?;

    Ok(text.trim_end_matches('\n').to_string())
}

/// Cell values in `EXPORT_HEADER` order, newlines already collapsed.
fn field_values(contact: &Contact) -> [String; 11] {
    let text = |value: &Option<String>| collapse_newlines(value.as_deref().unwrap_or_default());

    [
        collapse_newlines(&contact.name),
        text(&contact.email),
        text(&contact.phone),
        text(&contact.address),
        text(&contact.company),
        text(&contact.notes),
        collapse_newlines(&contact.tags.join(";")),
        contact
            .reminder
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        text(&contact.avatar),
        format_timestamp(&contact.created_at),
        format_timestamp(&contact.updated_at),
    ]
}

fn collapse_newlines(value: &str) -> String {
    value.replace("\r\n", " ").replace('\n', " ")
}
