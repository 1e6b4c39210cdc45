use super::*;
use crate::domain::contact::{NewContact, parse_reminder};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;

const UNNAMED: &str = "Unnamed";

type Row = HashMap<String, String>;

/// Parses `text` into one create payload per data row, in file order.
///
/// The first non-blank line is the header; column names are trimmed and
/// lowercased. A row whose cells cannot form a payload (an unreadable
/// reminder, say) yields an `Err` for that row only.
pub fn parse_rows(
    text: &str,
    dialect: CsvDialect,
) -> Result<Vec<Result<NewContact, AppError>>, AppError> {
    let rows = match dialect {
        CsvDialect::Legacy => split_legacy(text),
        CsvDialect::Rfc4180 => split_quoted(text)?,
    };

    Ok(rows
        .into_iter()
        .map(|row| row.and_then(|r| row_to_contact(&r)))
        .collect())
}

/// Naive splitting: lines on `\n`, cells on every `,`. Quotes and `\,` are
/// taken literally.
fn split_legacy(text: &str) -> Vec<Result<Row, AppError>> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let Some((header, body)) = lines.split_first() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();

    body.iter()
        .map(|line| {
            let cells: Vec<&str> = line.split(',').map(str::trim).collect();
            Ok(header
                .iter()
                .enumerate()
                .map(|(j, key)| {
                    let value = cells.get(j).copied().unwrap_or_default();
                    (key.clone(), value.to_string())
                })
                .collect())
        })
        .collect()
}

/// Quoted CSV through the `csv` reader. As with the legacy split, blank lines
/// are dropped and the first remaining record is the header.
fn split_quoted(text: &str) -> Result<Vec<Result<Row, AppError>>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut records = reader
        .records()
        .filter(|record| !matches!(record, Ok(r) if is_blank_line(r)));

    let header: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(|h| h.to_lowercase()).collect(),
        None => return Ok(Vec::new()),
    };

    Ok(records
        .map(|record| {
            let record = record.map_err(|e| AppError::Validation(format!("Bad CSV row: {}", e)))?;
            Ok(header
                .iter()
                .enumerate()
                .map(|(j, key)| (key.clone(), record.get(j).unwrap_or_default().to_string()))
                .collect())
        })
        .collect())
}

/// A whitespace-only line reads back as a single empty field.
fn is_blank_line(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

fn row_to_contact(row: &Row) -> Result<NewContact, AppError> {
    let cell = |key: &str| {
        row.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let name = cell("name").unwrap_or_else(|| {
        let full = format!(
            "{} {}",
            cell("first").unwrap_or_default(),
            cell("last").unwrap_or_default()
        );
        match full.trim() {
            "" => UNNAMED.to_string(),
            full => full.to_string(),
        }
    });

    let tags = cell("tags")
        .map(|t| {
            t.split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let reminder = cell("reminder").map(|r| parse_reminder(&r)).transpose()?;

    Ok(NewContact {
        name,
        email: cell("email"),
        phone: cell("phone"),
        address: cell("address"),
        company: cell("company"),
        notes: cell("notes"),
        tags,
        reminder,
        avatar: cell("avatar"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_rows(text: &str, dialect: CsvDialect) -> Vec<NewContact> {
        parse_rows(text, dialect)
            .unwrap()
            .into_iter()
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn header_is_case_insensitive_and_trimmed() {
        let rows = ok_rows(" Name , EMAIL \r\nAnn Lee, ann@x.com\r\n", CsvDialect::Legacy);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ann Lee");
        assert_eq!(rows[0].email.as_deref(), Some("ann@x.com"));
    }

    #[test]
    fn name_falls_back_to_first_last_then_unnamed() {
        let text = "first,last,phone\nAnn,Lee,1\n,Lee,2\n,,3\n";
        let rows = ok_rows(text, CsvDialect::Legacy);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann Lee", "Lee", "Unnamed"]);
    }

    #[test]
    fn tags_split_on_semicolons_and_unknown_columns_ignored() {
        let rows = ok_rows(
            "name,tags,favourite colour\nBob, a ; b;;c ,blue",
            CsvDialect::Legacy,
        );

        assert_eq!(rows[0].tags, vec!["a", "b", "c"]);
        assert_eq!(rows[0].company, None);
    }

    #[test]
    fn blank_input_has_no_rows() {
        for dialect in [CsvDialect::Legacy, CsvDialect::Rfc4180] {
            assert!(parse_rows("", dialect).unwrap().is_empty());
            assert!(parse_rows("\n \r\n", dialect).unwrap().is_empty());
            assert!(parse_rows(" \n\n  \r\n", dialect).unwrap().is_empty());
            assert!(parse_rows("name,email", dialect).unwrap().is_empty());
        }
    }

    #[test]
    fn blank_lines_between_rows_are_dropped() {
        let text = "\n  \nname,email\nA,a@x.com\n   \n\t\r\nB,b@x.com\n";

        for dialect in [CsvDialect::Legacy, CsvDialect::Rfc4180] {
            let names: Vec<String> = ok_rows(text, dialect).into_iter().map(|r| r.name).collect();
            assert_eq!(names, vec!["A", "B"], "{dialect:?}");
        }
    }

    #[test]
    fn legacy_split_does_not_unescape_commas() {
        let rows = ok_rows("name,notes,company\nAnn,met at a\\, b,Acme", CsvDialect::Legacy);

        assert_eq!(rows[0].notes.as_deref(), Some("met at a\\"));
        assert_eq!(rows[0].company.as_deref(), Some("b"));
    }

    #[test]
    fn quoted_dialect_keeps_commas() {
        let rows = ok_rows(
            "name,notes,company\nAnn,\"met at a, b\",Acme",
            CsvDialect::Rfc4180,
        );

        assert_eq!(rows[0].notes.as_deref(), Some("met at a, b"));
        assert_eq!(rows[0].company.as_deref(), Some("Acme"));
    }

    #[test]
    fn bad_reminder_fails_only_its_row() {
        let rows = parse_rows(
            "name,reminder\nAnn,2025-03-01\nBob,someday\nCara,",
            CsvDialect::Legacy,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows[0].as_ref().unwrap().reminder.is_some());
        assert!(matches!(rows[1], Err(AppError::Validation(_))));
        assert!(rows[2].as_ref().unwrap().reminder.is_none());
    }
}
