use crate::{
    domain::contact::{format_timestamp, parse_reminder},
    prelude::{
        AppError, Contact, ContactManager, ContactPatch, NewContact,
        command::{Cli, Commands},
    },
    storage::create_file_parent,
};
use chrono::{Duration, Utc};
use clap::Parser;
use dotenv::dotenv;
use std::fs;

pub fn run_app() -> Result<(), AppError> {
    // let clap's `env` attributes see values from .env
    dotenv().ok();
    let cli = Cli::parse();

    let config = cli.config()?;
    let manager = ContactManager::from_config(&config)?;
    let user = cli.user.clone().unwrap_or_default();

    log::debug!("storage medium: {}", manager.medium());

    match cli.command {
        Commands::Add {
            name,
            email,
            phone,
            address,
            company,
            notes,
            tags,
            reminder,
            avatar,
        } => {
            let payload = NewContact {
                name,
                email,
                phone,
                address,
                company,
                notes,
                tags,
                reminder: reminder.as_deref().map(parse_reminder).transpose()?,
                avatar,
            };

            let contact = manager.create(&user, payload)?;
            println!("Contact added successfully (id: {})", contact.id);
            Ok(())
        }

        Commands::List { search, sort } => {
            let contacts =
                manager.search(&user, search.as_deref().unwrap_or_default(), sort.into())?;

            if contacts.is_empty() {
                println!("No contact yet");
                return Ok(());
            }

            for (i, c) in contacts.iter().enumerate() {
                println!("{}", listing_format(i + 1, c));
            }
            Ok(())
        }

        Commands::Show { id } => {
            let contact = manager.get(&user, &id)?;
            println!("{}", display_contact(&contact));
            Ok(())
        }

        Commands::Edit {
            id,
            name,
            email,
            phone,
            address,
            company,
            notes,
            tags,
            clear_tags,
            reminder,
            avatar,
        } => {
            let reminder = match reminder.as_deref().map(str::trim) {
                None => None,
                Some("") => Some(None),
                Some(raw) => Some(Some(parse_reminder(raw)?)),
            };

            let patch = ContactPatch {
                name,
                email: email.map(Some),
                phone: phone.map(Some),
                address: address.map(Some),
                company: company.map(Some),
                notes: notes.map(Some),
                tags: if clear_tags || !tags.is_empty() {
                    Some(tags)
                } else {
                    None
                },
                reminder,
                avatar: avatar.map(Some),
            };

            if patch.is_empty() {
                return Err(AppError::Validation("Nothing to update".to_string()));
            }

            manager.update(&user, &id, patch)?;
            println!("Contact updated successfully");
            Ok(())
        }

        Commands::Delete { id } => {
            manager.delete(&user, &id)?;
            println!("Contact deleted successfully");
            Ok(())
        }

        Commands::Import { src } => {
            if !src.exists() {
                return Err(AppError::NotFound("CSV file".to_string()));
            }

            let text = fs::read_to_string(&src)?;
            let summary = manager.import_csv(&user, &text)?;
            println!(
                "Successfully imported {} contacts, skipped {}",
                summary.imported, summary.skipped
            );
            Ok(())
        }

        Commands::Export { des } => {
            let csv = manager.export_csv(&user)?;

            match des {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join("exported.csv")
                    } else {
                        path
                    };
                    create_file_parent(&path)?;
                    fs::write(&path, csv)?;
                    println!("Successfully exported contacts to {}", path.display());
                }
                None => println!("{csv}"),
            }
            Ok(())
        }

        Commands::Reminders { window } => {
            let due = manager.due_reminders(&user, Utc::now(), Duration::seconds(window))?;

            if due.is_empty() {
                println!("No reminders due");
                return Ok(());
            }

            for c in due {
                let at = c.reminder.as_ref().map(format_timestamp).unwrap_or_default();
                println!(
                    "Reminder: {} at {} - {}",
                    c.name,
                    at,
                    c.notes.as_deref().unwrap_or("Follow up with contact")
                );
            }
            Ok(())
        }
    }
}

pub fn listing_format(i: usize, c: &Contact) -> String {
    format!(
        "{i:>3}. {:<20} {:15} {:^30} {:<15}",
        c.name,
        c.phone.as_deref().unwrap_or_default(),
        c.email.as_deref().unwrap_or_default(),
        c.tags.join(";")
    )
}

pub fn display_contact(contact: &Contact) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_default();

    format!(
        "Id: {}\n\
        Name: {}\n\
        Email: {}\n\
        Phone: {}\n\
        Address: {}\n\
        Company: {}\n\
        Notes: {}\n\
        Tags: {}\n\
        Reminder: {}\n\
        Avatar: {}\n\
        Created: {}\n\
        Updated: {}",
        contact.id,
        contact.name,
        field(&contact.email),
        field(&contact.phone),
        field(&contact.address),
        field(&contact.company),
        field(&contact.notes),
        contact.tags.join(", "),
        contact
            .reminder
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default(),
        field(&contact.avatar),
        format_timestamp(&contact.created_at),
        format_timestamp(&contact.updated_at),
    )
}
