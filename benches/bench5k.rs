use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::Utc;
use rusty_contacts::prelude::{
    Contact, ContactManager, CsvDialect, MemoryStorage, NewContact, SortMode, contact,
};

const OWNER: &str = "bench-user";

// Manager over an in-memory store prepopulated with `n` contacts, so the
// measurements exclude disk I/O.
fn make_manager_with_n(n: usize) -> ContactManager {
    let created_at = Utc::now();
    let contacts: Vec<Contact> = (0..n)
        .map(|i| {
            NewContact::new(format!("User{i}"))
                .with_phone(format!("0888549{i:04}"))
                .with_email(format!("user{i}@yahoo.com"))
                .with_tags([if i % 2 == 0 { "friends" } else { "work" }])
                .into_contact(contact::generate_id(), created_at)
        })
        .collect();

    ContactManager::new(Box::new(MemoryStorage::with_contacts(OWNER, contacts)))
}

// One duplicate-checked create against 5k existing contacts.
fn bench_add(c: &mut Criterion) {
    c.bench_function("Adding to 5k contacts (duplicate check + insert)", |b| {
        b.iter_batched(
            || make_manager_with_n(5_000),
            |manager| {
                let created = manager.create(
                    OWNER,
                    NewContact::new("Zoe")
                        .with_phone("08885499529")
                        .with_email("bryanwelch@gmail.com"),
                );
                black_box(created.is_ok());
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_search(c: &mut Criterion) {
    c.bench_function("Searching 5k contacts (filter + sort by name)", |b| {
        let manager = make_manager_with_n(5_000);
        b.iter(|| {
            let found = manager
                .search(OWNER, black_box("friends"), SortMode::Name)
                .map(|c| c.len());
            black_box(found.ok());
        });
    });
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exporting 5k contacts");
    for dialect in [CsvDialect::Legacy, CsvDialect::Rfc4180] {
        let manager = make_manager_with_n(5_000).with_dialect(dialect);
        group.bench_function(format!("{dialect:?}"), |b| {
            b.iter(|| black_box(manager.export_csv(OWNER).map(|csv| csv.len()).ok()));
        });
    }
    group.finish();
}

fn bench_import(c: &mut Criterion) {
    let csv = make_manager_with_n(5_000)
        .export_csv(OWNER)
        .unwrap_or_default();

    c.bench_function("Importing 5k contacts into an empty store", |b| {
        b.iter_batched(
            || ContactManager::new(Box::new(MemoryStorage::new())),
            |manager| black_box(manager.import_csv(OWNER, &csv).ok()),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_add, bench_search, bench_export, bench_import);
criterion_main!(benches);
