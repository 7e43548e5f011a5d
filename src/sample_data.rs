//! A small Danish catalog for trying out the service.

use rusqlite::Connection;

use crate::{
    Error,
    category::{CategoryName, create_category},
    item::{Item, ItemName, create_item},
};

/// Categories with their descriptions, each followed by its items and their notes.
const SAMPLE_CATALOG: &[(&str, &str, &[(&str, Option<&str>)])] = &[
    (
        "Mejeriprodukter",
        "Mælk, ost, yoghurt osv.",
        &[
            ("Mælk", Some("Letmælk 1,5%")),
            ("Ost", Some("Almindelig skiveost")),
            ("Yoghurt", Some("Naturel yoghurt")),
            ("Smør", None),
        ],
    ),
    (
        "Kød og Fisk",
        "Kød, fisk og fjerkræ",
        &[
            ("Hakket oksekød", Some("500g 8-12%")),
            ("Kyllingebryst", None),
            ("Laks", Some("Frisk laks")),
        ],
    ),
    (
        "Frugt og Grønt",
        "Friske frugter og grøntsager",
        &[
            ("Bananer", None),
            ("Æbler", Some("Gala eller Granny Smith")),
            ("Kartofler", Some("Festkartofler")),
            ("Løg", None),
            ("Tomater", None),
        ],
    ),
    (
        "Brød og Korn",
        "Brød, pasta, ris osv.",
        &[
            ("Rugbrød", Some("Hjemmebagt eller Kohberg")),
            ("Pasta", Some("Spaghetti eller penne")),
            ("Ris", Some("Jasminris")),
        ],
    ),
    (
        "Rengøringsmidler",
        "Sæbe, vaskemiddel osv.",
        &[("Opvaskemiddel", None), ("Toiletpapir", None)],
    ),
    (
        "Andet",
        "Diverse varer",
        &[
            ("Kaffe", Some("Formalet kaffe")),
            ("Te", Some("Earl Grey eller English Breakfast")),
        ],
    ),
];

/// Fill an empty database with a sample catalog.
///
/// Nothing is inserted if any category exists. Returns whether the sample
/// catalog was inserted.
pub fn insert_sample_data(connection: &Connection) -> Result<bool, Error> {
    let category_count: u32 =
        connection.query_row("SELECT COUNT(1) FROM category", [], |row| row.get(0))?;

    if category_count > 0 {
        tracing::info!("The database already has data, skipping sample data");
        return Ok(false);
    }

    let transaction = connection.unchecked_transaction()?;
    let mut item_count = 0;

    for (category_name, description, items) in SAMPLE_CATALOG {
        let category = create_category(
            CategoryName::new(category_name)?,
            Some(*description),
            &transaction,
        )?;

        for (item_name, note) in *items {
            create_item(
                Item::build(ItemName::new(item_name)?, category.id).note(*note),
                &transaction,
            )?;
            item_count += 1;
        }
    }

    transaction.commit()?;
    tracing::info!(
        "Inserted {} sample categories and {item_count} sample items",
        SAMPLE_CATALOG.len()
    );

    Ok(true)
}
