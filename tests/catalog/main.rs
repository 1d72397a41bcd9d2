//! Catalog service integration tests: search, edits racing purchases, deletes.

#[path = "../ledger_support/mod.rs"]
mod support;

use std::sync::{Arc, Barrier};
use std::thread;

use rust_decimal_macros::dec;
use stock_ledger::{CatalogError, CatalogService, InventoryError, ItemPatch, ItemQuery, NewItem};

use support::{catalog, quantity};

fn sweets_catalog() -> CatalogService {
    let catalog = catalog();
    for (name, category, price, quantity) in [
        ("Gulab Jamun", "Traditional", dec!(50), 100),
        ("Barfi", "Traditional", dec!(75), 50),
        ("Chocolate Fudge", "Western", dec!(120.50), 10),
        ("Jamun Cheesecake", "Fusion", dec!(60), 0),
    ] {
        catalog
            .create(NewItem::new(name, category, price, quantity))
            .unwrap();
    }
    catalog
}

fn names(catalog: &CatalogService, query: ItemQuery) -> Vec<String> {
    catalog
        .search(&query)
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect()
}

#[test]
fn search_by_partial_name() {
    let catalog = sweets_catalog();
    assert_eq!(
        names(&catalog, ItemQuery::new().name("jamun")),
        ["Gulab Jamun", "Jamun Cheesecake"]
    );
}

#[test]
fn search_by_category() {
    let catalog = sweets_catalog();
    assert_eq!(
        names(&catalog, ItemQuery::new().category("Traditional")),
        ["Barfi", "Gulab Jamun"]
    );
}

#[test]
fn search_by_price_range() {
    let catalog = sweets_catalog();
    assert_eq!(
        names(&catalog, ItemQuery::new().min_price(dec!(50)).max_price(dec!(100))),
        ["Barfi", "Gulab Jamun", "Jamun Cheesecake"]
    );
    assert_eq!(
        names(&catalog, ItemQuery::new().min_price(dec!(70))),
        ["Barfi", "Chocolate Fudge"]
    );
    assert_eq!(
        names(&catalog, ItemQuery::new().max_price(dec!(60))),
        ["Gulab Jamun", "Jamun Cheesecake"]
    );
}

#[test]
fn search_combines_filters() {
    let catalog = sweets_catalog();
    let query = ItemQuery::new()
        .name("jamun")
        .category("Traditional")
        .min_price(dec!(40))
        .max_price(dec!(60));
    assert_eq!(names(&catalog, query), ["Gulab Jamun"]);
}

#[test]
fn search_with_no_hits_is_empty() {
    let catalog = sweets_catalog();
    assert!(names(&catalog, ItemQuery::new().name("nonexistent")).is_empty());
}

#[test]
fn list_returns_everything_including_sold_out() {
    let catalog = sweets_catalog();
    let items = catalog.list().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().any(|item| item.quantity == 0));
}

#[test]
fn edits_racing_purchases_never_clobber_stock() {
    let catalog = catalog();
    let item = catalog
        .create(NewItem::new("Kheer", "Milk", dec!(40), 200))
        .unwrap();
    let buyers = 8;
    let purchases_each = 20;
    let editors = 4;

    let barrier = Arc::new(Barrier::new(buyers + editors));
    let mut handles = Vec::new();
    for _ in 0..buyers {
        let catalog = catalog.clone();
        let barrier = Arc::clone(&barrier);
        let id = item.id.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..purchases_each {
                catalog.purchase(&id).unwrap();
            }
        }));
    }
    for editor in 0..editors {
        let catalog = catalog.clone();
        let barrier = Arc::clone(&barrier);
        let id = item.id.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            for round in 0..20 {
                let patch = ItemPatch::default()
                    .name(format!("Kheer v{editor}.{round}"))
                    .price(dec!(40) + rust_decimal::Decimal::from(round));
                catalog.update(&id, patch).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        quantity(&catalog, &item.id),
        200 - (buyers * purchases_each) as u32
    );
}

#[test]
fn delete_racing_purchases_reports_not_found_afterwards() {
    let catalog = catalog();
    let item = catalog
        .create(NewItem::new("Shrikhand", "Milk", dec!(35), 1_000_000))
        .unwrap();

    let barrier = Arc::new(Barrier::new(5));
    let buyers: Vec<_> = (0..4)
        .map(|_| {
            let catalog = catalog.clone();
            let barrier = Arc::clone(&barrier);
            let id = item.id.clone();
            thread::spawn(move || {
                barrier.wait();
                loop {
                    match catalog.purchase(&id) {
                        Ok(_) => continue,
                        Err(err) => return err,
                    }
                }
            })
        })
        .collect();

    barrier.wait();
    catalog.delete(&item.id).unwrap();

    for buyer in buyers {
        assert_eq!(
            buyer.join().unwrap(),
            CatalogError::Inventory(InventoryError::ItemNotFound(item.id.clone()))
        );
    }
    assert!(catalog.get(&item.id).unwrap().is_none());
}
