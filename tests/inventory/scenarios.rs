use stock_ledger::{CatalogError, InventoryError};

use crate::support::{catalog, quantity, seed};

#[test]
fn purchase_then_restock() {
    let catalog = catalog();
    let item = seed(&catalog, "Kaju Katli", 5);

    let after_purchase = catalog.purchase(&item.id).unwrap();
    assert_eq!(after_purchase.quantity, 4);

    let after_restock = catalog.restock(&item.id, 3).unwrap();
    assert_eq!(after_restock.quantity, 7);
    assert_eq!(quantity(&catalog, &item.id), 7);
}

#[test]
fn nonexistent_item_is_not_found() {
    let catalog = catalog();
    let engine = catalog.engine();

    assert_eq!(
        engine.purchase("no-such-item").unwrap_err(),
        InventoryError::ItemNotFound("no-such-item".into())
    );
    assert_eq!(
        engine.restock("no-such-item", 1).unwrap_err(),
        InventoryError::ItemNotFound("no-such-item".into())
    );
}

#[test]
fn empty_item_stays_empty_on_repeated_purchases() {
    let catalog = catalog();
    let item = seed(&catalog, "Peda", 0);

    for _ in 0..3 {
        let err = catalog.purchase(&item.id).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Inventory(InventoryError::OutOfStock(item.id.clone()))
        );
        assert!(err.to_string().contains("out of stock"));
    }
    assert_eq!(quantity(&catalog, &item.id), 0);
}

#[test]
fn invalid_restock_amounts_leave_quantity_unchanged() {
    let catalog = catalog();
    let item = seed(&catalog, "Soan Papdi", 4);

    for amount in [0, -1] {
        assert_eq!(
            catalog.restock(&item.id, amount).unwrap_err(),
            CatalogError::Inventory(InventoryError::InvalidAmount(amount))
        );
    }
    assert_eq!(quantity(&catalog, &item.id), 4);
}

#[test]
fn drained_item_can_be_sold_again_after_restock() {
    let catalog = catalog();
    let item = seed(&catalog, "Jalebi", 1);

    catalog.purchase(&item.id).unwrap();
    assert!(catalog.purchase(&item.id).is_err());

    catalog.restock(&item.id, 2).unwrap();
    assert_eq!(catalog.purchase(&item.id).unwrap().quantity, 1);
    assert_eq!(catalog.purchase(&item.id).unwrap().quantity, 0);
    assert!(catalog.purchase(&item.id).is_err());
}

#[test]
fn deleted_item_is_not_found_not_out_of_stock() {
    let catalog = catalog();
    let item = seed(&catalog, "Rasgulla", 0);
    catalog.delete(&item.id).unwrap();

    assert_eq!(
        catalog.engine().purchase(&item.id).unwrap_err(),
        InventoryError::ItemNotFound(item.id.clone())
    );
}
