//! Integration tests for the inventory commands over a real data directory.
//!
//! Each test builds an `AppState` pointing at a temporary directory and drives
//! the command building blocks the binary uses.

use rust_decimal::Decimal;
use tempfile::TempDir;

use junkyard_cli::cli::{AddArgs, CustomPart};
use junkyard_cli::commands::add::{add_vehicle, build_draft};
use junkyard_cli::commands::dashboard::DashboardReport;
use junkyard_cli::commands::delete::{DeleteOutcome, delete_vehicle};
use junkyard_cli::commands::list::InventoryListReport;
use junkyard_cli::commands::part_status::update_status;
use junkyard_cli::state::AppState;
use junkyard_core::config::JunkyardConfig;
use junkyard_core::types::PartStatus;
use junkyard_inventory::DashboardSummary;

fn state_in(dir: &TempDir) -> AppState {
    let mut config = JunkyardConfig::default();
    config.storage.data_dir = dir.path().join("data").display().to_string();
    config.lookup.enabled = false;
    AppState::new(config)
}

async fn add(state: &AppState, args: AddArgs) -> String {
    let catalog = state.load_catalog().expect("catalog should load");
    let resolver = state.resolver(args.offline);
    let (draft, source) = build_draft(args, &resolver, &catalog, 1024)
        .await
        .expect("draft should build");
    let mut store = state.open_store().expect("store should open");
    add_vehicle(&mut store, draft, source)
        .expect("vehicle should be added")
        .vehicle
        .id
}

#[tokio::test]
async fn test_add_list_status_delete_round_trip() {
    // Given: An empty data directory
    let dir = TempDir::new().expect("should create temp dir");
    let state = state_in(&dir);

    // When: Adding a decoded vehicle and a manual one
    let altima = add(
        &state,
        AddArgs {
            vin: "1N4AL3AP8JC231503".to_owned(),
            location: Some("Row 7".to_owned()),
            decode: true,
            offline: true,
            ..AddArgs::default()
        },
    )
    .await;
    let accord = add(
        &state,
        AddArgs {
            vin: "1HGCM82633A004352".to_owned(),
            make: Some("HONDA".to_owned()),
            model: Some("ACCORD".to_owned()),
            year: Some(2003),
            parts: vec!["battery".to_owned()],
            custom_parts: vec![CustomPart {
                name: "floor mats".to_owned(),
                price: Decimal::new(1999, 2),
            }],
            ..AddArgs::default()
        },
    )
    .await;

    // Then: A fresh store sees both vehicles
    let store = state.open_store().expect("store should reopen");
    assert_eq!(store.len(), 2);
    let report = InventoryListReport::new(Some("row 7".to_owned()), store.search("row 7"));
    assert_eq!(report.total, 1);
    assert_eq!(report.vehicles[0].id, altima);

    let accord_record = store.get(&accord).expect("accord stored");
    // battery 80 + mats 19.99 = 99.99, x1.5 = 149.985 -> 149.99
    assert_eq!(accord_record.price, Decimal::new(14999, 2));
    let battery = accord_record.parts[0].id.clone();
    drop(store);

    // When: Marking a part sold
    let mut store = state.open_store().expect("store should reopen");
    update_status(&mut store, &accord, &battery, PartStatus::Sold).expect("status should update");
    drop(store);

    // Then: The dashboard reflects the sale after reload
    let store = state.open_store().expect("store should reopen");
    let summary = DashboardReport(DashboardSummary::compute(store.vehicles()));
    assert_eq!(summary.0.total_vehicles, 2);
    assert_eq!(summary.0.sold_parts, 1);
    assert_eq!(summary.0.sold_revenue, Decimal::from(80));
    assert_eq!(summary.0.makes.get("NISSAN"), Some(&1));
    drop(store);

    // When: Deleting one vehicle with confirmation
    let mut store = state.open_store().expect("store should reopen");
    let report = delete_vehicle(&mut store, &altima, |_| Ok(true)).expect("delete should work");
    assert_eq!(report.outcome, DeleteOutcome::Deleted);
    drop(store);

    // Then: Only the other vehicle remains on disk
    let store = state.open_store().expect("store should reopen");
    assert_eq!(store.len(), 1);
    assert!(store.get(&accord).is_some());
}

#[tokio::test]
async fn test_duplicate_vin_is_rejected_without_changes() {
    // Given: A stored vehicle
    let dir = TempDir::new().expect("should create temp dir");
    let state = state_in(&dir);
    let args = || AddArgs {
        vin: "5YJ3E1EA7KF317000".to_owned(),
        make: Some("TESLA".to_owned()),
        model: Some("MODEL 3".to_owned()),
        year: Some(2019),
        price: Some(Decimal::from(15000)),
        ..AddArgs::default()
    };
    add(&state, args()).await;

    let inventory_file = state
        .storage()
        .path_for(&state.config.storage.inventory_key);
    let before = std::fs::read_to_string(&inventory_file).expect("inventory written");

    // When: Adding the same VIN again
    let catalog = state.load_catalog().expect("catalog should load");
    let (draft, _) = build_draft(args(), &state.resolver(true), &catalog, 1024)
        .await
        .expect("draft should build");
    let mut store = state.open_store().expect("store should open");
    let err = add_vehicle(&mut store, draft, None).expect_err("duplicate VIN");

    // Then: Validation error, nothing written
    assert_eq!(err.exit_code(), 3);
    assert_eq!(store.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&inventory_file).expect("inventory still there"),
        before
    );
}

#[tokio::test]
async fn test_photo_and_attachments_are_encoded() {
    // Given: Two small files
    let dir = TempDir::new().expect("should create temp dir");
    let state = state_in(&dir);
    let photo = dir.path().join("front.jpg");
    let doc = dir.path().join("title.pdf");
    std::fs::write(&photo, [0xFF, 0xD8, 0xFF]).expect("should write photo");
    std::fs::write(&doc, b"%PDF-1.4").expect("should write pdf");

    // When: Adding a vehicle with both
    let id = add(
        &state,
        AddArgs {
            vin: "1HGCM82633A004352".to_owned(),
            make: Some("HONDA".to_owned()),
            model: Some("ACCORD".to_owned()),
            year: Some(2003),
            price: Some(Decimal::from(900)),
            photo: Some(photo),
            attachments: vec![doc],
            ..AddArgs::default()
        },
    )
    .await;

    // Then: The stored record carries data URLs
    let store = state.open_store().expect("store should open");
    let vehicle = store.get(&id).expect("vehicle stored");
    assert!(
        vehicle
            .photo
            .as_deref()
            .is_some_and(|p| p.starts_with("data:image/jpeg;base64,"))
    );
    assert_eq!(vehicle.attachments.len(), 1);
    assert_eq!(vehicle.attachments[0].file_name, "title.pdf");
    assert_eq!(vehicle.attachments[0].mime_type, "application/pdf");
    assert_eq!(vehicle.attachments[0].size, 8);
}
