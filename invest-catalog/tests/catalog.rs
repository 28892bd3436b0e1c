use invest_catalog::{Catalog, Instance, Item, Selection, Track};
use invest_utils::Amount;
use serde_json::json;

fn abc_instance() -> Instance {
    let catalog = Catalog::new(vec![
        Item::new("A", 100.0, 60.0).unwrap(),
        Item::new("B", 200.0, 100.0).unwrap(),
        Item::new("C", 120.0, 90.0).unwrap(),
    ])
    .unwrap();
    Instance::new(catalog, 300.0)
}

#[test]
fn test_item_rejects_invalid_values() {
    assert!(Item::new("zero cost", 0.0, 1.0).is_err());
    assert!(Item::new("negative profit", 1.0, -1.0).is_err());
    assert!(Item::new("nan", f64::NAN, 1.0).is_err());
    assert!(Item::new("inf", 1.0, f64::INFINITY).is_err());
    assert!(Item::new("sub micro", 0.0000001, 1.0).is_err());
    assert!(Item::new("ok", 0.01, 0.001).is_ok());
}

#[test]
fn test_costs_round_half_up_to_cents() {
    assert_eq!(Item::new("A", 0.335, 1.0).unwrap().cost, 0.34);
    assert_eq!(Item::new("B", 0.334, 1.0).unwrap().cost, 0.33);
    assert_eq!(Item::new("C", 0.005, 1.0).unwrap().cost, 0.01);
    assert!(Item::new("D", 0.004, 1.0).is_err());

    let catalog: Catalog =
        serde_json::from_value(json!([{"id": "A", "cost": 0.335, "profit": 1.0}])).unwrap();
    assert_eq!(catalog.items()[0].cost, 0.34);
    assert_eq!(catalog.exact_costs(), &[Amount::from_minor_units(34)]);
}

#[test]
fn test_rounded_costs_drive_verification() {
    let catalog = Catalog::new(vec![
        Item::new("A", 0.335, 1.0).unwrap(),
        Item::new("B", 0.335, 1.0).unwrap(),
    ])
    .unwrap();
    let both = Selection { items: vec![0, 1] };
    assert!(Instance::new(catalog.clone(), 0.67).verify_selection(&both).is_err());
    let summary = Instance::new(catalog, 0.68).verify_selection(&both).unwrap();
    assert_eq!(summary.total_cost, Amount::from_minor_units(68));
}

#[test]
fn test_item_return_rate() {
    let item = Item::new("A", 200.0, 50.0).unwrap();
    assert_eq!(item.return_rate(), 0.25);
}

#[test]
fn test_catalog_deserialisation_validates() {
    let catalog: Catalog =
        serde_json::from_value(json!([{"id": "A", "cost": 1.5, "profit": 0.5}])).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.exact_costs(), &[Amount::from_f64(1.5).unwrap()]);

    let invalid = serde_json::from_value::<Catalog>(json!([{"id": "A", "cost": -1.0, "profit": 0.5}]));
    assert!(invalid.is_err());
}

#[test]
fn test_verify_selection() {
    let instance = abc_instance();

    let summary = instance
        .verify_selection(&Selection { items: vec![0, 1] })
        .unwrap();
    assert_eq!(summary.total_cost, Amount::from_f64(300.0).unwrap());
    assert_eq!(summary.total_profit, 160.0);
    assert_eq!(summary.item_count, 2);

    assert!(instance
        .verify_selection(&Selection { items: vec![1, 2] })
        .is_err());
    assert!(instance
        .verify_selection(&Selection { items: vec![0, 0] })
        .is_err());
    assert!(instance
        .verify_selection(&Selection { items: vec![3] })
        .is_err());

    let empty = instance.verify_selection(&Selection::new()).unwrap();
    assert_eq!(empty.total_cost, Amount::ZERO);
    assert_eq!(empty.total_profit, 0.0);
}

#[test]
fn test_verify_selection_uses_exact_costs() {
    let catalog = Catalog::new(vec![
        Item::new("X", 0.1, 1.0).unwrap(),
        Item::new("Y", 0.2, 1.0).unwrap(),
    ])
    .unwrap();
    let instance = Instance::new(catalog, 0.3);
    assert!(instance
        .verify_selection(&Selection { items: vec![0, 1] })
        .is_ok());
}

#[test]
fn test_selection_identifiers() {
    let instance = abc_instance();
    let selection = Selection { items: vec![2, 0] };
    assert_eq!(selection.identifiers(&instance.catalog), vec!["C", "A"]);
    assert_eq!(selection.sorted(), vec![0, 2]);
}

#[test]
fn test_generate_instance_is_deterministic() {
    let track = Track {
        num_items: 25,
        budget: 500.0,
    };
    let a = Instance::generate_instance(&[7u8; 32], &track).unwrap();
    let b = Instance::generate_instance(&[7u8; 32], &track).unwrap();
    let c = Instance::generate_instance(&[8u8; 32], &track).unwrap();
    assert_eq!(a.catalog, b.catalog);
    assert_ne!(a.catalog, c.catalog);
    assert_eq!(a.catalog.len(), 25);
    assert_eq!(a.budget, 500.0);
    for item in a.catalog.items() {
        assert!(item.cost >= 1.0 && item.cost <= 100.0);
        assert!(item.profit > 0.0 && item.profit <= item.cost * 0.4 + 0.005);
        assert!(item.id.starts_with("Share-"));
    }
}
