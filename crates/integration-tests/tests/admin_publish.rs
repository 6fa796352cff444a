//! Integration tests for editing the catalog draft and publishing it to the
//! storefront.

use coaxx_admin::{CatalogDraft, DEFAULT_DRAFT_KEY, DraftSource, ProductInput};
use coaxx_core::ProductId;
use coaxx_integration_tests::TestEnv;
use coaxx_storefront::{CartStore, Catalog, CatalogQuery};
use rust_decimal::Decimal;

fn published(env: &TestEnv) -> Vec<coaxx_core::Product> {
    Catalog::load(env.catalog_path())
        .expect("catalog")
        .products()
        .to_vec()
}

// =============================================================================
// Draft Lifecycle Tests
// =============================================================================

#[test]
fn test_draft_edits_persist_across_sessions() {
    let env = TestEnv::new().expect("test env");

    let new_id = {
        let mut draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));
        assert_eq!(draft.source(), DraftSource::Published);
        draft
            .delete(&ProductId::new("lace-set"))
            .expect("delete");
        draft
            .upsert(ProductInput::new("Satin Slip", Decimal::new(5500, 2)))
            .expect("upsert")
    };

    let draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));
    assert_eq!(draft.source(), DraftSource::Draft);
    assert_eq!(draft.products().len(), 3);
    assert!(draft.get(&new_id).is_some());
    assert!(draft.get(&ProductId::new("lace-set")).is_none());
}

#[test]
fn test_reset_returns_to_published() {
    let env = TestEnv::new().expect("test env");
    let mut draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));
    draft
        .delete(&ProductId::new("silk-robe"))
        .expect("delete");

    draft.reset(published(&env)).expect("reset");

    let reopened = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));
    assert_eq!(reopened.source(), DraftSource::Published);
    assert_eq!(reopened.products().len(), 3);
}

// =============================================================================
// Publish Tests
// =============================================================================

#[test]
fn test_published_catalog_feeds_storefront() {
    let env = TestEnv::new().expect("test env");
    let mut draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));

    let mut input = ProductInput::new("Satin Slip", Decimal::new(5500, 2));
    input.compare_at_price = Some(Decimal::from(70));
    input.collections = vec!["Bridal".to_string()];
    input.tags = vec!["Sleepwear".to_string()];
    let slip_id = draft.upsert(input).expect("upsert");

    let mut robe = ProductInput::from_product(draft.get(&ProductId::new("silk-robe")).expect("robe"));
    robe.price = Decimal::from(72);
    draft.upsert(robe).expect("edit robe");

    draft.publish(env.catalog_path()).expect("publish");

    let catalog = Catalog::load(env.catalog_path()).expect("storefront reads published file");
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.in_collection("bridal").len(), 2);
    assert_eq!(catalog.with_tag("sleepwear").len(), 2);
    assert!(catalog.deals().iter().any(|p| p.id == slip_id));
    assert_eq!(
        catalog
            .get(&ProductId::new("silk-robe"))
            .expect("robe")
            .price,
        Decimal::from(72)
    );

    let mut cart = CartStore::open_default(env.store().expect("store"));
    let slip = catalog.get(&slip_id).expect("slip");
    cart.add_item(slip, 1, None).expect("add slip");
    assert_eq!(cart.total(), Decimal::new(5500, 2));
}

#[test]
fn test_republish_keeps_every_catalog_field() {
    let env = TestEnv::new().expect("test env");
    let mut draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));

    let mut robe = ProductInput::from_product(draft.get(&ProductId::new("silk-robe")).expect("robe"));
    robe.sale_price = Some(Decimal::from(70));
    draft.upsert(robe).expect("edit robe");
    let mut mask = ProductInput::from_product(draft.get(&ProductId::new("velvet-mask")).expect("mask"));
    mask.description = Some("Blackout lining".to_string());
    draft.upsert(mask).expect("edit mask");

    draft.publish(env.catalog_path()).expect("publish");

    let raw = std::fs::read_to_string(env.catalog_path()).expect("read published file");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let robe = json.get(0).expect("robe entry");
    assert_eq!(
        robe.get("materials"),
        Some(&serde_json::json!(["mulberry silk"]))
    );
    assert_eq!(robe.get("careNotes").and_then(|v| v.as_str()), Some("Hand wash cold"));
    assert!(robe.get("paymentLink").is_some());

    let catalog = Catalog::load(env.catalog_path()).expect("catalog");
    let beginner = CatalogQuery::default().experience_level("beginner").apply(&catalog);
    assert_eq!(beginner.len(), 1);
    let robe = catalog.get(&ProductId::new("silk-robe")).expect("robe");
    assert_eq!(robe.effective_price(), Decimal::from(70));
    let mask = catalog.get(&ProductId::new("velvet-mask")).expect("mask");
    assert_eq!(mask.compare_at_price, Some(Decimal::from(20)));
    assert_eq!(mask.effective_price(), Decimal::from(15));
}

#[test]
fn test_cart_and_draft_share_a_data_dir() {
    let env = TestEnv::new().expect("test env");
    let catalog = Catalog::load(env.catalog_path()).expect("catalog");

    let mut cart = CartStore::open_default(env.store().expect("store"));
    cart.add_item(catalog.get(&ProductId::new("silk-robe")).expect("robe"), 1, None)
        .expect("add");

    let mut draft = CatalogDraft::open(env.store().expect("store"), DEFAULT_DRAFT_KEY, published(&env));
    draft.save().expect("save draft");

    let store = env.store().expect("store");
    let keys = coaxx_storage::KeyValueStore::keys(&store).expect("keys");
    assert_eq!(keys, vec!["coaxx-cart".to_string(), DEFAULT_DRAFT_KEY.to_string()]);
    assert!(env.root().join("data").is_dir());
}
