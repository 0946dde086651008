mod common;

use common::{create_product, create_product_with, set_price, setup_state};
use sea_orm::{EntityTrait, PaginatorTrait};
use storefront_orders::{
    entity::{Carts, products::ItemCondition},
    error::AppError,
    middleware::session::Shopper,
    services::cart_service::{self, MAX_CART_UNITS},
};

#[tokio::test]
async fn add_snapshots_current_price_and_sums_quantity() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "gbc-001", 12999).await?;
    let shopper = Shopper::anonymous("sid-1");

    let view = cart_service::add_to_cart(&state, &shopper, "gbc-001", 2).await?;
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.naive_total, 2 * 12999);

    // Re-adding replaces the snapshot rather than averaging it.
    set_price(&state, "gbc-001", 15000).await?;
    let view = cart_service::add_to_cart(&state, &shopper, "gbc-001", 1).await?;
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].quantity, 3);
    assert_eq!(view.lines[0].price_snapshot, 15000);
    assert_eq!(view.naive_total, 3 * 15000);
    Ok(())
}

#[tokio::test]
async fn add_clamps_to_capacity_then_rejects() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    create_product(&state, "b", 200).await?;
    let shopper = Shopper::anonymous("sid-cap");

    cart_service::add_to_cart(&state, &shopper, "a", 8).await?;
    let view = cart_service::add_to_cart(&state, &shopper, "b", 5).await?;
    assert_eq!(view.total_quantity, MAX_CART_UNITS);
    assert_eq!(view.lines[1].product_id, "b");
    assert_eq!(view.lines[1].quantity, 2);

    let err = cart_service::add_to_cart(&state, &shopper, "a", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CartFull));

    let view = cart_service::view_cart(&state, &shopper).await?;
    assert_eq!(view.total_quantity, MAX_CART_UNITS);
    Ok(())
}

#[tokio::test]
async fn non_positive_quantity_counts_as_one() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let shopper = Shopper::anonymous("sid-zero");

    let view = cart_service::add_to_cart(&state, &shopper, "a", 0).await?;
    assert_eq!(view.lines[0].quantity, 1);
    let view = cart_service::add_to_cart(&state, &shopper, "a", -4).await?;
    assert_eq!(view.lines[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn unknown_or_inactive_products_are_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product_with(&state, "retired", 100, ItemCondition::FirstHand, false).await?;
    let shopper = Shopper::anonymous("sid-missing");

    let err = cart_service::add_to_cart(&state, &shopper, "ghost", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    let err = cart_service::add_to_cart(&state, &shopper, "retired", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn lines_keep_insertion_order() -> anyhow::Result<()> {
    let state = setup_state().await?;
    for id in ["c", "a", "b"] {
        create_product(&state, id, 100).await?;
    }
    let shopper = Shopper::anonymous("sid-order");
    for id in ["c", "a", "b", "c"] {
        cart_service::add_to_cart(&state, &shopper, id, 1).await?;
    }

    let view = cart_service::view_cart(&state, &shopper).await?;
    let ids: Vec<_> = view.lines.iter().map(|l| l.product_id.as_str()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert_eq!(view.lines[0].quantity, 2);
    Ok(())
}

#[tokio::test]
async fn viewing_absent_cart_does_not_create_one() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let view = cart_service::view_cart(&state, &Shopper::anonymous("nobody")).await?;
    assert!(view.lines.is_empty());
    assert_eq!(view.naive_total, 0);
    assert!(view.cart_id.is_none());
    assert_eq!(Carts::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn clear_keeps_cart_identity() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let shopper = Shopper::anonymous("sid-clear");

    let before = cart_service::add_to_cart(&state, &shopper, "a", 2).await?;
    cart_service::clear(&state, &shopper).await?;
    let after = cart_service::view_cart(&state, &shopper).await?;
    assert!(after.lines.is_empty());
    assert_eq!(after.cart_id, before.cart_id);

    let again = cart_service::add_to_cart(&state, &shopper, "a", 1).await?;
    assert_eq!(again.cart_id, before.cart_id);
    Ok(())
}

#[tokio::test]
async fn remove_line_deletes_only_that_product() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    create_product(&state, "b", 200).await?;
    let shopper = Shopper::anonymous("sid-remove");
    cart_service::add_to_cart(&state, &shopper, "a", 1).await?;
    cart_service::add_to_cart(&state, &shopper, "b", 1).await?;

    let view = cart_service::remove_line(&state, &shopper, "a").await?;
    assert_eq!(view.lines.len(), 1);
    assert_eq!(view.lines[0].product_id, "b");

    let err = cart_service::remove_line(&state, &shopper, "a")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn sessions_and_users_have_separate_carts() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let user_id = uuid::Uuid::new_v4();

    cart_service::add_to_cart(&state, &Shopper::anonymous("sid-x"), "a", 1).await?;
    cart_service::add_to_cart(&state, &Shopper::user("sid-x", user_id), "a", 3).await?;

    let anon = cart_service::view_cart(&state, &Shopper::anonymous("sid-x")).await?;
    let owned = cart_service::view_cart(&state, &Shopper::user("sid-other", user_id)).await?;
    assert_eq!(anon.total_quantity, 1);
    assert_eq!(owned.total_quantity, 3);
    Ok(())
}
