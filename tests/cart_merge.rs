mod common;

use common::{create_product, setup_state};
use sea_orm::{EntityTrait, PaginatorTrait};
use storefront_orders::{
    entity::Carts,
    middleware::session::Shopper,
    services::{
        cart_merge::{self, MergeOutcome},
        cart_service,
    },
};
use uuid::Uuid;

async fn quantities(
    state: &storefront_orders::state::AppState,
    shopper: &Shopper,
) -> anyhow::Result<Vec<(String, i32)>> {
    let view = cart_service::view_cart(state, shopper).await?;
    Ok(view
        .lines
        .into_iter()
        .map(|l| (l.product_id, l.quantity))
        .collect())
}

#[tokio::test]
async fn folds_anonymous_lines_into_user_cart() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    create_product(&state, "b", 200).await?;
    let user_id = Uuid::new_v4();
    let user = Shopper::user("sid-old", user_id);
    let guest = Shopper::anonymous("sid-new");

    cart_service::add_to_cart(&state, &user, "a", 1).await?;
    cart_service::add_to_cart(&state, &user, "b", 3).await?;
    cart_service::add_to_cart(&state, &guest, "a", 2).await?;

    let outcome = cart_merge::merge_on_login(&state, user_id, "sid-new").await?;
    assert!(matches!(outcome, MergeOutcome::Folded { lines_folded: 1, .. }));

    let merged = quantities(&state, &Shopper::user("sid-new", user_id)).await?;
    assert_eq!(merged, vec![("a".to_string(), 3), ("b".to_string(), 3)]);

    assert!(cart_service::find_cart(&state.orm, &guest).await?.is_none());
    assert_eq!(Carts::find().count(&state.orm).await?, 1);
    Ok(())
}

#[tokio::test]
async fn new_products_are_appended_after_existing_lines() -> anyhow::Result<()> {
    let state = setup_state().await?;
    for id in ["a", "b", "c"] {
        create_product(&state, id, 100).await?;
    }
    let user_id = Uuid::new_v4();
    cart_service::add_to_cart(&state, &Shopper::user("sid-u", user_id), "b", 1).await?;
    let guest = Shopper::anonymous("sid-g");
    cart_service::add_to_cart(&state, &guest, "c", 1).await?;
    cart_service::add_to_cart(&state, &guest, "a", 1).await?;

    cart_merge::merge_on_login(&state, user_id, "sid-g").await?;

    let ids: Vec<_> = quantities(&state, &Shopper::user("sid-g", user_id))
        .await?
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, ["b", "c", "a"]);
    Ok(())
}

#[tokio::test]
async fn anonymous_cart_is_reowned_when_user_has_none() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let guest = Shopper::anonymous("sid-reown");
    let before = cart_service::add_to_cart(&state, &guest, "a", 4).await?;
    let user_id = Uuid::new_v4();

    let outcome = cart_merge::merge_on_login(&state, user_id, "sid-reown").await?;
    let cart_id = before.cart_id.expect("cart created by add");
    assert_eq!(outcome, MergeOutcome::Reowned { cart_id });

    let owned = cart_service::view_cart(&state, &Shopper::user("sid-reown", user_id)).await?;
    assert_eq!(owned.cart_id, Some(cart_id));
    assert_eq!(owned.total_quantity, 4);

    // The session is free to start a new anonymous cart.
    assert!(cart_service::view_cart(&state, &guest).await?.cart_id.is_none());
    let fresh = cart_service::add_to_cart(&state, &guest, "a", 1).await?;
    assert_ne!(fresh.cart_id, Some(cart_id));
    Ok(())
}

#[tokio::test]
async fn nothing_to_merge_without_anonymous_cart() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let user_id = Uuid::new_v4();
    cart_service::add_to_cart(&state, &Shopper::user("sid-x", user_id), "a", 2).await?;

    let outcome = cart_merge::merge_on_login(&state, user_id, "sid-empty").await?;
    assert_eq!(outcome, MergeOutcome::NothingToMerge);

    let owned = quantities(&state, &Shopper::user("sid-x", user_id)).await?;
    assert_eq!(owned, vec![("a".to_string(), 2)]);
    Ok(())
}

#[tokio::test]
async fn merge_does_not_apply_unit_cap() -> anyhow::Result<()> {
    let state = setup_state().await?;
    create_product(&state, "a", 100).await?;
    let user_id = Uuid::new_v4();
    cart_service::add_to_cart(&state, &Shopper::user("sid-u", user_id), "a", 6).await?;
    cart_service::add_to_cart(&state, &Shopper::anonymous("sid-g"), "a", 7).await?;

    cart_merge::merge_on_login(&state, user_id, "sid-g").await?;

    let view = cart_service::view_cart(&state, &Shopper::user("sid-g", user_id)).await?;
    assert_eq!(view.total_quantity, 13);
    Ok(())
}
