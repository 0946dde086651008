use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
    sea_query::LockType,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{
        cart_lines::{ActiveModel as CartLineActive, Entity as CartLines},
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts},
    },
    error::AppResult,
    services::cart_service,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// The session had no anonymous cart.
    NothingToMerge,
    /// The anonymous cart became the user's cart unchanged.
    Reowned { cart_id: Uuid },
    /// Anonymous lines were folded into the user's existing cart.
    Folded { cart_id: Uuid, lines_folded: usize },
}

/// Fold the session's anonymous cart into the user's cart at login.
///
/// Runs in a single transaction. The unit cap is not re-applied here.
pub async fn merge_on_login(
    state: &AppState,
    user_id: Uuid,
    session_id: &str,
) -> AppResult<MergeOutcome> {
    let txn = state.orm.begin().await?;

    let anonymous = Carts::find()
        .filter(CartCol::SessionId.eq(session_id))
        .filter(CartCol::UserId.is_null())
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let owned = Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;

    let outcome = match (anonymous, owned) {
        (None, _) => MergeOutcome::NothingToMerge,
        (Some(anonymous), None) => {
            let cart_id = anonymous.id;
            let mut active: CartActive = anonymous.into();
            active.user_id = Set(Some(user_id));
            // Frees the session key for a fresh anonymous cart after logout.
            active.session_id = Set(None);
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
            MergeOutcome::Reowned { cart_id }
        }
        (Some(anonymous), Some(owned)) => {
            let incoming = cart_service::cart_lines(&txn, anonymous.id).await?;
            let owned_lines = cart_service::cart_lines(&txn, owned.id).await?;
            let mut next_position = owned_lines.iter().map(|l| l.position).max().unwrap_or(0);
            let existing: HashMap<&str, _> = owned_lines
                .iter()
                .map(|line| (line.product_id.as_str(), line))
                .collect();

            // Anonymous lines must go before their cart row.
            cart_service::clear_lines(&txn, anonymous.id).await?;

            for line in &incoming {
                match existing.get(line.product_id.as_str()) {
                    Some(&current) => {
                        let mut active: CartLineActive = current.clone().into();
                        active.quantity = Set(current.quantity + line.quantity);
                        active.update(&txn).await?;
                    }
                    None => {
                        next_position += 1;
                        CartLines::insert(CartLineActive {
                            cart_id: Set(owned.id),
                            product_id: Set(line.product_id.clone()),
                            quantity: Set(line.quantity),
                            price_snapshot: Set(line.price_snapshot),
                            condition_snapshot: Set(line.condition_snapshot),
                            position: Set(next_position),
                            added_at: Set(line.added_at),
                        })
                        .exec_without_returning(&txn)
                        .await?;
                    }
                }
            }

            Carts::delete_by_id(anonymous.id).exec(&txn).await?;
            let cart_id = owned.id;
            cart_service::touch_cart(&txn, owned).await?;
            MergeOutcome::Folded {
                cart_id,
                lines_folded: incoming.len(),
            }
        }
    };

    txn.commit().await?;
    tracing::info!(%user_id, session_id, ?outcome, "cart merged at login");
    Ok(outcome)
}
