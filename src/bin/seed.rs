use chrono::Utc;
use sea_orm::{EntityTrait, Set, sea_query::OnConflict};
use storefront_orders::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        products::{self, ActiveModel as ProductActive, ItemCondition},
        stock_entries::{self, ActiveModel as StockActive},
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let catalog = vec![
        ("gbc-001", "retro-consoles", "Game Boy Color", "Handheld console", ItemCondition::SecondHand, 12999),
        ("nes-001", "retro-consoles", "NES Console", "Classic 8-bit console", ItemCondition::FirstHand, 19900),
        ("radio-001", "vintage-radios", "Philco 1939", "Vintage vacuum tube radio", ItemCondition::SecondHand, 34950),
    ];
    let now = Utc::now();
    let rows = catalog
        .into_iter()
        .map(|(id, category, title, desc, condition, price)| ProductActive {
            id: Set(id.to_string()),
            category_id: Set(category.to_string()),
            title: Set(title.to_string()),
            description: Set(Some(desc.to_string())),
            condition: Set(condition),
            price: Set(price),
            active: Set(true),
            created_at: Set(now.into()),
        });
    let inserted = products::Entity::insert_many(rows)
        .on_conflict(OnConflict::column(products::Column::Id).do_nothing().to_owned())
        .exec_without_returning(&orm)
        .await?;
    println!("Seeded {inserted} products");

    let stock = vec![
        ("gbc-001", "20742", 8),
        ("gbc-001", "10001", 1),
        ("nes-001", "20742", 0),
        ("nes-001", "10001", 5),
        ("radio-001", "20742", 2),
    ];
    let rows = stock.into_iter().map(|(product, region, qty)| StockActive {
        product_id: Set(product.to_string()),
        region_code: Set(region.to_string()),
        quantity: Set(qty),
    });
    let inserted = stock_entries::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([
                stock_entries::Column::ProductId,
                stock_entries::Column::RegionCode,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&orm)
        .await?;
    println!("Seeded {inserted} stock entries");

    Ok(())
}
