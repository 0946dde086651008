use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entity::{CartLines, Carts, OrderLines, Orders, Products, StockEntries};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children so foreign keys resolve.
        manager
            .create_table(schema.create_table_from_entity(Products).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(StockEntries)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Carts).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(CartLines).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Orders).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(OrderLines)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, OrderLines).await?;
        drop_table(manager, Orders).await?;
        drop_table(manager, CartLines).await?;
        drop_table(manager, Carts).await?;
        drop_table(manager, StockEntries).await?;
        drop_table(manager, Products).await
    }
}

async fn drop_table<E: EntityTrait>(manager: &SchemaManager<'_>, entity: E) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
