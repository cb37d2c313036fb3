use sea_orm_migration::prelude::*;

/// One restaurant per chef. Categories is a JSON array drawn from the fixed
/// category set; dish categories must stay inside it.
#[derive(DeriveIden)]
enum Restaurants {
    Table,
    Id,
    OwnerId,
    Name,
    Address,
    Latitude,
    Longitude,
    PrepTimeMinutes,
    DeliveryRadiusKm,
    AcceptingOrders,
    Categories,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Dishes {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    Price,
    Category,
    ImageUrl,
    Rating,
    IsAvailable,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::OwnerId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Address).string().not_null())
                    .col(ColumnDef::new(Restaurants::Latitude).double().not_null())
                    .col(ColumnDef::new(Restaurants::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Restaurants::PrepTimeMinutes)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Restaurants::DeliveryRadiusKm)
                            .double()
                            .not_null()
                            .default(5.0),
                    )
                    .col(
                        ColumnDef::new(Restaurants::AcceptingOrders)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Restaurants::Categories)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Dishes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Dishes::RestaurantId).uuid().not_null())
                    .col(ColumnDef::new(Dishes::Name).string().not_null())
                    .col(ColumnDef::new(Dishes::Description).text().null())
                    .col(ColumnDef::new(Dishes::Price).big_integer().not_null())
                    .col(ColumnDef::new(Dishes::Category).string().not_null())
                    .col(ColumnDef::new(Dishes::ImageUrl).string().null())
                    .col(
                        ColumnDef::new(Dishes::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Dishes::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Dishes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Dishes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_restaurant")
                            .from(Dishes::Table, Dishes::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_restaurant_id")
                    .table(Dishes::Table)
                    .col(Dishes::RestaurantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dishes_category")
                    .table(Dishes::Table)
                    .col(Dishes::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        Ok(())
    }
}
