use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_member_table::Migration),
            Box::new(m20240101_000002_create_item_table::Migration),
            Box::new(m20240101_000003_create_category_tables::Migration),
            Box::new(m20240101_000004_create_order_tables::Migration),
        ]
    }
}

/// Money column. SQLite has no exact decimal type, so it gets REAL affinity
/// there; NUMERIC affinity would turn whole amounts into integers that no
/// longer decode as decimals.
fn money_column<T: IntoIden>(manager: &SchemaManager, column: T) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    match manager.get_database_backend() {
        DbBackend::Sqlite => def.double(),
        _ => def.decimal_len(19, 2),
    };
    def
}

mod m20240101_000001_create_member_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_member_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Member::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Member::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Member::Name).string().not_null())
                        .col(ColumnDef::new(Member::City).string().null())
                        .col(ColumnDef::new(Member::Street).string().null())
                        .col(ColumnDef::new(Member::Zipcode).string().null())
                        .to_owned(),
                )
                .await?;

            // Registration checks names before insert; this index closes the race.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_member_name_unique")
                        .table(Member::Table)
                        .col(Member::Name)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Member::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Member {
        Table,
        Id,
        Name,
        City,
        Street,
        Zipcode,
    }
}

mod m20240101_000002_create_item_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_item_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Single table for the whole item hierarchy, discriminated by dtype.
            manager
                .create_table(
                    Table::create()
                        .table(Item::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Item::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Item::Dtype).string_len(31).not_null())
                        .col(ColumnDef::new(Item::Name).string().not_null())
                        .col(super::money_column(manager, Item::Price).not_null())
                        .col(
                            ColumnDef::new(Item::StockQuantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Item::Author).string().null())
                        .col(ColumnDef::new(Item::Isbn).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Item::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Item {
        Table,
        Id,
        Dtype,
        Name,
        Price,
        StockQuantity,
        Author,
        Isbn,
    }
}

mod m20240101_000003_create_category_tables {
    use super::m20240101_000002_create_item_table::Item;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_category_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Category::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Category::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Category::Name).string().not_null())
                        .col(ColumnDef::new(Category::ParentId).big_integer().null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_parent")
                                .from(Category::Table, Category::ParentId)
                                .to(Category::Table, Category::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CategoryItem::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CategoryItem::CategoryId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CategoryItem::ItemId).big_integer().not_null())
                        .primary_key(
                            Index::create()
                                .col(CategoryItem::CategoryId)
                                .col(CategoryItem::ItemId),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_item_category")
                                .from(CategoryItem::Table, CategoryItem::CategoryId)
                                .to(Category::Table, Category::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_category_item_item")
                                .from(CategoryItem::Table, CategoryItem::ItemId)
                                .to(Item::Table, Item::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(CategoryItem::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Category::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Category {
        Table,
        Id,
        Name,
        ParentId,
    }

    #[derive(DeriveIden)]
    enum CategoryItem {
        Table,
        CategoryId,
        ItemId,
    }
}

mod m20240101_000004_create_order_tables {
    use super::m20240101_000001_create_member_table::Member;
    use super::m20240101_000002_create_item_table::Item;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Delivery::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Delivery::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Delivery::City).string().null())
                        .col(ColumnDef::new(Delivery::Street).string().null())
                        .col(ColumnDef::new(Delivery::Zipcode).string().null())
                        .col(ColumnDef::new(Delivery::Status).string_len(16).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::MemberId).big_integer().not_null())
                        .col(
                            ColumnDef::new(Orders::DeliveryId)
                                .big_integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Orders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Orders::Status).string_len(16).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_member")
                                .from(Orders::Table, Orders::MemberId)
                                .to(Member::Table, Member::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_delivery")
                                .from(Orders::Table, Orders::DeliveryId)
                                .to(Delivery::Table, Delivery::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItem::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItem::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderItem::OrderId).big_integer().not_null())
                        .col(ColumnDef::new(OrderItem::ItemId).big_integer().not_null())
                        .col(super::money_column(manager, OrderItem::OrderPrice).not_null())
                        .col(ColumnDef::new(OrderItem::Count).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_item_order")
                                .from(OrderItem::Table, OrderItem::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_item_item")
                                .from(OrderItem::Table, OrderItem::ItemId)
                                .to(Item::Table, Item::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_member_id")
                        .table(Orders::Table)
                        .col(Orders::MemberId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_item_order_id")
                        .table(OrderItem::Table)
                        .col(OrderItem::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItem::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Delivery::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Delivery {
        Table,
        Id,
        City,
        Street,
        Zipcode,
        Status,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        MemberId,
        DeliveryId,
        OrderDate,
        Status,
    }

    #[derive(DeriveIden)]
    enum OrderItem {
        Table,
        Id,
        OrderId,
        ItemId,
        OrderPrice,
        Count,
    }
}
