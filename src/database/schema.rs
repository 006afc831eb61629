//! Table bootstrap from the entity definitions.
//!
//! Schema evolution belongs to the migration tooling; this only creates what is
//! missing so a fresh database (or a test database) can serve requests.

use sea_orm::sea_query::{Index, Table, TableCreateStatement};
use sea_orm::{ConnectionTrait, DbErr, Schema};

use super::models::{city, country, state};

fn country_table(schema: &Schema) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(country::Entity);
    stmt.if_not_exists();
    stmt
}

fn state_table(schema: &Schema) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(state::Entity);
    stmt.if_not_exists()
        .index(
            Index::create()
                .name("uq_state_country_name")
                .col(state::Column::CountryId)
                .col(state::Column::Name)
                .unique(),
        )
        .index(
            Index::create()
                .name("uq_state_country_code")
                .col(state::Column::CountryId)
                .col(state::Column::Code)
                .unique(),
        );
    stmt
}

fn city_table(schema: &Schema) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(city::Entity);
    stmt.if_not_exists()
        .index(
            Index::create()
                .name("uq_city_state_name")
                .col(city::Column::StateId)
                .col(city::Column::Name)
                .unique(),
        )
        .index(
            Index::create()
                .name("uq_city_state_code")
                .col(city::Column::StateId)
                .col(city::Column::Code)
                .unique(),
        );
    stmt
}

/// Creates the country, state and city tables if they do not exist yet.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Parents first so the foreign keys resolve.
    for stmt in [country_table(&schema), state_table(&schema), city_table(&schema)] {
        db.execute(backend.build(&stmt)).await?;
    }

    log::info!("Schema ready (country, state, city)");
    Ok(())
}

/// Drops the tables, children first.
pub async fn drop_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for stmt in [
        Table::drop().table(city::Entity).if_exists().to_owned(),
        Table::drop().table(state::Entity).if_exists().to_owned(),
        Table::drop().table(country::Entity).if_exists().to_owned(),
    ] {
        db.execute(backend.build(&stmt)).await?;
    }

    log::info!("Dropped tables city, state, country");
    Ok(())
}
