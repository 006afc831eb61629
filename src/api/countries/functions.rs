use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    database::{
        models::{country, state},
        ConnectionManager,
    },
    errors::AppError,
    services::{now, CrudService, Pagination},
};

use super::structures::{CountryResponse, CreateCountry, UpdateCountry};

pub(crate) async fn find_country<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<country::Model, AppError> {
    country::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Country {} not found", id)))
}

/// Resolves a country referenced by a child payload. A missing parent is the
/// caller's input problem, so it surfaces as a validation error on `field`.
pub(crate) async fn require_country<C: ConnectionTrait>(
    conn: &C,
    field: &str,
    id: i32,
) -> Result<country::Model, AppError> {
    country::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::invalid(field, format!("country {} does not exist", id)))
}

async fn ensure_code_available<C: ConnectionTrait>(
    conn: &C,
    code: &str,
    exclude: Option<i32>,
) -> Result<(), AppError> {
    let mut query = country::Entity::find().filter(country::Column::Code.eq(code));
    if let Some(id) = exclude {
        query = query.filter(country::Column::Id.ne(id));
    }

    if query.count(conn).await? > 0 {
        log::warn!("Rejected country with duplicate code {}", code);
        return Err(AppError::Conflict(format!(
            "Country with code {} already exists",
            code
        )));
    }
    Ok(())
}

pub struct CountryService<'a> {
    db: &'a ConnectionManager,
}

impl<'a> CountryService<'a> {
    pub fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }
}

impl CrudService for CountryService<'_> {
    type Create = CreateCountry;
    type Update = UpdateCountry;
    type Filter = ();
    type Output = CountryResponse;

    async fn create(&self, input: CreateCountry) -> Result<CountryResponse, AppError> {
        let session = self.db.open_session().await?;

        ensure_code_available(session.conn(), &input.code, None).await?;

        let timestamp = now();
        let created = country::ActiveModel {
            name: Set(input.name),
            code: Set(input.code),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
            ..Default::default()
        }
        .insert(session.conn())
        .await?;

        session.commit().await?;
        log::info!("Created country {} ({})", created.id, created.code);
        Ok(created.into())
    }

    async fn get(&self, id: i32) -> Result<CountryResponse, AppError> {
        let session = self.db.open_session().await?;
        let found = find_country(session.conn(), id).await?;
        log::debug!("Loaded country {}", id);
        session.commit().await?;
        Ok(found.into())
    }

    async fn list(&self, _filter: (), page: Pagination) -> Result<Vec<CountryResponse>, AppError> {
        let session = self.db.open_session().await?;
        let rows = country::Entity::find()
            .order_by_asc(country::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(session.conn())
            .await?;
        session.commit().await?;
        Ok(rows.into_iter().map(CountryResponse::from).collect())
    }

    async fn update(&self, id: i32, input: UpdateCountry) -> Result<CountryResponse, AppError> {
        let session = self.db.open_session().await?;
        let current = find_country(session.conn(), id).await?;

        if input.is_noop(&current) {
            session.commit().await?;
            return Ok(current.into());
        }

        if let Some(code) = input.code.as_deref().filter(|code| *code != current.code) {
            ensure_code_available(session.conn(), code, Some(id)).await?;
        }

        let mut active: country::ActiveModel = current.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(code) = input.code {
            active.code = Set(code);
        }
        active.updated_at = Set(now());
        let updated = active.update(session.conn()).await?;

        session.commit().await?;
        log::info!("Updated country {}", id);
        Ok(updated.into())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let session = self.db.open_session().await?;
        find_country(session.conn(), id).await?;

        let states = state::Entity::find()
            .filter(state::Column::CountryId.eq(id))
            .count(session.conn())
            .await?;
        if states > 0 {
            session.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Country {} still has {} state(s)",
                id, states
            )));
        }

        country::Entity::delete_by_id(id).exec(session.conn()).await?;
        session.commit().await?;
        log::info!("Deleted country {}", id);
        Ok(())
    }
}
