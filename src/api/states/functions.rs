use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::{
    api::countries::functions::require_country,
    database::{
        models::{city, country, state},
        ConnectionManager,
    },
    errors::AppError,
    services::{now, CrudService, Pagination},
};

use super::structures::{CreateState, StateFilter, StateResponse, UpdateState};

async fn find_state_with_country<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<(state::Model, Option<country::Model>), AppError> {
    state::Entity::find_by_id(id)
        .find_also_related(country::Entity)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("State {} not found", id)))
}

pub(crate) async fn find_state<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<state::Model, AppError> {
    state::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("State {} not found", id)))
}

pub(crate) async fn require_state<C: ConnectionTrait>(
    conn: &C,
    field: &str,
    id: i32,
) -> Result<state::Model, AppError> {
    state::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::invalid(field, format!("state {} does not exist", id)))
}

/// Name and code are each unique within one country.
async fn ensure_unique_in_country<C: ConnectionTrait>(
    conn: &C,
    country_id: i32,
    name: &str,
    code: &str,
    exclude: Option<i32>,
) -> Result<(), AppError> {
    let mut query = state::Entity::find()
        .filter(state::Column::CountryId.eq(country_id))
        .filter(
            Condition::any()
                .add(state::Column::Name.eq(name))
                .add(state::Column::Code.eq(code)),
        );
    if let Some(id) = exclude {
        query = query.filter(state::Column::Id.ne(id));
    }

    if let Some(existing) = query.one(conn).await? {
        let clash = if existing.name == name {
            format!("name {}", name)
        } else {
            format!("code {}", code)
        };
        log::warn!("Rejected state with duplicate {} in country {}", clash, country_id);
        return Err(AppError::Conflict(format!(
            "State with {} already exists in country {}",
            clash, country_id
        )));
    }
    Ok(())
}

pub struct StateService<'a> {
    db: &'a ConnectionManager,
}

impl<'a> StateService<'a> {
    pub fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }
}

impl CrudService for StateService<'_> {
    type Create = CreateState;
    type Update = UpdateState;
    type Filter = StateFilter;
    type Output = StateResponse;

    async fn create(&self, input: CreateState) -> Result<StateResponse, AppError> {
        let session = self.db.open_session().await?;

        let parent = require_country(session.conn(), "country_id", input.country_id).await?;
        ensure_unique_in_country(session.conn(), parent.id, &input.name, &input.code, None)
            .await?;

        let timestamp = now();
        let created = state::ActiveModel {
            country_id: Set(parent.id),
            name: Set(input.name),
            code: Set(input.code),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
            ..Default::default()
        }
        .insert(session.conn())
        .await?;

        session.commit().await?;
        log::info!("Created state {} ({}) in country {}", created.id, created.code, parent.id);
        Ok(StateResponse::from_parts(created, Some(parent)))
    }

    async fn get(&self, id: i32) -> Result<StateResponse, AppError> {
        let session = self.db.open_session().await?;
        let (found, parent) = find_state_with_country(session.conn(), id).await?;
        log::debug!("Loaded state {}", id);
        session.commit().await?;
        Ok(StateResponse::from_parts(found, parent))
    }

    async fn list(&self, filter: StateFilter, page: Pagination) -> Result<Vec<StateResponse>, AppError> {
        let session = self.db.open_session().await?;

        let mut query = state::Entity::find();
        if let Some(country_id) = filter.country_id {
            query = query.filter(state::Column::CountryId.eq(country_id));
        }
        let rows = query
            .find_also_related(country::Entity)
            .order_by_asc(state::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(session.conn())
            .await?;

        session.commit().await?;
        Ok(rows
            .into_iter()
            .map(|(found, parent)| StateResponse::from_parts(found, parent))
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateState) -> Result<StateResponse, AppError> {
        let session = self.db.open_session().await?;
        let (current, current_parent) = find_state_with_country(session.conn(), id).await?;

        if input.is_noop(&current) {
            session.commit().await?;
            return Ok(StateResponse::from_parts(current, current_parent));
        }

        let parent = match input.country_id {
            Some(country_id) if country_id != current.country_id => {
                Some(require_country(session.conn(), "country_id", country_id).await?)
            }
            _ => current_parent,
        };

        let country_id = input.country_id.unwrap_or(current.country_id);
        let name = input.name.unwrap_or_else(|| current.name.clone());
        let code = input.code.unwrap_or_else(|| current.code.clone());
        ensure_unique_in_country(session.conn(), country_id, &name, &code, Some(id)).await?;

        let mut active: state::ActiveModel = current.into();
        active.country_id = Set(country_id);
        active.name = Set(name);
        active.code = Set(code);
        active.updated_at = Set(now());
        let updated = active.update(session.conn()).await?;

        session.commit().await?;
        log::info!("Updated state {}", id);
        Ok(StateResponse::from_parts(updated, parent))
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let session = self.db.open_session().await?;
        find_state(session.conn(), id).await?;

        let cities = city::Entity::find()
            .filter(city::Column::StateId.eq(id))
            .count(session.conn())
            .await?;
        if cities > 0 {
            session.rollback().await?;
            return Err(AppError::Conflict(format!(
                "State {} still has {} cities",
                id, cities
            )));
        }

        state::Entity::delete_by_id(id).exec(session.conn()).await?;
        session.commit().await?;
        log::info!("Deleted state {}", id);
        Ok(())
    }
}
