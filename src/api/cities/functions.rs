use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::{
    api::states::{functions::require_state, StateResponse},
    database::{
        models::{city, country, state},
        ConnectionManager,
    },
    errors::AppError,
    services::{now, CrudService, Pagination},
};

use super::structures::{CityFilter, CityResponse, CreateCity, UpdateCity};

async fn find_city<C: ConnectionTrait>(conn: &C, id: i32) -> Result<city::Model, AppError> {
    city::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City {} not found", id)))
}

/// Loads the given states with their countries, keyed by state id.
async fn load_states<C: ConnectionTrait>(
    conn: &C,
    state_ids: Vec<i32>,
) -> Result<HashMap<i32, StateResponse>, AppError> {
    if state_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = state::Entity::find()
        .filter(state::Column::Id.is_in(state_ids))
        .find_also_related(country::Entity)
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(found, parent)| (found.id, StateResponse::from_parts(found, parent)))
        .collect())
}

async fn load_state<C: ConnectionTrait>(
    conn: &C,
    state_id: i32,
) -> Result<Option<StateResponse>, AppError> {
    Ok(load_states(conn, vec![state_id]).await?.remove(&state_id))
}

/// Name is unique within a state; so is code, when present.
async fn ensure_unique_in_state<C: ConnectionTrait>(
    conn: &C,
    state_id: i32,
    name: &str,
    code: Option<&str>,
    exclude: Option<i32>,
) -> Result<(), AppError> {
    let mut by_name = city::Entity::find()
        .filter(city::Column::StateId.eq(state_id))
        .filter(city::Column::Name.eq(name));
    if let Some(id) = exclude {
        by_name = by_name.filter(city::Column::Id.ne(id));
    }
    if by_name.count(conn).await? > 0 {
        log::warn!("Rejected city with duplicate name {} in state {}", name, state_id);
        return Err(AppError::Conflict(format!(
            "City with name {} already exists in state {}",
            name, state_id
        )));
    }

    let Some(code) = code else {
        return Ok(());
    };

    let mut by_code = city::Entity::find()
        .filter(city::Column::StateId.eq(state_id))
        .filter(city::Column::Code.eq(code));
    if let Some(id) = exclude {
        by_code = by_code.filter(city::Column::Id.ne(id));
    }
    if by_code.count(conn).await? > 0 {
        log::warn!("Rejected city with duplicate code {} in state {}", code, state_id);
        return Err(AppError::Conflict(format!(
            "City with code {} already exists in state {}",
            code, state_id
        )));
    }
    Ok(())
}

pub struct CityService<'a> {
    db: &'a ConnectionManager,
}

impl<'a> CityService<'a> {
    pub fn new(db: &'a ConnectionManager) -> Self {
        Self { db }
    }
}

impl CrudService for CityService<'_> {
    type Create = CreateCity;
    type Update = UpdateCity;
    type Filter = CityFilter;
    type Output = CityResponse;

    async fn create(&self, input: CreateCity) -> Result<CityResponse, AppError> {
        let session = self.db.open_session().await?;

        let parent = require_state(session.conn(), "state_id", input.state_id).await?;
        ensure_unique_in_state(
            session.conn(),
            parent.id,
            &input.name,
            input.code.as_deref(),
            None,
        )
        .await?;

        let timestamp = now();
        let created = city::ActiveModel {
            state_id: Set(parent.id),
            name: Set(input.name),
            code: Set(input.code),
            created_at: Set(timestamp),
            updated_at: Set(timestamp),
            ..Default::default()
        }
        .insert(session.conn())
        .await?;

        let state = load_state(session.conn(), parent.id).await?;
        session.commit().await?;
        log::info!("Created city {} in state {}", created.id, parent.id);
        Ok(CityResponse::from_parts(created, state))
    }

    async fn get(&self, id: i32) -> Result<CityResponse, AppError> {
        let session = self.db.open_session().await?;
        let found = find_city(session.conn(), id).await?;
        let state = load_state(session.conn(), found.state_id).await?;
        log::debug!("Loaded city {}", id);
        session.commit().await?;
        Ok(CityResponse::from_parts(found, state))
    }

    async fn list(&self, filter: CityFilter, page: Pagination) -> Result<Vec<CityResponse>, AppError> {
        let session = self.db.open_session().await?;

        let mut query = city::Entity::find();
        if let Some(state_id) = filter.state_id {
            query = query.filter(city::Column::StateId.eq(state_id));
        }
        let rows = query
            .order_by_asc(city::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(session.conn())
            .await?;

        let mut state_ids: Vec<i32> = rows.iter().map(|c| c.state_id).collect();
        state_ids.sort_unstable();
        state_ids.dedup();
        let states = load_states(session.conn(), state_ids).await?;

        session.commit().await?;
        Ok(rows
            .into_iter()
            .map(|found| {
                let state = states.get(&found.state_id).cloned();
                CityResponse::from_parts(found, state)
            })
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateCity) -> Result<CityResponse, AppError> {
        let session = self.db.open_session().await?;
        let current = find_city(session.conn(), id).await?;

        if input.is_noop(&current) {
            let state = load_state(session.conn(), current.state_id).await?;
            session.commit().await?;
            return Ok(CityResponse::from_parts(current, state));
        }

        let state_id = match input.state_id {
            Some(state_id) if state_id != current.state_id => {
                require_state(session.conn(), "state_id", state_id).await?.id
            }
            _ => current.state_id,
        };
        let name = input.name.unwrap_or_else(|| current.name.clone());
        let code = input.code.or_else(|| current.code.clone());
        ensure_unique_in_state(session.conn(), state_id, &name, code.as_deref(), Some(id)).await?;

        let mut active: city::ActiveModel = current.into();
        active.state_id = Set(state_id);
        active.name = Set(name);
        active.code = Set(code);
        active.updated_at = Set(now());
        let updated = active.update(session.conn()).await?;

        let state = load_state(session.conn(), updated.state_id).await?;
        session.commit().await?;
        log::info!("Updated city {}", id);
        Ok(CityResponse::from_parts(updated, state))
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let session = self.db.open_session().await?;
        find_city(session.conn(), id).await?;
        city::Entity::delete_by_id(id).exec(session.conn()).await?;
        session.commit().await?;
        log::info!("Deleted city {}", id);
        Ok(())
    }
}
