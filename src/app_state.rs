use crate::database::ConnectionManager;
use crate::errors::AppError;
use crate::services::Pagination;

#[derive(Clone)]
pub struct AppState {
    pub db: ConnectionManager,
    pub max_page_size: u64,
}

impl AppState {
    pub fn new(db: ConnectionManager, max_page_size: u64) -> Self {
        Self {
            db,
            max_page_size: max_page_size.max(1),
        }
    }

    /// Builds the page for a list request, rejecting limits above the configured maximum.
    pub fn page(&self, skip: Option<u64>, limit: Option<u64>) -> Result<Pagination, AppError> {
        let defaults = Pagination::default();
        Pagination::new(
            skip.unwrap_or(defaults.skip),
            limit.unwrap_or_else(|| defaults.limit.min(self.max_page_size)),
        )
        .checked(self.max_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    async fn state(max: u64) -> AppState {
        let conn = Database::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should open");
        AppState::new(ConnectionManager::from_connection(conn), max)
    }

    #[tokio::test]
    async fn page_defaults_respect_configured_maximum() {
        assert_eq!(state(1000).await.page(None, None).unwrap(), Pagination::new(0, 100));
        assert_eq!(state(20).await.page(Some(5), None).unwrap(), Pagination::new(5, 20));
        assert!(state(20).await.page(None, Some(21)).is_err());
    }

    #[tokio::test]
    async fn zero_maximum_is_raised_to_one() {
        let state = state(0).await;
        assert_eq!(state.max_page_size, 1);
        assert_eq!(state.page(None, None).unwrap(), Pagination::new(0, 1));
    }
}
