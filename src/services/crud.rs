use crate::errors::AppError;

pub const DEFAULT_PAGE_LIMIT: u64 = 100;

/// Offset pagination shared by every list operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    pub fn checked(self, max_limit: u64) -> Result<Self, AppError> {
        if self.limit > max_limit {
            return Err(AppError::invalid(
                "limit",
                format!("must be at most {}", max_limit),
            ));
        }
        Ok(self)
    }
}

/// Create/read/update/delete over one resource.
///
/// Every call runs inside its own session: committed when it returns `Ok`,
/// rolled back otherwise. Records come back already mapped to their output schema.
#[allow(async_fn_in_trait)]
pub trait CrudService {
    type Create;
    type Update;
    type Filter: Default;
    type Output;

    /// Fails with `Conflict` when a uniqueness rule would be broken.
    async fn create(&self, input: Self::Create) -> Result<Self::Output, AppError>;

    /// Fails with `NotFound` when no record has this id.
    async fn get(&self, id: i32) -> Result<Self::Output, AppError>;

    /// Ordered by id ascending. An empty page is a success.
    async fn list(&self, filter: Self::Filter, page: Pagination) -> Result<Vec<Self::Output>, AppError>;

    /// Applies only the fields present in `input`. An empty input returns the
    /// record unchanged.
    async fn update(&self, id: i32, input: Self::Update) -> Result<Self::Output, AppError>;

    /// Permanent. Deleting an id that is already gone fails with `NotFound`.
    async fn delete(&self, id: i32) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_capped() {
        assert!(Pagination::new(0, 50).checked(100).is_ok());
        assert!(Pagination::new(0, 100).checked(100).is_ok());
        assert!(matches!(
            Pagination::new(0, 101).checked(100),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn defaults_match_list_contract() {
        let page = Pagination::default();
        assert_eq!((page.skip, page.limit), (0, DEFAULT_PAGE_LIMIT));
    }
}
