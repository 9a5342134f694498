//! Mock data sources for isolating list views in tests.

use mockall::mock;

use crate::domain::client::Client;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ListQuery, ListSource};

mock! {
    pub ClientSource {}

    impl ListSource<Client> for ClientSource {
        fn list(&self, query: ListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    }
}
