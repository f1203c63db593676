//! Search over one table or federated across the whole base.

pub mod federated;
pub mod formula;
pub mod single;

pub use federated::{FederatedParams, search_all_tables};
pub use formula::SearchFormula;
pub use single::{SearchPage, SearchParams, search_table};
