use serde::Deserialize;

use crate::models::ItemType;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogSearchParams {
    pub search: Option<String>,
    pub item_type: Option<ItemType>,
    pub limit: Option<usize>,
}
