use axum::extract::{rejection::QueryRejection, OriginalUri, Query, State};
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

use crate::api::pagination_headers;
use crate::database::models::{Protocol, ProtocolContent, ProtocolPdfFile};
use crate::database::{Entity, PageRequest, Sort};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::EntityRef;

/// Value of `filter` selecting records without a protocol
pub const PROTOCOL_IS_NULL: &str = "protocol-is-null";

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl PageParams {
    /// Resolve against the configured default and cap. A size of 0 means
    /// the default.
    pub fn into_request<T: Entity>(self, default_size: u32, max_size: u32) -> Result<PageRequest, ApiError> {
        let size = match self.size {
            None | Some(0) => default_size,
            Some(size) => size,
        }
        .min(max_size)
        .max(1);

        let sort = self
            .sort
            .as_deref()
            .map(Sort::parse::<T>)
            .transpose()
            .map_err(ApiError::bad_request)?;

        Ok(PageRequest {
            page: self.page.unwrap_or(0),
            size,
            sort,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub filter: Option<String>,
}

/// Kinds held by a protocol through a one-to-one link
pub trait ProtocolPartner: Entity {
    fn linked_from(protocol: &Protocol) -> Option<EntityRef>;
}

impl ProtocolPartner for ProtocolContent {
    fn linked_from(protocol: &Protocol) -> Option<EntityRef> {
        protocol.protocol_content
    }
}

impl ProtocolPartner for ProtocolPdfFile {
    fn linked_from(protocol: &Protocol) -> Option<EntityRef> {
        protocol.protocol_pdf_file
    }
}

/// GET /api/{kind}
pub async fn list_all<T: Entity>(State(state): State<AppState>) -> ApiResult<Vec<T>> {
    debug!("REST request to get all {}", T::NAME);
    let items = T::store(&state.stores).list_all().await?;
    Ok(ApiResponse::success(items))
}

/// GET /api/{kind}?page=&size=&sort=
pub async fn list_paged<T: Entity>(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Vec<T>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    debug!("REST request to get a page of {} : {:?}", T::NAME, params);

    let request = params.into_request::<T>(state.api.default_page_size, state.api.max_page_size)?;
    let page = T::store(&state.stores).list_page(&request).await?;
    let headers = pagination_headers(&uri, &page);
    Ok(ApiResponse::success(page.items).with_headers(headers))
}

/// GET /api/{kind}?filter=protocol-is-null
///
/// Any other filter value, or none, lists every record.
pub async fn list_unattached<T: ProtocolPartner>(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> ApiResult<Vec<T>> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let items = T::store(&state.stores).list_all().await?;

    if params.filter.as_deref() != Some(PROTOCOL_IS_NULL) {
        debug!("REST request to get all {}", T::NAME);
        return Ok(ApiResponse::success(items));
    }

    debug!("REST request to get all {} where protocol is null", T::NAME);
    let linked: HashSet<i64> = state
        .stores
        .protocols
        .list_all()
        .await?
        .iter()
        .filter_map(|p| T::linked_from(p).map(|r| r.id))
        .collect();
    let unattached = items
        .into_iter()
        .filter(|item| item.id().map_or(true, |id| !linked.contains(&id)))
        .collect();
    Ok(ApiResponse::success(unattached))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_apply() {
        let request = PageParams::default().into_request::<Protocol>(20, 2000).unwrap();
        assert_eq!(request, PageRequest { page: 0, size: 20, sort: None });
    }

    #[test]
    fn page_size_is_capped() {
        let params = PageParams { page: Some(2), size: Some(5000), sort: None };
        let request = params.into_request::<Protocol>(20, 2000).unwrap();
        assert_eq!(request.size, 2000);
        assert_eq!(request.page, 2);
    }

    #[test]
    fn zero_size_means_default() {
        let params = PageParams { size: Some(0), ..Default::default() };
        assert_eq!(params.into_request::<Protocol>(20, 2000).unwrap().size, 20);
    }

    #[test]
    fn unknown_sort_is_a_bad_request() {
        let params = PageParams { sort: Some("nonsense".to_string()), ..Default::default() };
        let err = params.into_request::<Protocol>(20, 2000).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn partners_read_their_own_link() {
        let protocol = Protocol {
            protocol_content: Some(EntityRef::new(5)),
            ..Default::default()
        };
        assert_eq!(ProtocolContent::linked_from(&protocol), Some(EntityRef::new(5)));
        assert_eq!(ProtocolPdfFile::linked_from(&protocol), None);
    }
}
