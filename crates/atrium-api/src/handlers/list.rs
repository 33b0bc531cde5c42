//! List-query execution and the `Content-Range` response.

use atrium_core::{AppError, ListParams, QuerySpec, RangeDescriptor, Resource};
use atrium_db::ResourceStore;
use axum::{
    http::{header::CONTENT_RANGE, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// One list response: the records plus, for bounded requests, the range header
#[derive(Debug)]
pub struct ListPage<R> {
    pub records: Vec<R>,
    pub range: Option<RangeDescriptor>,
}

impl<R: Serialize> IntoResponse for ListPage<R> {
    fn into_response(self) -> Response {
        let mut response = Json(self.records).into_response();
        if let Some(range) = self.range {
            match HeaderValue::from_str(&range.to_string()) {
                Ok(value) => {
                    response.headers_mut().insert(CONTENT_RANGE, value);
                }
                Err(e) => tracing::error!(error = %e, "Invalid Content-Range value"),
            }
        }
        response
    }
}

/// Parse list parameters and run them against a store.
///
/// Bounded requests fetch the page and the filtered total concurrently.
pub async fn run_list<R: Resource>(
    store: &dyn ResourceStore<R>,
    params: &ListParams,
) -> Result<ListPage<R>, AppError> {
    let spec = R::spec();
    let query = QuerySpec::parse(params, spec)?;

    let Some(window) = query.window else {
        let records = store.find_many(&query.filter, &query.sort, 0, None).await?;
        return Ok(ListPage {
            records,
            range: None,
        });
    };

    let (total, records) = tokio::try_join!(
        store.count(&query.filter),
        store.find_many(
            &query.filter,
            &query.sort,
            window.skip(),
            Some(window.take())
        ),
    )?;

    Ok(ListPage {
        records,
        range: Some(RangeDescriptor::new(spec.name, window, total)),
    })
}
