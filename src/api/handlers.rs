//! List and create handlers shared by every resource.

use std::collections::HashMap;

use axum::{http::StatusCode, response::Response};

use crate::api::payload::{build_insert, parse_body};
use crate::api::resources::Resource;
use crate::error::ApiResult;
use crate::http::response;
use crate::http::server::AppState;
use crate::upstream::TableQuery;

/// Query parameter that narrows `GET /messages` to one conversation.
pub const CONVERSATION_FILTER: &str = "conversationId";

/// Build the upstream read for a list request.
pub fn list_query(resource: Resource, params: &HashMap<String, String>) -> TableQuery {
    let query = TableQuery::all().limit(resource.list_limit());

    match (resource, params.get(CONVERSATION_FILTER)) {
        (Resource::Messages, Some(id)) if !id.is_empty() => query.eq("conversation_id", id),
        _ => query,
    }
}

/// `GET /<resource>` - first page of rows, capped per resource.
pub async fn list(
    state: &AppState,
    resource: Resource,
    params: &HashMap<String, String>,
) -> ApiResult<Response> {
    let query = list_query(resource, params);
    let rows = state
        .upstream
        .select(resource.table(), &query)
        .await?
        .into_data()?;

    Ok(response::data(StatusCode::OK, rows))
}

/// `POST /<resource>` - authorize, validate, insert.
pub async fn create(state: &AppState, resource: Resource, body: &[u8]) -> ApiResult<Response> {
    state.write_policy.authorize()?;

    let row = build_insert(resource, &parse_body(body))?;
    let inserted = state
        .upstream
        .insert(resource.table(), &row)
        .await?
        .into_data()?;

    tracing::info!(resource = %resource, "Row created");
    Ok(response::data(StatusCode::CREATED, inserted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn has_param(query: &TableQuery, key: &str, value: &str) -> bool {
        query.params().iter().any(|(k, v)| k == key && v == value)
    }

    #[test]
    fn test_list_query_limits() {
        for resource in Resource::ALL {
            let query = list_query(resource, &HashMap::new());
            assert!(has_param(&query, "select", "*"));
            assert!(has_param(&query, "limit", &resource.list_limit().to_string()));
            assert_eq!(query.params().len(), 2);
        }
    }

    #[test]
    fn test_messages_filter_by_conversation() {
        let query = list_query(Resource::Messages, &params(&[(CONVERSATION_FILTER, "c1")]));
        assert!(has_param(&query, "conversation_id", "eq.c1"));
    }

    #[test]
    fn test_filter_ignored_elsewhere_or_empty() {
        let query = list_query(Resource::Users, &params(&[(CONVERSATION_FILTER, "c1")]));
        assert_eq!(query.params().len(), 2);

        let query = list_query(Resource::Messages, &params(&[(CONVERSATION_FILTER, "")]));
        assert_eq!(query.params().len(), 2);
    }
}
