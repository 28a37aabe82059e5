//! GraphQL transport wiring for axum.

pub mod schema;

pub use schema::{BoardSchema, MutationRoot, QueryRoot, build_schema};

use async_graphql::http::{GraphQLPlaygroundConfig, playground_source};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};

use crate::auth::{self, CurrentUser};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub schema: BoardSchema,
    pub config: Config,
}

pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = req.into_inner();
    if let Some(user_id) = auth::user_id_from_headers(&headers, &state.config.jwt_secret) {
        request = request.data(CurrentUser(user_id));
    }
    state.schema.execute(request).await.into()
}

pub async fn playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new(
        "/api/graphql",
    )))
}
