//! Resource CRUD routes, one set per [`Resource`].

use crate::handlers::entity::{bulk_delete, create, delete as delete_handler, list, read, update};
use crate::resource::Resource;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn resource_routes<R: Resource>(state: AppState) -> Router {
    Router::new()
        .route(
            &format!("/{}", R::PATH),
            get(list::<R>).post(create::<R>).delete(bulk_delete::<R>),
        )
        .route(
            &format!("/{}/:id", R::PATH),
            get(read::<R>)
                .put(update::<R>)
                .patch(update::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(state)
}
