//! Comic catalogue HTTP handlers.
//!
//! ```text
//! GET    /comics                         Browse the catalogue
//! POST   /comics                         Create a comic (admin)
//! GET    /comics/{id}                    Fetch one comic
//! PUT    /comics/{id}                    Edit a comic (admin)
//! DELETE /comics/{id}                    Delete a comic (admin)
//! POST   /comics/{id}/add_to_wishlist    Add to the caller's wishlist
//! POST   /comics/{id}/purchase           Record a purchase
//! ```
//!
//! Every handler resolves the request identity before checking its route
//! policy, so a malformed `Authorization` header fails even on public routes.

use actix_web::{delete, get, post, put, web};

use crate::domain::AccessPolicy;
use crate::inbound::http::ApiResult;
use crate::inbound::http::comics_dto::{
    ComicListResponse, ComicRequest, ComicResponse, CreatedResponse, ListComicsQuery,
    MessageResponse,
};
use crate::inbound::http::identity::RequestIdentity;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_comic_id, parse_page};

pub(crate) const CREATED_MESSAGE: &str = "Comic created";
pub(crate) const UPDATED_MESSAGE: &str = "Comic updated";
pub(crate) const DELETED_MESSAGE: &str = "Comic deleted";
pub(crate) const WISHLISTED_MESSAGE: &str = "Comic added to user wishlist";
pub(crate) const PURCHASED_MESSAGE: &str = "Comic purchased";

/// Register every catalogue route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_comics)
        .service(create_comic)
        .service(get_comic)
        .service(update_comic)
        .service(delete_comic)
        .service(add_to_wishlist)
        .service(purchase_comic);
}

/// Browse the catalogue, filtered and paginated 50 comics at a time.
#[utoipa::path(
    get,
    path = "/comics",
    params(ListComicsQuery),
    responses(
        (status = 200, description = "Catalogue page", body = ComicListResponse),
        (status = 400, description = "Invalid filter or page", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comics"],
    security([]),
    operation_id = "listComics"
)]
#[get("/comics")]
pub async fn list_comics(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    query: web::Query<ListComicsQuery>,
) -> ApiResult<web::Json<ComicListResponse>> {
    identity.authorize(AccessPolicy::Public)?;
    let page = parse_page(query.page.as_deref())?;
    let filter = query.to_filter()?;
    let (comics, window) = state
        .catalogue
        .list_comics(filter, page)
        .await?
        .into_parts();

    Ok(web::Json(ComicListResponse {
        comics: comics.into_iter().map(ComicResponse::from).collect(),
        page: window.page(),
        pages: window.total_pages(),
        total: window.total_items(),
    }))
}

/// Add a comic to the catalogue.
#[utoipa::path(
    post,
    path = "/comics",
    request_body = ComicRequest,
    responses(
        (status = 200, description = "Comic created", body = CreatedResponse),
        (status = 400, description = "Invalid comic", body = ErrorSchema),
        (status = 403, description = "Caller is not an administrator", body = ErrorSchema),
        (status = 500, description = "Title already exists or internal server error", body = ErrorSchema)
    ),
    tags = ["comics"],
    operation_id = "createComic"
)]
#[post("/comics")]
pub async fn create_comic(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    payload: web::Json<ComicRequest>,
) -> ApiResult<web::Json<CreatedResponse>> {
    identity.authorize(AccessPolicy::AdminOnly)?;
    let draft = payload.into_inner().into_new_comic()?;
    let id = state.admin.create(draft).await?;
    Ok(web::Json(CreatedResponse {
        created_id: id.to_string(),
        message: CREATED_MESSAGE.to_owned(),
    }))
}

/// Fetch a single comic.
#[utoipa::path(
    get,
    path = "/comics/{id}",
    params(("id" = String, Path, description = "Comic identifier")),
    responses(
        (status = 200, description = "Comic", body = ComicResponse),
        (status = 404, description = "Comic not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comics"],
    security([]),
    operation_id = "getComic"
)]
#[get("/comics/{id}")]
pub async fn get_comic(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComicResponse>> {
    identity.authorize(AccessPolicy::Public)?;
    let id = parse_comic_id(&path)?;
    let comic = state.catalogue.fetch_comic(&id).await?;
    Ok(web::Json(ComicResponse::from(comic)))
}

/// Edit the supplied fields of a comic.
#[utoipa::path(
    put,
    path = "/comics/{id}",
    params(("id" = String, Path, description = "Comic identifier")),
    request_body = ComicRequest,
    responses(
        (status = 200, description = "Comic updated", body = MessageResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 403, description = "Caller is not an administrator", body = ErrorSchema),
        (status = 404, description = "Comic not found", body = ErrorSchema),
        (status = 500, description = "Title already exists or internal server error", body = ErrorSchema)
    ),
    tags = ["comics"],
    operation_id = "updateComic"
)]
#[put("/comics/{id}")]
pub async fn update_comic(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
    payload: web::Json<ComicRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    identity.authorize(AccessPolicy::AdminOnly)?;
    let id = parse_comic_id(&path)?;
    let patch = payload.into_inner().into_patch()?;
    state.admin.edit(&id, patch).await?;
    Ok(web::Json(MessageResponse::new(UPDATED_MESSAGE)))
}

/// Remove a comic from the catalogue.
#[utoipa::path(
    delete,
    path = "/comics/{id}",
    params(("id" = String, Path, description = "Comic identifier")),
    responses(
        (status = 200, description = "Comic deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorSchema),
        (status = 404, description = "Comic not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comics"],
    operation_id = "deleteComic"
)]
#[delete("/comics/{id}")]
pub async fn delete_comic(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    identity.authorize(AccessPolicy::AdminOnly)?;
    let id = parse_comic_id(&path)?;
    state.admin.delete(&id).await?;
    Ok(web::Json(MessageResponse::new(DELETED_MESSAGE)))
}

/// Add a comic to the caller's wishlist; repeats are ignored.
#[utoipa::path(
    post,
    path = "/comics/{id}/add_to_wishlist",
    params(("id" = String, Path, description = "Comic identifier")),
    responses(
        (status = 200, description = "Comic added to user wishlist", body = MessageResponse),
        (status = 403, description = "Caller is anonymous", body = ErrorSchema),
        (status = 404, description = "Comic not found", body = ErrorSchema),
        (status = 409, description = "Concurrent list updates exhausted retries", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["wishlist"],
    operation_id = "addComicToWishlist"
)]
#[post("/comics/{id}/add_to_wishlist")]
pub async fn add_to_wishlist(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user = identity.require_user()?;
    let id = parse_comic_id(&path)?;
    state.wishlist.add_to_wishlist(user, &id).await?;
    Ok(web::Json(MessageResponse::new(WISHLISTED_MESSAGE)))
}

/// Record a purchase, moving the comic out of the wishlist.
#[utoipa::path(
    post,
    path = "/comics/{id}/purchase",
    params(("id" = String, Path, description = "Comic identifier")),
    responses(
        (status = 200, description = "Comic purchased", body = MessageResponse),
        (status = 403, description = "Caller is anonymous", body = ErrorSchema),
        (status = 404, description = "Comic not found", body = ErrorSchema),
        (status = 409, description = "Concurrent list updates exhausted retries", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["wishlist"],
    operation_id = "purchaseComic"
)]
#[post("/comics/{id}/purchase")]
pub async fn purchase_comic(
    state: web::Data<HttpState>,
    identity: RequestIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let user = identity.require_user()?;
    let id = parse_comic_id(&path)?;
    state.wishlist.purchase(user, &id).await?;
    Ok(web::Json(MessageResponse::new(PURCHASED_MESSAGE)))
}

#[cfg(test)]
#[path = "comics_tests.rs"]
mod tests;
