//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the catalogue, wishlist and health endpoints
//! - **Schemas**: request and response DTOs plus the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep utoipa out of the domain
//! - **Security**: bearer token scheme naming the calling user
//!
//! Swagger UI serves the document at `/docs` in debug builds.

use crate::inbound::http::comics_dto::{
    ComicListResponse, ComicRequest, ComicResponse, CreatedResponse, MessageResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token whose payload `sub` names the calling user. The signature is not verified.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Comics marketplace API",
        description = "Catalogue browsing, wishlists, purchases and admin curation of comics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::comics::list_comics,
        crate::inbound::http::comics::create_comic,
        crate::inbound::http::comics::get_comic,
        crate::inbound::http::comics::update_comic,
        crate::inbound::http::comics::delete_comic,
        crate::inbound::http::comics::add_to_wishlist,
        crate::inbound::http::comics::purchase_comic,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ComicRequest,
        ComicResponse,
        ComicListResponse,
        CreatedResponse,
        MessageResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "comics", description = "Catalogue browsing and admin curation"),
        (name = "wishlist", description = "Per-user wishlist and purchases"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
