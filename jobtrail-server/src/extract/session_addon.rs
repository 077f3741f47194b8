//! Utoipa addon for the session bearer security scheme.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify,
};

/// Utoipa addon for the session bearer security scheme.
#[derive(Debug)]
pub struct SessionAddon;

impl Modify for SessionAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("Opaque session token"))
                        .build(),
                ),
            )
        }
    }
}
