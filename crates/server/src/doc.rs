use crate::dtos::envelope::{ErrorBody, ErrorEnvelope};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
///
/// Paths are collected from the routers; every response body is wrapped in
/// `{"ok": true, "data": ...}`, failures in [`ErrorEnvelope`].
#[derive(OpenApi)]
#[openapi(
    components(schemas(ErrorEnvelope, ErrorBody)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and authentication checks"),
        (name = "Users", description = "Accounts and the caller's own roles"),
        (name = "Labs", description = "Labs and today's attendance"),
        (name = "Courses", description = "Courses and their coordinators"),
        (name = "Groups", description = "Weekly groups of a course"),
        (name = "Weeks", description = "Teaching weeks"),
        (name = "Sessions", description = "Regular and special sessions, and self check-in"),
        (name = "Records", description = "Check-in records"),
        (name = "Make-up sessions", description = "Attendance at another group's session"),
    ),
    info(
        title = "Lab Attendance API",
        version = "1.0.0",
        description = "Attendance tracking for lab sessions",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
