//! OpenAPI documentation definition.

use utoipa::OpenApi;

use crate::handlers::{RegionView, RegionsView};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::handle_health,
        crate::handlers::handle_regions,
        crate::handlers::handle_region,
    ),
    components(schemas(RegionsView, RegionView)),
    info(
        title = "pagedash API",
        version = "1.0",
        description = "Persistence service dashboard: rendered display regions and their change stream"
    )
)]
pub(crate) struct ApiDoc;
