// Gateway-level response models for the guarded section shells

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::capabilities::NavItem;

/// What a guarded section returns once the edge gate has admitted the
/// request; the SPA hydrates the actual page inside this shell.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SectionShell {
    #[schema(example = "admin")]
    pub section: &'static str,
    #[schema(example = "Admin Console")]
    pub title: &'static str,
}

impl SectionShell {
    pub fn new(section: &'static str, title: &'static str) -> Self {
        Self { section, title }
    }
}

/// Provider section shell: the sidebar is derived from the capability
/// resolver, so a shop owner never sees service management and a groomer
/// never sees inventory.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProviderShell {
    #[schema(example = "Shop Owner")]
    pub label: &'static str,
    pub nav: Vec<NavItem>,
}
