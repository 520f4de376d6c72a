// Role-capability resolver
// Pure mapping from provider sub-type to feature visibility, consumed by
// the provider navigation. No I/O, total over the sub-type enum.

use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::models::ProviderType;

/// Service management belongs to the appointment-style providers: vets and
/// groomers. Shops sell goods, they do not publish services.
pub fn can_manage_services(provider_type: Option<ProviderType>) -> bool {
    matches!(
        provider_type,
        Some(ProviderType::Vet) | Some(ProviderType::Babysitter)
    )
}

/// Bookings exist wherever services do.
pub fn can_manage_bookings(provider_type: Option<ProviderType>) -> bool {
    can_manage_services(provider_type)
}

pub fn can_manage_inventory(provider_type: Option<ProviderType>) -> bool {
    matches!(provider_type, Some(ProviderType::Shop))
}

pub fn can_access_vet_features(provider_type: Option<ProviderType>) -> bool {
    matches!(provider_type, Some(ProviderType::Vet))
}

/// Display label. `babysitter` stays on the wire while the product calls
/// them groomers.
pub fn provider_type_label(provider_type: Option<ProviderType>) -> &'static str {
    match provider_type {
        Some(ProviderType::Vet) => "Vet",
        Some(ProviderType::Shop) => "Shop Owner",
        Some(ProviderType::Babysitter) => "Groomer",
        None => "Provider",
    }
}

/// One entry of the provider sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NavItem {
    pub label: &'static str,
    pub route: &'static str,
}

/// Provider navigation derived from the capability flags. A provider with
/// no sub-type on record is valid but feature-restricted: Dashboard,
/// Posts, Profile, Feedback only.
pub fn provider_nav_items(provider_type: Option<ProviderType>) -> Vec<NavItem> {
    let mut items = vec![NavItem {
        label: "Dashboard",
        route: "/provider/dashboard",
    }];
    if can_manage_services(provider_type) {
        items.push(NavItem {
            label: "Services",
            route: "/provider/services",
        });
    }
    if can_manage_bookings(provider_type) {
        items.push(NavItem {
            label: "Bookings",
            route: "/provider/bookings",
        });
    }
    if can_manage_inventory(provider_type) {
        items.push(NavItem {
            label: "Inventory",
            route: "/provider/inventory",
        });
    }
    if can_access_vet_features(provider_type) {
        items.push(NavItem {
            label: "Consultations",
            route: "/provider/consultations",
        });
    }
    items.push(NavItem {
        label: "Posts",
        route: "/provider/posts",
    });
    items.push(NavItem {
        label: "Profile",
        route: "/provider/profile",
    });
    items.push(NavItem {
        label: "Feedback",
        route: "/provider/feedback",
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_capability_table() {
        assert!(can_manage_services(Some(ProviderType::Vet)));
        assert!(can_manage_services(Some(ProviderType::Babysitter)));
        assert!(!can_manage_services(Some(ProviderType::Shop)));
        assert!(!can_manage_services(None));

        assert!(can_manage_inventory(Some(ProviderType::Shop)));
        assert!(!can_manage_inventory(Some(ProviderType::Vet)));
        assert!(!can_manage_inventory(None));

        assert!(can_access_vet_features(Some(ProviderType::Vet)));
        assert!(!can_access_vet_features(Some(ProviderType::Babysitter)));
        assert!(!can_access_vet_features(Some(ProviderType::Shop)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(provider_type_label(Some(ProviderType::Vet)), "Vet");
        assert_eq!(provider_type_label(Some(ProviderType::Shop)), "Shop Owner");
        assert_eq!(
            provider_type_label(Some(ProviderType::Babysitter)),
            "Groomer"
        );
        assert_eq!(provider_type_label(None), "Provider");
    }

    #[test]
    fn test_restricted_provider_nav() {
        let labels: Vec<&str> = provider_nav_items(None)
            .iter()
            .map(|item| item.label)
            .collect();
        assert_eq!(labels, vec!["Dashboard", "Posts", "Profile", "Feedback"]);
    }

    #[test]
    fn test_shop_nav_has_inventory_but_no_services() {
        let labels: Vec<&str> = provider_nav_items(Some(ProviderType::Shop))
            .iter()
            .map(|item| item.label)
            .collect();
        assert!(labels.contains(&"Inventory"));
        assert!(!labels.contains(&"Services"));
        assert!(!labels.contains(&"Consultations"));
    }

    #[test]
    fn test_vet_nav_has_services_bookings_consultations() {
        let labels: Vec<&str> = provider_nav_items(Some(ProviderType::Vet))
            .iter()
            .map(|item| item.label)
            .collect();
        assert!(labels.contains(&"Services"));
        assert!(labels.contains(&"Bookings"));
        assert!(labels.contains(&"Consultations"));
        assert!(!labels.contains(&"Inventory"));
    }

    fn any_provider_type() -> impl Strategy<Value = Option<ProviderType>> {
        prop_oneof![
            Just(None),
            Just(Some(ProviderType::Vet)),
            Just(Some(ProviderType::Shop)),
            Just(Some(ProviderType::Babysitter)),
        ]
    }

    proptest! {
        // Bookings and services are granted together, always.
        #[test]
        fn prop_bookings_follow_services(provider_type in any_provider_type()) {
            prop_assert_eq!(
                can_manage_bookings(provider_type),
                can_manage_services(provider_type)
            );
        }

        // The nav always carries the four base entries and routes stay
        // inside the provider section.
        #[test]
        fn prop_nav_is_well_formed(provider_type in any_provider_type()) {
            let items = provider_nav_items(provider_type);
            for base in ["Dashboard", "Posts", "Profile", "Feedback"] {
                prop_assert!(items.iter().any(|item| item.label == base));
            }
            for item in &items {
                prop_assert!(item.route.starts_with("/provider/"));
            }
        }
    }
}
