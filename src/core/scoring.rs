use crate::models::{PreferenceVector, Property, TenantType};

/// How many of a tenant's criteria a property meets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CriteriaTally {
    pub matched: u32,
    pub total: u32,
}

impl CriteriaTally {
    #[inline]
    fn check(&mut self, satisfied: bool) {
        self.total += 1;
        if satisfied {
            self.matched += 1;
        }
    }

    /// Percentage of criteria met, rounded half up.
    ///
    /// A tally with no criteria scores 0, not 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        // round(100 * m / t) in integer arithmetic
        ((200 * self.matched + self.total) / (2 * self.total)) as u8
    }
}

/// Count the set criteria in `preferences` and how many `property` satisfies
pub fn tally_criteria(property: &Property, preferences: &PreferenceVector) -> CriteriaTally {
    let mut tally = CriteriaTally::default();

    if let Some(min_rooms) = preferences.min_rooms {
        tally.check(property.rooms >= min_rooms);
    }

    if let Some(furnished) = preferences.furnished {
        tally.check(property.furnished == furnished);
    }

    if let Some(water) = preferences.water {
        tally.check(property.water == water);
    }

    // Amenity flags only count when the tenant asks for them
    if preferences.wifi_required {
        tally.check(property.wifi);
    }

    if preferences.parking_required {
        tally.check(property.parking);
    }

    if let Some(max_rent) = preferences.max_rent {
        tally.check(property.rent_amount <= max_rent);
    }

    match preferences.tenant_type {
        None | Some(TenantType::Any) => {}
        Some(tenant_type) => tally.check(
            property.preferred_tenant == TenantType::Any
                || property.preferred_tenant == tenant_type,
        ),
    }

    tally
}

/// Calculate a match score (0-100) for a property against a tenant's preferences
///
/// The score is the share of the tenant's set criteria that the property
/// satisfies. Unset criteria carry no weight; a tenant with no criteria set
/// matches nothing and every property scores 0.
pub fn calculate_match_score(property: &Property, preferences: &PreferenceVector) -> u8 {
    tally_criteria(property, preferences).percent()
}
