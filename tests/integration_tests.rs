// Integration tests for Rental Match

use rental_match::core::{Matcher, distance::distance_km, calculate_match_score};
use rental_match::models::{
    FurnishedStatus, GeoPoint, PreferenceVector, Property, PropertyCard, RadiusPolicy,
    SearchRequest, SelectionStage, SortKey, TenantType, WaterFacility,
};
use uuid::Uuid;

fn create_test_property(
    id: u128,
    lat: f64,
    lon: f64,
    rent: f64,
    rooms: u32,
    wifi: bool,
) -> Property {
    Property {
        id: Uuid::from_u128(id),
        owner_id: Uuid::from_u128(id + 9000),
        title: format!("Listing {}", id),
        location: GeoPoint::new(lat, lon),
        rent_amount: rent,
        rooms,
        bathrooms: 1,
        furnished: FurnishedStatus::SemiFurnished,
        water: WaterFacility::AllDay,
        wifi,
        parking: false,
        preferred_tenant: TenantType::Any,
        is_available: true,
        image_paths: vec![],
        created_at: None,
    }
}

fn kathmandu_preferences() -> PreferenceVector {
    let mut prefs = PreferenceVector::at(GeoPoint::new(27.70, 85.32));
    prefs.radius_km = Some(3.0);
    prefs.min_rooms = Some(2);
    prefs.max_rent = Some(50000.0);
    prefs.wifi_required = true;
    prefs
}

#[test]
fn test_integration_kathmandu_scenario() {
    let matcher = Matcher::default();
    let property_a = create_test_property(1, 27.70, 85.32, 40000.0, 2, true);
    let property_b = create_test_property(2, 27.80, 85.40, 60000.0, 1, false);
    let prefs = kathmandu_preferences();

    // B sits well beyond both the preferred and the fallback radius
    let b_distance = distance_km(prefs.origin, property_b.location);
    assert!(b_distance > 5.0, "Expected B beyond 5 km, got {}", b_distance);
    assert_eq!(calculate_match_score(&property_b, &prefs), 0);

    let request = SearchRequest {
        preferences: Some(prefs),
        sort_key: SortKey::Match,
        ..Default::default()
    };
    let result = matcher.search(vec![property_a, property_b], &request);

    // A is in range, so no widening happens and B is excluded
    assert_eq!(result.stage, SelectionStage::Preferred(3.0));
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].property.id, Uuid::from_u128(1));
    assert_eq!(result.results[0].distance_km, 0.0);
    assert_eq!(result.results[0].match_score, 100);
}

#[test]
fn test_integration_fallback_to_full_pool_sorts_by_match() {
    let matcher = Matcher::default();
    // Shift the tenant so neither listing is within 5 km
    let mut prefs = kathmandu_preferences();
    prefs.origin = GeoPoint::new(27.60, 85.20);

    let property_b = create_test_property(2, 27.80, 85.40, 60000.0, 1, false);
    let property_a = create_test_property(1, 27.70, 85.32, 40000.0, 2, true);

    let request = SearchRequest {
        preferences: Some(prefs),
        sort_key: SortKey::Match,
        ..Default::default()
    };
    let result = matcher.search(vec![property_b, property_a], &request);

    assert_eq!(result.stage, SelectionStage::Unfiltered);
    assert_eq!(result.results.len(), 2);
    assert_eq!(result.results[0].property.id, Uuid::from_u128(1));
    assert_eq!(result.results[0].match_score, 100);
    assert!(result.results[1].match_score < 100);
}

#[test]
fn test_integration_no_preferences_preserves_fetch_order() {
    let matcher = Matcher::default();
    let pool = vec![
        create_test_property(3, 27.75, 85.30, 30000.0, 3, true),
        create_test_property(1, 27.70, 85.32, 40000.0, 2, true),
        create_test_property(2, 27.80, 85.40, 60000.0, 1, false),
    ];

    let result = matcher.search(pool, &SearchRequest::default());

    assert_eq!(result.stage, SelectionStage::Browse);
    let ids: Vec<u128> = result.results.iter().map(|c| c.property.id.as_u128()).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    for c in &result.results {
        assert_eq!(c.distance_km, 0.0);
        assert_eq!(c.match_score, 0);
    }
}

#[test]
fn test_integration_rent_override_and_sort() {
    let matcher = Matcher::default();
    let pool = vec![
        create_test_property(1, 27.701, 85.32, 40000.0, 2, true),
        create_test_property(2, 27.702, 85.32, 18000.0, 1, true),
        create_test_property(3, 27.703, 85.32, 26000.0, 2, false),
        create_test_property(4, 27.704, 85.32, 55000.0, 4, true),
    ];

    let request = SearchRequest {
        preferences: Some(kathmandu_preferences()),
        max_rent_override: Some(40000.0),
        sort_key: SortKey::Rent,
        limit: None,
    };
    let result = matcher.search(pool, &request);

    let rents: Vec<f64> = result.results.iter().map(|c| c.property.rent_amount).collect();
    assert_eq!(rents, vec![18000.0, 26000.0, 40000.0]);
}

#[test]
fn test_integration_distance_sort() {
    let matcher = Matcher::default();
    let pool = vec![
        create_test_property(1, 27.720, 85.32, 20000.0, 2, true),
        create_test_property(2, 27.705, 85.32, 20000.0, 2, true),
        create_test_property(3, 27.712, 85.32, 20000.0, 2, true),
    ];

    let request = SearchRequest {
        preferences: Some(kathmandu_preferences()),
        sort_key: SortKey::Distance,
        ..Default::default()
    };
    let result = matcher.search(pool, &request);

    let ids: Vec<u128> = result.results.iter().map(|c| c.property.id.as_u128()).collect();
    assert_eq!(ids, vec![2, 3, 1]);
    assert!(result
        .results
        .windows(2)
        .all(|w| w[0].distance_km <= w[1].distance_km));
}

#[test]
fn test_integration_configured_widening_chain() {
    let matcher = Matcher::new(RadiusPolicy {
        default_radius_km: 1.0,
        fallback_radii_km: vec![2.0, 12.0],
    });
    let mut prefs = kathmandu_preferences();
    prefs.radius_km = None;

    let pool = vec![
        create_test_property(1, 27.80, 85.40, 20000.0, 2, true), // ~13.6 km
        create_test_property(2, 27.75, 85.36, 20000.0, 2, true), // ~6.9 km
    ];

    let request = SearchRequest {
        preferences: Some(prefs),
        ..Default::default()
    };
    let result = matcher.search(pool, &request);

    assert_eq!(result.stage, SelectionStage::Widened(12.0));
    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].property.id, Uuid::from_u128(2));
}

#[test]
fn test_integration_property_card_links() {
    let matcher = Matcher::default();
    let mut property = create_test_property(1, 27.70, 85.32, 40000.0, 2, true);
    property.image_paths = vec!["https://cdn.test/a.jpg".to_string()];

    let result = matcher.search(vec![property], &SearchRequest::default());
    let card = PropertyCard::from(result.results.into_iter().next().unwrap());

    assert_eq!(card.detail_path, format!("/property/{}", Uuid::from_u128(1)));
    assert_eq!(
        card.contact_path,
        format!(
            "/messages?property={}&owner={}",
            Uuid::from_u128(1),
            Uuid::from_u128(9001)
        )
    );
    assert_eq!(card.cover_image.as_deref(), Some("https://cdn.test/a.jpg"));
}
