//! End-to-end: resolve the user's location, then rank the branch list against it.

use salon_finder::{find_nearest, LocationResolver, ProviderKind, ProviderSpec, Salon};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn branches() -> Vec<Salon> {
    serde_json::from_value(serde_json::json!([
        {"id": 1, "name": "Parramatta", "address": "Church St", "suburb": "Parramatta",
         "state": "NSW", "postcode": "2150", "phone": "02 9000 0001",
         "lat": -33.8121, "lon": 151.0049},
        {"id": 2, "name": "Collins", "address": "Collins St", "suburb": "Melbourne",
         "state": "VIC", "postcode": "3000", "lat": -37.8136, "lon": 144.9631},
        {"id": 3, "name": "Not Geocoded", "address": "Unknown", "suburb": "Sydney",
         "state": "NSW", "postcode": "2000", "lat": null, "lon": null}
    ]))
    .expect("fixture should parse")
}

#[tokio::test]
async fn resolved_location_picks_the_closest_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": -33.8688,
            "longitude": 151.2093,
            "city": "Sydney",
            "region": "New South Wales",
            "country": "Australia"
        })))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(
        vec![ProviderSpec::new("proxy", &server.uri(), 500, ProviderKind::Proxy)],
        Duration::from_millis(1),
        3,
    )
    .expect("resolver construction should not fail");

    let location = resolver.resolve_default().await.expect("should resolve");
    let nearest = find_nearest(location.coordinate(), &branches(), None).expect("should rank");

    assert_eq!(nearest.candidate.id().as_deref(), Some("1"));
    assert_eq!(nearest.distance_km, 20);

    let rendered = serde_json::to_value(&nearest).expect("should serialize");
    assert_eq!(rendered["phone"], "02 9000 0001");
    assert_eq!(rendered["distance"], 20);
}

#[tokio::test]
async fn unresolved_location_yields_no_branch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(
        vec![ProviderSpec::new("proxy", &server.uri(), 500, ProviderKind::Proxy)],
        Duration::from_millis(1),
        2,
    )
    .expect("resolver construction should not fail");

    let location = resolver.resolve_default().await;
    let nearest = find_nearest(location.and_then(|l| l.coordinate()), &branches(), None);
    assert!(nearest.is_none());
}
