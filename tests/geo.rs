use hotel_order_api::domain::{
    geo::{Coordinates, GeoError, bearing_degrees, eta_minutes, haversine_km},
    qr::{hotel_menu_url, parse_hotel_ref},
};
use uuid::Uuid;

fn at(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).expect("valid coordinates")
}

#[test]
fn one_degree_of_longitude_at_equator() {
    let distance = haversine_km(at(0.0, 0.0), at(0.0, 1.0));
    assert!((distance - 111.195).abs() < 0.01, "got {distance}");
}

#[test]
fn distance_is_symmetric_and_zero_for_same_point() {
    let jakarta = at(-6.2088, 106.8456);
    let bandung = at(-6.9175, 107.6191);
    let there = haversine_km(jakarta, bandung);
    let back = haversine_km(bandung, jakarta);
    assert!((there - back).abs() < 1e-9);
    assert!(there > 110.0 && there < 120.0, "got {there}");
    assert_eq!(haversine_km(jakarta, jakarta), 0.0);
}

#[test]
fn bearing_follows_compass_points() {
    let origin = at(0.0, 0.0);
    let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
    assert!(close(bearing_degrees(origin, at(1.0, 0.0)), 0.0));
    assert!(close(bearing_degrees(origin, at(0.0, 1.0)), 90.0));
    assert!(close(bearing_degrees(origin, at(-1.0, 0.0)), 180.0));
    assert!(close(bearing_degrees(origin, at(0.0, -1.0)), 270.0));
}

#[test]
fn bearing_stays_in_range() {
    let bearing = bearing_degrees(at(10.0, 10.0), at(9.0, 9.0));
    assert!((0.0..360.0).contains(&bearing), "got {bearing}");
}

#[test]
fn rejects_out_of_range_coordinates() {
    assert_eq!(Coordinates::new(91.0, 0.0), Err(GeoError::Latitude(91.0)));
    assert_eq!(
        Coordinates::new(0.0, -180.5),
        Err(GeoError::Longitude(-180.5))
    );
    assert!(Coordinates::new(f64::NAN, 0.0).is_err());
}

#[test]
fn eta_rounds_up_to_whole_minutes() {
    assert_eq!(eta_minutes(5.0, 20.0), 15);
    assert_eq!(eta_minutes(12.5, 25.0), 30);
    assert_eq!(eta_minutes(0.1, 25.0), 1);
    assert_eq!(eta_minutes(0.0, 25.0), 0);
    assert_eq!(eta_minutes(5.0, 0.0), 0);
}

#[test]
fn hotel_menu_url_uses_ref_query() {
    let id = Uuid::new_v4();
    assert_eq!(
        hotel_menu_url("https://order.example.com", id),
        format!("https://order.example.com/hotel-menu?ref={id}")
    );
    assert_eq!(
        hotel_menu_url("https://order.example.com/", id),
        format!("https://order.example.com/hotel-menu?ref={id}")
    );
}

#[test]
fn parses_hotel_reference() {
    let id = Uuid::new_v4();
    assert_eq!(parse_hotel_ref(&id.to_string()), Some(id));
    assert_eq!(parse_hotel_ref(&format!(" {id} ")), Some(id));
    assert_eq!(parse_hotel_ref("room-12"), None);
    assert_eq!(parse_hotel_ref(""), None);
}
