use uuid::Uuid;

/// Landing URL encoded in a hotel's QR code.
pub fn hotel_menu_url(frontend_base: &str, hotel_id: Uuid) -> String {
    format!(
        "{}/hotel-menu?ref={}",
        frontend_base.trim_end_matches('/'),
        hotel_id
    )
}

pub fn parse_hotel_ref(reference: &str) -> Option<Uuid> {
    Uuid::parse_str(reference.trim()).ok()
}
