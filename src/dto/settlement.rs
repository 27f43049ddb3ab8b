use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::settlement::SettlementSummary;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotelSettlement {
    pub hotel_id: Uuid,
    #[serde(flatten)]
    pub summary: SettlementSummary,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordSettlementRequest {
    pub amount: i64,
    pub note: Option<String>,
}
