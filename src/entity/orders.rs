use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub restaurant_id: Uuid,
    pub hotel_id: Option<Uuid>,
    pub delivery_partner_id: Option<Uuid>,
    pub order_type: String,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub invoice_number: String,
    pub room_number: Option<String>,
    pub total_amount: i64,
    pub hotel_commission: i64,
    pub admin_commission: i64,
    pub restaurant_amount: i64,
    pub commission_distributed: bool,
    pub delivery_latitude: f64,
    pub delivery_longitude: f64,
    pub courier_latitude: Option<f64>,
    pub courier_longitude: Option<f64>,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub preparing_at: Option<DateTimeWithTimeZone>,
    pub ready_at: Option<DateTimeWithTimeZone>,
    pub picked_up_at: Option<DateTimeWithTimeZone>,
    pub delivered_at: Option<DateTimeWithTimeZone>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::restaurants::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurants::Column::Id"
    )]
    Restaurants,
    #[sea_orm(
        belongs_to = "super::hotels::Entity",
        from = "Column::HotelId",
        to = "super::hotels::Column::Id"
    )]
    Hotels,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::restaurants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurants.def()
    }
}

impl Related<super::hotels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotels.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
