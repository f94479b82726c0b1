use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_oid};

use super::room_model::{Room, RoomVenue};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Showtime {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub hora: String,
    #[serde(serialize_with = "serialize_oid")]
    pub sala: ObjectId,
}

/// Showtime with its room populated one level.
#[derive(Debug, Serialize)]
pub struct ShowtimeDetail {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub hora: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sala: Option<Room>,
}

/// Showtime with its room, and that room's cinema and movie, expanded.
#[derive(Debug, Serialize)]
pub struct ShowtimeOverview {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub hora: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sala: Option<RoomVenue>,
}

#[derive(Debug, Deserialize)]
pub struct ShowtimeInput {
    pub hora: Option<String>,
    pub sala: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ShowtimeUpdate {
    pub hora: Option<String>,
}
