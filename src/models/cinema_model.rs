use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_oid_vec};

use super::room_model::{Room, RoomDetail};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Cinema {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub nombre: String,
    pub ubicacion: String,
    #[serde(default, serialize_with = "serialize_oid_vec")]
    pub salas: Vec<ObjectId>,
}

/// Cinema with its `salas` populated one level.
#[derive(Debug, Serialize)]
pub struct CinemaDetail {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub nombre: String,
    pub ubicacion: String,
    pub salas: Vec<Room>,
}

/// Cinema with rooms, and each room's movie and showtimes, expanded.
#[derive(Debug, Serialize)]
pub struct CinemaOverview {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub nombre: String,
    pub ubicacion: String,
    pub salas: Vec<RoomDetail>,
}

#[derive(Debug, Deserialize)]
pub struct CinemaInput {
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct CinemaUpdate {
    pub nombre: Option<String>,
    pub ubicacion: Option<String>,
}
