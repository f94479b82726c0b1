use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_oid_vec};

use super::room_model::{Room, RoomDetail};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Movie {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub titulo: String,
    pub director: String,
    pub duracion: i32,
    pub genero: String,
    #[serde(default, serialize_with = "serialize_oid_vec")]
    pub salas: Vec<ObjectId>,
}

/// Movie with its `salas` populated one level.
#[derive(Debug, Serialize)]
pub struct MovieDetail {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub titulo: String,
    pub director: String,
    pub duracion: i32,
    pub genero: String,
    pub salas: Vec<Room>,
}

/// Movie with rooms and each room's showtimes expanded.
#[derive(Debug, Serialize)]
pub struct MovieOverview {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub titulo: String,
    pub director: String,
    pub duracion: i32,
    pub genero: String,
    pub salas: Vec<RoomDetail>,
}

#[derive(Debug, Deserialize)]
pub struct MovieInput {
    pub titulo: Option<String>,
    pub director: Option<String>,
    pub duracion: Option<i32>,
    pub genero: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct MovieUpdate {
    pub titulo: Option<String>,
    pub director: Option<String>,
    pub duracion: Option<i32>,
    pub genero: Option<String>,
}
