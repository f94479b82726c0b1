use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_oid, serialize_oid_vec};

use super::{cinema_model::Cinema, movie_model::Movie, showtime_model::Showtime};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Room {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub numero_sala: i32,
    pub butacas: i32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub pelicula: Option<ObjectId>,
    #[serde(default, serialize_with = "serialize_oid_vec")]
    pub horarios: Vec<ObjectId>,
    #[serde(serialize_with = "serialize_oid")]
    pub cine: ObjectId,
}

/// Room with its movie and showtimes populated.
#[derive(Debug, Serialize)]
pub struct RoomDetail {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub numero_sala: i32,
    pub butacas: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pelicula: Option<Movie>,
    pub horarios: Vec<Showtime>,
    #[serde(serialize_with = "serialize_oid")]
    pub cine: ObjectId,
}

/// Room with its cinema and movie populated, showtimes left as ids. Used by
/// the showtime detail aggregate.
#[derive(Debug, Serialize)]
pub struct RoomVenue {
    #[serde(
        rename = "_id",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_object_id"
    )]
    pub id: Option<ObjectId>,
    pub numero_sala: i32,
    pub butacas: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cine: Option<Cinema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pelicula: Option<Movie>,
    #[serde(serialize_with = "serialize_oid_vec")]
    pub horarios: Vec<ObjectId>,
}

#[derive(Debug, Deserialize)]
pub struct RoomInput {
    pub numero_sala: Option<i32>,
    pub butacas: Option<i32>,
    pub cine: Option<String>,
    pub pelicula: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoomUpdate {
    pub numero_sala: Option<i32>,
    pub butacas: Option<i32>,
    pub cine: Option<String>,
    pub pelicula: Option<String>,
}
