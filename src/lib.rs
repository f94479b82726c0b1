pub mod controllers;
pub mod error;
pub mod links;
pub mod models;
pub mod queries;
pub mod store;
pub mod utils;

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};

use controllers::{
    cinema_controller::*, home_controller, movie_controller::*, room_controller::*,
    showtime_controller::*,
};
use store::DynStore;

/// Builds the full route table over the given store.
pub fn app(store: DynStore) -> Router {
    Router::new()
        .route("/", get(home_controller::index))
        .route("/cines", post(add_cinema).get(load_cinemas))
        .route(
            "/cines/:id",
            get(load_cinema).put(update_cinema).delete(delete_cinema),
        )
        .route("/salas", post(add_room).get(load_rooms))
        .route(
            "/salas/:id",
            get(load_room).put(update_room).delete(delete_room),
        )
        .route(
            "/salas/:sala_id/pelicula/:pelicula_id",
            put(attach_movie_to_room).get(fetch_room_movie),
        )
        .route("/peliculas", post(add_movie).get(load_movies))
        .route(
            "/peliculas/:id",
            get(load_movie).put(update_movie).delete(delete_movie),
        )
        .route("/horarios", post(add_showtime).get(load_showtimes))
        .route(
            "/horarios/:id",
            get(load_showtime)
                .put(update_showtime)
                .delete(delete_showtime),
        )
        .route("/peliculas-con-salas-y-horarios", get(load_movies_overview))
        .route("/horarios-con-detalles", get(load_showtimes_overview))
        .route(
            "/cines-con-salas-peliculas-y-horarios",
            get(load_cinemas_overview),
        )
        .layer(Extension(store))
}
