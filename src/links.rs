//! Referential integrity maintenance between cinemas, rooms, movies and
//! showtimes.
//!
//! Every mutation that touches a cross-entity link goes through one of these
//! operations, which issue the compensating writes that keep the
//! back-references consistent. Each write is a separate store round trip:
//! a `NotFound` on a compensating write propagates to the caller and never
//! rolls back the primary mutation that already succeeded.

use mongodb::bson::{doc, oid::ObjectId};

use crate::store::{EntityStore, StoreError, CINES, PELICULAS, SALAS};

/// Appends the room to its cinema's `salas` list. Invoked once, at room
/// creation; a later `cine` rebind on the room does not re-invoke it.
pub async fn link_room_to_cinema(
    store: &dyn EntityStore,
    room_id: ObjectId,
    cinema_id: ObjectId,
) -> Result<(), StoreError> {
    store.push(CINES, cinema_id, "salas", room_id.into()).await
}

/// Adds the room to the movie's `salas` set (no duplicates) and points the
/// room's `pelicula` at the movie. The set update runs first so that ordering
/// stays deterministic when a cinema link follows.
pub async fn link_room_to_movie(
    store: &dyn EntityStore,
    room_id: ObjectId,
    movie_id: ObjectId,
) -> Result<(), StoreError> {
    store
        .add_to_set(PELICULAS, movie_id, "salas", room_id.into())
        .await?;
    store
        .update_fields(SALAS, room_id, doc! {"pelicula": movie_id})
        .await?
        .ok_or(StoreError::NotFound)?;
    Ok(())
}

/// Removes the room from the movie's `salas` set.
pub async fn unlink_room_from_movie(
    store: &dyn EntityStore,
    room_id: ObjectId,
    movie_id: ObjectId,
) -> Result<(), StoreError> {
    store.pull(PELICULAS, movie_id, "salas", room_id.into()).await
}

/// Removes the room from the cinema's `salas` list.
pub async fn unlink_room_from_cinema(
    store: &dyn EntityStore,
    room_id: ObjectId,
    cinema_id: ObjectId,
) -> Result<(), StoreError> {
    store.pull(CINES, cinema_id, "salas", room_id.into()).await
}

/// Appends the showtime to its room's `horarios` list.
pub async fn link_showtime_to_room(
    store: &dyn EntityStore,
    showtime_id: ObjectId,
    room_id: ObjectId,
) -> Result<(), StoreError> {
    store.push(SALAS, room_id, "horarios", showtime_id.into()).await
}

/// Removes the showtime from its room's `horarios` list.
pub async fn unlink_showtime_from_room(
    store: &dyn EntityStore,
    showtime_id: ObjectId,
    room_id: ObjectId,
) -> Result<(), StoreError> {
    store.pull(SALAS, room_id, "horarios", showtime_id.into()).await
}

/// Clears the `pelicula` reference on every room that currently points at the
/// movie. One unset per room; rooms deleted between the scan and the unset
/// are skipped.
pub async fn clear_movie_from_rooms(
    store: &dyn EntityStore,
    movie_id: ObjectId,
) -> Result<(), StoreError> {
    let rooms = store.find_all(SALAS).await?;
    for room in rooms {
        if room.get_object_id("pelicula").ok() != Some(movie_id) {
            continue;
        }
        let room_id = match room.get_object_id("_id") {
            Ok(id) => id,
            Err(_) => continue,
        };
        match store.unset_field(SALAS, room_id, "pelicula").await {
            Ok(()) | Err(StoreError::NotFound) => {}
            Err(error) => return Err(error),
        }
    }
    Ok(())
}

/// Deletes every room whose `cine` reference equals the cinema. Those rooms'
/// showtimes and movie links are left as they are.
pub async fn cascade_delete_rooms_of_cinema(
    store: &dyn EntityStore,
    cinema_id: ObjectId,
) -> Result<u64, StoreError> {
    store.delete_many(SALAS, doc! {"cine": cinema_id}).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use mongodb::bson::doc;

    async fn seeded_movie_and_room(store: &MemoryStore) -> (ObjectId, ObjectId) {
        let movie = store
            .create(
                PELICULAS,
                doc! {"titulo": "Dune", "director": "D", "duracion": 155, "genero": "Sci-Fi", "salas": []},
            )
            .await
            .unwrap();
        let room = store
            .create(SALAS, doc! {"numero_sala": 1, "butacas": 80, "cine": ObjectId::new(), "horarios": []})
            .await
            .unwrap();
        (
            movie.get_object_id("_id").unwrap(),
            room.get_object_id("_id").unwrap(),
        )
    }

    #[tokio::test]
    async fn linking_a_room_to_a_movie_twice_keeps_one_entry() {
        let store = MemoryStore::new();
        let (movie_id, room_id) = seeded_movie_and_room(&store).await;

        link_room_to_movie(&store, room_id, movie_id).await.unwrap();
        link_room_to_movie(&store, room_id, movie_id).await.unwrap();

        let movie = store.get(PELICULAS, movie_id).await.unwrap().unwrap();
        assert_eq!(movie.get_array("salas").unwrap().len(), 1);
        let room = store.get(SALAS, room_id).await.unwrap().unwrap();
        assert_eq!(room.get_object_id("pelicula").unwrap(), movie_id);
    }

    #[tokio::test]
    async fn linking_against_a_missing_movie_fails_without_touching_the_room() {
        let store = MemoryStore::new();
        let (_, room_id) = seeded_movie_and_room(&store).await;

        let result = link_room_to_movie(&store, room_id, ObjectId::new()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));

        let room = store.get(SALAS, room_id).await.unwrap().unwrap();
        assert!(room.get_object_id("pelicula").is_err());
    }

    #[tokio::test]
    async fn clearing_a_movie_unsets_only_its_rooms() {
        let store = MemoryStore::new();
        let (movie_id, room_id) = seeded_movie_and_room(&store).await;
        link_room_to_movie(&store, room_id, movie_id).await.unwrap();
        let other = store
            .create(SALAS, doc! {"numero_sala": 2, "butacas": 100, "cine": ObjectId::new(), "pelicula": ObjectId::new(), "horarios": []})
            .await
            .unwrap();

        clear_movie_from_rooms(&store, movie_id).await.unwrap();

        let room = store.get(SALAS, room_id).await.unwrap().unwrap();
        assert!(room.get_object_id("pelicula").is_err());
        let other_id = other.get_object_id("_id").unwrap();
        let untouched = store.get(SALAS, other_id).await.unwrap().unwrap();
        assert!(untouched.get_object_id("pelicula").is_ok());
    }

    #[tokio::test]
    async fn cascade_only_removes_rooms_of_the_cinema() {
        let store = MemoryStore::new();
        let cinema_id = ObjectId::new();
        store
            .create(SALAS, doc! {"numero_sala": 1, "butacas": 100, "cine": cinema_id, "horarios": []})
            .await
            .unwrap();
        store
            .create(SALAS, doc! {"numero_sala": 2, "butacas": 100, "cine": ObjectId::new(), "horarios": []})
            .await
            .unwrap();

        let removed = cascade_delete_rooms_of_cinema(&store, cinema_id).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.find_all(SALAS).await.unwrap().len(), 1);
    }
}
