pub mod cinema_controller;
pub mod home_controller;
pub mod movie_controller;
pub mod room_controller;
pub mod showtime_controller;
