pub mod bot;
pub mod game_loop;
