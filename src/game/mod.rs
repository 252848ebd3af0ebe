pub mod behavior;
pub mod constants;
pub mod controller;
pub mod game_loop;
pub mod input;
pub mod match_result;
pub mod state;
pub mod systems;
