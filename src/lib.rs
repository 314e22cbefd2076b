pub mod config;
pub mod error;
pub mod generator;
pub mod graph;
pub mod maze;

pub use config::{MazeConfig, ShuffleBias};
pub use error::InvalidConfigError;
pub use generator::{MazeGenerator, generate, generate_batch, generate_with_rng};
pub use graph::{MazeReport, analyze};
pub use maze::{Cell, Maze};
