// src/generator.rs
//! Генерация идеального лабиринта рандомизированным поиском в глубину
//!
//! Карвинг идёт по решётке с шагом 2: клетки с нечётными координатами — узлы,
//! клетки между ними — стены, которые прорубаются при переходе. Вместо рекурсии
//! используется явный стек, поэтому размер сетки не ограничен глубиной стека вызовов.

use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::config::{MazeConfig, ShuffleBias};
use crate::error::InvalidConfigError;
use crate::maze::Maze;

/// Направление шага карвинга (через одну клетку)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Смещение `(dy, dx)` на два шага
    #[must_use]
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (-2, 0),
            Direction::South => (2, 0),
            Direction::East => (0, 2),
            Direction::West => (0, -2),
        }
    }
}

/// Итоги одного прогона карвинга (для логов)
#[derive(Debug, Clone, Copy, Default)]
struct CarveStats {
    visited: usize,
    backtracks: usize,
    max_depth: usize,
}

/// Генератор лабиринтов с проверенной конфигурацией
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    /// Проверяет конфигурацию до любых выделений памяти
    pub fn new(config: MazeConfig) -> Result<Self, InvalidConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Генерирует лабиринт: с сидом из конфигурации детерминированно, иначе через `thread_rng`
    #[must_use]
    pub fn generate(&self) -> Maze {
        match self.config.seed {
            Some(seed) => {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
                self.generate_with_rng(&mut rng)
            }
            None => self.generate_with_rng(&mut rand::thread_rng()),
        }
    }

    /// Генерирует лабиринт из переданного источника случайности.
    ///
    /// На каждую попытку шага из источника берётся ровно четыре числа в `[0, 1)`.
    #[instrument(
        level = "debug",
        skip_all,
        fields(width = self.config.width, height = self.config.height)
    )]
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Maze {
        let MazeConfig {
            width,
            height,
            complexity,
            bias,
            ..
        } = self.config;

        let mut maze = Maze::new(width, height);
        let stats = carve(&mut maze, complexity, bias, rng);
        debug!(
            visited = stats.visited,
            backtracks = stats.backtracks,
            max_depth = stats.max_depth,
            "Карвинг завершён"
        );

        finalize(&mut maze);
        maze
    }
}

/// Генерирует новый лабиринт по конфигурации
pub fn generate(config: &MazeConfig) -> Result<Maze, InvalidConfigError> {
    Ok(MazeGenerator::new(config.clone())?.generate())
}

/// Генерирует новый лабиринт с внешним источником случайности (сид из конфигурации игнорируется)
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &MazeConfig,
    rng: &mut R,
) -> Result<Maze, InvalidConfigError> {
    Ok(MazeGenerator::new(config.clone())?.generate_with_rng(rng))
}

/// Генерирует `count` независимых лабиринтов.
///
/// При заданном сиде лабиринт `i` строится с сидом `seed + i` (с переполнением),
/// поэтому результат не зависит от числа потоков.
#[instrument(skip(config), fields(width = config.width, height = config.height))]
pub fn generate_batch(config: &MazeConfig, count: usize) -> Result<Vec<Maze>, InvalidConfigError> {
    let generator = MazeGenerator::new(config.clone())?;

    let build = |i: usize| match generator.config.seed {
        Some(seed) => {
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64));
            generator.generate_with_rng(&mut rng)
        }
        None => generator.generate_with_rng(&mut rand::thread_rng()),
    };

    #[cfg(feature = "parallel")]
    let mazes = (0..count).into_par_iter().map(build).collect();
    #[cfg(not(feature = "parallel"))]
    let mazes = (0..count).map(build).collect();

    Ok(mazes)
}

/// Случайный порядок направлений для одного шага.
///
/// Для каждого направления берётся одно число из `rng`, затем направления сортируются по ключу.
fn shuffled_directions<R: Rng + ?Sized>(
    rng: &mut R,
    complexity: f64,
    bias: ShuffleBias,
    straight: Option<Direction>,
) -> [Direction; 4] {
    let mut keyed = Direction::ALL.map(|dir| {
        let draw: f64 = rng.gen_range(0.0..1.0);
        let key = match bias {
            ShuffleBias::Legacy => draw + complexity,
            ShuffleBias::Weighted if Some(dir) == straight => draw * complexity,
            ShuffleBias::Weighted => draw,
        };
        (key, dir)
    });
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.map(|(_, dir)| dir)
}

fn carve<R: Rng + ?Sized>(
    maze: &mut Maze,
    complexity: f64,
    bias: ShuffleBias,
    rng: &mut R,
) -> CarveStats {
    let width = maze.width();
    let height = maze.height();
    let mut visited = vec![false; width * height];
    let mut stats = CarveStats::default();

    let (start_y, start_x) = maze.start();
    maze.set_wall(start_y, start_x, false);
    visited[start_y * width + start_x] = true;
    stats.visited = 1;

    // Вершина стека: клетка и направление, которым в неё пришли
    let mut stack: Vec<((usize, usize), Option<Direction>)> = vec![((start_y, start_x), None)];

    while let Some(&((y, x), came_by)) = stack.last() {
        let mut next = None;

        for dir in shuffled_directions(rng, complexity, bias, came_by) {
            let (dy, dx) = dir.offset();
            let (Some(ny), Some(nx)) = (y.checked_add_signed(dy), x.checked_add_signed(dx))
            else {
                continue;
            };

            // Только строго внутри кольца и только непосещённые
            if ny == 0 || nx == 0 || ny >= height - 1 || nx >= width - 1 {
                continue;
            }
            if visited[ny * width + nx] {
                continue;
            }

            next = Some(((ny, nx), dir));
            break;
        }

        match next {
            Some(((ny, nx), dir)) => {
                let (dy, dx) = dir.offset();
                let mid_y = y.wrapping_add_signed(dy / 2);
                let mid_x = x.wrapping_add_signed(dx / 2);
                maze.set_wall(mid_y, mid_x, false);
                maze.set_wall(ny, nx, false);
                visited[ny * width + nx] = true;
                stack.push(((ny, nx), Some(dir)));

                stats.visited += 1;
                stats.max_depth = stats.max_depth.max(stack.len());
            }
            None => {
                stack.pop();
                stats.backtracks += 1;
            }
        }
    }

    trace!(backtracks = stats.backtracks, "Стек опустел");
    stats
}

/// Закрывает внешнее кольцо и открывает вход и выход.
///
/// При чётной стороне клетка рядом с выходом не лежит на решётке карвинга,
/// поэтому выход соединяется с деревом одной или двумя клетками-перемычками.
/// Каждая перемычка касается ровно одного существующего прохода, и дерево остаётся деревом.
fn finalize(maze: &mut Maze) {
    let width = maze.width();
    let height = maze.height();

    for col in 0..width {
        maze.set_wall(0, col, true);
        maze.set_wall(height - 1, col, true);
    }
    for row in 0..height {
        maze.set_wall(row, 0, true);
        maze.set_wall(row, width - 1, true);
    }

    let (entrance_y, entrance_x) = maze.entrance();
    maze.set_wall(entrance_y, entrance_x, false);
    let (exit_y, exit_x) = maze.exit();
    maze.set_wall(exit_y, exit_x, false);

    let height_even = height % 2 == 0;
    let width_even = width % 2 == 0;
    if height_even || width_even {
        maze.set_wall(height - 2, width - 2, false);
    }
    if height_even && width_even {
        maze.set_wall(height - 2, width - 3, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn seeded(seed: u64) -> rand_chacha::ChaCha8Rng {
        rand_chacha::ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn legacy_order_ignores_complexity() {
        // Одна и та же последовательность чисел даёт один и тот же порядок при любой сложности
        for seed in 0..50 {
            let low = shuffled_directions(&mut seeded(seed), 0.0, ShuffleBias::Legacy, None);
            let high = shuffled_directions(&mut seeded(seed), 1.0, ShuffleBias::Legacy, None);
            assert_eq!(low, high);
        }
    }

    #[test]
    fn weighted_zero_complexity_prefers_straight() {
        let mut rng = seeded(3);
        for dir in Direction::ALL {
            for _ in 0..20 {
                let order = shuffled_directions(&mut rng, 0.0, ShuffleBias::Weighted, Some(dir));
                assert_eq!(order[0], dir);
            }
        }
    }

    #[test]
    fn weighted_full_complexity_matches_plain_draws() {
        for seed in 0..20 {
            let weighted = shuffled_directions(
                &mut seeded(seed),
                1.0,
                ShuffleBias::Weighted,
                Some(Direction::East),
            );
            let legacy = shuffled_directions(&mut seeded(seed), 0.0, ShuffleBias::Legacy, None);
            assert_eq!(weighted, legacy);
        }
    }

    #[test]
    fn shuffle_draws_four_numbers_per_step() {
        let mut counted = seeded(11);
        shuffled_directions(&mut counted, 0.5, ShuffleBias::Legacy, None);
        let after_shuffle: f64 = counted.gen_range(0.0..1.0);

        let mut manual = seeded(11);
        for _ in 0..4 {
            let _: f64 = manual.gen_range(0.0..1.0);
        }
        let after_four: f64 = manual.gen_range(0.0..1.0);

        assert!((after_shuffle - after_four).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_source_still_terminates() {
        // Вырожденный источник: все ключи равны, порядок определяется стабильной сортировкой
        let mut rng = StepRng::new(0, 0);
        let maze = MazeGenerator::new(MazeConfig::new(9, 9, 0.3))
            .unwrap()
            .generate_with_rng(&mut rng);
        let odd_cells = maze
            .passage_cells()
            .filter(|&(r, c)| r % 2 == 1 && c % 2 == 1 && !maze.is_boundary(r, c))
            .count();
        assert_eq!(odd_cells, 16);
    }

    #[test]
    fn three_by_three_is_a_straight_corridor() {
        let maze = generate(&MazeConfig::new(3, 3, 0.0)).unwrap();
        let rows: Vec<Vec<bool>> = maze
            .rows()
            .map(|row| row.iter().map(|c| c.is_wall).collect())
            .collect();
        assert_eq!(
            rows,
            vec![
                vec![true, true, true],
                vec![false, false, false],
                vec![true, true, true],
            ]
        );
    }

    #[test]
    fn even_dimensions_connect_exit() {
        for (width, height) in [(4, 4), (6, 5), (5, 6), (8, 10), (3, 4), (4, 3)] {
            let maze = generate(&MazeConfig::new(width, height, 0.5).with_seed(1)).unwrap();
            let (exit_y, exit_x) = maze.exit();
            assert!(
                !maze.is_wall(exit_y, exit_x - 1),
                "exit of {width}x{height} is sealed"
            );
        }
    }

    #[test]
    fn seeded_generator_is_deterministic() {
        let generator = MazeGenerator::new(MazeConfig::new(15, 11, 0.4).with_seed(99)).unwrap();
        assert_eq!(generator.generate(), generator.generate());
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        assert_eq!(
            generate(&MazeConfig::new(2, 5, 0.5)).unwrap_err(),
            InvalidConfigError::WidthTooSmall { width: 2 }
        );
        assert!(matches!(
            generate_with_rng(&MazeConfig::new(5, 5, 1.5), &mut seeded(0)),
            Err(InvalidConfigError::ComplexityOutOfRange { .. })
        ));
        assert!(generate_batch(&MazeConfig::new(5, 2, 0.5), 3).is_err());
    }

    #[test]
    fn batch_with_seed_matches_single_generation() {
        let config = MazeConfig::new(11, 11, 0.5).with_seed(40);
        let batch = generate_batch(&config, 4).unwrap();
        assert_eq!(batch.len(), 4);
        for (i, maze) in batch.iter().enumerate() {
            let single = generate(&config.clone().with_seed(40 + i as u64)).unwrap();
            assert_eq!(*maze, single);
        }
    }

    #[test]
    fn empty_batch() {
        assert!(generate_batch(&MazeConfig::default(), 0).unwrap().is_empty());
    }
}
