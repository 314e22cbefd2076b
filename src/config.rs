// src/config.rs
//! Конфигурация генерации лабиринта
//!
//! Этот модуль определяет параметры, управляющие генерацией:
//! - Размеры сетки (вместе с внешним кольцом стен)
//! - Сложность и режим смещения порядка направлений
//! - Необязательный сид для детерминированной генерации
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::InvalidConfigError;

/// Минимальная сторона сетки: кольцо стен, одна внутренняя клетка, вход и выход
pub const MIN_DIMENSION: usize = 3;

/// Способ, которым сложность влияет на порядок перебора направлений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
pub enum ShuffleBias {
    /// Ключ каждого направления — `random() + complexity`.
    ///
    /// Константа одинакова для всех четырёх ключей, поэтому порядок после сортировки
    /// от сложности не зависит. Режим сохранён ради совместимости.
    #[default]
    Legacy,
    /// Ключ направления «прямо» умножается на `complexity`:
    /// - `0.0` — карвер идёт прямо, пока может (длинные коридоры),
    /// - `1.0` — все направления равновероятны (извилистый лабиринт).
    Weighted,
}

/// Параметры генерации одного лабиринта
///
/// Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MazeConfig {
    /// Ширина сетки в клетках, включая граничные стены (по умолчанию 21)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Высота сетки в клетках, включая граничные стены (по умолчанию 21)
    #[serde(default = "default_height")]
    pub height: usize,

    /// Сложность в диапазоне [0, 1] (по умолчанию 0.5)
    #[serde(default = "default_complexity")]
    pub complexity: f64,

    /// Сид генератора случайных чисел. Без сида используется `thread_rng`.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Режим смещения порядка направлений (по умолчанию `Legacy`)
    #[serde(default)]
    pub bias: ShuffleBias,
}

impl MazeConfig {
    #[must_use]
    pub fn new(width: usize, height: usize, complexity: f64) -> Self {
        Self {
            width,
            height,
            complexity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_bias(mut self, bias: ShuffleBias) -> Self {
        self.bias = bias;
        self
    }

    /// Проверяет размеры и сложность.
    ///
    /// # Ошибки
    /// - `WidthTooSmall` / `HeightTooSmall` — сторона меньше [`MIN_DIMENSION`]
    /// - `TooLarge` — число клеток переполняет `usize` или превышает `isize::MAX`
    /// - `ComplexityOutOfRange` — сложность вне [0, 1] или NaN
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.width < MIN_DIMENSION {
            return Err(InvalidConfigError::WidthTooSmall { width: self.width });
        }
        if self.height < MIN_DIMENSION {
            return Err(InvalidConfigError::HeightTooSmall {
                height: self.height,
            });
        }
        // Ограничение `Vec`: не больше `isize::MAX` байт на буфер клеток
        let fits = self
            .width
            .checked_mul(self.height)
            .is_some_and(|cells| isize::try_from(cells).is_ok());
        if !fits {
            return Err(InvalidConfigError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if !(0.0..=1.0).contains(&self.complexity) {
            return Err(InvalidConfigError::ComplexityOutOfRange {
                complexity: self.complexity,
            });
        }
        Ok(())
    }

    /// Загружает параметры из TOML-файла
    ///
    /// Значения не проверяются при загрузке: проверка происходит при генерации.
    ///
    /// # Пример
    /// ```toml
    /// # maze.toml
    /// width = 41
    /// height = 31
    /// complexity = 0.75
    /// seed = 42
    /// bias = "Weighted"
    /// ```
    pub fn from_toml_file(
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}

fn default_width() -> usize {
    21
}
fn default_height() -> usize {
    21
}
fn default_complexity() -> f64 {
    0.5
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 21,
            height: 21,
            complexity: 0.5,
            seed: None,
            bias: ShuffleBias::Legacy,
        }
    }
}
