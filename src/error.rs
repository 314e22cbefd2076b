// src/error.rs
//! Ошибки генератора лабиринтов
//!
//! Ядро генерации знает ровно одну ошибку — недопустимую конфигурацию.
//! Она обнаруживается до выделения памяти под сетку и возвращается вызывающему коду без изменений.

use derive_more::{Display, Error};

/// Недопустимая конфигурация лабиринта
#[derive(Debug, Clone, Copy, PartialEq, Display, Error)]
pub enum InvalidConfigError {
    /// Ширина меньше минимально допустимой (3)
    #[display("invalid maze config: width {width} is less than 3")]
    WidthTooSmall { width: usize },

    /// Высота меньше минимально допустимой (3)
    #[display("invalid maze config: height {height} is less than 3")]
    HeightTooSmall { height: usize },

    /// Сложность вне диапазона [0, 1] (включая NaN)
    #[display("invalid maze config: complexity {complexity} is outside [0, 1]")]
    ComplexityOutOfRange { complexity: f64 },

    /// Сетка `width × height` не помещается в адресное пространство
    #[display("invalid maze config: {width}x{height} grid is too large")]
    TooLarge { width: usize, height: usize },
}
