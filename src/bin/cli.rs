use clap::Parser;
use mazegen::{MazeConfig, ShuffleBias, analyze, generate_batch};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Генератор идеальных лабиринтов
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ширина сетки вместе с граничными стенами
    #[arg(long)]
    width: Option<usize>,

    /// Высота сетки вместе с граничными стенами
    #[arg(long)]
    height: Option<usize>,

    /// Сложность в диапазоне [0, 1]
    #[arg(long)]
    complexity: Option<f64>,

    /// Сид для детерминированной генерации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Режим влияния сложности на порядок направлений
    #[arg(long, value_enum)]
    bias: Option<ShuffleBias>,

    /// Количество лабиринтов
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Путь для сохранения JSON (по умолчанию: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Проверить, что каждый лабиринт связен и не содержит циклов
    #[arg(long)]
    verify: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<MazeConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => {
                info!(path = %path.display(), "Загрузка конфигурации");
                MazeConfig::from_toml_file(path)?
            }
            None => MazeConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(complexity) = self.complexity {
            config.complexity = complexity;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(bias) = self.bias {
            config.bias = bias;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    info!(
        width = config.width,
        height = config.height,
        complexity = config.complexity,
        count = cli.count,
        "Генерация лабиринтов"
    );
    let mazes = generate_batch(&config, cli.count)?;

    if cli.verify {
        for (i, maze) in mazes.iter().enumerate() {
            let report = analyze(maze);
            if !report.is_perfect() || !report.entrance_reachable_exit {
                error!(index = i, ?report, "Лабиринт не идеален");
                return Err(format!("maze {i} failed verification").into());
            }
            info!(index = i, passages = report.passages, "Проверка пройдена");
        }
    }

    let mut writer: BufWriter<Box<dyn Write>> = match &cli.output {
        Some(path) => {
            info!(path = %path.display(), "Сохранение");
            BufWriter::new(Box::new(File::create(path)?))
        }
        None => BufWriter::new(Box::new(io::stdout().lock())),
    };

    if let [maze] = mazes.as_slice() {
        serde_json::to_writer_pretty(&mut writer, maze)?;
    } else {
        serde_json::to_writer_pretty(&mut writer, &mazes)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    info!("Готово!");
    Ok(())
}
