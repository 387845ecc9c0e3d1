use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use nqueens_engine::{BoardSize, Leaderboard};
use nqueens_solver::SolverConfig;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::create(path),
            None => Ok(Output::Stdout {
                writer: io::stdout().lock(),
            }),
        }
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self)
            .with_context(|| format!("Failed to write newline to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))?;
    Ok(value)
}

/// Reads solver settings, or the defaults when no file is given.
pub fn read_solver_config(path: Option<&Path>) -> anyhow::Result<SolverConfig> {
    let Some(path) = path else {
        return Ok(SolverConfig::default());
    };
    let config: SolverConfig = read_json_file("solver config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid solver config: {}", path.display()))?;
    Ok(config)
}

/// Reads a leaderboard, starting an empty one when the file does not exist yet.
pub fn read_leaderboard(path: &Path) -> anyhow::Result<Leaderboard> {
    if !path.exists() {
        return Ok(Leaderboard::new());
    }
    read_json_file("leaderboard", path)
}

/// Clamps a requested board size into the supported range, with a warning.
pub fn clamp_board_size(requested: usize) -> BoardSize {
    let size = BoardSize::clamped(requested);
    if size.get() != requested {
        log::warn!("board size {requested} is out of range, using {size}");
    }
    size
}

/// Builds a seeded generator, or one seeded from the thread RNG.
pub fn make_rng(seed: Option<u64>) -> Pcg32 {
    match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_read_solver_config_rejects_bad_rates() {
        let path = std::env::temp_dir().join(format!("nqueens-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "genetic": { "mutation_rate": 1.5, "max_generations": 3 } }"#).unwrap();
        let err = read_solver_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(format!("{err:#}").contains("genetic.mutation_rate must be within [0, 1]"));
    }

    #[test]
    fn test_read_solver_config_defaults_without_file() {
        assert_eq!(read_solver_config(None).unwrap(), SolverConfig::default());
    }
}
