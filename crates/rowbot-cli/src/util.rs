use std::{
    fs::File,
    io::{self, BufWriter, Read as _, StdoutLock},
    path::{Path, PathBuf},
};

use anyhow::Context;
use rowbot_remote::config::GameConfig;

/// Destination of a JSON document: stdout, or a file created on open.
#[derive(Debug)]
pub enum Output {
    Stdout(StdoutLock<'static>),
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `path`, or to stdout without a path.
    pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        let mut output = match path {
            Some(path) => Output::create(path)?,
            None => Output::Stdout(io::stdout().lock()),
        };
        output.write_json(value)
    }

    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        })
    }

    fn destination(&self) -> String {
        match self {
            Output::Stdout(_) => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize + ?Sized,
    {
        let writer: &mut dyn io::Write = match self {
            Output::Stdout(writer) => writer,
            Output::File { writer, .. } => writer,
        };
        serde_json::to_writer_pretty(&mut *writer, value)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(writer))
            .and_then(|()| writer.flush())
            .with_context(|| format!("Failed to write JSON to {}", self.destination()))
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {} file: {}", file_kind, path.display()))
}

/// Reads a whole text file, or stdin when `path` is `None` or `-`.
pub fn read_text_input(file_kind: &str, path: Option<&Path>) -> anyhow::Result<String> {
    let mut text = String::new();
    match path {
        Some(path) if path != Path::new("-") => {
            File::open(path)
                .and_then(|mut file| file.read_to_string(&mut text))
                .with_context(|| format!("Failed to read {} file: {}", file_kind, path.display()))?;
        }
        _ => {
            io::stdin()
                .read_to_string(&mut text)
                .with_context(|| format!("Failed to read {file_kind} from stdin"))?;
        }
    }
    Ok(text)
}

/// Loads the game configuration, falling back to defaults without a file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    let config = match path {
        Some(path) => read_json_file("config", path)?,
        None => GameConfig::default(),
    };
    config
        .validate()
        .context("Invalid game configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_config_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{"board_size": 7, "program": "./connect4"}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.board_size, 7);
        assert_eq!(config.program, PathBuf::from("./connect4"));
        assert_eq!(config.prompt, ": ");
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{"board_size": 1}"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_read_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.txt");
        fs::write(&path, "OO\nX.\n").unwrap();
        assert_eq!(read_text_input("board", Some(&path)).unwrap(), "OO\nX.\n");
    }
}
