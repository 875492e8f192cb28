use super::error::ConfigurationError;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const INGREDIENTS_FILE: &str = "ingredients.json";
pub const EFFECTS_FILE: &str = "effects.json";

pub fn open_data(dir: &Path, filename: &str) -> Result<impl std::io::Read, ConfigurationError> {
    let path = dir.join(filename);
    File::open(&path)
        .map(BufReader::new)
        .map_err(|source| ConfigurationError::Io {
            path: path.display().to_string(),
            source,
        })
}
