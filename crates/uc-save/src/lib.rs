//! uc-save: Save/restore of generated dungeons
//!
//! Dungeons are stored as JSON behind a small header, optionally gzipped.
//! Loading accepts either form.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use uc_core::dungeon::{Coord, Dungeon};

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

/// First two bytes of any gzip stream
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Save file corrupted")]
    Corrupted,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,
}

/// Save file header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// Numeric seed the dungeon was generated from
    pub seed: u64,
    /// Grid extent
    pub size: Coord,
    pub room_count: usize,
    pub stair_count: usize,
    /// Timestamp of save
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "UCRS";

    pub fn new(dungeon: &Dungeon) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            seed: dungeon.seed(),
            size: dungeon.size(),
            room_count: dungeon.rooms().len(),
            stair_count: dungeon.stairs().len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Check that the header describes this dungeon
    pub fn matches(&self, dungeon: &Dungeon) -> bool {
        self.seed == dungeon.seed()
            && self.size == dungeon.size()
            && self.room_count == dungeon.rooms().len()
            && self.stair_count == dungeon.stairs().len()
    }
}

/// Complete save file structure
#[derive(Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub dungeon: Dungeon,
}

/// Borrowed form used when writing, so saving never clones the grid
#[derive(Serialize)]
struct SaveFileRef<'a> {
    header: SaveHeader,
    dungeon: &'a Dungeon,
}

/// Header-only view; the dungeon body is skipped without being built
#[derive(Deserialize)]
struct HeaderOnly {
    header: SaveHeader,
}

/// Save a dungeon to a JSON file
pub fn save_dungeon(dungeon: &Dungeon, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let save_file = SaveFileRef {
        header: SaveHeader::new(dungeon),
        dungeon,
    };

    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &save_file)?;
    debug!("saved dungeon {} to {}", dungeon.seed(), path.as_ref().display());
    Ok(())
}

/// Save a dungeon to a gzip-compressed JSON file
pub fn save_dungeon_compressed(dungeon: &Dungeon, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let save_file = SaveFileRef {
        header: SaveHeader::new(dungeon),
        dungeon,
    };

    let file = File::create(path.as_ref())?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, &save_file)?;
    encoder.finish()?.flush()?;
    debug!(
        "saved compressed dungeon {} to {}",
        dungeon.seed(),
        path.as_ref().display()
    );
    Ok(())
}

/// Read a save file, decompressing it if needed
fn read_save_bytes(path: &Path) -> Result<Vec<u8>, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let mut raw = Vec::new();
    BufReader::new(file).read_to_end(&mut raw)?;

    if raw.starts_with(&GZIP_MAGIC) {
        let mut json = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut json)
            .map_err(|_| SaveError::Corrupted)?;
        Ok(json)
    } else {
        Ok(raw)
    }
}

/// Load a dungeon from a file written by `save_dungeon` or
/// `save_dungeon_compressed`
pub fn load_dungeon(path: impl AsRef<Path>) -> Result<Dungeon, SaveError> {
    let bytes = read_save_bytes(path.as_ref())?;
    let save_file: SaveFile = serde_json::from_slice(&bytes)?;

    save_file.header.validate()?;
    if !save_file.header.matches(&save_file.dungeon) || !save_file.dungeon.is_consistent() {
        return Err(SaveError::Corrupted);
    }
    Ok(save_file.dungeon)
}

/// Load only the header from a save file
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    let bytes = read_save_bytes(path.as_ref())?;
    let save_file: HeaderOnly = serde_json::from_slice(&bytes)?;
    save_file.header.validate()?;
    Ok(save_file.header)
}

/// Check if a save file exists
pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a save file
pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

/// Path of a named dungeon in the user's data directory
///
/// Creates the `undercroft/dungeons` directory if it does not exist yet.
pub fn default_save_path(name: &str) -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("undercroft");
    path.push("dungeons");
    std::fs::create_dir_all(&path).ok();
    path.push(format!("{}.json", name));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use uc_core::DungeonConfig;
    use uc_core::dungeon::DungeonGenerator;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("undercroft_{}_{}.json", name, std::process::id()))
    }

    fn sample_dungeon(seed: &str) -> Dungeon {
        let config = DungeonConfig {
            seed: seed.to_string(),
            size: Coord::new(20, 3, 20),
            room_count: 5,
            ..DungeonConfig::default()
        };
        DungeonGenerator::new(config).unwrap().generate()
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("plain");
        let dungeon = sample_dungeon("save");
        save_dungeon(&dungeon, &path).unwrap();

        assert!(save_exists(&path));

        let loaded = load_dungeon(&path).unwrap();
        assert_eq!(loaded, dungeon);

        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
    }

    #[test]
    fn test_save_and_load_compressed() {
        let path = temp_path("gzip");
        let dungeon = sample_dungeon("compressed");
        save_dungeon_compressed(&dungeon, &path).unwrap();

        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(&GZIP_MAGIC));

        let loaded = load_dungeon(&path).unwrap();
        assert_eq!(loaded, dungeon);
        assert_eq!(load_header(&path).unwrap().seed, dungeon.seed());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_header() {
        let path = temp_path("header");
        let dungeon = sample_dungeon("header");
        save_dungeon(&dungeon, &path).unwrap();

        let header = load_header(&path).unwrap();
        assert!(header.matches(&dungeon));
        assert_eq!(header.room_count, dungeon.rooms().len());
        assert_eq!(header.stair_count, dungeon.stairs().len());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_validation() {
        let dungeon = sample_dungeon("validate");
        let header = SaveHeader::new(&dungeon);

        assert!(header.validate().is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(
            bad_header.validate(),
            Err(SaveError::InvalidHeader)
        ));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_mismatched_header_is_corrupt() {
        let path = temp_path("mismatch");
        let dungeon = sample_dungeon("mismatch");
        let mut header = SaveHeader::new(&dungeon);
        header.room_count += 1;
        let file = SaveFileRef {
            header,
            dungeon: &dungeon,
        };
        std::fs::write(&path, serde_json::to_vec(&file).unwrap()).unwrap();

        assert!(matches!(load_dungeon(&path), Err(SaveError::Corrupted)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_garbage_file() {
        let path = temp_path("garbage");
        std::fs::write(&path, b"not a dungeon").unwrap();
        assert!(matches!(
            load_dungeon(&path),
            Err(SaveError::Serialization(_))
        ));

        std::fs::write(&path, [0x1f, 0x8b, 0x00, 0x01]).unwrap();
        assert!(matches!(
            load_dungeon(&path),
            Err(SaveError::Corrupted | SaveError::Serialization(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_default_save_path() {
        let path = default_save_path("crypt");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("crypt.json"));
        let dir = path.parent().unwrap();
        assert!(dir.ends_with("undercroft/dungeons"));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_dungeon("/nonexistent/path/dungeon.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }
}
