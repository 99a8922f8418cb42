use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::config::CatalogSettings;

use super::display::compose_display;
use super::model::Audio;

/// One track record as stored in a catalog snapshot file.
///
/// Snapshots are JSON arrays of these records, written by whatever
/// synchronized the catalog last. Fetching them from the platform API
/// is out of scope here.
#[derive(Debug, Deserialize)]
pub struct AudioRecord {
    pub id: u64,
    pub owner_id: i64,
    pub artist: String,
    pub title: String,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    pub url: String,
}

impl AudioRecord {
    fn into_audio(self, settings: &CatalogSettings) -> Audio {
        let display = compose_display(&self.artist, &self.title, &settings.display_separator);
        Audio {
            id: self.id,
            owner_id: self.owner_id,
            artist: self.artist,
            title: self.title,
            duration: self.duration_secs.map(Duration::from_secs),
            url: self.url,
            cache_file: None,
            display,
        }
    }
}

/// Load a catalog snapshot from `path`, preserving the stored order.
///
/// The remote catalog is already ordered by the platform; reordering
/// it locally would make the list disagree with every other client.
pub fn load_snapshot(
    path: &Path,
    settings: &CatalogSettings,
) -> Result<Vec<Audio>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let records: Vec<AudioRecord> = serde_json::from_reader(BufReader::new(file))?;

    Ok(records
        .into_iter()
        .map(|r| r.into_audio(settings))
        .collect())
}
