//! Saved-events store persisted to a delimited text file.
//!
//! The whole dataset lives in memory; every mutation rewrites the complete
//! file. Rewrites go through a sibling `<name>.tmp` file that is synced and renamed
//! over the target, so the file on disk is always either the previous or the
//! new version.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use csv::StringRecord;

use crate::domain::event::Event;
use crate::domain::saved_event::SavedEvent;
use crate::domain::types::{EventId, Username};
use crate::models::saved_event::{HEADER, SavedEventRow};
use crate::repository::memory::SavedEventMap;
use crate::repository::{RepositoryResult, SavedEventReader, SavedEventWriter};

/// File-backed saved-events store.
#[derive(Debug)]
pub struct CsvFileRepository {
    path: PathBuf,
    saved: Mutex<SavedEventMap>,
}

impl CsvFileRepository {
    /// Opens the store at `path`, loading any rows already persisted there.
    ///
    /// A missing or empty file yields an empty store. Unreadable files and
    /// malformed rows are logged and skipped.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let saved = load_saved_events(&path);
        Self {
            path,
            saved: Mutex::new(saved),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the in-memory state with the current file contents.
    pub fn reload(&self) -> RepositoryResult<()> {
        let loaded = load_saved_events(&self.path);
        *self.saved.lock()? = loaded;
        Ok(())
    }

    /// Persists `saved`, logging instead of failing so the in-memory change stands.
    fn persist(&self, saved: &SavedEventMap) {
        if let Err(e) = write_saved_events(&self.path, &saved.entries()) {
            log::error!(
                "Failed to write saved events to {}: {e}",
                self.path.display()
            );
        }
    }
}

fn load_saved_events(path: &Path) -> SavedEventMap {
    let mut saved = SavedEventMap::default();

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        Ok(meta) if meta.is_file() => return saved,
        Ok(_) => {
            log::error!("Saved events path {} is not a file", path.display());
            return saved;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => return saved,
        Err(e) => {
            log::error!("Failed to read saved events file {}: {e}", path.display());
            return saved;
        }
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to read saved events file {}: {e}", path.display());
            return saved;
        }
    };

    // Each line is parsed on its own so a broken quote cannot spill into the next row.
    let mut loaded = 0usize;
    for (idx, line) in BufReader::new(file).split(b'\n').enumerate().skip(1) {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read saved events file {}: {e}", path.display());
                break;
            }
        };

        let record = match parse_line(&line) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("Skipping unreadable saved event row on line {line_no}: {e}");
                continue;
            }
        };

        let parsed = SavedEventRow::from_record(&record).and_then(SavedEvent::try_from);
        match parsed {
            Ok(entry) => {
                if saved.insert(&entry.username, &entry.event) {
                    loaded += 1;
                } else {
                    log::warn!(
                        "Skipping duplicate saved event {} for user {} on line {line_no}",
                        entry.event.id,
                        entry.username
                    );
                }
            }
            Err(e) => log::warn!("Skipping malformed saved event row on line {line_no}: {e}"),
        }
    }

    log::info!("Loaded {loaded} saved events from {}", path.display());
    saved
}

/// Parses a single file line. Blank lines yield `None`.
fn parse_line(line: &[u8]) -> RepositoryResult<Option<StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line);
    let mut record = StringRecord::new();
    if reader.read_record(&mut record)? {
        Ok(Some(record))
    } else {
        Ok(None)
    }
}

/// `saved_events.csv` becomes `saved_events.csv.tmp`.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_saved_events(path: &Path, entries: &[SavedEvent]) -> RepositoryResult<()> {
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", HEADER.join(","))?;
    for entry in entries {
        writeln!(writer, "{}", SavedEventRow::from(entry).to_line())?;
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl SavedEventReader for CsvFileRepository {
    fn get_saved_events(&self, user: &Username) -> RepositoryResult<Vec<Event>> {
        Ok(self.saved.lock()?.events(user))
    }

    fn is_event_saved(&self, user: &Username, event_id: &EventId) -> RepositoryResult<bool> {
        Ok(self.saved.lock()?.contains(user, event_id))
    }

    fn list_users(&self) -> RepositoryResult<Vec<Username>> {
        Ok(self.saved.lock()?.users())
    }
}

impl SavedEventWriter for CsvFileRepository {
    fn save_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        let mut saved = self.saved.lock()?;
        if !saved.insert(user, event) {
            log::info!("Event already saved: {} for user {user}", event.name);
            return Ok(false);
        }
        self.persist(&saved);
        log::info!("Saved event: {} for user {user}", event.name);
        Ok(true)
    }

    fn unsave_event(&self, user: &Username, event: &Event) -> RepositoryResult<bool> {
        let mut saved = self.saved.lock()?;
        let removed = saved.remove(user, event);
        if removed {
            self.persist(&saved);
            log::info!("Removed event: {} for user {user}", event.name);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::repository::test::{sample_event, user};
    use tempfile::TempDir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let repo = CsvFileRepository::open(dir.path().join("saved_events.csv"));
        assert!(repo.list_users().unwrap().is_empty());
        assert!(!repo.path().exists());
    }

    #[test]
    fn empty_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_events.csv");
        fs::write(&path, "").unwrap();
        let repo = CsvFileRepository::open(&path);
        assert!(repo.list_users().unwrap().is_empty());
    }

    #[test]
    fn save_writes_header_and_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_events.csv");
        let repo = CsvFileRepository::open(&path);

        repo.save_event(&user("alice"), &sample_event("1")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(
                "alice,1,\"Event 1\",MUSIC,2025-11-20T19:00:00,\"123 College St\",\
                 43.6629,-79.3957,\"\",\"Live music at UofT.\""
            )
        );
        assert_eq!(lines.next(), None);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn unsave_rewrites_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_events.csv");
        let repo = CsvFileRepository::open(&path);
        let alice = user("alice");

        repo.save_event(&alice, &sample_event("1")).unwrap();
        repo.save_event(&alice, &sample_event("2")).unwrap();
        repo.unsave_event(&alice, &sample_event("1")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("alice,2,"));
        assert!(!content.contains("alice,1,"));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("saved.csv");
        let repo = CsvFileRepository::open(&path);
        repo.save_event(&user("alice"), &sample_event("1")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_failure_keeps_in_memory_state() {
        let dir = TempDir::new().unwrap();
        // A directory in place of the file makes the final rename fail.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();
        let repo = CsvFileRepository::open(&path);
        let alice = user("alice");

        assert!(repo.save_event(&alice, &sample_event("1")).unwrap());
        assert!(repo.is_event_saved(&alice, &sample_event("1").id).unwrap());
    }

    #[test]
    fn reload_picks_up_external_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_events.csv");
        let repo = CsvFileRepository::open(&path);
        repo.save_event(&user("alice"), &sample_event("1")).unwrap();

        let other = CsvFileRepository::open(&path);
        other.save_event(&user("bob"), &sample_event("2")).unwrap();

        assert!(repo.get_saved_events(&user("bob")).unwrap().is_empty());
        repo.reload().unwrap();
        assert_eq!(repo.get_saved_events(&user("bob")).unwrap().len(), 1);
    }

    fn sample_line(name: &str, id: &str) -> String {
        SavedEventRow::from(&SavedEvent {
            username: user(name),
            event: sample_event(id),
        })
        .to_line()
    }

    #[test]
    fn invalid_utf8_row_is_skipped_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved_events.csv");
        let mut content = format!("{}\n{}\n", HEADER.join(","), sample_line("alice", "1"))
            .into_bytes();
        content.extend_from_slice(b"alice,2,\"Caf\xe9\",MUSIC\n");
        content.extend_from_slice(format!("{}\n", sample_line("alice", "3")).as_bytes());
        fs::write(&path, content).unwrap();

        let repo = CsvFileRepository::open(&path);

        let ids: Vec<String> = repo
            .get_saved_events(&user("alice"))
            .unwrap()
            .into_iter()
            .map(|e| e.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["1".to_string(), "3".to_string()]);
    }

    #[test]
    fn parse_line_reports_csv_errors() {
        assert!(matches!(
            parse_line(b"alice,\xff"),
            Err(RepositoryError::Csv(_))
        ));
        assert!(parse_line(b"").unwrap().is_none());
        assert_eq!(parse_line(b"a, b ,c").unwrap().unwrap().len(), 3);
    }

    #[test]
    fn temp_file_name_appends_suffix() {
        assert_eq!(
            temp_path_for(Path::new("data/saved_events.csv")),
            PathBuf::from("data/saved_events.csv.tmp")
        );
        assert_ne!(
            temp_path_for(Path::new("events.csv")),
            temp_path_for(Path::new("events.json"))
        );
    }

    #[test]
    fn target_with_tmp_extension_still_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.tmp");
        let repo = CsvFileRepository::open(&path);
        repo.save_event(&user("alice"), &sample_event("1")).unwrap();

        assert!(!dir.path().join("saved.tmp.tmp").exists());
        let reopened = CsvFileRepository::open(&path);
        assert!(reopened.is_event_saved(&user("alice"), &sample_event("1").id).unwrap());
    }

    #[test]
    fn write_failure_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = write_saved_events(&path, &[]).unwrap_err();
        assert!(matches!(err, RepositoryError::Io(_)));
    }
}
