use crate::config::{LoggingConfig, Section};
use std::{
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, MakeWriter},
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" | "" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// True if `target` is `prefix` itself or one of its `prefix::` children.
fn matches_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.flush()
    }
}

fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(section: &Section, base_dir: &Path) -> io::Result<RotWriter> {
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rot = FileRotate::new(
        &path,
        AppendTimestamp::default(FileLimit::MaxFiles(section.max_backups.unwrap_or(3))),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotWriter(Arc::new(Mutex::new(rot))))
}

// -------- routing by target --------

/// Sends each event to the file of the most specific section whose name
/// prefixes the event target, or to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: Vec<(String, RotWriter)>,
}

impl FileRouter {
    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }

    fn route(&self, target: &str) -> Option<RotWriter> {
        self.by_prefix
            .iter()
            .filter(|(prefix, _)| matches_prefix(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }
}

enum RoutedWriter {
    File(RotWriter),
    Discard,
}

impl Write for RoutedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RoutedWriter::File(w) => w.write(buf),
            RoutedWriter::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RoutedWriter::File(w) => w.flush(),
            RoutedWriter::Discard => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.default
            .clone()
            .map_or(RoutedWriter::Discard, RoutedWriter::File)
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        self.route(meta.target())
            .map_or(RoutedWriter::Discard, RoutedWriter::File)
    }
}

// -------- filters --------

fn console_targets(cfg: &LoggingConfig) -> Targets {
    let mut targets = Targets::new().with_default(
        cfg.get(DEFAULT_SECTION)
            .map_or(LevelFilter::INFO, |s| parse_level(&s.console_level)),
    );
    for (name, section) in cfg.iter().filter(|(n, _)| *n != DEFAULT_SECTION) {
        targets = targets.with_target(name.clone(), parse_level(&section.console_level));
    }
    targets
}

fn has_file(section: &Section) -> bool {
    !section.file.trim().is_empty()
}

fn file_targets(cfg: &LoggingConfig) -> Targets {
    let default = cfg
        .get(DEFAULT_SECTION)
        .filter(|s| has_file(s))
        .map_or(LevelFilter::OFF, |s| parse_level(&s.file_level));
    let mut targets = Targets::new().with_default(default);
    for (name, section) in cfg.iter().filter(|(n, _)| *n != DEFAULT_SECTION) {
        // Subsystems without their own file still land in the default file.
        let level = if has_file(section) {
            parse_level(&section.file_level)
        } else {
            default
        };
        targets = targets.with_target(name.clone(), level);
    }
    targets
}

fn build_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg.iter().filter(|(_, s)| has_file(s)) {
        match open_rotating(section, base_dir) {
            Ok(w) if name == DEFAULT_SECTION => router.default = Some(w),
            Ok(w) => router.by_prefix.push((name.clone(), w)),
            Err(e) => eprintln!("failed to open log file '{}' for '{name}': {e}", section.file),
        }
    }
    router
}

/// Install the global subscriber: human-readable console output plus JSON
/// files routed per subsystem. Relative file paths resolve against `base_dir`.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    // Bridge `log` records (sqlx, hyper internals) into tracing.
    let _ = tracing_log::LogTracer::init();

    let console = fmt::layer()
        .with_ansi(io::stdout().is_terminal())
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg));

    let router = build_router(cfg, base_dir);
    if router.is_empty() {
        let _ = Registry::default().with(console).try_init();
        return;
    }

    let file = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router)
        .with_filter(file_targets(cfg));

    let _ = Registry::default().with(console).with(file).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_backups: Some(1),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn levels_parse_leniently() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::DEBUG);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level(""), LevelFilter::INFO);
        assert_eq!(parse_level("bogus"), LevelFilter::INFO);
    }

    #[test]
    fn prefix_matching_respects_module_boundaries() {
        assert!(matches_prefix("sqlx", "sqlx"));
        assert!(matches_prefix("sqlx::query", "sqlx"));
        assert!(!matches_prefix("sqlx_core", "sqlx"));
    }

    #[test]
    fn router_prefers_the_longest_prefix() {
        let tmp = tempdir().unwrap();
        let mut cfg: LoggingConfig = HashMap::new();
        cfg.insert("default".into(), section("info", "logs/all.log", "debug"));
        cfg.insert("authz_data".into(), section("info", "logs/authz.log", "debug"));
        cfg.insert("sqlx".into(), section("warn", "", ""));

        let router = build_router(&cfg, tmp.path());
        assert_eq!(router.by_prefix.len(), 1);
        assert!(router.default.is_some());
        assert!(tmp.path().join("logs/authz.log").exists());

        let authz = router.route("authz_data::service").unwrap();
        let own = &router.by_prefix[0].1;
        assert!(Arc::ptr_eq(&authz.0, &own.0));

        let other = router.route("sqlx::query").unwrap();
        assert!(Arc::ptr_eq(&other.0, &router.default.as_ref().unwrap().0));
    }

    #[test]
    fn no_files_means_empty_router() {
        let tmp = tempdir().unwrap();
        let mut cfg: LoggingConfig = HashMap::new();
        cfg.insert("default".into(), section("info", "", ""));
        assert!(build_router(&cfg, tmp.path()).is_empty());
    }

    #[test]
    fn routed_writer_discards_without_a_file() {
        let mut w = RoutedWriter::Discard;
        assert_eq!(w.write(b"dropped").unwrap(), 7);
        w.flush().unwrap();
    }
}
