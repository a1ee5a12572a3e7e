use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Stderr, plus an append-only copy in the log file when one is configured.
#[derive(Clone, Default)]
struct LogSink {
    file: Option<Arc<Mutex<File>>>,
}

impl LogSink {
    fn open(log_file: Option<&Path>) -> io::Result<Self> {
        let Some(path) = log_file else {
            return Ok(Self::default());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Arc::new(Mutex::new(file))),
        })
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = io::stderr().write(buf)?;
        if let Some(Ok(mut file)) = self.file.as_ref().map(|f| f.lock()) {
            let _ = file.write_all(&buf[..written]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(Ok(mut file)) = self.file.as_ref().map(|f| f.lock()) {
            let _ = file.flush();
        }
        io::stderr().flush()
    }
}

/// Installs the global subscriber. `log` records are bridged into it, the
/// filter comes from `RUST_LOG` (default `info`). A log file that cannot be
/// opened leaves logging on stderr only.
pub fn init(log_file: Option<&Path>) {
    let _ = tracing_log::LogTracer::init();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let sink = LogSink::open(log_file).unwrap_or_else(|err| {
        eprintln!("cannot open log file: {err}");
        LogSink::default()
    });
    let ansi = sink.file.is_none();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(ansi)
        .with_writer(move || sink.clone())
        .try_init();
}
