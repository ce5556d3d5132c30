//! Live-mode runtime: filesystem watcher, interactive input and the build
//! session.
//!
//! The [`Session`] is the only owner of build state. The watcher task and the
//! input thread send it [`Message`]s over one channel; pending rebuilds are
//! held by its [`WatchScheduler`] and fire from the same `select!` loop, so
//! builds never overlap each other or command handling.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{sleep_until, Instant};

use folio_build::{BuildError, BuildReport};
use folio_core::{IgnoreRules, RunOptions, IGNORE_FILE};
use folio_render::Collaborators;

use crate::command::{Command, HELP};
use crate::error::{io_err, LiveError};
use crate::hooks;
use crate::scheduler::{Decision, RunFlags, WatchScheduler, When};
use crate::settings::LiveConfig;

/// Something that can run one full build.
pub trait BuildRunner: Send + Sync + 'static {
    fn build(&self, options: &RunOptions) -> Result<BuildReport, BuildError>;
}

impl BuildRunner for Collaborators {
    fn build(&self, options: &RunOptions) -> Result<BuildReport, BuildError> {
        folio_build::run(options, self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Changed(PathBuf),
    Command(Command),
}

/// Start live mode and block the current thread until it exits.
pub fn start_blocking<R: BuildRunner>(
    options: RunOptions,
    config: LiveConfig,
    runner: R,
) -> Result<(), LiveError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(options, config, runner))
}

/// Run live mode: an initial build, then rebuilds on change, command or
/// availability transition until quit or ctrl-c.
pub async fn run<R: BuildRunner>(
    options: RunOptions,
    config: LiveConfig,
    runner: R,
) -> Result<(), LiveError> {
    let (source, destination) =
        folio_build::pipeline::validate_roots(&options.source, &options.destination)?;
    let options = RunOptions {
        source: source.clone(),
        destination: destination.clone(),
        ..options
    };

    let (tx, rx) = mpsc::channel::<Message>(64);
    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    let watcher_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = watcher_task(source, destination, tx, shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        let mut shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => match signal {
                    Ok(()) => {
                        tracing::info!("received ctrl-c, shutting down");
                        let _ = shutdown.send(());
                        Ok(())
                    }
                    Err(err) => Err(LiveError::Task {
                        task: "signal_handler",
                        message: err.to_string(),
                    }),
                },
            }
        })
    };

    spawn_input_thread(tx)?;
    println!("{HELP}");

    let mut session = Session::new(options, config, runner);
    let session_result = session.run(rx, shutdown_tx.subscribe()).await;
    let _ = shutdown_tx.send(());

    let (watcher_result, signal_result) = tokio::join!(watcher_handle, signal_handle);
    handle_join("watcher", watcher_result)?;
    handle_join("signal_handler", signal_result)?;
    session_result
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Single owner of the run options, live settings and pending rebuild.
pub struct Session<R> {
    options: RunOptions,
    config: LiveConfig,
    runner: Arc<R>,
    scheduler: WatchScheduler,
    builds: usize,
}

impl<R: BuildRunner> Session<R> {
    pub fn new(options: RunOptions, config: LiveConfig, runner: R) -> Self {
        Self {
            options,
            config,
            runner: Arc::new(runner),
            scheduler: WatchScheduler::new(),
            builds: 0,
        }
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    /// Builds executed so far.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub async fn run(
        &mut self,
        mut rx: mpsc::Receiver<Message>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), LiveError> {
        self.request(When::Now, RunFlags::default()).await?;

        loop {
            let deadline = self.scheduler.deadline();
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(flags) = self.scheduler.take_due(Instant::now()) {
                        self.execute(flags).await?;
                    }
                }
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    if !self.handle(msg).await? {
                        break;
                    }
                }
            }
        }

        self.scheduler.cancel();
        tracing::info!(builds = self.builds, "live mode stopped");
        Ok(())
    }

    /// Returns `false` on quit.
    async fn handle(&mut self, msg: Message) -> Result<bool, LiveError> {
        let cmd = match msg {
            Message::Changed(path) => {
                tracing::debug!(path = %path.display(), "source changed");
                self.request(When::After(self.config.debounce), RunFlags::default())
                    .await?;
                return Ok(true);
            }
            Message::Command(cmd) => cmd,
        };
        tracing::debug!(command = %cmd, "command received");

        match cmd {
            Command::Rebuild => self.request(When::Now, RunFlags::default()).await?,
            Command::RebuildIgnoringTimes => {
                let flags = RunFlags {
                    ignore_times: true,
                    force_copy: false,
                };
                self.request(When::Now, flags).await?
            }
            Command::RebuildAndCopy => {
                let flags = RunFlags {
                    ignore_times: false,
                    force_copy: true,
                };
                self.request(When::Now, flags).await?
            }
            Command::RebuildAll => self.request(When::Now, RunFlags::ALL).await?,
            Command::TogglePreview => {
                self.config.open_browser = !self.config.open_browser;
                tracing::info!(enabled = self.config.open_browser, "live preview toggled");
            }
            Command::SetWatchUrl(url) => {
                tracing::info!(url = %url, "watch url set");
                self.config.watch_url = Some(url);
            }
            Command::UploadHook => self.upload().await?,
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn request(&mut self, when: When, flags: RunFlags) -> Result<(), LiveError> {
        match self.scheduler.request(when, flags, Instant::now()) {
            Decision::Execute(flags) => self.execute(flags).await,
            Decision::Scheduled(at) => {
                tracing::debug!(in_ms = at.saturating_duration_since(Instant::now()).as_millis() as u64, "rebuild scheduled");
                Ok(())
            }
            Decision::Coalesced(_) => Ok(()),
        }
    }

    async fn execute(&mut self, flags: RunFlags) -> Result<(), LiveError> {
        let options = self
            .options
            .clone()
            .ignore_times(self.options.ignore_times || flags.ignore_times)
            .force_copy(self.options.force_copy || flags.force_copy)
            .at(Utc::now());
        let runner = Arc::clone(&self.runner);
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || runner.build(&options))
            .await
            .map_err(|err| LiveError::Task {
                task: "build",
                message: err.to_string(),
            })?;
        self.builds += 1;

        let report = match result {
            Ok(report) => report,
            Err(err) => {
                tracing::error!(error = %err, "rebuild failed");
                return Ok(());
            }
        };
        tracing::info!(
            written = report.written,
            up_to_date = report.up_to_date,
            skipped = report.skipped,
            failed = report.failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "rebuild finished"
        );

        if let Some(next) = report.next_transition {
            if let Decision::Scheduled(_) = self.scheduler.arm_transition(next, Utc::now(), Instant::now()) {
                tracing::info!(at = %next, "rebuild armed for availability transition");
            }
        }

        if self.config.open_browser {
            if let Some(url) = &self.config.watch_url {
                if let Err(err) = hooks::open_preview(url) {
                    tracing::warn!(error = %err, "cannot open preview");
                }
            }
        }
        Ok(())
    }

    async fn upload(&self) -> Result<(), LiveError> {
        let Some(program) = self.config.upload_hook.clone() else {
            tracing::warn!("no upload hook configured");
            return Ok(());
        };
        let destination = self.options.destination.clone();
        let result = tokio::task::spawn_blocking(move || hooks::run_upload_hook(&program, &destination))
            .await
            .map_err(|err| LiveError::Task {
                task: "upload_hook",
                message: err.to_string(),
            })?;
        if let Err(err) = result {
            tracing::error!(error = %err, "upload hook failed");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Watcher and input
// ---------------------------------------------------------------------------

async fn watcher_task(
    source: PathBuf,
    destination: PathBuf,
    tx: mpsc::Sender<Message>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), LiveError> {
    let ignore_file = source.join(IGNORE_FILE);
    let mut rules = IgnoreRules::load(&source)?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();
    let mut watcher: RecommendedWatcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    watcher.watch(&source, RecursiveMode::Recursive)?;
    tracing::info!(source = %source.display(), "watching for changes");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watcher event error");
                        continue;
                    }
                };
                if !is_relevant_event_kind(&event.kind) {
                    continue;
                }

                for path in event.paths {
                    if path == ignore_file {
                        match IgnoreRules::load(&source) {
                            Ok(reloaded) => rules = reloaded,
                            Err(err) => tracing::warn!(target: "folio::load", error = %err, "ignore file not reloaded"),
                        }
                    }
                    if !is_watched(&path, &source, &destination, &rules) {
                        continue;
                    }
                    if tx.send(Message::Changed(path)).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
    }

    drop(watcher);
    Ok(())
}

fn spawn_input_thread(tx: mpsc::Sender<Message>) -> Result<(), LiveError> {
    // Blocking stdin reads cannot be cancelled; the thread is left detached
    // and ends with the process.
    std::thread::Builder::new()
        .name("folio-input".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(cmd) => {
                        if tx.blocking_send(Message::Command(cmd)).is_err() {
                            break;
                        }
                    }
                    Err(err) => tracing::warn!(error = %err, "ignored input"),
                }
            }
        })
        .map_err(|e| io_err("folio-input", e))?;
    Ok(())
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Whether a change at `path` should request a rebuild: inside the source,
/// outside the destination, and not excluded by the ignore file.
fn is_watched(path: &Path, source: &Path, destination: &Path, rules: &IgnoreRules) -> bool {
    if path.starts_with(destination) {
        return false;
    }
    let Ok(rel) = path.strip_prefix(source) else {
        return false;
    };
    let mut parent = PathBuf::new();
    let mut components = rel.components().peekable();
    while let Some(component) = components.next() {
        let name = component.as_os_str().to_string_lossy();
        let is_dir = components.peek().is_some() || path.is_dir();
        if rules.is_ignored(&parent, &name, is_dir) {
            return false;
        }
        parent.push(component);
    }
    true
}

fn handle_join(
    task: &'static str,
    result: Result<Result<(), LiveError>, tokio::task::JoinError>,
) -> Result<(), LiveError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(LiveError::Task {
            task,
            message: format!("join failure: {err}"),
        }),
    }
}
