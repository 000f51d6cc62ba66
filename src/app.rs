use std::time::SystemTime;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::{
    domain::{
        format_gp, parse_gp, AppState, EditError, FieldPath, ItemCatalog, PriceSnapshot,
        Provenance, Report,
    },
    infra::{CacheError, CacheStore, PriceClient, PriceClientError},
    ui::components::status::StatusLog,
};

pub type FetchResult = Result<(PriceSnapshot, Provenance), PriceClientError>;

/// Completion events delivered to the dashboard loop.
#[derive(Debug)]
pub enum AppEvent {
    FetchFinished(FetchResult),
}

/// Follow-up the caller has to perform after a command.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    None,
    Fetch(ItemCatalog),
    Quit,
}

pub const COMMAND_HELP: &str = "set <field> <value> | fetch | load | save | quit";

/// Owns the price state, the cache port and the fetch lifecycle. Only the
/// event loop holding this value mutates it.
pub struct App<C: CacheStore> {
    state: AppState,
    cache: C,
    status: StatusLog,
    /// `Some` while a fetch is in flight; holds edits made in the meantime.
    fetch_journal: Option<Vec<(FieldPath, i64)>>,
    quit: bool,
}

impl<C: CacheStore> App<C> {
    pub fn new(cache: C, state: AppState) -> Self {
        Self {
            state,
            cache,
            status: StatusLog::default(),
            fetch_journal: None,
            quit: false,
        }
    }

    /// Starts from the cached state, or the zeroed default when the cache is
    /// absent or unusable.
    pub fn bootstrap(cache: C) -> Self {
        let restored = cache.load_usable();
        let mut app = Self::new(cache, AppState::default());
        match restored {
            Some(record) => {
                app.state.apply_record(record);
                app.status.info(format!(
                    "Loaded {} prices from cache",
                    app.state.provenance.tag.label()
                ));
            }
            None => app.status.info("No usable cache; starting from zero prices"),
        }
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLog {
        &mut self.status
    }

    pub fn report(&self, now: SystemTime) -> Report {
        self.state.report(now)
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_journal.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Routes a raw edit through the parser and the override rules. Edits made
    /// during a fetch are also journaled so the fetch result cannot drop them.
    pub fn apply_edit(&mut self, field: &str, raw_value: &str) -> Result<FieldPath, EditError> {
        let result = FieldPath::parse(field)
            .map_err(EditError::from)
            .and_then(|path| Ok((path, parse_gp(raw_value)?)))
            .and_then(|(path, value)| {
                self.state.apply_value(path, value)?;
                Ok((path, value))
            });

        match result {
            Ok((path, value)) => {
                if let Some(journal) = self.fetch_journal.as_mut() {
                    journal.push((path, value));
                }
                debug!("Manual edit {path} = {value}");
                self.status
                    .success(format!("{path} set to {} gp", format_gp(value)));
                Ok(path)
            }
            Err(err) => {
                self.status.error(format!("Rejected edit: {err}"));
                Err(err)
            }
        }
    }

    /// Opens the fetch window. Returns the lookups to run, or `None` when a
    /// fetch is already in flight.
    pub fn begin_fetch(&mut self) -> Option<ItemCatalog> {
        if self.is_fetching() {
            self.status.warning("A fetch is already running");
            return None;
        }
        self.fetch_journal = Some(Vec::new());
        self.status.info("Fetching live prices...");
        Some(ItemCatalog::from_snapshot(&self.state.snapshot))
    }

    /// Applies a fetch outcome. On success the fetched snapshot replaces the
    /// state, edits made meanwhile are replayed on top and the result is
    /// saved; the replay count is returned. On failure nothing changes.
    pub fn finish_fetch(&mut self, result: FetchResult) -> Result<usize, PriceClientError> {
        let journal = self.fetch_journal.take().unwrap_or_default();

        let (snapshot, provenance) = match result {
            Ok(fetched) => fetched,
            Err(err) => {
                error!("Price fetch failed: {err}");
                if !journal.is_empty() {
                    debug!("Dropping journal of {} edits", journal.len());
                }
                self.status.error(format!("Fetch failed: {err}"));
                return Err(err);
            }
        };

        self.state.replace_with_fetch(snapshot, provenance);

        let mut replayed = 0;
        for (path, value) in journal {
            match self.state.apply_value(path, value) {
                Ok(()) => replayed += 1,
                Err(err) => warn!("Could not replay edit {path} = {value}: {err}"),
            }
        }

        match self.cache.save(&self.state.to_record()) {
            Ok(()) if replayed > 0 => self.status.success(format!(
                "Fetched prices; re-applied {replayed} manual edit(s)"
            )),
            Ok(()) => self.status.success("Fetched and saved live prices"),
            Err(err) => {
                error!("Saving fetched prices failed: {err}");
                self.status
                    .warning(format!("Fetched prices but could not save: {err}"));
            }
        }
        info!("Fetch applied ({replayed} edits replayed)");
        Ok(replayed)
    }

    /// Reloads the cached state. An absent or unusable cache leaves the
    /// current state alone.
    pub fn load_cache(&mut self) -> bool {
        if self.is_fetching() {
            self.status.warning("Wait for the running fetch before loading");
            return false;
        }
        match self.cache.load() {
            Ok(Some(record)) => {
                self.state.apply_record(record);
                self.status.success(format!(
                    "Loaded {} prices from cache",
                    self.state.provenance.tag.label()
                ));
                true
            }
            Ok(None) => {
                self.status.warning("No cache saved yet");
                false
            }
            Err(err) => {
                warn!("Cache load failed: {err}");
                self.status.error(format!("Cache unusable: {err}"));
                false
            }
        }
    }

    pub fn save_cache(&mut self) -> Result<(), CacheError> {
        match self.cache.save(&self.state.to_record()) {
            Ok(()) => {
                self.status.success("Saved prices to cache");
                Ok(())
            }
            Err(err) => {
                error!("Cache save failed: {err}");
                self.status.error(format!("Save failed: {err}"));
                Err(err)
            }
        }
    }

    /// Runs one line typed at the `:` prompt.
    pub fn run_command(&mut self, line: &str) -> Action {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Action::None;
        };

        match verb.to_lowercase().as_str() {
            "set" => {
                let field = words.next();
                let value = words.collect::<Vec<_>>().join(" ");
                match field {
                    Some(field) if !value.is_empty() => {
                        let _ = self.apply_edit(field, &value);
                    }
                    _ => self.status.warning("Usage: set <field> <value>"),
                }
                Action::None
            }
            "fetch" | "f" => self.begin_fetch().map_or(Action::None, Action::Fetch),
            "load" | "l" => {
                self.load_cache();
                Action::None
            }
            "save" | "s" => {
                let _ = self.save_cache();
                Action::None
            }
            "quit" | "q" | "exit" => {
                self.request_quit();
                Action::Quit
            }
            "help" | "?" => {
                self.status.info(COMMAND_HELP);
                Action::None
            }
            other => {
                self.status
                    .warning(format!("Unknown command '{other}' ({COMMAND_HELP})"));
                Action::None
            }
        }
    }
}

/// Runs the lookups on the runtime and reports back with exactly one event.
pub fn spawn_fetch(client: PriceClient, catalog: ItemCatalog, events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = client.fetch_snapshot(&catalog).await;
        if events.send(AppEvent::FetchFinished(result)).is_err() {
            debug!("Fetch finished after the dashboard closed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CacheRecord;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryCache(RefCell<Option<CacheRecord>>);

    impl CacheStore for MemoryCache {
        fn load(&self) -> Result<Option<CacheRecord>, CacheError> {
            Ok(self.0.borrow().clone())
        }

        fn save(&self, record: &CacheRecord) -> Result<(), CacheError> {
            *self.0.borrow_mut() = Some(record.clone());
            Ok(())
        }
    }

    #[test]
    fn set_command_takes_the_rest_of_the_line() {
        let mut app = App::new(MemoryCache::default(), AppState::default());
        assert_eq!(app.run_command("set item2.avg 1,250k"), Action::None);
        assert_eq!(app.state().snapshot.items[1].price.avg, 1_250_000);
    }

    #[test]
    fn second_fetch_is_refused_while_one_runs() {
        let mut app = App::new(MemoryCache::default(), AppState::default());
        assert!(matches!(app.run_command("fetch"), Action::Fetch(_)));
        assert_eq!(app.run_command("f"), Action::None);
        assert!(app.is_fetching());
    }

    #[test]
    fn unknown_and_empty_commands_do_nothing() {
        let mut app = App::new(MemoryCache::default(), AppState::default());
        assert_eq!(app.run_command("   "), Action::None);
        assert_eq!(app.run_command("explode"), Action::None);
        assert_eq!(app.state(), &AppState::default());
        assert!(app.status().latest().unwrap().text.contains("explode"));
        assert_eq!(app.run_command("QUIT"), Action::Quit);
        assert!(app.should_quit());
    }
}
