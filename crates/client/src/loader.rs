//! One-shot background loads with a completion callback.
//!
//! Each load runs on its own thread: fetch, parse, then hand the result to
//! `on_load`. The callback runs exactly once per load, with `Ok(sheet)` or
//! the error that stopped it.

use std::thread::{self, JoinHandle};

use gsheet_core::Sheet;

use crate::client::{FetchError, SheetClient};
use crate::source::SheetSource;

type OnLoad = Box<dyn FnOnce(Result<Sheet, FetchError>) + Send + 'static>;

/// Header mode and completion callback for a load.
pub struct LoadOptions {
    has_header: bool,
    on_load: OnLoad,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_header: false,
            on_load: Box::new(|_| {}),
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat the first payload row as column names.
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn on_load<F>(mut self, on_load: F) -> Self
    where
        F: FnOnce(Result<Sheet, FetchError>) + Send + 'static,
    {
        self.on_load = Box::new(on_load);
        self
    }
}

impl std::fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadOptions")
            .field("has_header", &self.has_header)
            .finish_non_exhaustive()
    }
}

/// Starts background loads on a shared client.
#[derive(Clone)]
pub struct SheetLoader {
    client: SheetClient,
}

impl SheetLoader {
    pub fn new(client: SheetClient) -> Self {
        Self { client }
    }

    /// Load a publish-to-web CSV export.
    pub fn from_export(&self, id: impl Into<String>, opts: LoadOptions) -> LoadHandle {
        self.spawn(SheetSource::export(id), opts)
    }

    /// Load a Sheets API value range.
    pub fn from_api(
        &self,
        id: impl Into<String>,
        sheet: impl Into<String>,
        key: impl Into<String>,
        range: Option<&str>,
        opts: LoadOptions,
    ) -> LoadHandle {
        let mut source = SheetSource::api(id, sheet, key);
        if let Some(range) = range {
            source = source.with_range(range);
        }
        self.spawn(source, opts)
    }

    pub fn spawn(&self, source: SheetSource, opts: LoadOptions) -> LoadHandle {
        let client = self.client.clone();
        let LoadOptions { has_header, on_load } = opts;

        let handle = thread::spawn(move || {
            let result = client.load(&source, has_header);
            if let Err(e) = &result {
                log::warn!("load of {} failed: {}", source.describe(), e);
            }
            on_load(result);
        });

        LoadHandle { handle }
    }
}

/// Handle to an in-flight load.
#[derive(Debug)]
pub struct LoadHandle {
    handle: JoinHandle<()>,
}

impl LoadHandle {
    /// Block until the callback has returned. `Err` carries the panic
    /// payload if the callback panicked.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
