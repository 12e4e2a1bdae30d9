use super::*;

use crate::resolver::{PendingFetch, Resolver, Restore};
use crate::search::search_url;

/// Column 0 lists root types; column `n + 1` is cascade level `n`.
pub(super) struct App {
    resolver: Resolver,
    worker: Worker,
    pub(super) focus: usize,
    pub(super) cursors: Vec<usize>,
    pub(super) quit: bool,
    pub(super) notice: Option<String>,
    output: Option<String>,
}

impl App {
    pub(super) fn load(catalog: SharedCatalog, opts: TuiRunOptions) -> Result<Self> {
        let worker = Worker::spawn(catalog.clone())?;
        let mut resolver = Resolver::new();
        resolver.load_root_types(&catalog);

        let mut app = App {
            resolver,
            worker,
            focus: 0,
            cursors: vec![0],
            quit: false,
            notice: None,
            output: None,
        };

        match opts.pairs.as_deref() {
            Some(pairs) => {
                if let Restore::Replayed {
                    requested,
                    restored,
                } = app.resolver.initialize_from_pairs(&catalog, pairs)
                    && restored < requested
                {
                    app.notice = Some(format!(
                        "restored {} of {} pairs; the rest are no longer offered",
                        restored, requested
                    ));
                }
            }
            None => app.start_first_root(),
        }

        app.sync_cursors();
        app.focus = app.open_column();
        Ok(app)
    }

    pub(super) fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub(super) fn column_count(&self) -> usize {
        self.resolver.levels().len() + 1
    }

    pub(super) fn take_output(&mut self) -> Option<String> {
        self.output.take()
    }

    fn submit(&self, fetch: PendingFetch) {
        self.worker.submit(fetch);
    }

    fn start_first_root(&mut self) {
        match self.resolver.root_types().first().map(|r| r.id) {
            Some(root) => {
                let fetch = self.resolver.begin_root(root);
                self.submit(fetch);
            }
            None => self.notice = Some("no root types available".to_string()),
        }
    }

    /// Applies finished fetches. Superseded ones are dropped by the resolver.
    pub(super) fn drain_results(&mut self) {
        while let Some((fetch, expansion)) = self.worker.try_recv() {
            self.apply(fetch, expansion);
        }
    }

    fn apply(&mut self, fetch: PendingFetch, expansion: crate::resolver::Expansion) {
        if self.resolver.apply_expansion(&fetch, expansion) {
            self.sync_cursors();
            self.focus = self.open_column();
        }
    }

    /// First column still waiting for a pick, or the last one.
    fn open_column(&self) -> usize {
        let levels = self.resolver.levels();
        levels
            .iter()
            .position(|l| !l.is_selected())
            .map(|i| i + 1)
            .unwrap_or(levels.len())
    }

    fn sync_cursors(&mut self) {
        let columns = self.column_count();
        self.cursors.resize(columns, 0);

        if let Some(root) = self.resolver.selected_root()
            && let Some(i) = self.resolver.root_types().iter().position(|r| r.id == root)
        {
            self.cursors[0] = i;
        }

        for (i, level) in self.resolver.levels().iter().enumerate() {
            let sorted = level.sorted_values();
            let cursor = &mut self.cursors[i + 1];
            if level.is_selected()
                && let Some(pos) = sorted.iter().position(|v| v.id == level.selected_id)
            {
                *cursor = pos;
            }
            *cursor = (*cursor).min(sorted.len().saturating_sub(1));
        }
        self.focus = self.focus.min(columns - 1);
    }

    fn column_len(&self, column: usize) -> usize {
        if column == 0 {
            self.resolver.root_types().len()
        } else {
            self.resolver
                .levels()
                .get(column - 1)
                .map(|l| l.values.len())
                .unwrap_or(0)
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if is_ctrl_c(&key) {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Left => self.focus = self.focus.saturating_sub(1),
            KeyCode::Right => self.focus = (self.focus + 1).min(self.column_count() - 1),
            KeyCode::Up => {
                let cursor = &mut self.cursors[self.focus];
                *cursor = cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = self.column_len(self.focus);
                let cursor = &mut self.cursors[self.focus];
                if *cursor + 1 < len {
                    *cursor += 1;
                }
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Char('r') => self.cycle_root(),
            KeyCode::Char('c') => {
                self.resolver.reset_initialization();
                self.notice = None;
                self.start_first_root();
                self.sync_cursors();
                self.focus = 0;
            }
            KeyCode::Char('s') => {
                self.output = Some(search_url(&self.resolver.selection()));
                self.quit = true;
            }
            _ => {}
        }
    }

    fn activate(&mut self) {
        self.notice = None;
        if self.focus == 0 {
            let Some(root) = self.resolver.root_types().get(self.cursors[0]).map(|r| r.id) else {
                return;
            };
            let fetch = self.resolver.begin_root(root);
            self.submit(fetch);
            self.sync_cursors();
            return;
        }

        let index = self.focus - 1;
        let Some(level) = self.resolver.levels().get(index) else {
            return;
        };
        let type_name = level.type_name().to_string();
        let Some((id, label)) = level
            .sorted_values()
            .get(self.cursors[self.focus])
            .map(|v| (v.id, v.label().to_string()))
        else {
            return;
        };

        match self.resolver.begin_select(index, id, &label) {
            Some(fetch) => self.submit(fetch),
            None => {
                self.notice = Some(format!("choose the levels above {} first", type_name));
            }
        }
        self.sync_cursors();
    }

    fn cycle_root(&mut self) {
        let roots = self.resolver.root_types();
        if roots.is_empty() {
            return;
        }
        let next = self
            .resolver
            .selected_root()
            .and_then(|root| roots.iter().position(|r| r.id == root))
            .map(|i| (i + 1) % roots.len())
            .unwrap_or(0);
        let root = roots[next].id;

        self.notice = None;
        let fetch = self.resolver.begin_root(root);
        self.submit(fetch);
        self.sync_cursors();
        self.focus = 0;
    }

    #[cfg(test)]
    pub(super) fn wait_for_result(&mut self) -> bool {
        match self.worker.recv_timeout(Duration::from_secs(5)) {
            Some((fetch, expansion)) => {
                self.apply(fetch, expansion);
                true
            }
            None => false,
        }
    }
}
