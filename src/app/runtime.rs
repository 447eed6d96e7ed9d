use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{
    domain::SelectOption,
    form::{ComponentEnv, FieldState, FormCommand, FormEngine, FormState},
    i18n::Translator,
    presentation::{self, UiContext},
    search::OptionSource,
    submit::{Notification, StoreError, SubmissionController, SubmitOutcome},
};

use super::{
    form_ui::UiOutcome,
    input::{AppCommand, CommandDispatch, InputRouter},
    keymap::KeymapContext,
    options::UiOptions,
    overlay::RecordOverlay,
    popup::{LookupRequest, PopupKey, SelectPopup},
    status::StatusLine,
    terminal::TerminalGuard,
};

struct LookupResult {
    field: String,
    seq: u64,
    result: Result<Vec<SelectOption>, StoreError>,
}

pub(crate) struct AppParts {
    pub(crate) title: String,
    pub(crate) form_state: FormState,
    pub(crate) controller: Option<SubmissionController>,
    pub(crate) option_source: Option<Arc<dyn OptionSource>>,
    pub(crate) translator: Translator,
    pub(crate) env: ComponentEnv,
    pub(crate) options: UiOptions,
}

pub(crate) struct App {
    title: String,
    form_state: FormState,
    controller: Option<SubmissionController>,
    option_source: Option<Arc<dyn OptionSource>>,
    translator: Translator,
    env: ComponentEnv,
    options: UiOptions,
    status: StatusLine,
    notification: Option<Notification>,
    exit_armed: bool,
    should_quit: bool,
    outcome: Option<UiOutcome>,
    popup: Option<SelectPopup>,
    overlay: Option<RecordOverlay>,
    runtime: tokio::runtime::Runtime,
    lookup_tx: UnboundedSender<LookupResult>,
    lookup_rx: UnboundedReceiver<LookupResult>,
}

impl App {
    pub(crate) fn new(parts: AppParts) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("dashform-io")
            .build()
            .context("failed to start the async runtime")?;
        let (lookup_tx, lookup_rx) = unbounded_channel();
        Ok(Self {
            title: parts.title,
            form_state: parts.form_state,
            controller: parts.controller,
            option_source: parts.option_source,
            status: StatusLine::new(parts.translator.clone()),
            translator: parts.translator,
            env: parts.env,
            options: parts.options,
            notification: None,
            exit_armed: false,
            should_quit: false,
            outcome: None,
            popup: None,
            overlay: None,
            runtime,
            lookup_tx,
            lookup_rx,
        })
    }

    pub(crate) fn run(&mut self) -> Result<UiOutcome> {
        let mut terminal = TerminalGuard::enter()?;
        while !self.should_quit {
            self.pump_lookups(Instant::now());
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key, Instant::now()),
                Event::Resize(width, height) => {
                    terminal.resize(Rect::new(0, 0, width, height))?;
                }
                Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }
        Ok(self.outcome.take().unwrap_or(UiOutcome::Cancelled))
    }

    fn draw(&mut self, frame: &mut Frame<'_>) {
        let help = self.current_help_text();
        let dirty = self.form_state.is_dirty();
        let error_count = self.form_state.error_count();
        let popup = self.popup.as_ref().map(SelectPopup::as_render);
        let overlay = self.overlay.as_mut().map(RecordOverlay::as_render);
        presentation::draw(
            frame,
            &mut self.form_state,
            UiContext {
                title: &self.title,
                translator: &self.translator,
                status_message: self.status.message(),
                notification: self.notification.as_ref(),
                dirty,
                error_count,
                help: help.as_deref(),
                popup,
                overlay,
            },
        );
    }

    fn keymap_context(&self) -> KeymapContext {
        if self.overlay.is_some() {
            KeymapContext::Overlay
        } else if self
            .form_state
            .focused_field()
            .is_some_and(|field| field.is_collection())
        {
            KeymapContext::Collection
        } else {
            KeymapContext::Default
        }
    }

    fn current_help_text(&self) -> Option<String> {
        if !self.options.show_help {
            return None;
        }
        self.options.keymap_store.help_text(self.keymap_context())
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(popup) = self.popup.as_mut() {
            let field = popup.field().to_string();
            match popup.handle_key(&key, now) {
                PopupKey::Handled => {}
                PopupKey::Close => {
                    self.popup = None;
                    self.status.ready();
                }
                PopupKey::Choose(option) => {
                    self.popup = None;
                    if let Some(target) = self.form_state.field_mut(&field) {
                        target.choose(option);
                    }
                    self.after_edit(&field);
                    self.status.value_updated();
                }
            }
            return;
        }

        let context = self.keymap_context();
        let dispatch = InputRouter::new(&self.options.keymap_store).route(key, context);
        if self.overlay.is_some() {
            self.handle_overlay_dispatch(dispatch);
            return;
        }
        match dispatch {
            CommandDispatch::Form(command) => {
                self.dispatch_form_command(command);
                self.exit_armed = false;
            }
            CommandDispatch::App(command) => self.handle_app_command(command, key),
            CommandDispatch::Input(event) => self.handle_field_input(&event),
        }
    }

    fn handle_app_command(&mut self, command: AppCommand, key: KeyEvent) {
        match command {
            AppCommand::Save => {
                self.exit_armed = false;
                self.on_save();
            }
            AppCommand::Quit => self.on_exit(),
            AppCommand::ResetStatus => {
                self.exit_armed = false;
                self.notification = None;
                self.status.ready();
            }
            AppCommand::TogglePopup => {
                if !self.try_open_popup() {
                    self.handle_field_input(&key);
                }
            }
            AppCommand::EditEntry => self.open_record_overlay(true),
            AppCommand::ListAddEntry => {
                if self
                    .form_state
                    .focused_field()
                    .is_some_and(|field| field.is_record())
                {
                    self.open_record_overlay(false);
                } else {
                    self.edit_focused(|field| field.collection_add());
                }
            }
            AppCommand::ListRemoveEntry => self.edit_focused(|field| field.collection_remove()),
            AppCommand::ListSelect(delta) => {
                if let Some(field) = self.form_state.focused_field_mut() {
                    field.collection_select(delta);
                }
            }
        }
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&mut FieldState) -> bool) {
        let Some(field) = self.form_state.focused_field_mut() else {
            return;
        };
        if edit(field) {
            let name = field.name().to_string();
            self.exit_armed = false;
            self.after_edit(&name);
            self.status.value_updated();
        }
    }

    fn handle_field_input(&mut self, event: &KeyEvent) {
        if let Some(field) = self.form_state.focused_field_mut()
            && field.handle_key(event)
        {
            let name = field.name().to_string();
            let label = field.descriptor.display_label();
            self.exit_armed = false;
            self.status.editing(&label);
            self.after_edit(&name);
        }
    }

    fn after_edit(&mut self, name: &str) {
        if self.options.auto_validate {
            self.dispatch_form_command(FormCommand::FieldEdited {
                name: name.to_string(),
            });
        }
    }

    fn dispatch_form_command(&mut self, command: FormCommand) {
        let mut engine = FormEngine::new(&mut self.form_state);
        if let Err(message) = engine.dispatch(command) {
            self.status.set_raw(message);
        }
    }

    fn try_open_popup(&mut self) -> bool {
        let Some(field) = self.form_state.focused_field() else {
            return false;
        };
        let remote = self.option_source.is_some();
        let Some(mut popup) = SelectPopup::from_field(field, self.options.search_debounce, remote)
        else {
            return false;
        };
        match popup.initial_lookup() {
            Some(request) => {
                self.status.searching();
                self.spawn_lookup(request);
            }
            None => self
                .status
                .set_raw(self.translator.t("Type to filter, ↑/↓ to move, Enter to choose")),
        }
        self.popup = Some(popup);
        true
    }

    fn spawn_lookup(&self, request: LookupRequest) {
        let Some(source) = self.option_source.clone() else {
            return;
        };
        let tx = self.lookup_tx.clone();
        tracing::debug!(
            field = %request.field,
            seq = request.seq,
            query = %request.query,
            "option lookup dispatched"
        );
        self.runtime.spawn(async move {
            let result = source.search(&request.endpoint, &request.query).await;
            let _ = tx.send(LookupResult {
                field: request.field,
                seq: request.seq,
                result,
            });
        });
    }

    fn pump_lookups(&mut self, now: Instant) {
        if let Some(request) = self.popup.as_mut().and_then(|popup| popup.tick(now)) {
            self.spawn_lookup(request);
        }
        while let Ok(message) = self.lookup_rx.try_recv() {
            let Some(popup) = self.popup.as_mut().filter(|popup| popup.field() == message.field)
            else {
                continue;
            };
            match message.result {
                Ok(options) => {
                    if popup.apply_results(message.seq, options) {
                        self.status.ready();
                    }
                }
                Err(err) => {
                    tracing::warn!(field = %message.field, error = %err, "option lookup failed");
                    popup.lookup_failed(message.seq);
                    self.status.set_raw(err.to_string());
                }
            }
        }
    }

    fn open_record_overlay(&mut self, edit_selected: bool) {
        let Some(field) = self.form_state.focused_field_mut() else {
            return;
        };
        if !field.is_record() {
            return;
        }
        let row = if edit_selected {
            let selected = field.collection_panel().and_then(|panel| panel.selected);
            let row = selected.and_then(|index| {
                field
                    .record_editor()
                    .and_then(|editor| editor.rows().into_iter().nth(index))
            });
            match row {
                Some(row) => Some(row),
                None => {
                    self.status.set_raw(self.translator.t("Nothing to edit"));
                    return;
                }
            }
        } else {
            None
        };
        match RecordOverlay::open(field, row.as_ref(), &self.env, &self.translator) {
            Ok(Some(overlay)) => {
                self.status.editing(overlay.title());
                self.overlay = Some(overlay);
            }
            Ok(None) => self.status.set_raw(self.translator.t("Nothing to edit")),
            Err(err) => {
                tracing::error!(error = %err, "record editor failed to open");
                self.status.set_raw(err.to_string());
            }
        }
    }

    fn handle_overlay_dispatch(&mut self, dispatch: CommandDispatch) {
        match dispatch {
            CommandDispatch::App(AppCommand::Save) => self.commit_overlay(),
            CommandDispatch::App(AppCommand::Quit) => self.cancel_overlay(),
            CommandDispatch::App(_) => {}
            CommandDispatch::Form(command) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    let _ = FormEngine::new(overlay.form_mut()).dispatch(command);
                }
            }
            CommandDispatch::Input(event) => {
                let Some(overlay) = self.overlay.as_mut() else {
                    return;
                };
                let form = overlay.form_mut();
                if let Some(field) = form.focused_field_mut()
                    && field.handle_key(&event)
                {
                    let name = field.name().to_string();
                    let _ = form.validate_field(&name);
                }
            }
        }
    }

    fn commit_overlay(&mut self) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let Some(draft) = overlay.draft() else {
            return;
        };
        let name = overlay.field().to_string();
        let committed = self
            .form_state
            .field_mut(&name)
            .and_then(|field| field.with_record_editor(|editor| editor.commit(&draft)));
        match committed {
            Some(Err(err)) => {
                let message = err.to_string();
                overlay.set_error(message.clone());
                self.status.set_raw(message);
            }
            Some(Ok(())) | None => {
                self.overlay = None;
                self.after_edit(&name);
                self.status.value_updated();
            }
        }
    }

    fn cancel_overlay(&mut self) {
        if let Some(overlay) = self.overlay.take()
            && let Some(field) = self.form_state.field_mut(overlay.field())
        {
            field.with_record_editor(|editor| editor.cancel());
        }
        self.status.ready();
    }

    fn on_save(&mut self) {
        self.notification = None;
        let Some(controller) = &self.controller else {
            self.save_locally();
            return;
        };
        self.status.submitting();
        let values = self.form_state.values();
        let outcome = self
            .runtime
            .block_on(controller.submit(&mut self.form_state));
        match outcome {
            SubmitOutcome::Invalid(errors) => self.status.issues_remaining(errors.len()),
            SubmitOutcome::Saved {
                response,
                notification,
                navigate_back,
            } => {
                self.status.set_raw(notification.text.clone());
                self.notification = Some(notification);
                self.outcome = Some(UiOutcome::Saved {
                    values,
                    response: Some(response),
                    navigate_back,
                });
                self.should_quit = true;
            }
            SubmitOutcome::Unconfirmed => self.status.unconfirmed(),
            SubmitOutcome::Failed { notification } => {
                match &notification {
                    Some(notification) => self.status.set_raw(notification.text.clone()),
                    None => self.status.ready(),
                }
                self.notification = notification;
            }
        }
    }

    fn save_locally(&mut self) {
        match self.form_state.validate_all() {
            Ok(values) => {
                self.form_state.rebase();
                self.outcome = Some(UiOutcome::Saved {
                    values,
                    response: None,
                    navigate_back: false,
                });
                self.should_quit = true;
            }
            Err(errors) => {
                if let Some(name) = self.form_state.first_error_field().map(str::to_string) {
                    self.form_state.focus_field(&name);
                }
                self.status.issues_remaining(errors.len());
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form_state.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("title", &self.title)
            .field("controller", &self.controller)
            .field("popup", &self.popup.is_some())
            .field("overlay", &self.overlay.is_some())
            .finish()
    }
}
