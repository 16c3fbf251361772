//! Taskboard application.
//!
//! Layout:
//! ┌───────────────────────────────┐
//! │  Navigation (title, logout)   │
//! ├───────────────────────────────┤
//! │  Notice banner (if any)       │
//! │  Filter / sort selectors      │
//! │  Create form                  │
//! │  Task list                    │
//! └───────────────────────────────┘
//!
//! Requests run off the UI thread (spawn_local on wasm, a tokio runtime on
//! native) and complete into per-request slots that are polled each frame.
//! Mutation slots carry the original intent so a request whose outcome is
//! unknown can be replayed as an optimistic local change.

use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use eframe::egui;
use egui::Color32;
use taskboard_types::{SortKey, StatusFilter, Task, TaskCreate, TaskUpdate};

use crate::api::{ApiClient, ApiError};
use crate::modals::{ConfirmDeleteModal, ConfirmDeleteResult};
use crate::panels::{
    navigation_bar, LoginAction, LoginPanel, NavAction, TaskForm, TaskFormAction, TaskListAction,
    TaskListPanel,
};
use crate::state::{AuthStatus, Notice, SessionStore, TaskListState};

/// Default service URL when nothing else is configured.
const DEFAULT_API_URL: &str = "http://localhost:8000";

const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";

/// Completion slot for one in-flight request.
type Pending<T> = Arc<Mutex<Option<Result<T, ApiError>>>>;

/// In-flight mutation: the completion slot plus whatever is needed to apply
/// the optimistic fallback if the outcome comes back unknown.
struct MutationSlot<T, I> {
    slot: Pending<T>,
    intent: I,
}

/// Main application state.
pub struct TaskBoardApp {
    api: ApiClient,
    session: SessionStore,
    tasks: TaskListState,

    // Panel widgets
    login_panel: LoginPanel,
    task_form: TaskForm,
    task_list_panel: TaskListPanel,

    // Modal dialogs
    confirm_delete: ConfirmDeleteModal,

    // Async result holders
    pending_list: Option<Pending<Vec<Task>>>,
    pending_create: Option<MutationSlot<Task, TaskCreate>>,
    pending_update: Option<MutationSlot<Task, (i64, TaskUpdate)>>,
    pending_toggle: Option<MutationSlot<Task, i64>>,
    pending_delete: Option<MutationSlot<(), i64>>,

    // Tokio runtime for native builds
    #[cfg(not(target_arch = "wasm32"))]
    runtime: Arc<tokio::runtime::Runtime>,
}

impl TaskBoardApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        #[cfg(target_arch = "wasm32")]
        let base_url = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let base_url =
            std::env::var("TASKBOARD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        #[cfg(not(target_arch = "wasm32"))]
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime"),
        );

        let mut session = SessionStore::new();
        session.restore();
        let api = ApiClient::new(&base_url, session.token_handle());
        tracing::info!(base_url = %api.base_url(), "taskboard starting");

        let mut app = Self {
            api,
            session,
            tasks: TaskListState::new(),
            login_panel: LoginPanel::new(),
            task_form: TaskForm::new(),
            task_list_panel: TaskListPanel::new(),
            confirm_delete: ConfirmDeleteModal::new(),
            pending_list: None,
            pending_create: None,
            pending_update: None,
            pending_toggle: None,
            pending_delete: None,
            #[cfg(not(target_arch = "wasm32"))]
            runtime,
        };

        if app.session.is_authenticated() {
            app.load_tasks();
        }
        app
    }

    // =========================================================================
    // REQUEST SPAWNING
    // =========================================================================

    #[cfg(target_arch = "wasm32")]
    fn spawn_request<T, F>(&self, fut: F) -> Pending<T>
    where
        T: 'static,
        F: Future<Output = Result<T, ApiError>> + 'static,
    {
        let slot: Pending<T> = Arc::new(Mutex::new(None));
        let out = slot.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = fut.await;
            if let Ok(mut guard) = out.lock() {
                *guard = Some(result);
            }
        });
        slot
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_request<T, F>(&self, fut: F) -> Pending<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let slot: Pending<T> = Arc::new(Mutex::new(None));
        let out = slot.clone();
        self.runtime.spawn(async move {
            let result = fut.await;
            if let Ok(mut guard) = out.lock() {
                *guard = Some(result);
            }
        });
        slot
    }

    // =========================================================================
    // API CALLS
    // =========================================================================

    fn load_tasks(&mut self) {
        self.tasks.loading = true;
        let api = self.api.clone();
        let filter = self.tasks.filter;
        let sort = self.tasks.sort;
        self.pending_list =
            Some(self.spawn_request(async move { api.list_tasks(filter, sort).await }));
    }

    fn start_create(&mut self, create: TaskCreate) {
        if self.pending_create.is_some() {
            return;
        }
        let api = self.api.clone();
        let body = create.clone();
        let slot = self.spawn_request(async move { api.create_task(&body).await });
        self.pending_create = Some(MutationSlot {
            slot,
            intent: create,
        });
    }

    fn start_update(&mut self, id: i64, update: TaskUpdate) {
        if self.pending_update.is_some() {
            return;
        }
        let api = self.api.clone();
        let body = update.clone();
        let slot = self.spawn_request(async move { api.update_task(id, &body).await });
        self.pending_update = Some(MutationSlot {
            slot,
            intent: (id, update),
        });
    }

    fn start_toggle(&mut self, id: i64) {
        if self.pending_toggle.is_some() {
            return;
        }
        let api = self.api.clone();
        let slot = self.spawn_request(async move { api.toggle_task(id).await });
        self.pending_toggle = Some(MutationSlot { slot, intent: id });
    }

    fn start_delete(&mut self, id: i64) {
        if self.pending_delete.is_some() {
            return;
        }
        let api = self.api.clone();
        let slot = self.spawn_request(async move { api.delete_task(id).await });
        self.pending_delete = Some(MutationSlot { slot, intent: id });
    }

    fn mutation_in_flight(&self) -> bool {
        self.pending_create.is_some()
            || self.pending_update.is_some()
            || self.pending_toggle.is_some()
            || self.pending_delete.is_some()
    }

    fn has_pending(&self) -> bool {
        self.pending_list.is_some() || self.mutation_in_flight()
    }

    fn current_user_id(&self) -> String {
        self.session
            .session()
            .map(|s| s.user.id.clone())
            .unwrap_or_default()
    }

    // =========================================================================
    // ASYNC RESULT HANDLING
    // =========================================================================

    fn check_pending_requests(&mut self) {
        // List fetch
        if let Some(result) = take_slot(&mut self.pending_list) {
            match result {
                Ok(tasks) => self.tasks.set_from_server(tasks),
                Err(ApiError::Unauthorized) => self.handle_unauthorized(),
                Err(e) => {
                    tracing::warn!(error = %e, "task list fetch failed");
                    let unknown = e.outcome_unknown();
                    self.tasks.refresh_failed(unknown, e.to_string());
                }
            }
        }

        // Create
        if let Some((result, intent)) = take_mutation(&mut self.pending_create) {
            match result {
                Ok(task) => {
                    self.tasks.apply_created(task);
                    self.task_form.clear();
                }
                Err(ApiError::Unauthorized) => self.handle_unauthorized(),
                Err(e) if e.outcome_unknown() => {
                    tracing::warn!(error = %e, "create outcome unknown, applying locally");
                    let user_id = self.current_user_id();
                    self.tasks.apply_created_local(intent, &user_id);
                    self.task_form.clear();
                }
                Err(e @ ApiError::Decode(_)) => {
                    // The server confirmed the create but the row was
                    // unreadable; refetch to pick it up.
                    self.tasks.set_error(e.to_string());
                    self.task_form.clear();
                    self.load_tasks();
                }
                Err(e) => self.task_form.set_error(e.to_string()),
            }
        }

        // Update
        if let Some((result, (id, update))) = take_mutation(&mut self.pending_update) {
            match result {
                Ok(task) => {
                    self.tasks.apply_updated(task);
                    self.task_list_panel.close_edit();
                }
                Err(ApiError::Unauthorized) => self.handle_unauthorized(),
                Err(e) if e.outcome_unknown() => {
                    tracing::warn!(error = %e, "update outcome unknown, applying locally");
                    self.tasks.apply_updated_local(id, &update);
                    self.task_list_panel.close_edit();
                }
                Err(e @ ApiError::Decode(_)) => {
                    self.tasks.set_error(e.to_string());
                    self.task_list_panel.close_edit();
                    self.load_tasks();
                }
                Err(e) => self.task_list_panel.set_edit_error(e.to_string()),
            }
        }

        // Toggle completion
        if let Some((result, id)) = take_mutation(&mut self.pending_toggle) {
            match result {
                Ok(task) => self.tasks.apply_updated(task),
                Err(ApiError::Unauthorized) => self.handle_unauthorized(),
                Err(e) if e.outcome_unknown() => {
                    tracing::warn!(error = %e, "toggle outcome unknown, applying locally");
                    self.tasks.apply_toggled_local(id);
                }
                Err(e @ ApiError::Decode(_)) => {
                    self.tasks.set_error(e.to_string());
                    self.load_tasks();
                }
                Err(e) => self.tasks.set_error(e.to_string()),
            }
        }

        // Delete
        if let Some((result, id)) = take_mutation(&mut self.pending_delete) {
            match result {
                Ok(()) => self.tasks.apply_removed(id),
                Err(ApiError::Unauthorized) => self.handle_unauthorized(),
                Err(e) if e.outcome_unknown() => {
                    tracing::warn!(error = %e, "delete outcome unknown, applying locally");
                    self.tasks.apply_removed_local(id);
                }
                Err(e) => self.tasks.set_error(e.to_string()),
            }
        }
    }

    // =========================================================================
    // SESSION TRANSITIONS
    // =========================================================================

    fn handle_unauthorized(&mut self) {
        self.session.expire();
        self.end_session(Some(SESSION_EXPIRED_NOTICE));
    }

    /// Drop everything tied to the signed-in user and return to the login
    /// screen (the session store itself is already cleared by the caller).
    fn end_session(&mut self, notice: Option<&str>) {
        self.tasks = TaskListState::new();
        self.task_form.clear();
        self.task_list_panel.close_edit();
        self.confirm_delete.close();
        self.pending_list = None;
        self.pending_create = None;
        self.pending_update = None;
        self.pending_toggle = None;
        self.pending_delete = None;
        self.login_panel.clear();
        if let Some(notice) = notice {
            self.login_panel.set_notice(notice);
        }
    }

    // =========================================================================
    // SCREENS
    // =========================================================================

    fn show_login(&mut self, ctx: &egui::Context) {
        let mut action = LoginAction::None;
        let loading = self.session.status() == AuthStatus::Loading;

        egui::CentralPanel::default().show(ctx, |ui| {
            if loading {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            } else {
                action = self.login_panel.ui(ui);
            }
        });

        if let LoginAction::SignIn { email, password } = action {
            self.session.sign_in(&email, &password);
            self.tasks = TaskListState::new();
            self.load_tasks();
        }
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        // Modal first so it draws on top.
        if let ConfirmDeleteResult::Confirmed(id) = self.confirm_delete.ui(ctx) {
            self.start_delete(id);
        }

        let user_email = self
            .session
            .session()
            .map(|s| s.user.email.clone())
            .unwrap_or_default();

        let mut nav_action = NavAction::None;
        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            nav_action = navigation_bar(ui, &user_email);
        });
        if nav_action == NavAction::Logout {
            self.session.sign_out();
            self.end_session(None);
            return;
        }

        let notice = self.tasks.notice().cloned();
        let busy = self.mutation_in_flight();
        let create_busy = self.pending_create.is_some();
        let loading = self.tasks.loading;

        let mut form_action = TaskFormAction::None;
        let mut list_action = TaskListAction::None;
        let mut dismiss_notice = false;
        let mut new_filter = self.tasks.filter;
        let mut new_sort = self.tasks.sort;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("My Tasks");
            ui.add_space(4.0);

            if let Some(notice) = &notice {
                let (text, color) = match notice {
                    Notice::Error(message) => {
                        (message.clone(), Color32::from_rgb(248, 113, 113))
                    }
                    Notice::Offline => (
                        "Server unreachable - local changes are not confirmed.".to_string(),
                        Color32::from_rgb(251, 191, 36),
                    ),
                };
                ui.horizontal(|ui| {
                    ui.colored_label(color, text);
                    if ui.small_button("Dismiss").clicked() {
                        dismiss_notice = true;
                    }
                });
                ui.add_space(4.0);
            }

            ui.horizontal(|ui| {
                ui.label("Filter:");
                egui::ComboBox::from_id_salt("status_filter")
                    .selected_text(new_filter.display_name())
                    .show_ui(ui, |ui| {
                        for filter in StatusFilter::ALL {
                            ui.selectable_value(&mut new_filter, filter, filter.display_name());
                        }
                    });
                ui.separator();
                ui.label("Sort by:");
                egui::ComboBox::from_id_salt("sort_key")
                    .selected_text(new_sort.display_name())
                    .show_ui(ui, |ui| {
                        for sort in SortKey::ALL {
                            ui.selectable_value(&mut new_sort, sort, sort.display_name());
                        }
                    });
                if loading {
                    ui.spinner();
                }
            });

            ui.separator();
            form_action = self.task_form.ui(ui, create_busy);
            ui.separator();
            list_action = self
                .task_list_panel
                .ui(ui, self.tasks.records(), loading, busy);
        });

        if dismiss_notice {
            self.tasks.clear_notice();
        }
        if new_filter != self.tasks.filter || new_sort != self.tasks.sort {
            self.tasks.filter = new_filter;
            self.tasks.sort = new_sort;
            self.load_tasks();
        }
        if let TaskFormAction::Create(create) = form_action {
            self.start_create(create);
        }
        match list_action {
            TaskListAction::ToggleCompletion(id) => self.start_toggle(id),
            TaskListAction::SubmitEdit { id, update } => self.start_update(id, update),
            TaskListAction::RequestDelete { id, title } => self.confirm_delete.open(id, title),
            TaskListAction::None => {}
        }
    }
}

impl eframe::App for TaskBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.session.tick(Utc::now()) {
            self.end_session(Some(SESSION_EXPIRED_NOTICE));
        }

        self.check_pending_requests();

        // Keep polling while anything is in flight.
        if self.has_pending() || self.tasks.loading {
            ctx.request_repaint();
        }

        match self.session.status() {
            AuthStatus::Authenticated => self.show_main(ctx),
            AuthStatus::Loading | AuthStatus::Unauthenticated => self.show_login(ctx),
        }
    }
}

/// Take the result out of a completed request slot, clearing the slot.
fn take_slot<T>(slot_opt: &mut Option<Pending<T>>) -> Option<Result<T, ApiError>> {
    let result = slot_opt
        .as_ref()
        .and_then(|slot| slot.try_lock().ok())
        .and_then(|mut guard| guard.take());
    if result.is_some() {
        *slot_opt = None;
    }
    result
}

/// Take the result and intent out of a completed mutation slot.
fn take_mutation<T, I>(
    slot_opt: &mut Option<MutationSlot<T, I>>,
) -> Option<(Result<T, ApiError>, I)> {
    let ready = slot_opt
        .as_ref()
        .map(|s| s.slot.try_lock().map(|g| g.is_some()).unwrap_or(false))
        .unwrap_or(false);
    if !ready {
        return None;
    }
    slot_opt.take().and_then(|MutationSlot { slot, intent }| {
        slot.lock()
            .ok()
            .and_then(|mut guard| guard.take())
            .map(|result| (result, intent))
    })
}
