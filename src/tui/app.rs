//! Application State
//!
//! Owns every piece of dashboard state and sequences the
//! upload → map columns → analyze → render flow. Network calls run as
//! spawned tasks that report back through an [`AppEvent`] channel; whichever
//! completion arrives last wins.

use crate::client::AnalyticsBackend;
use crate::config::Config;
use crate::dashboard::{render_results, ChartRegistry, PanelId, ResultsView};
use crate::intake::{self, IntakeSource};
use crate::mapping::ColumnMapper;
use crate::models::{AnalysisResult, UploadResponse, UploadedFile};
use crate::tui::event::AppAction;
use crate::tui::theme::Theme;
use crate::types::{AppError, AppResult};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::{CursorMove, TextArea};

const PATH_PLACEHOLDER: &str = "Path to a CSV file, then Enter";

/// Where the flow currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineStage {
    /// Waiting for a file
    #[default]
    Idle,
    /// Fetching sample data or uploading
    Uploading,
    /// Columns received, waiting for the user to confirm the mapping
    Mapping,
    /// Analysis request in flight
    Analyzing,
    /// Results rendered
    Complete,
    /// Last request failed
    Error(String),
}

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Help,
}

/// Panel receiving keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Intake,
    Mapping,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Info,
}

/// Inline, dismissable message shown in the results area
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Content of the results area
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResultsArea {
    #[default]
    Empty,
    Alert(Alert),
    Rendered(ResultsView),
}

/// A discrete user command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Manual selection of a local file
    SelectFile(PathBuf),
    /// Raw text delivered by a terminal drag-and-drop
    DropFile(String),
    LoadSample,
    ClearFile,
    /// Re-post the currently selected file
    SubmitUpload,
    SubmitAnalysis,
}

/// Events from spawned network tasks
#[derive(Debug)]
pub enum AppEvent {
    SampleFetched(AppResult<UploadedFile>),
    UploadSettled(AppResult<UploadResponse>),
    AnalysisSettled(AppResult<AnalysisResult>),
}

/// Main application state
pub struct App {
    // Configuration
    pub config: Config,

    // UI State
    pub view: View,
    pub focus: Focus,
    pub should_quit: bool,
    pub loading: bool,
    pub spinner_frame: usize,
    pub pipeline_stage: PipelineStage,

    // Intake
    pub path_input: TextArea<'static>,
    pub current_file: Option<UploadedFile>,

    // Mapping
    pub mapper: Option<ColumnMapper>,
    pub mapping_visible: bool,
    pub analysis_filename: Option<String>,

    // Results
    pub results: ResultsArea,
    pub charts: ChartRegistry,
    pub results_page: usize,
    pub chart_cursor: usize,

    // Async communication
    backend: Arc<dyn AnalyticsBackend>,
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

fn new_path_input() -> TextArea<'static> {
    let mut input = TextArea::default();
    input.set_cursor_line_style(ratatui::style::Style::default());
    input.set_placeholder_text(PATH_PLACEHOLDER);
    input.set_placeholder_style(Theme::placeholder());
    input
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, backend: Arc<dyn AnalyticsBackend>) -> Self {
        let (tx, rx) = mpsc::channel(100);

        Self {
            config,
            view: View::Dashboard,
            focus: Focus::Intake,
            should_quit: false,
            loading: false,
            spinner_frame: 0,
            pipeline_stage: PipelineStage::Idle,
            path_input: new_path_input(),
            current_file: None,
            mapper: None,
            mapping_visible: false,
            analysis_filename: None,
            results: ResultsArea::Empty,
            charts: ChartRegistry::new(),
            results_page: 0,
            chart_cursor: 0,
            backend,
            event_rx: rx,
            event_tx: tx,
        }
    }

    /// Poll for async events
    pub fn poll_events(&mut self) {
        let mut collected = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            collected.push(event);
        }

        for event in collected {
            self.handle_event(event);
        }
    }

    /// Wait for the next async event and apply it
    pub async fn next_event(&mut self) -> bool {
        match self.event_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Handle an async event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SampleFetched(result) => self.sample_settled(result),
            AppEvent::UploadSettled(result) => self.upload_settled(result),
            AppEvent::AnalysisSettled(result) => self.analysis_settled(result),
        }
    }

    /// Apply a user command
    pub async fn dispatch(&mut self, command: Command) {
        match command {
            Command::SelectFile(path) => self.intake_path(path, IntakeSource::Selected).await,
            Command::DropFile(raw) => {
                if let Some(path) = intake::normalize_dropped_path(&raw) {
                    self.intake_path(path, IntakeSource::Dropped).await;
                }
            }
            Command::LoadSample => self.load_sample(),
            Command::ClearFile => self.clear_file(),
            Command::SubmitUpload => self.submit_upload(),
            Command::SubmitAnalysis => self.submit_analysis(),
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => match self.focus {
                Focus::Intake => {
                    let typed = self.path_input.lines().join("");
                    if let Some(path) = intake::normalize_selected_path(&typed) {
                        self.dispatch(Command::SelectFile(path)).await;
                    }
                }
                Focus::Mapping => self.dispatch(Command::SubmitAnalysis).await,
                Focus::Results => {}
            },
            AppAction::Paste(text) => self.dispatch(Command::DropFile(text)).await,
            AppAction::LoadSample => self.dispatch(Command::LoadSample).await,
            AppAction::ClearFile => self.dispatch(Command::ClearFile).await,
            AppAction::Reupload => self.dispatch(Command::SubmitUpload).await,
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Dashboard
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                if self.view != View::Dashboard {
                    self.view = View::Dashboard;
                } else if matches!(self.results, ResultsArea::Alert(_)) {
                    self.results = ResultsArea::Empty;
                }
            }
            AppAction::NextFocus => self.cycle_focus(true),
            AppAction::PrevFocus => self.cycle_focus(false),
            AppAction::Up => {
                if let (Focus::Mapping, Some(mapper)) = (self.focus, self.mapper.as_mut()) {
                    mapper.focus_prev();
                }
            }
            AppAction::Down => {
                if let (Focus::Mapping, Some(mapper)) = (self.focus, self.mapper.as_mut()) {
                    mapper.focus_next();
                }
            }
            AppAction::Left => match self.focus {
                Focus::Intake => self.path_input.move_cursor(CursorMove::Back),
                Focus::Mapping => {
                    if let Some(mapper) = self.mapper.as_mut() {
                        mapper.cycle_prev();
                    }
                }
                Focus::Results => self.chart_cursor = self.chart_cursor.saturating_sub(1),
            },
            AppAction::Right => match self.focus {
                Focus::Intake => self.path_input.move_cursor(CursorMove::Forward),
                Focus::Mapping => {
                    if let Some(mapper) = self.mapper.as_mut() {
                        mapper.cycle_next();
                    }
                }
                Focus::Results => {
                    if self.chart_cursor + 1 < self.cursor_limit() {
                        self.chart_cursor += 1;
                    }
                }
            },
            AppAction::PageUp => {
                self.results_page = self.results_page.saturating_sub(1);
            }
            AppAction::PageDown => {
                if self.results_page + 1 < self.page_count() {
                    self.results_page += 1;
                }
            }
            AppAction::Input(key_event) => {
                if self.focus == Focus::Intake && self.view == View::Dashboard {
                    self.path_input.input(key_event);
                }
            }
            AppAction::Tick => {
                if self.loading {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let mut order = vec![Focus::Intake];
        if self.mapping_visible {
            order.push(Focus::Mapping);
        }
        if matches!(self.results, ResultsArea::Rendered(_)) {
            order.push(Focus::Results);
        }

        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    // === File Intake ===

    async fn intake_path(&mut self, path: PathBuf, source: IntakeSource) {
        match intake::read_local_file(&path).await {
            Ok(file) => self.handle_file(file, source),
            Err(e) => self.show_error(e),
        }
    }

    /// Accept a file: show it in intake, reset downstream panels, upload it
    fn handle_file(&mut self, file: UploadedFile, source: IntakeSource) {
        info!("Accepted {} from {:?} intake", file.name, source);
        self.current_file = Some(file.clone());
        self.loading = true;
        self.results = ResultsArea::Empty;
        self.hide_mapping();
        self.pipeline_stage = PipelineStage::Uploading;
        self.spawn_upload(file);
    }

    fn load_sample(&mut self) {
        self.loading = true;
        self.results = ResultsArea::Empty;
        self.hide_mapping();
        self.pipeline_stage = PipelineStage::Uploading;

        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.fetch_sample().await;
            tx.send(AppEvent::SampleFetched(result)).await.ok();
        });
    }

    fn sample_settled(&mut self, result: AppResult<UploadedFile>) {
        match result {
            Ok(file) => self.handle_file(file, IntakeSource::Sample),
            Err(e) => {
                self.loading = false;
                self.show_error(e);
            }
        }
    }

    /// Explicit teardown: reset intake, hide mapping, drop results and charts
    fn clear_file(&mut self) {
        info!("Clearing file selection");
        self.current_file = None;
        self.path_input = new_path_input();
        self.results = ResultsArea::Empty;
        self.hide_mapping();
        self.charts.dispose_all();
        self.results_page = 0;
        self.chart_cursor = 0;
        self.pipeline_stage = PipelineStage::Idle;
    }

    /// Hidden panels cannot hold focus
    fn hide_mapping(&mut self) {
        self.mapping_visible = false;
        self.focus = Focus::Intake;
    }

    // === Upload Coordinator ===

    fn submit_upload(&mut self) {
        match self.current_file.clone() {
            Some(file) => self.spawn_upload(file),
            None => self.show_error(AppError::NoFileSelected),
        }
    }

    fn spawn_upload(&self, file: UploadedFile) {
        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.upload(&file).await;
            tx.send(AppEvent::UploadSettled(result)).await.ok();
        });
    }

    fn upload_settled(&mut self, result: AppResult<UploadResponse>) {
        self.loading = false;
        match result {
            Ok(reply) => {
                info!("Upload settled: {} columns, token {}", reply.columns.len(), reply.filename);
                self.mapper = Some(ColumnMapper::new(reply.columns));
                self.mapping_visible = true;
                self.analysis_filename = Some(reply.filename);
                self.focus = Focus::Mapping;
                self.pipeline_stage = PipelineStage::Mapping;
            }
            Err(e) => self.show_error(e),
        }
    }

    // === Analysis Coordinator ===

    fn submit_analysis(&mut self) {
        let Some(mapper) = self.mapper.as_ref().filter(|_| self.mapping_visible) else {
            return;
        };
        let mapping = mapper.field_mapping();
        let filename = self.analysis_filename.clone();

        self.loading = true;
        self.results = ResultsArea::Empty;
        self.pipeline_stage = PipelineStage::Analyzing;

        let backend = Arc::clone(&self.backend);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = backend.analyze(filename.as_deref(), &mapping).await;
            tx.send(AppEvent::AnalysisSettled(result)).await.ok();
        });
    }

    fn analysis_settled(&mut self, result: AppResult<AnalysisResult>) {
        self.loading = false;
        match result {
            Ok(result) => {
                let view = render_results(&result, &mut self.charts);
                self.results_page = 0;
                self.chart_cursor = 0;
                self.pipeline_stage = PipelineStage::Complete;
                self.results = match view.notice() {
                    Some(notice) => ResultsArea::Alert(Alert::info(notice)),
                    None => {
                        self.focus = Focus::Results;
                        ResultsArea::Rendered(view)
                    }
                };
            }
            Err(e) => self.show_error(e),
        }
    }

    fn show_error(&mut self, error: AppError) {
        warn!("{}", error);
        self.pipeline_stage = PipelineStage::Error(error.to_string());
        self.results = ResultsArea::Alert(Alert::error(error.to_string()));
    }

    // === Results paging ===

    fn rendered_panels(&self) -> &[PanelId] {
        match &self.results {
            ResultsArea::Rendered(view) => &view.panels,
            _ => &[],
        }
    }

    pub fn page_count(&self) -> usize {
        let per_page = self.config.ui.charts_per_page.max(1);
        self.rendered_panels().len().div_ceil(per_page).max(1)
    }

    /// Panels shown on the current page
    pub fn visible_panels(&self) -> &[PanelId] {
        let panels = self.rendered_panels();
        let per_page = self.config.ui.charts_per_page.max(1);
        let start = (self.results_page * per_page).min(panels.len());
        let end = (start + per_page).min(panels.len());
        &panels[start..end]
    }

    /// One past the largest cursor position over the visible charts
    fn cursor_limit(&self) -> usize {
        self.visible_panels()
            .iter()
            .filter_map(|p| self.charts.get(*p))
            .map(|c| c.len())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::FakeBackend;
    use crate::dashboard::NO_RESULTS_MESSAGE;
    use crate::models::SemanticField;
    use serde_json::json;
    use tempfile::TempDir;

    fn upload_ok() -> AppResult<UploadResponse> {
        Ok(UploadResponse {
            columns: vec!["CustomerID".into(), "InvoiceNo".into(), "UnitPrice".into()],
            filename: "orders.csv".into(),
        })
    }

    fn payload(value: serde_json::Value) -> AppResult<AnalysisResult> {
        Ok(serde_json::from_value(value).unwrap())
    }

    fn app_with(backend: FakeBackend) -> (App, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        let app = App::new(Config::default(), backend.clone());
        (app, backend)
    }

    fn csv_on_disk() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.csv");
        std::fs::write(&path, "CustomerID,InvoiceNo,UnitPrice\n1,2,3\n").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_successful_upload_shows_mapping() {
        let (mut app, backend) = app_with(FakeBackend::default().with_upload(upload_ok()));
        let (_dir, path) = csv_on_disk();

        app.dispatch(Command::SelectFile(path)).await;
        assert!(app.loading);
        assert!(!app.mapping_visible);

        app.next_event().await;
        assert!(!app.loading);
        assert!(app.mapping_visible);
        assert_eq!(app.analysis_filename.as_deref(), Some("orders.csv"));
        assert_eq!(app.focus, Focus::Mapping);
        assert_eq!(
            app.mapper.as_ref().map(|m| m.selection(SemanticField::CustomerId).to_string()),
            Some("CustomerID".to_string())
        );
        assert_eq!(backend.upload_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_upload_hides_mapping() {
        let (mut app, _backend) = app_with(
            FakeBackend::default().with_upload(Err(AppError::Server("No selected file".into()))),
        );
        let (_dir, path) = csv_on_disk();

        app.dispatch(Command::SelectFile(path)).await;
        app.next_event().await;

        assert!(!app.loading);
        assert!(!app.mapping_visible);
        assert!(matches!(
            &app.results,
            ResultsArea::Alert(a) if a.kind == AlertKind::Error && a.message == "Error: No selected file"
        ));
    }

    #[tokio::test]
    async fn test_new_file_returns_focus_to_intake() {
        let (mut app, backend, _dir) = app_at_mapping(payload(json!({
            "Sales by Day": [{"day": "Monday", "sales": 5.0}]
        })))
        .await;
        assert_eq!(app.focus, Focus::Mapping);

        let (_other_dir, other) = csv_on_disk();
        app.dispatch(Command::SelectFile(other.clone())).await;
        assert!(!app.mapping_visible);
        assert_eq!(app.focus, Focus::Intake);

        // Arrows no longer reach the hidden mapper
        let before = app.mapper.as_ref().map(|m| m.field_mapping());
        app.handle_action(AppAction::Down).await;
        app.handle_action(AppAction::Right).await;
        assert_eq!(app.mapper.as_ref().map(|m| m.field_mapping()), before);

        app.next_event().await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;
        assert_eq!(app.focus, Focus::Results);

        app.dispatch(Command::SelectFile(other)).await;
        assert_eq!(app.results, ResultsArea::Empty);
        assert_eq!(app.focus, Focus::Intake);
        assert_eq!(backend.upload_count(), 3);
    }

    #[tokio::test]
    async fn test_failed_sample_never_uploads() {
        let (mut app, backend) = app_with(
            FakeBackend::default()
                .with_upload(upload_ok())
                .with_sample(Err(AppError::SampleUnavailable("Failed to load sample data.".into()))),
        );

        app.dispatch(Command::LoadSample).await;
        assert!(app.loading);
        app.next_event().await;

        assert!(!app.loading);
        assert_eq!(backend.upload_count(), 0);
        assert!(matches!(&app.results, ResultsArea::Alert(a) if a.kind == AlertKind::Error));
    }

    #[tokio::test]
    async fn test_sample_flows_into_upload() {
        let (mut app, backend) = app_with(
            FakeBackend::default()
                .with_upload(upload_ok())
                .with_sample(Ok(intake::sample_file(&b"CustomerID\n1\n"[..]))),
        );

        app.dispatch(Command::LoadSample).await;
        app.next_event().await;
        assert_eq!(app.current_file.as_ref().map(|f| f.name.as_str()), Some("sample_data.csv"));
        assert!(app.loading);

        app.next_event().await;
        assert_eq!(backend.upload_count(), 1);
        assert!(app.mapping_visible);
    }

    #[tokio::test]
    async fn test_drop_of_nothing_is_noop() {
        let (mut app, backend) = app_with(FakeBackend::default().with_upload(upload_ok()));
        app.dispatch(Command::DropFile("  \n".into())).await;
        assert!(!app.loading);
        assert!(app.current_file.is_none());
        assert_eq!(backend.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_error() {
        let (mut app, backend) = app_with(FakeBackend::default().with_upload(upload_ok()));
        app.dispatch(Command::SelectFile(PathBuf::from("/definitely/not/here.csv"))).await;
        assert!(matches!(&app.results, ResultsArea::Alert(a) if a.kind == AlertKind::Error));
        assert_eq!(backend.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_upload_without_file() {
        let (mut app, _backend) = app_with(FakeBackend::default());
        app.dispatch(Command::SubmitUpload).await;
        assert!(matches!(
            &app.results,
            ResultsArea::Alert(a) if a.message == "Please select or drop a CSV file to upload."
        ));
    }

    async fn app_at_mapping(analysis: AppResult<AnalysisResult>) -> (App, Arc<FakeBackend>, TempDir) {
        let (mut app, backend) = app_with(FakeBackend::default().with_upload(upload_ok()).with_analysis(analysis));
        let (dir, path) = csv_on_disk();
        app.dispatch(Command::SelectFile(path)).await;
        app.next_event().await;
        (app, backend, dir)
    }

    #[tokio::test]
    async fn test_analysis_renders_charts() {
        let (mut app, backend, _dir) = app_at_mapping(payload(json!({
            "Total Revenue": "$1,000.00",
            "Total Transactions": 4,
            "Unique Customers": 2,
            "Sales by Day": [{"day": "Monday", "sales": 5.0}]
        })))
        .await;

        app.dispatch(Command::SubmitAnalysis).await;
        assert!(app.loading);
        app.next_event().await;

        assert!(!app.loading);
        assert_eq!(app.charts.len(), 1);
        assert_eq!(app.focus, Focus::Results);
        match &app.results {
            ResultsArea::Rendered(view) => {
                assert_eq!(view.metrics.as_ref().unwrap()[2].value, "$250.00");
            }
            other => panic!("unexpected results area: {:?}", other),
        }

        let sent = backend.last_mapping.lock().unwrap().clone().unwrap();
        assert_eq!(sent.0.as_deref(), Some("orders.csv"));
        assert_eq!(sent.1.customer_id_col, "CustomerID");
        assert_eq!(sent.1.country_col, "");
    }

    #[tokio::test]
    async fn test_analysis_rerender_replaces_charts() {
        let (mut app, backend, _dir) = app_at_mapping(payload(json!({
            "Top Customers": [{"customer_id": 1, "total_revenue": 5.0}],
            "Top Products": [{"product": "MUG", "total_sales": 5.0}]
        })))
        .await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;
        assert_eq!(app.charts.len(), 2);

        backend.set_analysis(payload(json!({"Sales by Hour": [{"hour": 9, "sales": 1.0}]})));
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;

        assert_eq!(app.charts.panels().collect::<Vec<_>>(), vec![PanelId::SalesByHour]);
    }

    #[tokio::test]
    async fn test_analysis_error_payload_keeps_charts() {
        let (mut app, backend, _dir) = app_at_mapping(payload(json!({
            "Sales by Day": [{"day": "Monday", "sales": 5.0}]
        })))
        .await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;

        backend.set_analysis(Err(AppError::Server("File not found. Please re-upload.".into())));
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;

        assert!(!app.loading);
        assert_eq!(app.charts.len(), 1);
        assert!(matches!(
            &app.results,
            ResultsArea::Alert(a) if a.message == "Error: File not found. Please re-upload."
        ));
    }

    #[tokio::test]
    async fn test_empty_analysis_shows_notice() {
        let (mut app, _backend, _dir) = app_at_mapping(payload(json!({"Top Customers": []}))).await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;

        assert!(app.charts.is_empty());
        assert!(matches!(
            &app.results,
            ResultsArea::Alert(a) if a.kind == AlertKind::Info && a.message == NO_RESULTS_MESSAGE
        ));
    }

    #[tokio::test]
    async fn test_clear_tears_everything_down() {
        let (mut app, _backend, _dir) = app_at_mapping(payload(json!({
            "Sales by Day": [{"day": "Monday", "sales": 5.0}],
            "Sales by Hour": [{"hour": 9, "sales": 5.0}]
        })))
        .await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;
        assert_eq!(app.charts.len(), 2);

        app.dispatch(Command::ClearFile).await;
        assert!(app.charts.is_empty());
        assert_eq!(app.charts.disposed_count(), 2);
        assert!(app.current_file.is_none());
        assert!(!app.mapping_visible);
        assert_eq!(app.results, ResultsArea::Empty);
        assert_eq!(app.focus, Focus::Intake);
        assert_eq!(app.pipeline_stage, PipelineStage::Idle);
    }

    #[tokio::test]
    async fn test_last_upload_completion_wins() {
        let (mut app, _backend) = app_with(FakeBackend::default());

        app.handle_event(AppEvent::UploadSettled(Ok(UploadResponse {
            columns: vec!["a".into()],
            filename: "second.csv".into(),
        })));
        app.handle_event(AppEvent::UploadSettled(Ok(UploadResponse {
            columns: vec!["b".into()],
            filename: "first.csv".into(),
        })));

        assert_eq!(app.analysis_filename.as_deref(), Some("first.csv"));
        assert_eq!(app.mapper.as_ref().map(|m| m.columns().to_vec()), Some(vec!["b".to_string()]));
    }

    #[tokio::test]
    async fn test_submit_analysis_requires_mapping_panel() {
        let (mut app, backend) = app_with(FakeBackend::default());
        app.dispatch(Command::SubmitAnalysis).await;
        assert!(!app.loading);
        assert_eq!(backend.analysis_count(), 0);
    }

    #[tokio::test]
    async fn test_escape_dismisses_alert() {
        let (mut app, _backend) = app_with(FakeBackend::default());
        app.dispatch(Command::SubmitUpload).await;
        app.handle_action(AppAction::Escape).await;
        assert_eq!(app.results, ResultsArea::Empty);
    }

    #[tokio::test]
    async fn test_paging_over_panels() {
        let (mut app, _backend, _dir) = app_at_mapping(payload(json!({
            "Top Customers": [{"customer_id": 1, "total_revenue": 5.0}],
            "Monthly Sales Trends": [{"month": "2011-01", "sales": 5.0}],
            "Top Products": [{"product": "MUG", "total_sales": 5.0}],
            "Sales by Country": [{"country": "UK", "total_sales": 5.0}],
            "Sales by Day": [{"day": "Monday", "sales": 5.0}, {"day": "Friday", "sales": 2.0}]
        })))
        .await;
        app.dispatch(Command::SubmitAnalysis).await;
        app.next_event().await;

        assert_eq!(app.page_count(), 2);
        assert_eq!(app.visible_panels().len(), 4);
        app.handle_action(AppAction::PageDown).await;
        assert_eq!(app.visible_panels(), &[PanelId::SalesByDay]);
        app.handle_action(AppAction::PageDown).await;
        assert_eq!(app.results_page, 1);

        app.handle_action(AppAction::Right).await;
        app.handle_action(AppAction::Right).await;
        assert_eq!(app.chart_cursor, 1);
    }
}
