//! HTTP + WebSocket API for BirdGuard
//!
//! Endpoints:
//! - GET  /health                    - Health check
//! - POST /import                    - Import conversation text into today
//! - GET  /records                   - All day records
//! - GET  /records/:date             - One day record
//! - POST /records/:date/learn       - Complete the day's learning
//! - POST /records/:date/risk-shown  - Acknowledge the risk overlay
//! - GET  /timeline?filter=money     - Projected timeline items
//! - GET  /profile, PUT /profile     - Profile CRUD
//! - WS   /ws                        - Live record updates

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::core::clock::today_seoul_key;
use crate::core::escalation::bird_state_for_uploads;
use crate::core::parser::ConversationParser;
use crate::core::store::{DayRecordStore, Storage};
use crate::core::timeline::{complete_learning, project, TimelineStore};
use crate::types::{
    BirdState, DayRecord, FlagKind, ImmediateRisk, ImportDraft, Mood, Profile, StorageError,
    TimelineEntry, TimelineItem,
};

/// Live update message, broadcast after every record mutation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub date: String,
    pub upload_count: u32,
    pub bird: BirdState,
    pub risk_flags_count: usize,
    pub learned: bool,
}

impl RecordUpdate {
    fn from_record(record: &DayRecord) -> Self {
        Self {
            date: record.date.clone(),
            upload_count: record.upload_count,
            bird: bird_state_for_uploads(record.upload_count),
            risk_flags_count: record.flags.count(),
            learned: record.learned,
        }
    }
}

/// App state shared by all handlers
pub struct AppState {
    pub records: RwLock<DayRecordStore>,
    pub timeline: RwLock<TimelineStore>,
    pub storage: Arc<dyn Storage>,
    pub parser: ConversationParser,
    pub update_tx: broadcast::Sender<RecordUpdate>,
}

/// Import request: decoded conversation text plus optional extras
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub text: String,
    #[serde(default)]
    pub source_file_name: Option<String>,
    #[serde(default)]
    pub native_sentences: Option<Vec<String>>,
    #[serde(default)]
    pub immediate_risk: Option<ImmediateRisk>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub record: DayRecord,
    pub summary: String,
    pub tags: Vec<String>,
    pub risk_flags_count: usize,
    pub bird: BirdState,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnResponse {
    pub record: DayRecord,
    pub entry: TimelineEntry,
    pub bird_state: Mood,
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub records: usize,
}

/// Create the API router
///
/// Fails when the stores cannot be opened, e.g. an unwritable data
/// directory surfaces here rather than at the first request.
pub fn create_router(storage: Arc<dyn Storage>) -> Result<Router, StorageError> {
    let records = DayRecordStore::open(storage.clone())?;
    let timeline = TimelineStore::open(storage.clone())?;
    let (tx, _) = broadcast::channel(100);

    let state = Arc::new(AppState {
        records: RwLock::new(records),
        timeline: RwLock::new(timeline),
        storage,
        parser: ConversationParser::new(),
        update_tx: tx,
    });

    Ok(Router::new()
        .route("/health", get(health))
        .route("/import", post(import))
        .route("/records", get(list_records))
        .route("/records/:date", get(get_record))
        .route("/records/:date/learn", post(learn))
        .route("/records/:date/risk-shown", post(risk_shown))
        .route("/timeline", get(timeline_items))
        .route("/profile", get(get_profile))
        .route("/profile", put(put_profile))
        .route("/ws", get(websocket_handler))
        .with_state(state))
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = state.records.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        records: records.records().len(),
    })
}

/// Import conversation text into today's record
async fn import(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, StatusCode> {
    let parsed = state.parser.parse(&req.text);

    let draft = ImportDraft {
        native_sentences: req.native_sentences,
        source_file_name: req.source_file_name,
        immediate_risk: req.immediate_risk,
        ..ImportDraft::from_parsed(&parsed)
    };

    let today = today_seoul_key();
    let mut records = state.records.write().await;
    let record = records
        .add_or_update(&today, draft)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let _ = state.update_tx.send(RecordUpdate::from_record(&record));

    Ok(Json(ImportResponse {
        bird: bird_state_for_uploads(record.upload_count),
        record,
        summary: parsed.summary,
        tags: parsed.tags,
        risk_flags_count: parsed.risk_flags_count,
    }))
}

/// All day records
async fn list_records(State(state): State<Arc<AppState>>) -> Json<Vec<DayRecord>> {
    let records = state.records.read().await;
    Json(records.records().to_vec())
}

/// One day record by date key
async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DayRecord>, StatusCode> {
    let records = state.records.read().await;
    let record = records.get(&date).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(record.clone()))
}

/// Complete the day's learning, appending the timeline snapshot
async fn learn(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<LearnResponse>, StatusCode> {
    let mut records = state.records.write().await;
    let mut timeline = state.timeline.write().await;

    let outcome = complete_learning(&mut records, &mut timeline, &date)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let _ = state.update_tx.send(RecordUpdate::from_record(&outcome.record));

    Ok(Json(LearnResponse {
        bird_state: outcome.risk_level.to_mood(),
        record: outcome.record,
        entry: outcome.entry,
    }))
}

/// Acknowledge the risk overlay for a date
async fn risk_shown(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<Json<DayRecord>, StatusCode> {
    let mut records = state.records.write().await;
    let record = records
        .mark_immediate_risk_shown(&date)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(record))
}

/// Projected timeline items, optionally filtered by flag
async fn timeline_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<TimelineItem>>, StatusCode> {
    let filter = match query.filter.as_deref() {
        None | Some("all") => None,
        Some(key) => Some(FlagKind::from_filter_key(key).ok_or(StatusCode::BAD_REQUEST)?),
    };

    let records = state.records.read().await;
    Ok(Json(project(records.records(), filter)))
}

/// Load the profile
async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<Profile>, StatusCode> {
    let profile = state
        .storage
        .load_profile()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(profile))
}

/// Save the profile
async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, StatusCode> {
    state
        .storage
        .save_profile(&profile)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(profile))
}

/// WebSocket handler for live record updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = state.update_tx.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, rx))
}

/// Forward broadcast updates until the client goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<RecordUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => {
                let update = match update {
                    Ok(update) => update,
                    Err(_) => break,
                };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
}

/// Run the API server
pub async fn run_server(addr: &str, storage: Arc<dyn Storage>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(storage)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("🐦 BirdGuard API running on {}", addr);
    println!("  POST /import                   - Import conversation text");
    println!("  GET  /records                  - List day records");
    println!("  POST /records/:date/learn      - Complete learning");
    println!("  POST /records/:date/risk-shown - Acknowledge risk overlay");
    println!("  GET  /timeline                 - Projected timeline");
    println!("  GET/PUT /profile               - Profile");
    println!("  WS   /ws                       - Live updates");
    println!("  GET  /health                   - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
