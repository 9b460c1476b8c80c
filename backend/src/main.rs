use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use pmi_core::annotation::{
    self, AnnotationError, DimensionKind, LengthGeometry, MeasurementGeometry, PlacementConfig,
};
use pmi_core::geometry::{Plane, Point3, Vector3};
use pmi_core::topo::{EntityId, ModelSnapshot, Shape, ShapeRegistry};
use pmi_core::units::LengthUnit;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Format an error as a JSON message for the frontend
fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!("ERROR_UPDATE:{}", json!({
        "code": code,
        "message": message,
        "severity": severity
    }))
}

fn annotation_error(err: &AnnotationError) -> String {
    format_error(err.code(), err.reason(), "error")
}

/// Process settings, read once from the environment at startup.
struct ServerConfig {
    addr: SocketAddr,
    placement: PlacementConfig,
    unit: LengthUnit,
}

impl ServerConfig {
    fn from_env() -> Self {
        let addr = std::env::var("PMI_BACKEND_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr.parse().unwrap_or_else(|_| {
            warn!("Invalid PMI_BACKEND_ADDR '{}', using {}", addr, DEFAULT_ADDR);
            SocketAddr::from(([127, 0, 0, 1], 3000))
        });

        let placement = match std::env::var("PMI_PLACEMENT") {
            Ok(raw) => parse_placement(&raw).unwrap_or_else(|e| {
                warn!("Invalid PMI_PLACEMENT ({}), using defaults", e);
                PlacementConfig::default()
            }),
            Err(_) => PlacementConfig::default(),
        };

        let unit = match std::env::var("PMI_DISPLAY_UNIT") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, labelling in mm", e);
                LengthUnit::Millimeter
            }),
            Err(_) => LengthUnit::Millimeter,
        };

        Self { addr, placement, unit }
    }
}

fn parse_placement(raw: &str) -> Result<PlacementConfig, String> {
    let placement: PlacementConfig = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    placement.validate()?;
    Ok(placement)
}

// Application State
struct AppState {
    registry: RwLock<ShapeRegistry>,
    placement: PlacementConfig,
    unit: LengthUnit,
}

impl AppState {
    fn new(placement: PlacementConfig, unit: LengthUnit) -> Self {
        Self {
            registry: RwLock::new(ShapeRegistry::new()),
            placement,
            unit,
        }
    }

    // Lock poisoning is ignored.
    fn registry(&self) -> RwLockReadGuard<'_, ShapeRegistry> {
        self.registry.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, ShapeRegistry> {
        self.registry.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let shared_state = Arc::new(AppState::new(config.placement, config.unit));

    // build our application with a route
    let app = Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    info!("listening on {}", config.addr);
    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Failed to bind {}: {}", config.addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        warn!("Server stopped: {}", e);
    }
}

async fn root() -> &'static str {
    "Hello from PMI Backend!"
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session = Uuid::new_v4();
    info!("Client connected ({})", session);

    let (mut sender, mut receiver) = socket.split();

    {
        let count = state.registry().len();
        let hello = format!("MODEL_UPDATE:{}", json!({ "count": count }));
        if sender.send(Message::Text(hello)).await.is_err() {
            return;
        }
    }

    while let Some(msg) = receiver.next().await {
        let msg = if let Ok(msg) = msg {
            msg
        } else {
            break;
        };

        match msg {
            Message::Text(text) => {
                info!("Received message: {}", summarize(&text));
                let reply = handle_command(&text, &state);
                if sender.send(Message::Text(reply)).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("Client disconnected ({})", session);
}

/// Command name plus payload size; model payloads are too large to log.
fn summarize(text: &str) -> String {
    match text.split_once(':') {
        Some((command, payload)) => format!("{} ({} bytes)", command, payload.len()),
        None => text.to_string(),
    }
}

#[derive(Deserialize)]
struct PrimitiveCmd {
    id: EntityId,
}

#[derive(Deserialize)]
struct DimensionCmd {
    kind: DimensionKind,
    first: EntityId,
    second: Option<EntityId>,
    placement_plane: Option<Plane>,
}

#[derive(Deserialize)]
struct DatumCmd {
    shape: EntityId,
    touch: Point3,
    placement_normal: Vector3,
    #[serde(default)]
    label_width: f64,
}

#[derive(Deserialize)]
struct ToleranceCmd {
    shape: EntityId,
    touch: Point3,
}

#[derive(Deserialize)]
struct PlaceCmd {
    touch: Point3,
    direction: Vector3,
}

fn parse<'a, T: Deserialize<'a>>(command: &str, json_str: &'a str) -> Result<T, String> {
    serde_json::from_str(json_str).map_err(|e| {
        warn!("Failed to parse {} command: {}", command, e);
        format_error("BAD_COMMAND", &format!("malformed {} command: {}", command, e), "warning")
    })
}

fn resolve(registry: &ShapeRegistry, id: &EntityId) -> Result<Shape, String> {
    registry.resolve(id).cloned().ok_or_else(|| {
        warn!("Shape {} not found", id);
        format_error("UNKNOWN_SHAPE", &format!("shape {} is not part of the loaded model", id), "error")
    })
}

/// Runs one text command and returns the frame to send back.
fn handle_command(text: &str, state: &AppState) -> String {
    let result = if let Some(json_str) = text.strip_prefix("MODEL_LOAD:") {
        load_model(json_str, state)
    } else if let Some(json_str) = text.strip_prefix("PRIMITIVE:") {
        primitive(json_str, state)
    } else if let Some(json_str) = text.strip_prefix("DIMENSION:") {
        dimension(json_str, state)
    } else if let Some(json_str) = text.strip_prefix("DATUM:") {
        datum(json_str, state)
    } else if let Some(json_str) = text.strip_prefix("TOLERANCE:") {
        tolerance(json_str, state)
    } else if let Some(json_str) = text.strip_prefix("PLACE:") {
        place(json_str, state)
    } else {
        warn!("Unknown command: {}", summarize(text));
        Err(format_error("UNKNOWN_COMMAND", "unknown command", "warning"))
    };

    result.unwrap_or_else(|frame| frame)
}

fn load_model(json_str: &str, state: &AppState) -> Result<String, String> {
    let snapshot = ModelSnapshot::from_json(json_str).map_err(|e| {
        warn!("Failed to parse MODEL_LOAD command: {}", e);
        format_error("BAD_COMMAND", &format!("malformed MODEL_LOAD command: {}", e), "warning")
    })?;

    let mut registry = state.registry_mut();
    registry.load(snapshot);
    info!("Loaded model with {} shapes", registry.len());
    Ok(format!(
        "MODEL_UPDATE:{}",
        json!({ "count": registry.len(), "bounds": registry.bounds() })
    ))
}

fn primitive(json_str: &str, state: &AppState) -> Result<String, String> {
    let cmd: PrimitiveCmd = parse("PRIMITIVE", json_str)?;
    let shape = resolve(&state.registry(), &cmd.id)?;
    let primitive = annotation::extract_primitive(&shape);
    Ok(format!("PRIMITIVE_UPDATE:{}", json!({ "id": cmd.id, "primitive": primitive })))
}

fn dimension(json_str: &str, state: &AppState) -> Result<String, String> {
    let cmd: DimensionCmd = parse("DIMENSION", json_str)?;
    let (first, second, bounds) = {
        let registry = state.registry();
        let first = resolve(&registry, &cmd.first)?;
        let second = match &cmd.second {
            Some(id) => Some(resolve(&registry, id)?),
            None => None,
        };
        (first, second, registry.bounds())
    };

    let placement = match cmd.placement_plane {
        Some(plane) => Some(Plane::from_point_normal(plane.origin, plane.normal).ok_or_else(|| {
            format_error("BAD_COMMAND", "placement plane has no normal", "warning")
        })?),
        None => None,
    };

    let dimension = annotation::construct(&first, second.as_ref(), cmd.kind, placement.as_ref())
        .map_err(|e| {
            warn!("Dimension rejected: {}", e);
            annotation_error(&e)
        })?;

    let frame = match dimension.geometry {
        MeasurementGeometry::Length(LengthGeometry::Span { start, end, plane }) => Some(
            annotation::span_label_frame(&start, &end, &plane.normal, &bounds, &state.placement)
                .map_err(|e| annotation_error(&e))?,
        ),
        _ => None,
    };

    info!("Built {} dimension via {:?}", cmd.kind, dimension.case);
    Ok(format!(
        "DIMENSION_UPDATE:{}",
        json!({
            "case": dimension.case,
            "geometry": dimension.geometry,
            "value": dimension.value(),
            "label": dimension.geometry.label_text(state.unit),
            "frame": frame,
        })
    ))
}

fn datum(json_str: &str, state: &AppState) -> Result<String, String> {
    let cmd: DatumCmd = parse("DATUM", json_str)?;
    let (shape, bounds) = {
        let registry = state.registry();
        (resolve(&registry, &cmd.shape)?, registry.bounds())
    };

    let placement = annotation::datum_placement(
        &shape,
        &cmd.touch,
        &cmd.placement_normal,
        cmd.label_width,
        &bounds,
        &state.placement,
    )
    .map_err(|e| {
        warn!("Datum rejected: {}", e);
        annotation_error(&e)
    })?;
    Ok(format!("DATUM_UPDATE:{}", json!(placement)))
}

fn tolerance(json_str: &str, state: &AppState) -> Result<String, String> {
    let cmd: ToleranceCmd = parse("TOLERANCE", json_str)?;
    let (shape, bounds) = {
        let registry = state.registry();
        (resolve(&registry, &cmd.shape)?, registry.bounds())
    };

    let placement = annotation::tolerance_placement(&shape, &cmd.touch, &bounds, &state.placement)
        .map_err(|e| {
            warn!("Tolerance rejected: {}", e);
            annotation_error(&e)
        })?;
    Ok(format!("TOLERANCE_UPDATE:{}", json!(placement)))
}

fn place(json_str: &str, state: &AppState) -> Result<String, String> {
    let cmd: PlaceCmd = parse("PLACE", json_str)?;
    let bounds = state.registry().bounds();
    let target = annotation::solve_placement(&cmd.touch, &cmd.direction, &bounds, &state.placement)
        .map_err(|e| annotation_error(&e))?;
    Ok(format!("PLACE_UPDATE:{}", json!({ "target": target })))
}
