//! RemoteGraphService against a local HTTP graph service
//!
//! The server is a small axum router answering from the in-memory sample
//! graph, bound to an ephemeral port.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use graph_explorer::client::{NeighborhoodRequest, PathRequest};
use graph_explorer::*;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

type Shared = Arc<InMemoryGraphService>;

#[derive(Deserialize)]
struct SearchParams {
    q: String,
    limit: usize,
}

#[derive(Deserialize)]
struct NeighborParams {
    depth: u8,
    direction: Direction,
    limit: usize,
}

#[derive(Deserialize)]
struct PathParams {
    start: String,
    end: String,
    max_depth: u8,
}

fn error_response(e: ServiceError) -> Response {
    let status = match e {
        ServiceError::NodeNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

async fn search(State(service): State<Shared>, Query(params): Query<SearchParams>) -> Response {
    match service.search(&params.q, params.limit).await {
        Ok(results) => Json(results).into_response(),
        Err(e) => error_response(e),
    }
}

async fn neighbors(
    State(service): State<Shared>,
    Path(node_id): Path<String>,
    Query(params): Query<NeighborParams>,
) -> Response {
    let Some(depth) = Depth::new(params.depth) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "detail": "depth out of range" })),
        )
            .into_response();
    };
    let request = NeighborhoodRequest {
        node_id: NodeId::new(node_id),
        depth,
        direction: params.direction,
        limit: params.limit,
    };
    match service.fetch_neighborhood(&request).await {
        Ok(subgraph) => Json(subgraph).into_response(),
        Err(e) => error_response(e),
    }
}

async fn path(State(service): State<Shared>, Query(params): Query<PathParams>) -> Response {
    if params.start == "garbled" {
        return (StatusCode::OK, "{\"nodes\": [").into_response();
    }
    if params.start == "explode" {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "detail": "boom" })),
        )
            .into_response();
    }
    let request = PathRequest {
        start: NodeId::new(params.start),
        end: NodeId::new(params.end),
        max_depth: params.max_depth,
    };
    match service.fetch_path(&request).await {
        Ok(subgraph) => Json(subgraph).into_response(),
        Err(e) => error_response(e),
    }
}

async fn spawn_server(service: InMemoryGraphService) -> String {
    let app = Router::new()
        .route("/api/v1/graph/search", get(search))
        .route("/api/v1/graph/neighbors/:node_id", get(neighbors))
        .route("/api/v1/graph/path", get(path))
        .route("/health", get(|| async { "ok" }))
        .with_state(Arc::new(service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(url: &str) -> RemoteGraphService {
    RemoteGraphService::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_search_over_http() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    let service = client(&url);

    let results = service.search("a", 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].label, "Ada Lovelace");
    assert_eq!(results[0].node_type.as_str(), "Person");

    assert!(service.search("  ", 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_neighborhood_with_awkward_id() {
    let mut graph = InMemoryGraphService::sample();
    graph.insert_node(Node::new("team/core alpha", "Team", "Core Alpha"));
    graph.insert_edge(Edge::new("e-alpha", "p-ada", "team/core alpha", "MEMBER_OF"));
    let url = spawn_server(graph).await;
    let service = client(&url);

    let subgraph = service
        .fetch_neighborhood(&NeighborhoodRequest {
            node_id: NodeId::new("team/core alpha"),
            depth: Depth::MIN,
            direction: Direction::Both,
            limit: 50,
        })
        .await
        .unwrap();

    let ids: Vec<&str> = subgraph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["team/core alpha", "p-ada"]);
    assert_eq!(subgraph.edges.len(), 1);
    assert_eq!(
        subgraph.nodes[1].get_property("role"),
        Some(&PropertyValue::String("Engineer".to_string()))
    );
}

#[tokio::test]
async fn test_missing_node_maps_to_not_found() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    let service = client(&url);

    let err = service
        .fetch_neighborhood(&NeighborhoodRequest {
            node_id: NodeId::new("ghost"),
            depth: Depth::MIN,
            direction: Direction::Both,
            limit: 50,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NodeNotFound(id) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn test_error_bodies_surface_as_api_errors() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    let service = client(&url);

    let err = service
        .fetch_path(&PathRequest {
            start: NodeId::new("explode"),
            end: NodeId::new("p-ada"),
            max_depth: 5,
        })
        .await
        .unwrap_err();
    match err {
        ServiceError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error {:?}", other),
    }

    let err = service
        .fetch_path(&PathRequest {
            start: NodeId::new("p-ada"),
            end: NodeId::new("nowhere"),
            max_depth: 5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Api { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_a_serialization_error() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    let service = client(&url);

    let err = service
        .fetch_path(&PathRequest {
            start: NodeId::new("garbled"),
            end: NodeId::new("p-ada"),
            max_depth: 5,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Serialization(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_ping() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    assert!(client(&url).ping().await.is_ok());

    // Nothing listens on a port we bound and released
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    assert!(matches!(client(&closed).ping().await, Err(ServiceError::Http(_))));
}

#[tokio::test]
async fn test_explorer_over_http() {
    let url = spawn_server(InMemoryGraphService::sample()).await;
    let service = client(&url);
    let local = InMemoryGraphService::sample();

    let mut remote_explorer = Explorer::default();
    let mut local_explorer = Explorer::default();
    for explorer in [&mut remote_explorer, &mut local_explorer] {
        explorer.set_depth(2).unwrap();
    }

    remote_explorer.load(&service, "t-research").await;
    remote_explorer
        .expand(&service, &NodeId::new("p-edsger"))
        .await
        .unwrap();
    local_explorer.load(&local, "t-research").await;
    local_explorer
        .expand(&local, &NodeId::new("p-edsger"))
        .await
        .unwrap();

    let remote_nodes: Vec<&Node> = remote_explorer.store().nodes().collect();
    let local_nodes: Vec<&Node> = local_explorer.store().nodes().collect();
    assert_eq!(remote_nodes, local_nodes);
    assert_eq!(
        remote_explorer.layout().positions(),
        local_explorer.layout().positions()
    );
}
