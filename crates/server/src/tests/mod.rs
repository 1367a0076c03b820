// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod seed_tests;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use nagrik_setu_persistence::Persistence;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tower::ServiceExt;

use crate::outbox::{OutboundMessage, OutboxGateway};
use crate::seed::{DirectorySeed, SeedCitizen, SeedDepartment, SeedStaff};
use crate::{build_router, build_state};

pub fn test_seed() -> DirectorySeed {
    DirectorySeed {
        departments: vec![SeedDepartment {
            name: String::from("Roads"),
            description: String::from("Potholes and streetlights"),
        }],
        citizens: vec![
            SeedCitizen {
                name: String::from("Asha Rao"),
                email: String::from("asha@example.org"),
            },
            SeedCitizen {
                name: String::from("Ravi Kumar"),
                email: String::from("ravi@example.org"),
            },
        ],
        staff: vec![SeedStaff {
            name: String::from("Vikram"),
            email: String::from("vikram@city.example"),
            department: String::from("Roads"),
        }],
    }
}

/// A router over a freshly seeded in-memory database.
///
/// The seed yields department 1, citizens 1 and 2, and staff 1. The returned
/// receiver is the outbox queue; nothing drains it.
pub fn test_app(queue: usize) -> (Router, OutboxGateway, mpsc::Receiver<OutboundMessage>) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    test_seed().apply(&mut persistence).unwrap();
    let (gateway, rx) = OutboxGateway::channel(queue);
    (
        build_router(build_state(persistence, gateway.clone())),
        gateway,
        rx,
    )
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    actor: Option<(&str, &str)>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = actor {
        builder = builder.header("X-Actor-Id", id).header("X-Actor-Role", role);
    }
    let body: Body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
