mod common;

use common::*;
use lnresume::client::{ClientError, ResumeClient, ResumePager};
use lnresume::server::create_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;

async fn spawn_server(node: MockNode, page_size: u64) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_app(state_with(node, page_size, 1_000));

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

fn node() -> MockNode {
    MockNode::new()
        .with_payments(vec![
            payment("p-20", ALICE, "2024-03-20"),
            payment("p-03", BOB, "2024-03-03"),
        ])
        .with_invoices(vec![
            invoice("i-15", "2024-03-15"),
            invoice("i-10", "2024-03-10"),
            invoice("i-05", "2024-03-05"),
            invoice("i-01", "2024-03-01"),
        ])
        .with_page_size(2)
}

#[tokio::test]
async fn pager_accumulates_pages_over_http() {
    let addr = spawn_server(node(), 2).await;
    let client = ResumeClient::new(format!("http://{addr}/"), bearer("default")).unwrap();
    let mut pager = ResumePager::new(client);

    pager.load_first().await.unwrap();
    assert_eq!(pager.entries().len(), 3);
    assert!(pager.state().has_more());

    assert!(pager.show_more().await.unwrap());
    assert!(!pager.state().has_more());
    assert!(!pager.show_more().await.unwrap());

    let dates: Vec<_> = pager.entries().iter().map(|e| e.date()).collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
    assert_eq!(pager.entries().iter().filter(|e| e.is_payment()).count(), 2);
}

#[tokio::test]
async fn rejected_requests_surface_as_api_errors() {
    let addr = spawn_server(node(), 2).await;
    let client = ResumeClient::new(format!("http://{addr}"), "bad-token").unwrap();
    let mut pager = ResumePager::new(client);

    match pager.load_first().await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected api error, got {other:?}"),
    }
    assert!(pager.entries().is_empty());
}
