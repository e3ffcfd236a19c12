//! Crawl engine behavior against an in-memory site.
//!
//! These cover the guarantees the engine makes regardless of transport:
//! scoping, dedup under concurrency, the depth bound, termination on
//! cycles, and failure isolation.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{config, crawler, page_url, FakeSite, SEED};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_identical_link_from_1000_tasks_is_recorded_once() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", vec!["/same"; 1000])
            .page("/same", Vec::<String>::new()),
    );

    let report = crawler(Arc::clone(&site), config(3)).run().await;

    assert_eq!(report.len(), 2);
    assert!(report.contains(&page_url("/same")));
    assert_eq!(site.requests_for("/same"), 1);
    assert_eq!(report.tally.already_visited, 999);
}

#[tokio::test]
async fn test_depth_bound_stops_after_max_depth_hops() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/a"])
            .page("/a", ["/b"])
            .page("/b", ["/c"])
            .page("/c", ["/d"])
            .page("/d", ["/e"])
            .page("/e", ["/f"])
            .page("/f", Vec::<String>::new()),
    );

    let report = crawler(Arc::clone(&site), config(5)).run().await;

    for path in ["/", "/a", "/b", "/c", "/d", "/e"] {
        assert!(report.contains(&page_url(path)), "missing {path}");
    }
    assert!(!report.contains(&page_url("/f")));
    // /e sits on the limit: recorded, never fetched
    assert_eq!(site.requests_for("/e"), 0);
    assert_eq!(site.requests_for("/f"), 0);
}

#[tokio::test]
async fn test_self_links_terminate_and_record_seed_once() {
    let site = Arc::new(FakeSite::new().page("/", ["/", "", SEED, "#top", "/?"]));

    let report = crawler(Arc::clone(&site), config(5)).run().await;

    // "/?" is a different URL (empty query) but the same host
    assert!(report.contains(SEED));
    assert!(report.contains("http://example.test/?"));
    assert_eq!(report.len(), 2);
    assert_eq!(site.requests_for("/"), 2);
}

#[tokio::test]
async fn test_cycles_terminate() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/a"])
            .page("/a", ["/b"])
            .page("/b", ["/a", "/"]),
    );

    let engine = crawler(Arc::clone(&site), config(50));
    let report = tokio::time::timeout(Duration::from_secs(10), engine.run())
        .await
        .expect("crawl of a cycle must terminate");

    assert_eq!(report.len(), 3);
    assert_eq!(site.requests_for("/a"), 1);
    assert_eq!(site.requests_for("/b"), 1);
}

#[tokio::test]
async fn test_malformed_link_is_skipped_not_fatal() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["not a url: with spaces", "/a", "/b"])
            .page("/a", ["/a/child"])
            .page("/a/child", Vec::<String>::new())
            .page("/b", Vec::<String>::new()),
    );

    let report = crawler(site, config(3)).run().await;

    assert!(report.contains(&page_url("/a")));
    assert!(report.contains(&page_url("/b")));
    assert!(report.contains(&page_url("/a/child")));
    assert_eq!(report.tally.resolution_failures, 1);
    assert_eq!(report.tally.failures[0].url, "not a url: with spaces");
}

#[tokio::test]
async fn test_404_does_not_stop_siblings() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/missing", "/a"])
            .page("/a", ["/a/child"])
            .page("/a/child", ["/a/grandchild"])
            .page("/a/grandchild", Vec::<String>::new()),
    );

    let report = crawler(Arc::clone(&site), config(3)).run().await;

    assert_eq!(site.requests_for("/missing"), 1);
    assert!(report.contains(&page_url("/a/child")));
    assert!(report.contains(&page_url("/a/grandchild")));
    assert_eq!(report.tally.fetch_failures, 1);
    assert_eq!(report.tally.failures[0].status, Some(404));
}

#[tokio::test]
async fn test_only_seed_host_is_recorded() {
    let site = Arc::new(
        FakeSite::new()
            .page(
                "/",
                [
                    "/a",
                    "http://other.test/x",
                    "http://evil-example.test/",
                    "http://www.example.test/",
                    "mailto:admin@example.test",
                ],
            )
            .page("/a", Vec::<String>::new()),
    );

    let report = crawler(site, config(2)).run().await;

    assert_eq!(report.len(), 2);
    for recorded in &report.visited {
        let parsed = url::Url::parse(recorded).unwrap();
        assert_eq!(parsed.host_str(), Some("example.test"));
    }
    assert_eq!(report.tally.out_of_scope, 4);
    assert!(report.tally.external.contains("http://other.test/x"));
}

#[tokio::test]
async fn test_subdomains_when_allowed() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["http://www.example.test/docs", "http://evil-example.test/"])
            .page("/docs", Vec::<String>::new()),
    );

    let report = crawler(site, config(2).with_subdomains(true)).run().await;

    assert!(report.contains("http://www.example.test/docs"));
    assert!(!report.contains("http://evil-example.test/"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_result_whichever_path_claims_first() {
    // /b is one hop away directly and two hops away through /a. The direct
    // path must get to expand it, so /c (two hops) is always found.
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/a", "/b"])
            .page("/a", ["/b"])
            .page("/b", ["/c"])
            .page("/c", Vec::<String>::new()),
    );

    for _ in 0..20 {
        let report = crawler(Arc::clone(&site), config(2)).run().await;
        assert!(report.contains(&page_url("/c")));
        assert_eq!(report.len(), 4);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_in_flight_fetches_are_capped() {
    let children: Vec<String> = (0..20).map(|i| format!("/p{i}")).collect();
    let mut site = FakeSite::new()
        .with_delay(Duration::from_millis(10))
        .page("/", children.clone());
    for child in &children {
        site = site.page(child, [format!("{child}/leaf")]);
    }
    let site = Arc::new(site);

    let engine = crawler(Arc::clone(&site), config(2).with_max_in_flight(2));
    let report = tokio::time::timeout(Duration::from_secs(10), engine.run())
        .await
        .expect("capped crawl must not deadlock");

    assert_eq!(report.len(), 41);
    assert!(site.max_in_flight_seen() <= 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_permit_deep_tree_completes() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/a", "/b"])
            .page("/a", ["/a/1", "/a/2"])
            .page("/b", ["/b/1", "/b/2"])
            .page("/a/1", ["/"])
            .page("/a/2", Vec::<String>::new())
            .page("/b/1", Vec::<String>::new())
            .page("/b/2", Vec::<String>::new()),
    );

    let engine = crawler(site, config(4).with_max_in_flight(1));
    let report = tokio::time::timeout(Duration::from_secs(10), engine.run())
        .await
        .expect("one permit must still let the whole tree finish");

    assert_eq!(report.len(), 7);
}

#[tokio::test]
async fn test_panicking_task_is_contained() {
    let site = Arc::new(
        FakeSite::new()
            .page("/", ["/boom", "/a"])
            .page("/a", ["/a/child"])
            .page("/a/child", Vec::<String>::new())
            .panic_on("/boom"),
    );

    let report = crawler(site, config(3)).run().await;

    assert!(report.contains(&page_url("/a/child")));
    assert_eq!(report.tally.task_panics, 1);
}

#[tokio::test]
async fn test_dropping_run_stops_the_crawl() {
    // A slow chain / -> /p1 -> ... -> /p20, far from done when run() is dropped
    let mut site = FakeSite::new().page("/", ["/p1"]);
    for i in 1..20 {
        site = site.page(&format!("/p{i}"), [format!("/p{}", i + 1)]);
    }
    let site = Arc::new(
        site.page("/p20", Vec::<String>::new())
            .with_delay(Duration::from_millis(50)),
    );

    let engine = crawler(Arc::clone(&site), config(25));
    let cancelled = tokio::time::timeout(Duration::from_millis(120), engine.run()).await;
    assert!(cancelled.is_err());

    // Let the aborts land, then make sure nothing is still fetching
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fetched = site.total_requests();
    assert!(fetched < 21);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(site.total_requests(), fetched);
}
