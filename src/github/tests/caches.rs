//! Tests for the per-resource cache set.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use tokio::sync::watch;
use tokio::time::advance;

use crate::cache::{CacheSettings, ExpiringStore};
use crate::github::models::test_support::pull_request_summaries;
use crate::github::{ResourceCaches, ResourceKind, ResourceTtls, spawn_credential_watcher};

fn caches() -> ResourceCaches {
    let max_size = NonZeroUsize::new(8).expect("non-zero capacity");
    ResourceCaches::new(
        CacheSettings::new(max_size, Duration::from_secs(300)),
        ResourceTtls::default(),
    )
}

#[rstest]
#[case(ResourceKind::Profile, 3600)]
#[case(ResourceKind::Repositories, 600)]
#[case(ResourceKind::PullRequests, 600)]
#[case(ResourceKind::PullRequest, 300)]
#[case(ResourceKind::Files, 300)]
#[case(ResourceKind::Diff, 120)]
fn default_ttls_follow_resource_volatility(#[case] kind: ResourceKind, #[case] seconds: u64) {
    assert_eq!(
        ResourceTtls::default().for_kind(kind),
        Duration::from_secs(seconds)
    );
}

#[rstest]
fn stats_cover_every_resource_kind() {
    let stats = caches().stats();
    let kinds: Vec<_> = stats.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, ResourceKind::ALL);
    assert!(stats.iter().all(|(_, entry)| entry.max_size == 8));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn cleanup_sweeps_each_store_with_its_own_ttl() {
    let caches = caches();
    caches.diffs.set("diff:a", "+x".to_owned());
    caches
        .pull_requests
        .set("pulls:a:open", pull_request_summaries(1..=2));

    advance(Duration::from_secs(121)).await;

    assert_eq!(caches.cleanup(), 1, "only the diff has expired");
    assert_eq!(caches.stats_for(ResourceKind::PullRequests).valid_entries, 1);
}

#[rstest]
#[tokio::test]
async fn credential_change_clears_every_store() {
    let caches = Arc::new(caches());
    caches.diffs.set("diff:a", "+x".to_owned());
    caches
        .pull_requests
        .set("pulls:a:open", pull_request_summaries(1..=2));
    let (sender, receiver) = watch::channel(0_u64);

    let handle = spawn_credential_watcher(Arc::clone(&caches), receiver);
    sender.send(1).expect("watcher should be listening");
    drop(sender);
    handle.await.expect("watcher should finish once the sender is dropped");

    assert!(
        caches
            .stats()
            .iter()
            .all(|(_, stats)| stats.total_entries == 0)
    );
}
