//! End-to-end scenarios for the engagement engine
//!
//! Runs the vote, poll, and bookmark services against the in-memory
//! aggregation store and checks the aggregate invariants: polarity
//! exclusivity, set-derived counters, single active poll choice, and no
//! lost updates under concurrency.

use anyhow::Result;
use chrono::{Duration, Utc};
use futures::future::join_all;

use engage_core::entities::Polarity;
use engage_core::DomainError;
use engage_service::{BookmarkService, PollService, ServiceError, VoteService};
use integration_tests::{bare_context, poll_context, test_id, vote_context};

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn upvote_toggle_clears_vote() -> Result<()> {
    let subject = test_id();
    let user = test_id();
    let ctx = vote_context(subject).await;
    let votes = VoteService::new(&ctx);

    let outcome = votes.apply(subject, user, Polarity::Up).await?;
    assert_eq!(outcome.score, 1);
    assert!(outcome.user_upvoted);

    let outcome = votes.apply(subject, user, Polarity::Up).await?;
    assert_eq!(outcome.score, 0);
    assert!(!outcome.user_upvoted);

    Ok(())
}

#[tokio::test]
async fn downvote_replaces_own_upvote() -> Result<()> {
    let subject = test_id();
    let user = test_id();
    let ctx = vote_context(subject).await;
    let votes = VoteService::new(&ctx);

    votes.apply(subject, user, Polarity::Up).await?;
    let outcome = votes.apply(subject, user, Polarity::Down).await?;

    assert_eq!(outcome.score, -1);
    assert!(!outcome.user_upvoted);
    assert!(outcome.user_downvoted);

    Ok(())
}

#[tokio::test]
async fn poll_vote_switch_moves_membership() -> Result<()> {
    let poll_id = test_id();
    let user = test_id();
    let ctx = poll_context(poll_id, ["A", "B"], None).await;
    let polls = PollService::new(&ctx);

    polls.vote(poll_id, user, 0).await?;
    let outcome = polls.vote(poll_id, user, 1).await?;

    assert_eq!(outcome.options[0].vote_count, 0);
    assert_eq!(outcome.options[1].vote_count, 1);
    assert_eq!(outcome.total_votes, 1);

    Ok(())
}

#[tokio::test]
async fn poll_vote_out_of_range_fails() {
    let poll_id = test_id();
    let ctx = poll_context(poll_id, ["A", "B"], None).await;
    let polls = PollService::new(&ctx);

    let err = polls.vote(poll_id, test_id(), 5).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InvalidOption { .. })
    ));
}

#[tokio::test]
async fn bookmark_double_toggle_unsaves() -> Result<()> {
    let ctx = bare_context();
    let bookmarks = BookmarkService::new(&ctx);
    let user = test_id();
    let subject = test_id();

    assert!(bookmarks.toggle(user, subject).await?.saved);
    assert!(!bookmarks.toggle(user, subject).await?.saved);

    Ok(())
}

#[tokio::test]
async fn closed_poll_rejects_votes_but_keeps_results() -> Result<()> {
    let poll_id = test_id();
    let user = test_id();
    let ctx = poll_context(poll_id, ["A", "B"], Some(Utc::now() - Duration::minutes(1))).await;
    let polls = PollService::new(&ctx);

    let err = polls.vote(poll_id, user, 0).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::PollClosed(_))
    ));

    let results = polls.results(poll_id, user).await?;
    assert_eq!(results.total_votes, 0);

    Ok(())
}

// ============================================================================
// Invariants over operation sequences
// ============================================================================

#[tokio::test]
async fn polarity_exclusivity_holds_across_sequences() -> Result<()> {
    let subject = test_id();
    let user = test_id();
    let ctx = vote_context(subject).await;
    let votes = VoteService::new(&ctx);

    let sequence = [
        Polarity::Up,
        Polarity::Down,
        Polarity::Down,
        Polarity::Up,
        Polarity::Up,
        Polarity::Down,
    ];

    for polarity in sequence {
        let outcome = votes.apply(subject, user, polarity).await?;
        assert!(
            !(outcome.user_upvoted && outcome.user_downvoted),
            "user held both polarities after applying {polarity:?}"
        );

        // Counters always equal set cardinality
        let snapshot = ctx.store().load_votes(subject).await?;
        assert_eq!(
            outcome.score,
            snapshot.state.upvotes.len() as i64 - snapshot.state.downvotes.len() as i64
        );
    }

    Ok(())
}

#[tokio::test]
async fn poll_membership_sums_to_one_per_voter() -> Result<()> {
    let poll_id = test_id();
    let ctx = poll_context(poll_id, ["A", "B", "C"], None).await;
    let polls = PollService::new(&ctx);

    let users: Vec<_> = (0..5).map(|_| test_id()).collect();
    let moves = [(0, 0), (1, 1), (0, 2), (2, 2), (3, 0), (1, 0), (4, 1), (0, 0)];

    for (user_index, option) in moves {
        polls.vote(poll_id, users[user_index], option).await?;

        let snapshot = ctx.store().load_poll(poll_id).await?;
        for user in &users {
            let memberships = snapshot
                .state
                .options
                .iter()
                .filter(|option| option.voters.contains(user))
                .count();
            assert!(memberships <= 1, "voter in more than one option set");
        }
        let membership_total: usize = snapshot
            .state
            .options
            .iter()
            .map(|option| option.voters.len())
            .sum();
        assert_eq!(membership_total, snapshot.state.total_votes());
    }

    Ok(())
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_are_not_lost() -> Result<()> {
    let subject = test_id();
    let ctx = vote_context(subject).await;

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let ctx = ctx.clone();
            let user = test_id();
            let polarity = if i % 2 == 0 { Polarity::Up } else { Polarity::Down };
            tokio::spawn(async move {
                VoteService::new(&ctx).apply(subject, user, polarity).await
            })
        })
        .collect();

    for joined in join_all(handles).await {
        joined.expect("task panicked").expect("vote failed");
    }

    let snapshot = ctx.store().load_votes(subject).await?;
    assert_eq!(snapshot.state.upvotes.len(), 16);
    assert_eq!(snapshot.state.downvotes.len(), 16);
    assert_eq!(snapshot.state.score(), 0);

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_poll_votes_all_land() -> Result<()> {
    let poll_id = test_id();
    let ctx = poll_context(poll_id, ["A", "B", "C"], None).await;

    let handles: Vec<_> = (0..30usize)
        .map(|i| {
            let ctx = ctx.clone();
            let user = test_id();
            tokio::spawn(async move { PollService::new(&ctx).vote(poll_id, user, i % 3).await })
        })
        .collect();

    for joined in join_all(handles).await {
        joined.expect("task panicked").expect("poll vote failed");
    }

    let snapshot = ctx.store().load_poll(poll_id).await?;
    assert_eq!(snapshot.state.total_votes(), 30);
    for option in &snapshot.state.options {
        assert_eq!(option.vote_count(), 10);
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookmark_toggles_all_land() -> Result<()> {
    let ctx = bare_context();
    let user = test_id();

    let subjects: Vec<_> = (0..20).map(|_| test_id()).collect();
    let handles: Vec<_> = subjects
        .iter()
        .map(|&subject| {
            let ctx = ctx.clone();
            tokio::spawn(async move { BookmarkService::new(&ctx).toggle(user, subject).await })
        })
        .collect();

    for joined in join_all(handles).await {
        let outcome = joined.expect("task panicked").expect("toggle failed");
        assert!(outcome.saved);
    }

    let snapshot = ctx.store().load_bookmarks(user).await?;
    assert_eq!(snapshot.state.saved.len(), 20);

    Ok(())
}
