//! Live integration tests for postloom-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/postloom-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use postloom_db::{
    claim_ready_posts, complete_brief, create_brand, create_brief, delete_brand, fail_brief,
    get_brand_by_id, get_brand_for_user, get_post_for_user, insert_draft_post,
    list_brands_for_user, list_briefs_for_user, list_posts_for_brief, mark_post_failed,
    mark_post_posted, mark_post_ready, reconcile_stale_briefs, update_brand, DbError,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Insert a minimal brand row owned by `user_id` and return its generated `id`.
async fn insert_test_brand(pool: &sqlx::PgPool, user_id: Uuid, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO brands (user_id, name, description, tone_of_voice) \
         VALUES ($1, $2, 'A test brand', 'friendly') RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|e| panic!("insert_test_brand failed for '{name}': {e}"))
}

/// Create a brief in `processing` for `user_id` and return its internal `id`.
async fn insert_test_brief(pool: &sqlx::PgPool, user_id: Uuid, brand_id: i64) -> i64 {
    create_brief(pool, user_id, brand_id, "Test topic", "Generate engagement", None)
        .await
        .expect("create_brief failed")
        .id
}

/// Insert a draft post and move it to `ready_to_post`, returning its `id`.
async fn insert_ready_post(pool: &sqlx::PgPool, brief_id: i64, platform: &str) -> i64 {
    let post = insert_draft_post(pool, brief_id, platform, "Some copy", None)
        .await
        .expect("insert_draft_post failed");
    mark_post_ready(pool, post.id, None)
        .await
        .expect("mark_post_ready failed");
    post.id
}

/// Backdate a brief's `updated_at` so the stale sweep sees it as stuck.
async fn backdate_brief(pool: &sqlx::PgPool, brief_id: i64) {
    sqlx::query("UPDATE content_briefs SET updated_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(brief_id)
        .execute(pool)
        .await
        .expect("backdate_brief failed");
}

async fn fetch_brief_status(pool: &sqlx::PgPool, brief_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM content_briefs WHERE id = $1")
        .bind(brief_id)
        .fetch_one(pool)
        .await
        .expect("fetch_brief_status failed")
}

async fn fetch_post_status(pool: &sqlx::PgPool, post_id: i64) -> String {
    sqlx::query_scalar("SELECT status FROM generated_posts WHERE id = $1")
        .bind(post_id)
        .fetch_one(pool)
        .await
        .expect("fetch_post_status failed")
}

// ---------------------------------------------------------------------------
// Section 1: Brief Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn brief_is_created_directly_in_processing(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;

    let brief = create_brief(
        &pool,
        user_id,
        brand_id,
        "Summer launch",
        "Drive signups",
        Some("Sign up today"),
    )
    .await
    .expect("create_brief failed");

    assert_eq!(brief.status, "processing");
    assert_eq!(brief.topic, "Summer launch");
    assert_eq!(brief.goal, "Drive signups");
    assert_eq!(brief.cta_text.as_deref(), Some("Sign up today"));
    assert_eq!(brief.brand_id, brand_id);
    assert_eq!(brief.user_id, user_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn brief_lifecycle_processing_to_completed(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    complete_brief(&pool, brief_id)
        .await
        .expect("complete_brief failed");

    assert_eq!(fetch_brief_status(&pool, brief_id).await, "completed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn brief_lifecycle_processing_to_error(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    fail_brief(&pool, brief_id).await.expect("fail_brief failed");

    assert_eq!(fetch_brief_status(&pool, brief_id).await, "error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn brief_cannot_complete_twice(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    complete_brief(&pool, brief_id)
        .await
        .expect("first complete failed");

    let err = complete_brief(&pool, brief_id)
        .await
        .expect_err("completing a completed brief should fail");

    assert!(matches!(
        err,
        DbError::InvalidBriefTransition {
            expected_status: "processing",
            ..
        }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn terminal_brief_cannot_move_back_to_error(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    complete_brief(&pool, brief_id)
        .await
        .expect("complete failed");

    let err = fail_brief(&pool, brief_id)
        .await
        .expect_err("failing a completed brief should fail");

    assert!(
        matches!(err, DbError::InvalidBriefTransition { .. }),
        "expected InvalidBriefTransition, got {err:?}"
    );
    assert_eq!(fetch_brief_status(&pool, brief_id).await, "completed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn brief_complete_fails_for_unknown_id(pool: sqlx::PgPool) {
    let err = complete_brief(&pool, 999_999)
        .await
        .expect_err("completing an unknown brief should fail");
    assert!(matches!(
        err,
        DbError::InvalidBriefTransition {
            expected_status: "processing",
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Section 2: Brand Ownership and CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_brand_returns_full_row(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();

    let brand = create_brand(
        &pool,
        user_id,
        "Hi Boy",
        "Sparkling hemp beverages",
        "playful",
        Some("https://example.com/logo.png"),
    )
    .await
    .expect("create_brand failed");

    assert_eq!(brand.name, "Hi Boy");
    assert_eq!(brand.description, "Sparkling hemp beverages");
    assert_eq!(brand.tone_of_voice, "playful");
    assert_eq!(brand.logo_url.as_deref(), Some("https://example.com/logo.png"));
    assert_eq!(brand.user_id, user_id);
    assert!(brand.deleted_at.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_brand_for_user_scopes_by_owner(pool: sqlx::PgPool) {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let brand = create_brand(&pool, owner, "Cann", "Social tonics", "upbeat", None)
        .await
        .expect("create_brand failed");

    let found = get_brand_for_user(&pool, brand.public_id, owner)
        .await
        .expect("owner lookup failed");
    assert!(found.is_some(), "owner should see their own brand");

    let hidden = get_brand_for_user(&pool, brand.public_id, other)
        .await
        .expect("other-user lookup failed");
    assert!(
        hidden.is_none(),
        "another user's brand must be indistinguishable from an absent one"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_brand_for_user_excludes_soft_deleted(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand = create_brand(&pool, user_id, "Cann", "Social tonics", "upbeat", None)
        .await
        .expect("create_brand failed");

    delete_brand(&pool, brand.id).await.expect("delete failed");

    let found = get_brand_for_user(&pool, brand.public_id, user_id)
        .await
        .expect("lookup failed");
    assert!(found.is_none(), "soft-deleted brand should not be returned");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_brands_for_user_returns_only_own_brands(pool: sqlx::PgPool) {
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    insert_test_brand(&pool, user_a, "A-1").await;
    insert_test_brand(&pool, user_a, "A-2").await;
    insert_test_brand(&pool, user_b, "B-1").await;

    let brands = list_brands_for_user(&pool, user_a)
        .await
        .expect("list_brands_for_user failed");

    assert_eq!(brands.len(), 2, "should return exactly user A's brands");
    assert!(brands.iter().all(|b| b.user_id == user_a));
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_brand_preserves_unset_fields(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand = create_brand(&pool, user_id, "Cann", "Social tonics", "upbeat", None)
        .await
        .expect("create_brand failed");

    let updated = update_brand(&pool, brand.id, Some("Cann Social"), None, None, None)
        .await
        .expect("update_brand failed");

    assert_eq!(updated.name, "Cann Social");
    assert_eq!(updated.description, "Social tonics", "unset field preserved");
    assert_eq!(updated.tone_of_voice, "upbeat", "unset field preserved");
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_brand_can_null_logo_url(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand = create_brand(
        &pool,
        user_id,
        "Cann",
        "Social tonics",
        "upbeat",
        Some("https://example.com/logo.png"),
    )
    .await
    .expect("create_brand failed");

    let updated = update_brand(&pool, brand.id, None, None, None, Some(None))
        .await
        .expect("update_brand failed");

    assert!(
        updated.logo_url.is_none(),
        "Some(None) should clear the logo URL"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_brand_is_soft(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand = create_brand(&pool, user_id, "Cann", "Social tonics", "upbeat", None)
        .await
        .expect("create_brand failed");

    delete_brand(&pool, brand.id).await.expect("delete failed");

    let deleted_at: Option<chrono::DateTime<chrono::Utc>> =
        sqlx::query_scalar("SELECT deleted_at FROM brands WHERE id = $1")
            .bind(brand.id)
            .fetch_one(&pool)
            .await
            .expect("row should still exist after soft delete");

    assert!(deleted_at.is_some(), "deleted_at should be set");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_brand_by_id_includes_soft_deleted(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand = create_brand(&pool, user_id, "Cann", "Social tonics", "upbeat", None)
        .await
        .expect("create_brand failed");
    delete_brand(&pool, brand.id).await.expect("delete failed");

    let fetched = get_brand_by_id(&pool, brand.id)
        .await
        .expect("get_brand_by_id failed")
        .expect("soft-deleted brand should still resolve by id");

    assert_eq!(fetched.name, "Cann");
    assert!(fetched.deleted_at.is_some());
}

// ---------------------------------------------------------------------------
// Section 3: Briefs Feed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_briefs_joins_brand_name_and_post_count(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    insert_draft_post(&pool, brief_id, "LinkedIn", "Copy A", None)
        .await
        .expect("insert post failed");
    insert_draft_post(&pool, brief_id, "Twitter", "Copy B", None)
        .await
        .expect("insert post failed");

    let briefs = list_briefs_for_user(&pool, user_id, 20)
        .await
        .expect("list_briefs_for_user failed");

    assert_eq!(briefs.len(), 1);
    assert_eq!(briefs[0].brand_name, "Cann");
    assert_eq!(briefs[0].posts_count, 2);
    assert_eq!(briefs[0].status, "processing");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_briefs_is_scoped_and_limited(pool: sqlx::PgPool) {
    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();
    let brand_a = insert_test_brand(&pool, user_a, "A").await;
    let brand_b = insert_test_brand(&pool, user_b, "B").await;

    for _ in 0..3 {
        insert_test_brief(&pool, user_a, brand_a).await;
    }
    insert_test_brief(&pool, user_b, brand_b).await;

    let briefs = list_briefs_for_user(&pool, user_a, 2)
        .await
        .expect("list_briefs_for_user failed");

    assert_eq!(briefs.len(), 2, "limit should cap the feed");
}

// ---------------------------------------------------------------------------
// Section 4: Post Lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn draft_post_has_expected_defaults(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    let media = vec!["https://example.com/a.png".to_string()];
    let post = insert_draft_post(&pool, brief_id, "LinkedIn", "Hello world", Some(&media))
        .await
        .expect("insert_draft_post failed");

    assert_eq!(post.status, "draft");
    assert_eq!(post.platform, "LinkedIn");
    assert_eq!(post.generated_text, "Hello world");
    assert_eq!(post.generated_media_urls, Some(media));
    assert!(post.schedule_time.is_none());
    assert!(post.posted_at.is_none());
    assert!(post.post_url.is_none());
    assert!(post.posting_error.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_post_ready_records_schedule_time(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    let post = insert_draft_post(&pool, brief_id, "LinkedIn", "Hello", None)
        .await
        .expect("insert failed");

    let when = chrono::Utc::now() + chrono::Duration::hours(2);
    mark_post_ready(&pool, post.id, Some(when))
        .await
        .expect("mark_post_ready failed");

    let posts = list_posts_for_brief(&pool, brief_id)
        .await
        .expect("list failed");
    assert_eq!(posts[0].status, "ready_to_post");
    assert!(posts[0].schedule_time.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_post_ready_rejects_non_draft(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    let post_id = insert_ready_post(&pool, brief_id, "LinkedIn").await;

    let err = mark_post_ready(&pool, post_id, None)
        .await
        .expect_err("readying a ready post should fail");

    assert!(matches!(
        err,
        DbError::InvalidPostTransition {
            expected_status: "draft",
            ..
        }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn mark_post_posted_requires_publishing(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    let post = insert_draft_post(&pool, brief_id, "LinkedIn", "Hello", None)
        .await
        .expect("insert failed");

    let err = mark_post_posted(&pool, post.id, "https://example.com/posts/abc")
        .await
        .expect_err("posting an unclaimed draft should fail");

    assert!(matches!(
        err,
        DbError::InvalidPostTransition {
            expected_status: "publishing",
            ..
        }
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn posted_post_records_url_and_timestamp(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    let post_id = insert_ready_post(&pool, brief_id, "LinkedIn").await;

    let claimed = claim_ready_posts(&pool, 10).await.expect("claim failed");
    assert_eq!(claimed.len(), 1);

    mark_post_posted(&pool, post_id, "https://linkedin.com/posts/abc123")
        .await
        .expect("mark_post_posted failed");

    let posts = list_posts_for_brief(&pool, brief_id)
        .await
        .expect("list failed");
    assert_eq!(posts[0].status, "posted");
    assert!(posts[0].posted_at.is_some(), "posted_at should be set");
    assert_eq!(
        posts[0].post_url.as_deref(),
        Some("https://linkedin.com/posts/abc123")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_post_records_reason_and_is_terminal(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    let post_id = insert_ready_post(&pool, brief_id, "Twitter").await;

    claim_ready_posts(&pool, 10).await.expect("claim failed");
    mark_post_failed(&pool, post_id, "Failed to post to twitter: Platform API error (simulated)")
        .await
        .expect("mark_post_failed failed");

    assert_eq!(fetch_post_status(&pool, post_id).await, "error");

    // A failed post is terminal; it is not claimable again.
    let reclaimed = claim_ready_posts(&pool, 10).await.expect("claim failed");
    assert!(reclaimed.is_empty(), "error posts must not be re-claimed");
}

// ---------------------------------------------------------------------------
// Section 5: Batch Claim Semantics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn claim_moves_ready_posts_to_publishing(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    insert_ready_post(&pool, brief_id, "LinkedIn").await;
    insert_ready_post(&pool, brief_id, "Twitter").await;
    insert_ready_post(&pool, brief_id, "Instagram").await;

    let claimed = claim_ready_posts(&pool, 10).await.expect("claim failed");

    assert_eq!(claimed.len(), 3);
    assert!(claimed.iter().all(|p| p.status == "publishing"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn claim_respects_batch_size_oldest_first(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    let first = insert_ready_post(&pool, brief_id, "LinkedIn").await;
    let second = insert_ready_post(&pool, brief_id, "Twitter").await;
    let third = insert_ready_post(&pool, brief_id, "Instagram").await;

    let claimed = claim_ready_posts(&pool, 2).await.expect("claim failed");

    assert_eq!(claimed.len(), 2);
    let ids: Vec<i64> = claimed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second], "oldest posts claim first");

    assert_eq!(fetch_post_status(&pool, third).await, "ready_to_post");
}

#[sqlx::test(migrations = "../../migrations")]
async fn claim_skips_posts_not_in_ready_status(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    // One draft, one ready.
    insert_draft_post(&pool, brief_id, "LinkedIn", "Draft copy", None)
        .await
        .expect("insert failed");
    let ready_id = insert_ready_post(&pool, brief_id, "Twitter").await;

    let claimed = claim_ready_posts(&pool, 10).await.expect("claim failed");

    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].id, ready_id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_claim_gets_remainder_then_empty(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    insert_ready_post(&pool, brief_id, "LinkedIn").await;
    insert_ready_post(&pool, brief_id, "Twitter").await;
    insert_ready_post(&pool, brief_id, "Instagram").await;

    let first = claim_ready_posts(&pool, 2).await.expect("claim failed");
    let second = claim_ready_posts(&pool, 2).await.expect("claim failed");
    let third = claim_ready_posts(&pool, 2).await.expect("claim failed");

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1, "second claim takes the remainder");
    assert!(third.is_empty(), "nothing left to claim");

    // No post was handed out twice across claims.
    let mut all_ids: Vec<i64> = first.iter().chain(&second).map(|p| p.id).collect();
    all_ids.sort_unstable();
    all_ids.dedup();
    assert_eq!(all_ids.len(), 3, "claims must partition the ready set");
}

#[sqlx::test(migrations = "../../migrations")]
async fn claim_returns_empty_when_nothing_ready(pool: sqlx::PgPool) {
    let claimed = claim_ready_posts(&pool, 10).await.expect("claim failed");
    assert!(claimed.is_empty());
}

// ---------------------------------------------------------------------------
// Section 6: Post Ownership Join
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn get_post_for_user_scopes_through_brief(pool: sqlx::PgPool) {
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, owner, "Cann").await;
    let brief_id = insert_test_brief(&pool, owner, brand_id).await;
    let post = insert_draft_post(&pool, brief_id, "LinkedIn", "Hello", None)
        .await
        .expect("insert failed");

    let found = get_post_for_user(&pool, post.public_id, owner)
        .await
        .expect("owner lookup failed");
    assert!(found.is_some(), "owner should see their post");

    let hidden = get_post_for_user(&pool, post.public_id, other)
        .await
        .expect("other-user lookup failed");
    assert!(hidden.is_none(), "foreign post should be invisible");
}

// ---------------------------------------------------------------------------
// Section 7: Stale Brief Reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn reconcile_completes_stale_brief_with_posts(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    insert_draft_post(&pool, brief_id, "LinkedIn", "Hello", None)
        .await
        .expect("insert failed");
    backdate_brief(&pool, brief_id).await;

    let (completed, errored) = reconcile_stale_briefs(&pool, 900)
        .await
        .expect("reconcile failed");

    assert_eq!(completed, 1);
    assert_eq!(errored, 0);
    assert_eq!(fetch_brief_status(&pool, brief_id).await, "completed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn reconcile_errors_stale_brief_without_posts(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    backdate_brief(&pool, brief_id).await;

    let (completed, errored) = reconcile_stale_briefs(&pool, 900)
        .await
        .expect("reconcile failed");

    assert_eq!(completed, 0);
    assert_eq!(errored, 1);
    assert_eq!(fetch_brief_status(&pool, brief_id).await, "error");
}

#[sqlx::test(migrations = "../../migrations")]
async fn reconcile_ignores_fresh_processing_briefs(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;

    let (completed, errored) = reconcile_stale_briefs(&pool, 900)
        .await
        .expect("reconcile failed");

    assert_eq!(completed + errored, 0);
    assert_eq!(fetch_brief_status(&pool, brief_id).await, "processing");
}

#[sqlx::test(migrations = "../../migrations")]
async fn reconcile_ignores_terminal_briefs(pool: sqlx::PgPool) {
    let user_id = Uuid::new_v4();
    let brand_id = insert_test_brand(&pool, user_id, "Cann").await;
    let brief_id = insert_test_brief(&pool, user_id, brand_id).await;
    complete_brief(&pool, brief_id)
        .await
        .expect("complete failed");
    backdate_brief(&pool, brief_id).await;

    let (completed, errored) = reconcile_stale_briefs(&pool, 900)
        .await
        .expect("reconcile failed");

    assert_eq!(completed + errored, 0);
    assert_eq!(fetch_brief_status(&pool, brief_id).await, "completed");
}
