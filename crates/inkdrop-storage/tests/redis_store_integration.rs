use inkdrop_core::{NewPaste, PasteId, PasteStore};
use inkdrop_storage::{RedisPasteStore, RedisStoreConfig};
use inkdrop_test_infra::redis::{RedisConfig, RedisServer};
use jiff::{SignedDuration, Timestamp};
use redis::AsyncCommands;

struct Fixture {
    _redis: RedisServer,
    conn: redis::aio::MultiplexedConnection,
    store: RedisPasteStore,
}

impl Fixture {
    async fn start() -> Self {
        let redis = RedisServer::new(RedisConfig::default())
            .await
            .expect("start redis");
        let conn = redis.connection().await.expect("redis connection");
        let store = RedisPasteStore::new(conn.clone(), RedisStoreConfig::default());

        Self {
            _redis: redis,
            conn,
            store,
        }
    }
}

fn id(value: &str) -> PasteId {
    PasteId::new_unchecked(value)
}

fn new_paste(value: &str, ttl: Option<SignedDuration>, max_views: Option<u32>) -> NewPaste {
    let now = Timestamp::now();
    NewPaste {
        id: id(value),
        content: format!("content of {value}"),
        created_at: now,
        expires_at: ttl.map(|ttl| now + ttl),
        max_views,
    }
}

#[tokio::test]
async fn create_and_get_round_trips_the_paste() {
    let fixture = Fixture::start().await;

    fixture
        .store
        .create(new_paste("abc123", None, Some(2)))
        .await
        .unwrap();

    let paste = fixture.store.get(&id("abc123")).await.unwrap().unwrap();
    assert_eq!(paste.content, "content of abc123");
    assert_eq!(paste.max_views, Some(2));
    assert_eq!(paste.view_count, 0);
    assert_eq!(paste.expires_at, None);
}

#[tokio::test]
async fn get_unknown_paste_is_none() {
    let fixture = Fixture::start().await;
    assert!(fixture.store.get(&id("nope")).await.unwrap().is_none());
}

#[tokio::test]
async fn expiring_paste_registers_marker_with_native_ttl() {
    let mut fixture = Fixture::start().await;

    fixture
        .store
        .create(new_paste("ttl1", Some(SignedDuration::from_secs(60)), None))
        .await
        .unwrap();

    let marker: Option<String> = fixture.conn.get("ttl:ttl1").await.unwrap();
    assert_eq!(marker.as_deref(), Some("ttl1"));

    let ttl: i64 = fixture.conn.ttl("ttl:ttl1").await.unwrap();
    assert!((1..=60).contains(&ttl), "unexpected marker ttl {ttl}");

    let paste_ttl: i64 = fixture.conn.ttl("paste:ttl1").await.unwrap();
    assert_eq!(paste_ttl, -1, "paste document must not carry a ttl");
}

#[tokio::test]
async fn paste_without_expiry_has_no_marker() {
    let mut fixture = Fixture::start().await;

    fixture
        .store
        .create(new_paste("forever", None, None))
        .await
        .unwrap();

    let exists: bool = fixture.conn.exists("ttl:forever").await.unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn increment_view_persists_the_counter() {
    let fixture = Fixture::start().await;
    fixture
        .store
        .create(new_paste("views", None, Some(5)))
        .await
        .unwrap();

    fixture.store.increment_view(&id("views")).await.unwrap();
    fixture.store.increment_view(&id("views")).await.unwrap();

    let paste = fixture.store.get(&id("views")).await.unwrap().unwrap();
    assert_eq!(paste.view_count, 2);
}

#[tokio::test]
async fn increment_view_on_missing_paste_writes_nothing() {
    let mut fixture = Fixture::start().await;

    fixture.store.increment_view(&id("ghost")).await.unwrap();

    let exists: bool = fixture.conn.exists("paste:ghost").await.unwrap();
    assert!(!exists);
}

#[tokio::test]
async fn delete_removes_paste_and_marker() {
    let mut fixture = Fixture::start().await;
    fixture
        .store
        .create(new_paste("gone", Some(SignedDuration::from_secs(60)), None))
        .await
        .unwrap();

    assert!(fixture.store.delete(&id("gone")).await.unwrap());
    assert!(fixture.store.get(&id("gone")).await.unwrap().is_none());
    let marker_exists: bool = fixture.conn.exists("ttl:gone").await.unwrap();
    assert!(!marker_exists);
    assert!(!fixture.store.delete(&id("gone")).await.unwrap());
}

#[tokio::test]
async fn purge_expired_removes_only_expired_pastes() {
    let fixture = Fixture::start().await;
    let now = Timestamp::now();

    fixture
        .store
        .create(new_paste("short", Some(SignedDuration::from_secs(5)), None))
        .await
        .unwrap();
    fixture
        .store
        .create(new_paste("long", Some(SignedDuration::from_secs(3600)), None))
        .await
        .unwrap();
    fixture
        .store
        .create(new_paste("forever", None, None))
        .await
        .unwrap();

    let removed = fixture
        .store
        .purge_expired(now + SignedDuration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(fixture.store.get(&id("short")).await.unwrap().is_none());
    assert!(fixture.store.get(&id("long")).await.unwrap().is_some());
    assert!(fixture.store.get(&id("forever")).await.unwrap().is_some());
}

#[tokio::test]
async fn purge_expired_deletes_by_key_not_document_id() {
    let mut fixture = Fixture::start().await;

    fixture
        .store
        .create(new_paste("live", None, None))
        .await
        .unwrap();
    // expired document whose id field names another paste
    let _: () = fixture
        .conn
        .set(
            "paste:stale",
            r#"{"id":"live","content":"old","createdAt":1000,"expiresAt":2000,"maxViews":null,"viewCount":0}"#,
        )
        .await
        .unwrap();

    let removed = fixture.store.purge_expired(Timestamp::now()).await.unwrap();

    assert_eq!(removed, 1);
    let stale_exists: bool = fixture.conn.exists("paste:stale").await.unwrap();
    assert!(!stale_exists);
    assert!(fixture.store.get(&id("live")).await.unwrap().is_some());
}

#[tokio::test]
async fn reads_documents_written_in_the_shared_format() {
    let mut fixture = Fixture::start().await;

    let _: () = fixture
        .conn
        .set(
            "paste:legacy",
            r#"{"id":"legacy","content":"hi","createdAt":1700000000000,"expiresAt":null,"maxViews":3,"viewCount":1}"#,
        )
        .await
        .unwrap();

    let paste = fixture.store.get(&id("legacy")).await.unwrap().unwrap();
    assert_eq!(paste.content, "hi");
    assert_eq!(paste.max_views, Some(3));
    assert_eq!(paste.view_count, 1);
}

#[tokio::test]
async fn ping_succeeds_against_live_server() {
    let fixture = Fixture::start().await;
    fixture.store.ping().await.unwrap();
}

#[tokio::test]
async fn namespaced_keys_are_isolated() {
    let fixture = Fixture::start().await;
    let other = RedisPasteStore::new(
        fixture.conn.clone(),
        RedisStoreConfig::default().namespaced("other:"),
    );

    fixture
        .store
        .create(new_paste("shared", None, None))
        .await
        .unwrap();

    assert!(other.get(&id("shared")).await.unwrap().is_none());
}
