//! Coordinator behavior under partial, overlapping, and failing refreshes.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carelog_client::{ClientError, RemoteClient};
use carelog_core::analytics::AlertLevel;
use carelog_core::record::{NewHydration, NewMeal};
use carelog_core::{
    Child, ChildId, FeedItem, HandoffSummary, Kind, LogRecord, NewChild, NewRecord, RecordId,
    SleepUpdate, VoiceLogResponse, WeeklySummary,
};
use carelog_state::{Coordinator, CoordinatorError, RefreshError, RefreshStatus};
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::poll;
use serde_json::{Value, json};
use tokio::sync::oneshot;

// ========== Scripted client ==========

#[derive(Default)]
struct FakeClient {
    children: Mutex<Vec<Child>>,
    collections: Mutex<HashMap<(ChildId, Kind), Vec<Value>>>,
    failing: Mutex<HashSet<Kind>>,
    gates: Mutex<HashMap<(ChildId, Kind), oneshot::Receiver<()>>>,
    fetches: Mutex<HashMap<Kind, usize>>,
    reject_creates: AtomicBool,
    /// Store creates but answer with a body that is not a record.
    garble_replies: AtomicBool,
    next_id: AtomicI64,
}

impl FakeClient {
    fn set(&self, child: &ChildId, kind: Kind, records: Vec<Value>) {
        self.collections
            .lock()
            .unwrap()
            .insert((child.clone(), kind), records);
    }

    /// The next fetch of (child, kind) snapshots its data, then waits until
    /// the returned sender fires.
    fn gate(&self, child: &ChildId, kind: Kind) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((child.clone(), kind), rx);
        tx
    }

    fn fail(&self, kind: Kind) {
        self.failing.lock().unwrap().insert(kind);
    }

    fn fetch_count(&self, kind: Kind) -> usize {
        self.fetches.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    fn add_child(&self, id: &str, name: &str) {
        self.children.lock().unwrap().push(Child {
            id: child(id),
            name: name.to_string(),
            birthdate: None,
            created_at: None,
        });
    }
}

fn unavailable() -> ClientError {
    ClientError::Status {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        message: "down for maintenance".to_string(),
    }
}

#[async_trait]
impl RemoteClient for FakeClient {
    async fn fetch_children(&self) -> Result<Vec<Child>, ClientError> {
        Ok(self.children.lock().unwrap().clone())
    }

    async fn create_child(&self, new_child: &NewChild) -> Result<Child, ClientError> {
        let created = Child {
            id: new_child.id.clone(),
            name: new_child.name.clone(),
            birthdate: new_child.birthdate.clone(),
            created_at: None,
        };
        self.children.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_child(&self, id: &ChildId) -> Result<(), ClientError> {
        self.children.lock().unwrap().retain(|known| &known.id != id);
        Ok(())
    }

    async fn fetch_collection(
        &self,
        kind: Kind,
        child: &ChildId,
    ) -> Result<Vec<Value>, ClientError> {
        *self.fetches.lock().unwrap().entry(kind).or_default() += 1;
        let snapshot = self
            .collections
            .lock()
            .unwrap()
            .get(&(child.clone(), kind))
            .cloned()
            .unwrap_or_default();
        let failing = self.failing.lock().unwrap().contains(&kind);
        let gate = self.gates.lock().unwrap().remove(&(child.clone(), kind));
        if let Some(gate) = gate {
            gate.await.ok();
        }
        if failing {
            return Err(unavailable());
        }
        Ok(snapshot)
    }

    async fn create_record(
        &self,
        child: &ChildId,
        record: &NewRecord,
    ) -> Result<Value, ClientError> {
        if self.reject_creates.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let mut value = serde_json::to_value(record).unwrap();
        value["id"] = json!(1000 + self.next_id.fetch_add(1, Ordering::SeqCst));
        value["child_id"] = json!(child.as_str());
        value["created_at"] = json!(at(90));
        self.collections
            .lock()
            .unwrap()
            .entry((child.clone(), record.kind()))
            .or_default()
            .push(value.clone());
        if self.garble_replies.load(Ordering::SeqCst) {
            return Ok(json!({ "status": "ok" }));
        }
        Ok(value)
    }

    async fn update_sleep(
        &self,
        sleep: &RecordId,
        update: &SleepUpdate,
    ) -> Result<Value, ClientError> {
        let mut collections = self.collections.lock().unwrap();
        for ((_, kind), records) in collections.iter_mut() {
            if *kind != Kind::Sleep {
                continue;
            }
            for record in records.iter_mut() {
                if record["id"] == json!(sleep) {
                    record["end_time"] = json!(update.end_time);
                    record["quality_rating"] = json!(update.quality_rating);
                    return Ok(record.clone());
                }
            }
        }
        Err(ClientError::Status {
            status: reqwest::StatusCode::NOT_FOUND,
            message: "Sleep log not found".to_string(),
        })
    }

    async fn weekly_summary(&self, _child: &ChildId) -> Result<WeeklySummary, ClientError> {
        Err(ClientError::InvalidResponse("not scripted".to_string()))
    }

    async fn handoff_summary(&self, _child: &ChildId) -> Result<HandoffSummary, ClientError> {
        Ok(HandoffSummary {
            summary: vec!["Napped 90 minutes".to_string()],
            alert_level: AlertLevel::Low,
            recommendations: Vec::new(),
        })
    }

    async fn process_voice_log(
        &self,
        child: &ChildId,
        _text: &str,
    ) -> Result<VoiceLogResponse, ClientError> {
        self.collections
            .lock()
            .unwrap()
            .entry((child.clone(), Kind::Meal))
            .or_default()
            .push(sample(Kind::Meal, child.as_str(), 500, 95));
        Ok(VoiceLogResponse {
            success: true,
            processed_types: vec!["meal".to_string()],
            message: "Logged 1 entry".to_string(),
        })
    }
}

// ========== Fixtures ==========

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

fn at(minutes: i64) -> String {
    (t0() + Duration::minutes(minutes)).to_rfc3339()
}

fn child(id: &str) -> ChildId {
    ChildId::new(id).unwrap()
}

fn sample(kind: Kind, child: &str, id: i64, minute: i64) -> Value {
    let ts = at(minute);
    match kind {
        Kind::Meal => json!({
            "id": id, "child_id": child, "meal_type": "Lunch",
            "notes": format!("meal {id} for {child}"), "created_at": ts
        }),
        Kind::Sleep => json!({
            "id": id, "child_id": child, "start_time": ts, "end_time": null, "created_at": ts
        }),
        Kind::Behavior => json!({
            "id": id, "child_id": child, "behavior_type": "calm", "mood_rating": 4,
            "created_at": ts
        }),
        Kind::Hydration => json!({
            "id": id, "child_id": child, "fluid_type": "Water", "amount_ml": 200,
            "created_at": ts
        }),
        Kind::Location => json!({
            "id": id, "child_id": child, "latitude": "1.0", "longitude": "2.0",
            "location_name": "Park", "created_at": ts
        }),
        Kind::Activity => json!({
            "id": id, "child_id": child, "activity_type": "Walk",
            "details": {"duration_minutes": 20}, "created_at": ts
        }),
    }
}

/// Three records per kind, with every kind sharing one tied timestamp.
fn seed(client: &FakeClient, id: &str) {
    for (offset, kind) in (0_i64..).zip(Kind::ALL) {
        client.set(
            &child(id),
            kind,
            vec![
                sample(kind, id, 1, offset * 10),
                sample(kind, id, 2, offset * 10 + 5),
                sample(kind, id, 3, 0),
            ],
        );
    }
}

fn ids(items: &[FeedItem]) -> Vec<String> {
    items.iter().map(|item| item.id.to_string()).collect()
}

// ========== Ordering ==========

#[tokio::test]
async fn settled_feed_is_independent_of_completion_order() {
    let client = Arc::new(FakeClient::default());
    seed(&client, "a");
    let a = child("a");

    let forward = Coordinator::new(client.clone());
    for kind in Kind::ALL {
        forward.refresh_kind(kind, &a).await.unwrap();
    }

    let backward = Coordinator::new(client.clone());
    for kind in Kind::ALL.into_iter().rev() {
        backward.refresh_kind(kind, &a).await.unwrap();
    }

    let concurrent = Coordinator::new(client.clone());
    let mut senders: Vec<Option<oneshot::Sender<()>>> = Kind::ALL
        .into_iter()
        .map(|kind| Some(client.gate(&a, kind)))
        .collect();
    let mut all = std::pin::pin!(concurrent.refresh_all(&a));
    assert!(poll!(all.as_mut()).is_pending());

    let release_order = [3, 0, 5, 1, 4, 2];
    for (step, index) in release_order.into_iter().enumerate() {
        senders[index].take().unwrap().send(()).unwrap();
        if step + 1 < release_order.len() {
            assert!(poll!(all.as_mut()).is_pending());
            // Every intermediate feed is exactly the released kinds' records.
            let partial = concurrent.child_feed(&a);
            assert_eq!(partial.len(), 3 * (step + 1));
            let released: HashSet<Kind> = release_order[..=step]
                .iter()
                .map(|&i| Kind::ALL[i])
                .collect();
            assert!(partial.iter().all(|item| released.contains(&item.kind)));
        }
    }
    let report = all.await;
    assert!(report.is_complete());

    let expected = forward.child_feed(&a);
    assert_eq!(expected.len(), 18);
    assert_eq!(&*backward.child_feed(&a), &*expected);
    assert_eq!(&*concurrent.child_feed(&a), &*expected);
}

#[tokio::test]
async fn tied_timestamps_break_by_kind_then_id() {
    let client = Arc::new(FakeClient::default());
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client);
    coordinator.refresh_all(&a).await;

    let feed = coordinator.child_feed(&a);
    let tail: Vec<String> = ids(&feed).into_iter().rev().take(6).collect();
    assert_eq!(
        tail,
        vec!["activity-3", "location-3", "hydration-3", "behavior-3", "sleep-3", "meal-3"]
    );
}

#[tokio::test]
async fn repeated_refresh_is_idempotent() {
    let client = Arc::new(FakeClient::default());
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client);

    coordinator.refresh_kind(Kind::Meal, &a).await.unwrap();
    let first = coordinator.child_feed(&a);
    coordinator.refresh_kind(Kind::Meal, &a).await.unwrap();
    let second = coordinator.child_feed(&a);

    assert_eq!(&*first, &*second);
    let unique: HashSet<String> = ids(&second).into_iter().collect();
    assert_eq!(unique.len(), second.len());
    assert_eq!(second.len(), 3);
}

#[tokio::test]
async fn older_overlapping_refresh_is_superseded() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    client.set(&a, Kind::Hydration, vec![sample(Kind::Hydration, "a", 1, 0)]);
    let coordinator = Coordinator::new(client.clone());

    let gate = client.gate(&a, Kind::Hydration);
    let mut slow = std::pin::pin!(coordinator.refresh_kind(Kind::Hydration, &a));
    assert!(poll!(slow.as_mut()).is_pending());

    client.set(
        &a,
        Kind::Hydration,
        vec![
            sample(Kind::Hydration, "a", 1, 0),
            sample(Kind::Hydration, "a", 2, 10),
        ],
    );
    let fast = coordinator.refresh_kind(Kind::Hydration, &a).await.unwrap();
    assert_eq!(fast.status, RefreshStatus::Applied);

    gate.send(()).unwrap();
    let stale = slow.await.unwrap();
    assert_eq!(stale.status, RefreshStatus::Superseded);
    assert_eq!(coordinator.collection(&a, Kind::Hydration).len(), 2);
}

// ========== Selection ==========

#[tokio::test]
async fn first_child_is_auto_selected() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    client.add_child("b", "Leo");
    let coordinator = Coordinator::new(client);

    let children = coordinator.refresh_children().await.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(coordinator.selected_child(), Some(child("a")));

    coordinator.select_child(&child("b")).unwrap();
    coordinator.refresh_children().await.unwrap();
    assert_eq!(coordinator.selected_child(), Some(child("b")));
}

#[tokio::test]
async fn selecting_unlisted_child_is_rejected() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    let coordinator = Coordinator::new(client);
    coordinator.refresh_children().await.unwrap();

    let err = coordinator.select_child(&child("zzz")).unwrap_err();
    assert!(matches!(err, CoordinatorError::UnknownChild(_)));
    assert_eq!(coordinator.selected_child(), Some(child("a")));
}

#[tokio::test]
async fn late_result_for_previous_child_never_reaches_displayed_feed() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    client.add_child("b", "Leo");
    seed(&client, "a");
    seed(&client, "b");
    let (a, b) = (child("a"), child("b"));
    let coordinator = Coordinator::new(client.clone());
    coordinator.refresh_children().await.unwrap();
    assert_eq!(coordinator.selected_child(), Some(a.clone()));

    let gate = client.gate(&a, Kind::Meal);
    let mut slow = std::pin::pin!(coordinator.refresh_kind(Kind::Meal, &a));
    assert!(poll!(slow.as_mut()).is_pending());

    coordinator.select_child(&b).unwrap();
    coordinator.refresh_kind(Kind::Meal, &b).await.unwrap();

    gate.send(()).unwrap();
    let outcome = slow.await.unwrap();
    assert_eq!(outcome.status, RefreshStatus::Applied);

    let shown = coordinator.feed();
    assert_eq!(shown.child, Some(b.clone()));
    assert_eq!(shown.items.len(), 3);
    assert!(
        shown
            .items
            .iter()
            .all(|item| item.subtitle.ends_with("for b"))
    );

    // A's result is kept for A and shown once A is selected again.
    coordinator.select_child(&a).unwrap();
    let shown = coordinator.feed();
    assert_eq!(shown.items.len(), 3);
    assert!(shown.items.iter().all(|item| item.subtitle.ends_with("for a")));
}

#[tokio::test]
async fn subscribers_see_selected_child_updates() {
    let client = Arc::new(FakeClient::default());
    seed(&client, "a");
    seed(&client, "b");
    let (a, b) = (child("a"), child("b"));
    let coordinator = Coordinator::new(client);
    let mut rx = coordinator.subscribe();

    coordinator.select_child(&a).unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().items.is_empty());

    coordinator.refresh_kind(Kind::Sleep, &a).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().items.len(), 3);

    coordinator.refresh_kind(Kind::Sleep, &b).await.unwrap();
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn logout_drops_state_and_in_flight_results() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());
    coordinator.refresh_children().await.unwrap();
    coordinator.refresh_kind(Kind::Meal, &a).await.unwrap();

    let gate = client.gate(&a, Kind::Sleep);
    let mut pending = std::pin::pin!(coordinator.refresh_kind(Kind::Sleep, &a));
    assert!(poll!(pending.as_mut()).is_pending());

    coordinator.logout();
    gate.send(()).unwrap();
    let outcome = pending.await.unwrap();

    assert_eq!(outcome.status, RefreshStatus::Discarded);
    assert!(coordinator.selection().children.is_empty());
    assert!(coordinator.selected_child().is_none());
    assert!(coordinator.child_feed(&a).is_empty());
    assert!(coordinator.feed().items.is_empty());
}

#[tokio::test]
async fn removed_child_state_stays_removed_after_late_result() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    client.add_child("b", "Leo");
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());
    coordinator.refresh_children().await.unwrap();

    let gate = client.gate(&a, Kind::Meal);
    let mut pending = std::pin::pin!(coordinator.refresh_kind(Kind::Meal, &a));
    assert!(poll!(pending.as_mut()).is_pending());

    coordinator.remove_child(&a).await.unwrap();
    gate.send(()).unwrap();
    let outcome = pending.await.unwrap();

    assert_eq!(outcome.status, RefreshStatus::Discarded);
    assert!(coordinator.child_feed(&a).is_empty());
    assert!(coordinator.with_child_state(&a, |_| ()).is_none());
    assert_eq!(coordinator.selected_child(), Some(child("b")));
    assert!(coordinator.feed().items.is_empty());
}

#[tokio::test]
async fn removing_selected_child_moves_selection() {
    let client = Arc::new(FakeClient::default());
    client.add_child("a", "Maya");
    client.add_child("b", "Leo");
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client);
    coordinator.refresh_children().await.unwrap();
    coordinator.refresh_all(&a).await;

    coordinator.remove_child(&a).await.unwrap();

    assert!(coordinator.child_feed(&a).is_empty());
    assert_eq!(coordinator.selected_child(), Some(child("b")));
    assert_eq!(coordinator.selection().children.len(), 1);
}

#[tokio::test]
async fn added_child_appears_in_children_list() {
    let client = Arc::new(FakeClient::default());
    let coordinator = Coordinator::new(client);

    let created = coordinator
        .add_child("Noor", Some("2021-06-01".to_string()))
        .await
        .unwrap();

    assert_eq!(created.name, "Noor");
    assert!(uuid_like(created.id.as_str()));
    assert_eq!(coordinator.selected_child(), Some(created.id));
}

fn uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().filter(|&c| c == '-').count() == 4
}

// ========== Failures ==========

#[tokio::test]
async fn failed_refresh_keeps_previous_collection_and_spares_siblings() {
    let client = Arc::new(FakeClient::default());
    seed(&client, "a");
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());
    coordinator.refresh_all(&a).await;

    client.fail(Kind::Hydration);
    client.set(&a, Kind::Hydration, Vec::new());
    client.set(
        &a,
        Kind::Meal,
        vec![
            sample(Kind::Meal, "a", 1, 0),
            sample(Kind::Meal, "a", 2, 5),
            sample(Kind::Meal, "a", 3, 0),
            sample(Kind::Meal, "a", 4, 60),
        ],
    );
    let report = coordinator.refresh_all(&a).await;

    let failures: Vec<&RefreshError> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        RefreshError::Fetch {
            kind: Kind::Hydration,
            ..
        }
    ));
    assert_eq!(coordinator.collection(&a, Kind::Hydration).len(), 3);
    assert_eq!(coordinator.collection(&a, Kind::Meal).len(), 4);
    assert_eq!(coordinator.child_feed(&a).len(), 19);
}

#[tokio::test]
async fn malformed_record_costs_only_itself() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    let mut records: Vec<Value> = (1..=10)
        .map(|id| sample(Kind::Behavior, "a", id, id))
        .collect();
    records[4].as_object_mut().unwrap().remove("behavior_type");
    client.set(&a, Kind::Behavior, records);
    let coordinator = Coordinator::new(client);

    let outcome = coordinator.refresh_kind(Kind::Behavior, &a).await.unwrap();

    assert_eq!(outcome.records, 9);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(coordinator.child_feed(&a).len(), 9);
    assert!(!ids(&coordinator.child_feed(&a)).contains(&"behavior-5".to_string()));
}

// ========== Writes ==========

#[tokio::test]
async fn created_record_is_refreshed_into_feed() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());
    coordinator.select_child(&a).unwrap();

    let record = NewRecord::Hydration(NewHydration {
        fluid_type: "Water".to_string(),
        amount_ml: 250,
        notes: None,
    });
    let created = coordinator.log_record(&a, &record).await.unwrap().unwrap();

    assert_eq!(created.kind(), Kind::Hydration);
    assert_eq!(client.fetch_count(Kind::Hydration), 1);
    let shown = coordinator.feed();
    assert_eq!(shown.items.len(), 1);
    assert_eq!(shown.items[0].id.to_string(), format!("hydration-{}", created.id()));
    assert_eq!(shown.items[0].subtitle, "250ml of Water");
}

#[tokio::test]
async fn failed_create_commits_nothing() {
    let client = Arc::new(FakeClient::default());
    client.reject_creates.store(true, Ordering::SeqCst);
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());

    let record = NewRecord::Meal(NewMeal {
        meal_type: "Dinner".to_string(),
        photo_url: None,
        notes: None,
    });
    let err = coordinator.log_record(&a, &record).await.unwrap_err();

    assert!(matches!(err, CoordinatorError::Client(_)));
    assert_eq!(client.fetch_count(Kind::Meal), 0);
    assert!(coordinator.collection(&a, Kind::Meal).is_empty());
}

#[tokio::test]
async fn unreadable_create_reply_still_reports_success() {
    let client = Arc::new(FakeClient::default());
    client.garble_replies.store(true, Ordering::SeqCst);
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());
    coordinator.select_child(&a).unwrap();

    let record = NewRecord::Meal(NewMeal {
        meal_type: "Dinner".to_string(),
        photo_url: None,
        notes: None,
    });
    let created = coordinator.log_record(&a, &record).await.unwrap();

    assert!(created.is_none());
    assert_eq!(coordinator.collection(&a, Kind::Meal).len(), 1);
    assert_eq!(coordinator.feed().items.len(), 1);
    assert_eq!(coordinator.feed().items[0].title, "Dinner");
}

#[tokio::test]
async fn ending_sleep_closes_active_log() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    client.set(&a, Kind::Sleep, vec![sample(Kind::Sleep, "a", 1, 0)]);
    let coordinator = Coordinator::new(client);
    coordinator.refresh_kind(Kind::Sleep, &a).await.unwrap();
    assert!(
        coordinator
            .with_child_state(&a, |state| state.active_sleep().is_some())
            .unwrap()
    );

    let update = SleepUpdate {
        end_time: t0() + Duration::minutes(45),
        quality_rating: Some(4),
        notes: None,
    };
    let updated = coordinator
        .end_sleep(&a, &RecordId::Int(1), &update)
        .await
        .unwrap()
        .unwrap();

    let LogRecord::Sleep(sleep) = updated else {
        panic!("expected sleep record");
    };
    assert_eq!(sleep.end_time, Some(t0() + Duration::minutes(45)));
    assert!(
        coordinator
            .with_child_state(&a, |state| state.active_sleep().is_none())
            .unwrap()
    );
}

#[tokio::test]
async fn voice_log_refreshes_every_kind() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    let coordinator = Coordinator::new(client.clone());

    let (response, report) = coordinator
        .process_voice_log(&a, "had a banana at snack time")
        .await
        .unwrap();

    assert!(response.success);
    assert!(report.is_complete());
    for kind in Kind::ALL {
        assert_eq!(client.fetch_count(kind), 1, "{kind} not refreshed");
    }
    assert_eq!(coordinator.collection(&a, Kind::Meal).len(), 1);
}

#[tokio::test]
async fn analytics_pass_through_client_results() {
    let client = Arc::new(FakeClient::default());
    let a = child("a");
    let coordinator = Coordinator::new(client);

    let handoff = coordinator.handoff_summary(&a).await.unwrap();
    assert_eq!(handoff.alert_level, AlertLevel::Low);

    let err = coordinator.weekly_summary(&a).await.unwrap_err();
    assert!(matches!(err, CoordinatorError::Client(ClientError::InvalidResponse(_))));
}
